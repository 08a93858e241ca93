// Deals service
// Deal creation/editing and the two ways a deal changes stage.
//
// Stage picked in the deal form: probability follows the stage map.
// Stage changed by dragging on the board: probability is left as it was.

use serde::Serialize;

use crate::activity::ActivityEvent;
use crate::aggregate::PipelineSummary;
use crate::board::{group_by_column, BoardColumn, BoardTarget};
use crate::error::{Notice, PipelineError};
use crate::filter::{filter_deals, DealQuery};
use crate::forms::DealForm;
use crate::stage::DealStage;
use crate::state::Session;
use crate::store::EntityStore;
use crate::types::{Deal, Lead, Task};

/// Validate the form and add a new deal at the top of the list.
///
/// The linked lead is required on the form but not checked for existence.
pub fn create_deal(session: &mut Session, form: &DealForm) -> Result<Deal, PipelineError> {
    let input = form.validate().map_err(|e| session.reject(e))?;

    let now = session.now_iso();
    let deal = Deal {
        id: session.next_id(),
        title: input.title,
        lead_id: input.lead_id,
        value: input.value,
        stage: input.stage,
        probability: input.probability,
        expected_close_date: input.expected_close_date,
        note: input.note,
        created_at: now.clone(),
        updated_at: now,
    };

    session.store.prepend_deal(deal.clone());
    session.record(ActivityEvent::deal_created(&deal.id, &deal.title));
    session.notify(Notice::success("Deal created successfully"));
    log::info!("Deal {} created at stage {}", deal.id, deal.stage);
    Ok(deal)
}

/// Apply an edit form to an existing deal. Stage and probability are taken
/// from the form as submitted.
pub fn update_deal(
    session: &mut Session,
    id: &str,
    form: &DealForm,
) -> Result<Deal, PipelineError> {
    let mut deal = session
        .store
        .deal(id)
        .cloned()
        .ok_or_else(|| PipelineError::not_found("Deal", id))?;
    let input = form.validate().map_err(|e| session.reject(e))?;

    let from = deal.stage;
    deal.title = input.title;
    deal.lead_id = input.lead_id;
    deal.value = input.value;
    deal.stage = input.stage;
    deal.probability = input.probability;
    deal.expected_close_date = input.expected_close_date;
    deal.note = input.note;
    deal.updated_at = session.now_iso();
    session.store.replace_deal(deal.clone());

    if from != deal.stage {
        session.record(ActivityEvent::deal_stage_changed(
            &deal.id,
            &deal.title,
            from,
            deal.stage,
        ));
    } else {
        session.record(ActivityEvent::deal_updated(&deal.id, &deal.title));
    }
    session.notify(Notice::success("Deal updated successfully"));
    Ok(deal)
}

fn change_stage(
    session: &mut Session,
    id: &str,
    stage: DealStage,
    derive_probability: bool,
) -> Result<Deal, PipelineError> {
    let Some(mut deal) = session.store.deal(id).cloned() else {
        log::warn!("Stage change: deal {} not found", id);
        return Err(PipelineError::not_found("Deal", id));
    };

    let from = deal.stage;
    deal.stage = stage;
    if derive_probability {
        deal.probability = stage.default_probability();
    }
    deal.updated_at = session.now_iso();
    session.store.replace_deal(deal.clone());

    session.record(ActivityEvent::deal_stage_changed(&deal.id, &deal.title, from, stage));
    session.notify(Notice::success(format!("Deal moved to {}", stage.label())));
    Ok(deal)
}

/// Stage chosen explicitly (form dropdown): probability follows the stage map.
pub fn set_stage_with_derived_probability(
    session: &mut Session,
    id: &str,
    stage: DealStage,
) -> Result<Deal, PipelineError> {
    change_stage(session, id, stage, true)
}

/// Stage changed by a board drop: probability keeps its previous value.
pub fn set_stage_only(
    session: &mut Session,
    id: &str,
    stage: DealStage,
) -> Result<Deal, PipelineError> {
    change_stage(session, id, stage, false)
}

/// Remove a deal. Tasks linked to it keep the id and render without a title.
pub fn delete_deal(session: &mut Session, id: &str) -> Result<Deal, PipelineError> {
    let deal = session
        .store
        .remove_deal(id)
        .ok_or_else(|| PipelineError::not_found("Deal", id))?;

    session.record(ActivityEvent::deal_deleted(&deal.id, &deal.title));
    session.notify(Notice::success("Deal deleted"));
    Ok(deal)
}

impl BoardTarget<DealStage> for Session {
    fn reassign(&mut self, record_id: &str, column: DealStage) -> Result<(), PipelineError> {
        set_stage_only(self, record_id, column).map(|_| ())
    }
}

// =============================================================================
// Views
// =============================================================================

pub fn list_deals<'a>(store: &'a EntityStore, query: &DealQuery) -> Vec<&'a Deal> {
    filter_deals(&store.deals, query)
}

/// Filtered deals grouped into one column per stage, each with its value total.
pub fn deal_board<'a>(
    store: &'a EntityStore,
    query: &DealQuery,
) -> Vec<BoardColumn<'a, DealStage, Deal>> {
    let deals = filter_deals(&store.deals, query);
    let value = |d: &Deal| d.value;
    group_by_column(
        &DealStage::ALL,
        &deals,
        |d: &Deal| d.stage,
        DealStage::column_title,
        Some(&value as &dyn Fn(&Deal) -> f64),
    )
}

/// Pipeline figures over every deal, regardless of the active filter.
pub fn pipeline_summary(store: &EntityStore) -> PipelineSummary {
    let deals: Vec<&Deal> = store.deals.iter().collect();
    PipelineSummary::compute(&deals)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealDetail<'a> {
    pub deal: &'a Deal,
    /// `None` when the linked lead has been deleted.
    pub lead: Option<&'a Lead>,
    pub lead_name: &'a str,
    pub weighted_value: f64,
    /// Tasks of the linked lead.
    pub tasks: Vec<&'a Task>,
}

pub fn deal_detail<'a>(store: &'a EntityStore, id: &str) -> Option<DealDetail<'a>> {
    let deal = store.deal(id)?;
    Some(DealDetail {
        deal,
        lead: store.lead(&deal.lead_id),
        lead_name: store.lead_name(&deal.lead_id),
        weighted_value: deal.weighted_value(),
        tasks: store.tasks_for_lead(&deal.lead_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardController;
    use crate::error::ValidationError;
    use crate::filter::StateFilter;
    use crate::store::{FixedClock, SequentialIds};
    use chrono::TimeZone;

    fn session() -> (Session, FixedClock) {
        let clock = FixedClock::new(chrono::Utc.with_ymd_and_hms(2024, 12, 6, 9, 0, 0).unwrap());
        let session = Session::new(crate::seed::demo_store())
            .with_clock(clock.clone())
            .with_ids(SequentialIds::new("deal"));
        (session, clock)
    }

    fn proposal_form() -> DealForm {
        let mut form = DealForm::for_lead(Some("3"));
        form.title = "Global Expansion".to_string();
        form.value = "52000".to_string();
        form.select_stage(DealStage::Proposal);
        form
    }

    #[test]
    fn form_stage_then_board_drag_keeps_probability() {
        let (mut session, clock) = session();
        let deal = create_deal(&mut session, &proposal_form()).unwrap();
        assert_eq!(deal.stage, DealStage::Proposal);
        assert_eq!(deal.probability, 50);

        clock.advance(chrono::Duration::minutes(5));
        let mut board = BoardController::<DealStage>::new();
        board.drag_start(&deal.id);
        board.drop_on(DealStage::Negotiation, &mut session);

        let moved = session.store.deal(&deal.id).unwrap();
        assert_eq!(moved.stage, DealStage::Negotiation);
        assert_eq!(moved.probability, 50);
        assert_eq!(moved.updated_at, "2024-12-06T09:05:00.000Z");
    }

    #[test]
    fn explicit_stage_selection_derives_probability() {
        let (mut session, _) = session();
        let deal = set_stage_with_derived_probability(&mut session, "2", DealStage::ClosedWon).unwrap();
        assert_eq!(deal.probability, 100);
        let deal = set_stage_only(&mut session, "2", DealStage::Qualified).unwrap();
        assert_eq!(deal.stage, DealStage::Qualified);
        assert_eq!(deal.probability, 100);
    }

    #[test]
    fn closed_deals_can_be_reopened() {
        let (mut session, _) = session();
        set_stage_only(&mut session, "1", DealStage::ClosedLost).unwrap();
        assert_eq!(pipeline_summary(&session.store).pipeline_value, 75000.0);
        set_stage_only(&mut session, "1", DealStage::Proposal).unwrap();
        assert_eq!(pipeline_summary(&session.store).pipeline_value, 120000.0);
    }

    #[test]
    fn stage_change_toast_uses_label() {
        let (mut session, _) = session();
        session.drain_notices();
        set_stage_only(&mut session, "3", DealStage::ClosedWon).unwrap();
        assert_eq!(
            session.drain_notices(),
            vec![Notice::success("Deal moved to Closed Won")]
        );
        assert_eq!(
            session.activity()[0].description,
            "Deal \"Global Industries Pilot\" marked as Closed Won"
        );
    }

    #[test]
    fn create_requires_lead_and_value() {
        let (mut session, _) = session();
        let mut form = proposal_form();
        form.lead_id.clear();
        let err = create_deal(&mut session, &form).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation(ValidationError::LeadNotSelected)
        ));
        form.lead_id = "3".to_string();
        form.value = "lots".to_string();
        assert!(create_deal(&mut session, &form).is_err());
        assert_eq!(session.store.deals.len(), 4);
    }

    #[test]
    fn deal_for_missing_lead_shows_unknown() {
        let (mut session, _) = session();
        let mut form = proposal_form();
        form.lead_id = "ghost".to_string();
        let deal = create_deal(&mut session, &form).unwrap();
        let detail = deal_detail(&session.store, &deal.id).unwrap();
        assert!(detail.lead.is_none());
        assert_eq!(detail.lead_name, "Unknown");
        assert_eq!(detail.weighted_value, 26000.0);
    }

    #[test]
    fn update_records_stage_move_from_form() {
        let (mut session, _) = session();
        let mut form = DealForm::from_deal(session.store.deal("4").unwrap());
        form.select_stage(DealStage::Negotiation);
        let deal = update_deal(&mut session, "4", &form).unwrap();
        assert_eq!(deal.probability, 70);
        assert_eq!(
            session.activity()[0].description,
            "Deal \"Startup Labs Growth Plan\" moved from Qualified to Negotiation"
        );
    }

    #[test]
    fn board_columns_carry_totals() {
        let (session, _) = session();
        let columns = deal_board(&session.store, &DealQuery::default());
        assert_eq!(columns.len(), 6);
        assert_eq!(columns[2].title, "Proposal");
        assert_eq!(columns[2].total, Some(45000.0));
        assert_eq!(columns[4].title, "Won");
        assert_eq!(columns[4].count, 0);
        assert_eq!(columns[4].total, Some(0.0));
    }

    #[test]
    fn summary_ignores_the_view_filter() {
        let (session, _) = session();
        let query = DealQuery {
            text: "acme".to_string(),
            stage: StateFilter::Only(DealStage::Proposal),
        };
        assert_eq!(list_deals(&session.store, &query).len(), 1);
        let summary = pipeline_summary(&session.store);
        assert_eq!(summary.pipeline_value, 120000.0);
        assert_eq!(summary.weighted_value, 62400.0);
    }

    #[test]
    fn delete_leaves_linked_tasks() {
        let (mut session, _) = session();
        let deal = delete_deal(&mut session, "2").unwrap();
        assert_eq!(deal.title, "TechStart SaaS License");
        assert_eq!(session.store.tasks_for_deal("2").len(), 2);
        assert_eq!(session.store.deal_title(Some("2")), None);
        assert!(matches!(
            delete_deal(&mut session, "2"),
            Err(PipelineError::NotFound { .. })
        ));
    }

    #[test]
    fn detail_resolves_lead_and_its_tasks() {
        let (session, _) = session();
        let detail = deal_detail(&session.store, "1").unwrap();
        assert_eq!(detail.lead_name, "John Smith");
        assert_eq!(detail.tasks.len(), 1);
        assert_eq!(detail.weighted_value, 27000.0);
    }
}
