// Leads service
// Create/edit/delete leads and move them between statuses.

use serde::Serialize;

use crate::activity::ActivityEvent;
use crate::aggregate::{status_counts, total_pipeline_value};
use crate::board::{group_by_column, BoardColumn, BoardTarget};
use crate::error::{Notice, PipelineError};
use crate::filter::{filter_leads, LeadQuery};
use crate::forms::{LeadForm, LeadInput};
use crate::stage::LeadStatus;
use crate::state::Session;
use crate::store::EntityStore;
use crate::types::{Deal, Lead, Note, Task};

fn apply_input(lead: &mut Lead, input: LeadInput) {
    lead.name = input.name;
    lead.company = input.company;
    lead.contact_name = input.contact_name;
    lead.email = input.email;
    lead.phone = input.phone;
    lead.status = input.status;
    lead.source = input.source;
    lead.priority = input.priority;
    lead.next_action = input.next_action;
    lead.next_action_date = input.next_action_date;
}

/// Validate the form and add a new lead at the top of the list.
pub fn create_lead(session: &mut Session, form: &LeadForm) -> Result<Lead, PipelineError> {
    let input = form.validate().map_err(|e| session.reject(e))?;

    let now = session.now_iso();
    let id = session.next_id();
    let mut lead = Lead {
        id,
        name: String::new(),
        company: None,
        contact_name: None,
        email: None,
        phone: None,
        status: LeadStatus::New,
        source: None,
        priority: None,
        next_action: None,
        next_action_date: None,
        created_at: now.clone(),
        updated_at: now,
    };
    apply_input(&mut lead, input);

    session.store.prepend_lead(lead.clone());
    session.record(ActivityEvent::lead_created(&lead.id, &lead.name));
    session.notify(Notice::success("Lead created successfully"));
    log::info!("Lead {} created", lead.id);
    Ok(lead)
}

/// Apply an edit form to an existing lead.
pub fn update_lead(
    session: &mut Session,
    id: &str,
    form: &LeadForm,
) -> Result<Lead, PipelineError> {
    let mut lead = session
        .store
        .lead(id)
        .cloned()
        .ok_or_else(|| PipelineError::not_found("Lead", id))?;
    let input = form.validate().map_err(|e| session.reject(e))?;

    apply_input(&mut lead, input);
    lead.updated_at = session.now_iso();
    session.store.replace_lead(lead.clone());

    session.record(ActivityEvent::lead_updated(&lead.id, &lead.name));
    session.notify(Notice::success("Lead updated successfully"));
    Ok(lead)
}

/// Move a lead to any status. Re-stamps `updated_at` even when the status
/// does not change.
pub fn set_status(
    session: &mut Session,
    id: &str,
    status: LeadStatus,
) -> Result<(), PipelineError> {
    let Some(mut lead) = session.store.lead(id).cloned() else {
        log::warn!("set_status: lead {} not found", id);
        return Err(PipelineError::not_found("Lead", id));
    };

    let from = lead.status;
    lead.status = status;
    lead.updated_at = session.now_iso();
    session.store.replace_lead(lead.clone());

    session.record(ActivityEvent::lead_status_changed(
        id,
        &lead.name,
        from.label(),
        status.label(),
    ));
    session.notify(Notice::success("Lead status updated"));
    Ok(())
}

/// Remove a lead. Deals and tasks that reference it are kept and will show
/// the lead as "Unknown".
pub fn delete_lead(session: &mut Session, id: &str) -> Result<Lead, PipelineError> {
    let lead = session
        .store
        .remove_lead(id)
        .ok_or_else(|| PipelineError::not_found("Lead", id))?;

    let orphaned = session.store.deals_for_lead(id).len() + session.store.tasks_for_lead(id).len();
    if orphaned > 0 {
        log::debug!("Lead {} deleted with {} dependent records left in place", id, orphaned);
    }

    session.record(ActivityEvent::lead_deleted(&lead.id, &lead.name));
    session.notify(Notice::success("Lead deleted"));
    Ok(lead)
}

impl BoardTarget<LeadStatus> for Session {
    fn reassign(&mut self, record_id: &str, column: LeadStatus) -> Result<(), PipelineError> {
        set_status(self, record_id, column)
    }
}

// =============================================================================
// Views
// =============================================================================

pub fn list_leads<'a>(store: &'a EntityStore, query: &LeadQuery) -> Vec<&'a Lead> {
    filter_leads(&store.leads, query)
}

/// Filtered leads grouped into one column per status.
pub fn lead_board<'a>(
    store: &'a EntityStore,
    query: &LeadQuery,
) -> Vec<BoardColumn<'a, LeadStatus, Lead>> {
    let leads = filter_leads(&store.leads, query);
    group_by_column(
        &LeadStatus::ALL,
        &leads,
        |l: &Lead| l.status,
        LeadStatus::column_title,
        None,
    )
}

/// Number of filtered leads per status.
pub fn lead_status_counts(store: &EntityStore, query: &LeadQuery) -> Vec<(LeadStatus, usize)> {
    status_counts(&filter_leads(&store.leads, query))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDetail<'a> {
    pub lead: &'a Lead,
    pub deals: Vec<&'a Deal>,
    pub tasks: Vec<&'a Task>,
    pub notes: Vec<&'a Note>,
    pub open_tasks: usize,
    pub pipeline_value: f64,
}

pub fn lead_detail<'a>(store: &'a EntityStore, id: &str) -> Option<LeadDetail<'a>> {
    let lead = store.lead(id)?;
    let deals = store.deals_for_lead(id);
    let tasks = store.tasks_for_lead(id);
    Some(LeadDetail {
        lead,
        open_tasks: tasks.iter().filter(|t| !t.is_completed).count(),
        pipeline_value: total_pipeline_value(deals.iter().copied()),
        notes: store.notes_for_lead(id),
        deals,
        tasks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardController, DropOutcome};
    use crate::error::{NoticeLevel, ValidationError};
    use crate::filter::StateFilter;
    use crate::store::{FixedClock, SequentialIds};
    use chrono::TimeZone;

    fn session() -> (Session, FixedClock) {
        let clock = FixedClock::new(chrono::Utc.with_ymd_and_hms(2024, 12, 6, 9, 0, 0).unwrap());
        let session = Session::new(crate::seed::demo_store())
            .with_clock(clock.clone())
            .with_ids(SequentialIds::new("lead"));
        (session, clock)
    }

    #[test]
    fn create_prepends_and_stamps() {
        let (mut session, _) = session();
        let form = LeadForm {
            name: "Ada Lovelace".to_string(),
            email: "ada@engines.io".to_string(),
            ..LeadForm::default()
        };
        let lead = create_lead(&mut session, &form).unwrap();
        assert_eq!(lead.id, "lead-1");
        assert_eq!(session.store.leads[0].id, "lead-1");
        assert_eq!(lead.created_at, "2024-12-06T09:00:00.000Z");
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(session.activity()[0].description, "New lead added: \"Ada Lovelace\"");
        assert_eq!(
            session.drain_notices(),
            vec![Notice::success("Lead created successfully")]
        );
    }

    #[test]
    fn invalid_form_mutates_nothing() {
        let (mut session, _) = session();
        let before = session.store.clone();
        let err = create_lead(&mut session, &LeadForm::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation(ValidationError::LeadNameRequired)
        ));
        assert_eq!(session.store, before);
        assert!(session.activity().is_empty());
        let notices = session.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].message, "Lead name is required");
    }

    #[test]
    fn set_status_allows_any_transition_and_restamps() {
        let (mut session, clock) = session();
        clock.advance(chrono::Duration::hours(1));
        set_status(&mut session, "3", LeadStatus::FollowUpRequired).unwrap();
        set_status(&mut session, "3", LeadStatus::New).unwrap();
        let lead = session.store.lead("3").unwrap();
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.updated_at, "2024-12-06T10:00:00.000Z");
    }

    #[test]
    fn same_status_only_restamps() {
        let (mut session, _) = session();
        let before = session.store.lead("1").unwrap().clone();
        set_status(&mut session, "1", before.status).unwrap();
        let after = session.store.lead("1").unwrap();
        assert_eq!(after.status, before.status);
        assert_ne!(after.updated_at, before.updated_at);
    }

    #[test]
    fn set_status_on_unknown_lead_fails_without_mutation() {
        let (mut session, _) = session();
        let before = session.store.clone();
        assert!(set_status(&mut session, "404", LeadStatus::Qualified).is_err());
        assert_eq!(session.store, before);
    }

    #[test]
    fn update_applies_form() {
        let (mut session, _) = session();
        let mut form = LeadForm::from_lead(session.store.lead("4").unwrap());
        form.company = String::new();
        form.status = LeadStatus::ProposalSent;
        let lead = update_lead(&mut session, "4", &form).unwrap();
        assert_eq!(lead.company, None);
        assert_eq!(lead.status, LeadStatus::ProposalSent);
        assert_eq!(lead.created_at, "2024-11-20T15:00:00Z");
        assert_eq!(session.store.leads[3], lead);
    }

    #[test]
    fn delete_leaves_deals_and_tasks_orphaned() {
        let (mut session, _) = session();
        delete_lead(&mut session, "1").unwrap();
        assert!(session.store.lead("1").is_none());
        assert_eq!(session.store.deals.len(), 4);
        assert_eq!(session.store.tasks.len(), 4);
        assert_eq!(session.store.lead_name("1"), "Unknown");
        assert_eq!(
            session.drain_notices(),
            vec![Notice::success("Lead deleted")]
        );
    }

    #[test]
    fn board_drag_moves_lead() {
        let (mut session, _) = session();
        let mut board = BoardController::<LeadStatus>::new();
        board.drag_start("5");
        let outcome = board.drop_on(LeadStatus::Qualified, &mut session);
        assert!(matches!(outcome, DropOutcome::Moved { .. }));
        assert_eq!(session.store.lead("5").unwrap().status, LeadStatus::Qualified);

        let columns = lead_board(&session.store, &LeadQuery::default());
        let qualified = &columns[1];
        assert_eq!(qualified.title, "Qualified");
        assert_eq!(qualified.count, 2);
        assert_eq!(qualified.total, None);
        assert_eq!(columns[4].title, "Follow-up");
        assert_eq!(columns[4].count, 0);
    }

    #[test]
    fn status_counts_follow_the_filter() {
        let (session, _) = session();
        let query = LeadQuery {
            text: "acme".to_string(),
            status: StateFilter::All,
        };
        let counts = lead_status_counts(&session.store, &query);
        assert_eq!(counts[1], (LeadStatus::Qualified, 1));
        assert_eq!(counts.iter().map(|(_, n)| n).sum::<usize>(), 1);
        assert_eq!(list_leads(&session.store, &query).len(), 1);
    }

    #[test]
    fn detail_collects_related_records() {
        let (session, _) = session();
        let detail = lead_detail(&session.store, "2").unwrap();
        assert_eq!(detail.deals.len(), 1);
        assert_eq!(detail.tasks.len(), 2);
        assert_eq!(detail.open_tasks, 1);
        assert_eq!(detail.pipeline_value, 24000.0);
        assert!(lead_detail(&session.store, "404").is_none());
    }
}
