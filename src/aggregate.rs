//! Pipeline value, weighted value, and per-column totals.
//!
//! Everything here is recomputed from the records on each call; there is no
//! cache to invalidate.

use serde::Serialize;

use crate::filter::TaskBucket;
use crate::stage::{DealStage, LeadStatus};
use crate::types::{Deal, Lead, Task};
use crate::util::format_currency;

fn open_deals<'a, I>(deals: I) -> impl Iterator<Item = &'a Deal>
where
    I: IntoIterator<Item = &'a Deal>,
{
    deals.into_iter().filter(|d| !d.stage.is_closed())
}

/// Sum of `value` over deals not in `closed_won` / `closed_lost`.
pub fn total_pipeline_value<'a, I>(deals: I) -> f64
where
    I: IntoIterator<Item = &'a Deal>,
{
    open_deals(deals).map(|d| d.value).sum()
}

/// Sum of `value * probability / 100` over the same open deals.
pub fn weighted_value<'a, I>(deals: I) -> f64
where
    I: IntoIterator<Item = &'a Deal>,
{
    open_deals(deals).map(Deal::weighted_value).sum()
}

pub fn open_deal_count<'a, I>(deals: I) -> usize
where
    I: IntoIterator<Item = &'a Deal>,
{
    open_deals(deals).count()
}

/// Count and value of the deals in one board column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTotal {
    pub stage: DealStage,
    pub count: usize,
    pub total: f64,
}

/// Per-stage count and value, in board column order. Closed stages are
/// included here; only the open-pipeline sums leave them out.
pub fn stage_totals(deals: &[&Deal]) -> Vec<StageTotal> {
    DealStage::ALL
        .iter()
        .map(|&stage| {
            let in_stage = deals.iter().filter(|d| d.stage == stage);
            StageTotal {
                stage,
                count: in_stage.clone().count(),
                total: in_stage.map(|d| d.value).sum(),
            }
        })
        .collect()
}

/// Per-status lead counts, in board column order.
pub fn status_counts(leads: &[&Lead]) -> Vec<(LeadStatus, usize)> {
    LeadStatus::ALL
        .iter()
        .map(|&status| (status, leads.iter().filter(|l| l.status == status).count()))
        .collect()
}

/// Aggregates shown above the deals board.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSummary {
    pub pipeline_value: f64,
    pub weighted_value: f64,
    pub open_deals: usize,
    pub per_stage: Vec<StageTotal>,
}

impl PipelineSummary {
    pub fn compute(deals: &[&Deal]) -> Self {
        Self {
            pipeline_value: total_pipeline_value(deals.iter().copied()),
            weighted_value: weighted_value(deals.iter().copied()),
            open_deals: open_deal_count(deals.iter().copied()),
            per_stage: stage_totals(deals),
        }
    }

    pub fn pipeline_value_display(&self) -> String {
        format_currency(self.pipeline_value)
    }

    pub fn weighted_value_display(&self) -> String {
        format_currency(self.weighted_value)
    }
}

/// Dashboard summary cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub pipeline_value: String,
    pub open_deals: usize,
    pub new_leads: usize,
    /// Incomplete tasks due today or already overdue.
    pub tasks_due: usize,
}

impl DashboardMetrics {
    pub fn compute(leads: &[Lead], deals: &[Deal], tasks: &[Task], today: &str) -> Self {
        let tasks_due = tasks
            .iter()
            .filter(|t| !t.is_completed)
            .filter(|t| {
                TaskBucket::Today.matches(t, today) || TaskBucket::Overdue.matches(t, today)
            })
            .count();

        Self {
            pipeline_value: format_currency(total_pipeline_value(deals)),
            open_deals: open_deal_count(deals),
            new_leads: leads.iter().filter(|l| l.status == LeadStatus::New).count(),
            tasks_due,
        }
    }
}
