//! Search and filter predicates for the list and board views.
//!
//! All filters are pure: they borrow the collection, keep its order, and
//! combine the text match and the state match with AND.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::stage::{DealStage, LeadStatus};
use crate::types::{Deal, Lead, Task};
use crate::util::contains_ignore_case;

/// `all` or one exact status/stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter<S> {
    All,
    Only(S),
}

impl<S> Default for StateFilter<S> {
    fn default() -> Self {
        StateFilter::All
    }
}

impl<S: PartialEq> StateFilter<S> {
    pub fn matches(&self, state: &S) -> bool {
        match self {
            StateFilter::All => true,
            StateFilter::Only(wanted) => wanted == state,
        }
    }
}

impl<S: std::str::FromStr> std::str::FromStr for StateFilter<S> {
    type Err = S::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(StateFilter::All)
        } else {
            s.parse().map(StateFilter::Only)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LeadQuery {
    pub text: String,
    pub status: StateFilter<LeadStatus>,
}

impl LeadQuery {
    /// Name, company, or email contains the query text.
    pub fn matches(&self, lead: &Lead) -> bool {
        let needle = self.text.to_lowercase();
        let text_match = contains_ignore_case(&lead.name, &needle)
            || lead
                .company
                .as_deref()
                .is_some_and(|c| contains_ignore_case(c, &needle))
            || lead
                .email
                .as_deref()
                .is_some_and(|e| contains_ignore_case(e, &needle));
        text_match && self.status.matches(&lead.status)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DealQuery {
    pub text: String,
    pub stage: StateFilter<DealStage>,
}

impl DealQuery {
    /// Title contains the query text.
    pub fn matches(&self, deal: &Deal) -> bool {
        contains_ignore_case(&deal.title, &self.text.to_lowercase())
            && self.stage.matches(&deal.stage)
    }
}

pub fn filter_leads<'a>(leads: &'a [Lead], query: &LeadQuery) -> Vec<&'a Lead> {
    leads.iter().filter(|l| query.matches(l)).collect()
}

pub fn filter_deals<'a>(deals: &'a [Deal], query: &DealQuery) -> Vec<&'a Deal> {
    deals.iter().filter(|d| query.matches(d)).collect()
}

// =============================================================================
// Tasks
// =============================================================================

/// Due-date bucket relative to today.
///
/// Dates are compared as `YYYY-MM-DD` strings; lexicographic order equals
/// calendar order for same-length ISO dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskBucket {
    #[default]
    All,
    Today,
    Upcoming,
    Overdue,
    NoDate,
}

impl TaskBucket {
    pub const ALL: [TaskBucket; 5] = [
        TaskBucket::All,
        TaskBucket::Today,
        TaskBucket::Upcoming,
        TaskBucket::Overdue,
        TaskBucket::NoDate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TaskBucket::All => "All Tasks",
            TaskBucket::Today => "Today",
            TaskBucket::Upcoming => "Upcoming",
            TaskBucket::Overdue => "Overdue",
            TaskBucket::NoDate => "No Date",
        }
    }

    pub fn matches(&self, task: &Task, today: &str) -> bool {
        let due = due_date(task);
        match self {
            TaskBucket::All => true,
            TaskBucket::Today => due == Some(today),
            TaskBucket::Upcoming => due.is_some_and(|d| d > today),
            TaskBucket::Overdue => due.is_some_and(|d| d < today) && !task.is_completed,
            TaskBucket::NoDate => due.is_none(),
        }
    }
}

impl std::str::FromStr for TaskBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TaskBucket::All),
            "today" => Ok(TaskBucket::Today),
            "upcoming" => Ok(TaskBucket::Upcoming),
            "overdue" => Ok(TaskBucket::Overdue),
            "no_date" => Ok(TaskBucket::NoDate),
            _ => Err(format!("Unknown task filter: {}", s)),
        }
    }
}

fn due_date(task: &Task) -> Option<&str> {
    task.due_date.as_deref().filter(|d| !d.is_empty())
}

#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub text: String,
    pub bucket: TaskBucket,
}

impl TaskQuery {
    pub fn matches(&self, task: &Task, today: &str) -> bool {
        contains_ignore_case(&task.title, &self.text.to_lowercase())
            && self.bucket.matches(task, today)
    }
}

pub fn filter_tasks<'a>(tasks: &'a [Task], query: &TaskQuery, today: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|t| query.matches(t, today)).collect()
}

/// Incomplete tasks first, then by due date ascending; undated tasks last.
/// Stable for ties.
pub fn sort_tasks(tasks: &mut [&Task]) {
    tasks.sort_by(|a, b| {
        a.is_completed
            .cmp(&b.is_completed)
            .then_with(|| compare_due_date(due_date(a), due_date(b)))
    });
}

fn compare_due_date(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
