// Dashboard service
// Headline metrics, the open task list, and the latest activity entries.

use serde::Serialize;

use crate::activity::ActivityLog;
use crate::aggregate::DashboardMetrics;
use crate::filter::sort_tasks;
use crate::state::Session;
use crate::types::Task;

/// Open tasks shown on the dashboard
pub const DASHBOARD_TASK_LIMIT: usize = 5;
/// Activity entries shown on the dashboard
pub const DASHBOARD_ACTIVITY_LIMIT: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData<'a> {
    pub metrics: DashboardMetrics,
    pub tasks: Vec<&'a Task>,
    pub activity: &'a [ActivityLog],
}

/// Result type for dashboard data loading
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DashboardResult<'a> {
    Success { data: DashboardData<'a> },
    Empty { message: String },
}

pub fn get_dashboard_data(session: &Session) -> DashboardResult<'_> {
    let store = &session.store;
    if store.leads.is_empty() && store.deals.is_empty() && store.tasks.is_empty() {
        return DashboardResult::Empty {
            message: "No leads or deals yet. Add a lead to get started.".to_string(),
        };
    }

    let today = session.today();
    let metrics = DashboardMetrics::compute(&store.leads, &store.deals, &store.tasks, &today);

    let mut tasks: Vec<&Task> = store.tasks.iter().filter(|t| !t.is_completed).collect();
    sort_tasks(&mut tasks);
    tasks.truncate(DASHBOARD_TASK_LIMIT);

    let activity = session.activity();
    let activity = &activity[..activity.len().min(DASHBOARD_ACTIVITY_LIMIT)];

    DashboardResult::Success {
        data: DashboardData {
            metrics,
            tasks,
            activity,
        },
    }
}
