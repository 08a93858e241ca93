// Tasks service
// Task creation/editing, completion toggling, and the bucketed task list.

use serde::Serialize;

use crate::activity::ActivityEvent;
use crate::error::{Notice, PipelineError};
use crate::filter::{filter_tasks, sort_tasks, TaskBucket, TaskQuery};
use crate::forms::TaskForm;
use crate::state::Session;
use crate::store::EntityStore;
use crate::types::Task;

/// Validate the form and add a new, incomplete task at the top of the list.
pub fn create_task(session: &mut Session, form: &TaskForm) -> Result<Task, PipelineError> {
    let input = form.validate().map_err(|e| session.reject(e))?;

    let now = session.now_iso();
    let task = Task {
        id: session.next_id(),
        title: input.title,
        description: input.description,
        due_date: input.due_date,
        is_completed: false,
        lead_id: input.lead_id,
        deal_id: input.deal_id,
        created_at: now.clone(),
        updated_at: now,
    };

    session.store.prepend_task(task.clone());
    session.record(ActivityEvent::task_created(&task.id, &task.title));
    session.notify(Notice::success("Task created"));
    Ok(task)
}

/// Apply an edit form. Completion state is untouched.
pub fn update_task(
    session: &mut Session,
    id: &str,
    form: &TaskForm,
) -> Result<Task, PipelineError> {
    let mut task = session
        .store
        .task(id)
        .cloned()
        .ok_or_else(|| PipelineError::not_found("Task", id))?;
    let input = form.validate().map_err(|e| session.reject(e))?;

    task.title = input.title;
    task.description = input.description;
    task.due_date = input.due_date;
    task.lead_id = input.lead_id;
    task.deal_id = input.deal_id;
    task.updated_at = session.now_iso();
    session.store.replace_task(task.clone());

    session.record(ActivityEvent::task_updated(&task.id, &task.title));
    session.notify(Notice::success("Task updated"));
    Ok(task)
}

/// Flip a task between completed and open.
pub fn toggle_complete(session: &mut Session, id: &str) -> Result<Task, PipelineError> {
    let Some(mut task) = session.store.task(id).cloned() else {
        log::warn!("toggle_complete: task {} not found", id);
        return Err(PipelineError::not_found("Task", id));
    };

    task.is_completed = !task.is_completed;
    task.updated_at = session.now_iso();
    session.store.replace_task(task.clone());

    session.record(ActivityEvent::task_toggled(
        &task.id,
        &task.title,
        task.is_completed,
    ));
    let message = if task.is_completed {
        "Task completed!"
    } else {
        "Task marked as incomplete"
    };
    session.notify(Notice::success(message));
    Ok(task)
}

pub fn delete_task(session: &mut Session, id: &str) -> Result<Task, PipelineError> {
    let task = session
        .store
        .remove_task(id)
        .ok_or_else(|| PipelineError::not_found("Task", id))?;

    session.record(ActivityEvent::task_deleted(&task.id, &task.title));
    session.notify(Notice::success("Task deleted"));
    Ok(task)
}

/// A task list row with its links resolved for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow<'a> {
    pub task: &'a Task,
    /// `None` when unlinked or when the lead no longer exists.
    pub lead_name: Option<&'a str>,
    pub deal_title: Option<&'a str>,
    pub overdue: bool,
}

/// Filtered and sorted task list: open tasks first, then by due date.
pub fn list_tasks<'a>(store: &'a EntityStore, query: &TaskQuery, today: &str) -> Vec<TaskRow<'a>> {
    let mut tasks = filter_tasks(&store.tasks, query, today);
    sort_tasks(&mut tasks);
    tasks
        .into_iter()
        .map(|task| TaskRow {
            task,
            lead_name: store.linked_lead_name(task.lead_id.as_deref()),
            deal_title: store.deal_title(task.deal_id.as_deref()),
            overdue: TaskBucket::Overdue.matches(task, today),
        })
        .collect()
}

/// Number of tasks in each bucket (ignoring the search text).
pub fn bucket_counts(store: &EntityStore, today: &str) -> Vec<(TaskBucket, usize)> {
    TaskBucket::ALL
        .iter()
        .map(|&bucket| {
            let n = store
                .tasks
                .iter()
                .filter(|t| bucket.matches(t, today))
                .count();
            (bucket, n)
        })
        .collect()
}

/// Summary counts above the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub completed: usize,
    /// Open tasks past their due date.
    pub overdue: usize,
    /// Open tasks due today.
    pub due_today: usize,
}

pub fn task_stats(store: &EntityStore, today: &str) -> TaskStats {
    store.tasks.iter().fold(TaskStats::default(), |mut stats, task| {
        if task.is_completed {
            stats.completed += 1;
        } else if TaskBucket::Overdue.matches(task, today) {
            stats.overdue += 1;
        } else if TaskBucket::Today.matches(task, today) {
            stats.due_today += 1;
        }
        stats
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::store::{FixedClock, SequentialIds};
    use chrono::TimeZone;

    const TODAY: &str = "2024-12-06";

    fn session() -> Session {
        let clock = FixedClock::new(chrono::Utc.with_ymd_and_hms(2024, 12, 6, 9, 0, 0).unwrap());
        Session::new(crate::seed::demo_store())
            .with_clock(clock)
            .with_ids(SequentialIds::new("task"))
    }

    #[test]
    fn create_defaults_to_incomplete() {
        let mut session = session();
        let form = TaskForm {
            title: "Draft MSA".to_string(),
            due_date: "2024-12-09".to_string(),
            ..TaskForm::linked(None, Some("1"))
        };
        let task = create_task(&mut session, &form).unwrap();
        assert!(!task.is_completed);
        assert_eq!(session.store.tasks[0].id, "task-1");
        assert_eq!(task.deal_id.as_deref(), Some("1"));
    }

    #[test]
    fn malformed_due_date_is_rejected_with_toast() {
        let mut session = session();
        let before = session.store.clone();
        for due in ["2024-12-6", "12/05/2024", "2024-12-06T17:00"] {
            let form = TaskForm {
                title: "Draft MSA".to_string(),
                due_date: due.to_string(),
                ..TaskForm::default()
            };
            let err = create_task(&mut session, &form).unwrap_err();
            assert!(matches!(
                err,
                PipelineError::Validation(ValidationError::InvalidDueDate)
            ));
        }
        assert_eq!(session.store, before);
        let notices = session.drain_notices();
        assert_eq!(notices.len(), 3);
        assert_eq!(notices[0], Notice::error("Please enter a valid due date"));

        let mut form = TaskForm::from_task(session.store.task("1").unwrap());
        form.due_date = "tomorrow".to_string();
        assert!(update_task(&mut session, "1", &form).is_err());
        assert_eq!(session.store.task("1").unwrap().due_date.as_deref(), Some("2024-12-06"));
    }

    #[test]
    fn toggle_flips_and_notifies() {
        let mut session = session();
        let task = toggle_complete(&mut session, "1").unwrap();
        assert!(task.is_completed);
        let task = toggle_complete(&mut session, "1").unwrap();
        assert!(!task.is_completed);
        assert_eq!(
            session.drain_notices(),
            vec![
                Notice::success("Task completed!"),
                Notice::success("Task marked as incomplete"),
            ]
        );
        assert!(toggle_complete(&mut session, "404").is_err());
    }

    #[test]
    fn update_keeps_completion() {
        let mut session = session();
        let mut form = TaskForm::from_task(session.store.task("4").unwrap());
        form.due_date.clear();
        let task = update_task(&mut session, "4", &form).unwrap();
        assert!(task.is_completed);
        assert_eq!(task.due_date, None);
    }

    #[test]
    fn delete_removes_only_the_task() {
        let mut session = session();
        delete_task(&mut session, "2").unwrap();
        assert!(session.store.task("2").is_none());
        assert_eq!(session.store.tasks.len(), 3);
        assert_eq!(session.store.deals.len(), 4);
        assert_eq!(session.activity()[0].action_type, "deleted");
        assert!(delete_task(&mut session, "2").is_err());
    }

    #[test]
    fn list_sorts_and_resolves_links() {
        let session = session();
        let rows = list_tasks(&session.store, &TaskQuery::default(), TODAY);
        let order: Vec<&str> = rows.iter().map(|r| r.task.id.as_str()).collect();
        assert_eq!(order, vec!["1", "2", "3", "4"]);
        assert_eq!(rows[0].lead_name, Some("John Smith"));
        assert_eq!(rows[0].deal_title, Some("Acme Enterprise Package"));
        assert_eq!(rows[2].deal_title, None);
        assert!(!rows[3].overdue);
    }

    #[test]
    fn rows_tolerate_deleted_lead() {
        let mut session = session();
        crate::services::leads::delete_lead(&mut session, "3").unwrap();
        let rows = list_tasks(&session.store, &TaskQuery::default(), TODAY);
        let row = rows.iter().find(|r| r.task.id == "3").unwrap();
        assert_eq!(row.lead_name, None);
        assert_eq!(row.task.lead_id.as_deref(), Some("3"));
    }

    #[test]
    fn bucket_counts_for_seed() {
        let session = session();
        let counts = bucket_counts(&session.store, TODAY);
        assert_eq!(
            counts,
            vec![
                (TaskBucket::All, 4),
                (TaskBucket::Today, 1),
                (TaskBucket::Upcoming, 2),
                (TaskBucket::Overdue, 0),
                (TaskBucket::NoDate, 0),
            ]
        );
    }

    #[test]
    fn stats_split_completed_overdue_and_due_today() {
        let mut session = session();
        assert_eq!(
            task_stats(&session.store, TODAY),
            TaskStats {
                completed: 1,
                overdue: 0,
                due_today: 1,
            }
        );

        // Completing today's task moves it out of due_today.
        toggle_complete(&mut session, "1").unwrap();
        // Reopening the past-due task makes it overdue.
        toggle_complete(&mut session, "4").unwrap();
        assert_eq!(
            task_stats(&session.store, TODAY),
            TaskStats {
                completed: 1,
                overdue: 1,
                due_today: 0,
            }
        );
    }
}
