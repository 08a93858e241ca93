//! Activity feed entries recorded by pipeline mutations.

use serde::{Deserialize, Serialize};

use crate::stage::DealStage;

/// Maximum number of activity entries kept per session
pub const MAX_ACTIVITY_SIZE: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Lead,
    Deal,
    Task,
    Note,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: String,
    pub entity_type: ActivityKind,
    pub entity_id: String,
    pub action_type: String,
    pub description: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    pub created_at: String,
}

/// What happened, before an id and timestamp are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEvent {
    pub entity_type: ActivityKind,
    pub entity_id: String,
    pub action_type: &'static str,
    pub description: String,
    pub metadata: Option<serde_json::Value>,
}

impl ActivityEvent {
    fn new(
        entity_type: ActivityKind,
        entity_id: &str,
        action_type: &'static str,
        description: String,
    ) -> Self {
        Self {
            entity_type,
            entity_id: entity_id.to_string(),
            action_type,
            description,
            metadata: None,
        }
    }

    pub fn lead_created(id: &str, name: &str) -> Self {
        Self::new(
            ActivityKind::Lead,
            id,
            "created",
            format!("New lead added: \"{}\"", name),
        )
    }

    pub fn lead_updated(id: &str, name: &str) -> Self {
        Self::new(
            ActivityKind::Lead,
            id,
            "updated",
            format!("Lead \"{}\" updated", name),
        )
    }

    pub fn lead_status_changed(id: &str, name: &str, from: &str, to: &str) -> Self {
        let mut event = Self::new(
            ActivityKind::Lead,
            id,
            "status_changed",
            format!("Lead \"{}\" moved from {} to {}", name, from, to),
        );
        event.metadata = Some(serde_json::json!({ "from": from, "to": to }));
        event
    }

    pub fn lead_deleted(id: &str, name: &str) -> Self {
        Self::new(
            ActivityKind::Lead,
            id,
            "deleted",
            format!("Lead \"{}\" deleted", name),
        )
    }

    pub fn deal_created(id: &str, title: &str) -> Self {
        Self::new(
            ActivityKind::Deal,
            id,
            "created",
            format!("New deal added: \"{}\"", title),
        )
    }

    pub fn deal_updated(id: &str, title: &str) -> Self {
        Self::new(
            ActivityKind::Deal,
            id,
            "updated",
            format!("Deal \"{}\" updated", title),
        )
    }

    /// Closed stages read as "marked as Closed Won" in the feed.
    pub fn deal_stage_changed(id: &str, title: &str, from: DealStage, to: DealStage) -> Self {
        let description = if to.is_closed() {
            format!("Deal \"{}\" marked as {}", title, to.label())
        } else {
            format!(
                "Deal \"{}\" moved from {} to {}",
                title,
                from.label(),
                to.label()
            )
        };
        let mut event = Self::new(ActivityKind::Deal, id, "stage_changed", description);
        event.metadata = Some(serde_json::json!({ "from": from, "to": to }));
        event
    }

    pub fn deal_deleted(id: &str, title: &str) -> Self {
        Self::new(
            ActivityKind::Deal,
            id,
            "deleted",
            format!("Deal \"{}\" deleted", title),
        )
    }

    pub fn task_created(id: &str, title: &str) -> Self {
        Self::new(
            ActivityKind::Task,
            id,
            "created",
            format!("Task created: \"{}\"", title),
        )
    }

    pub fn task_updated(id: &str, title: &str) -> Self {
        Self::new(
            ActivityKind::Task,
            id,
            "updated",
            format!("Task updated: \"{}\"", title),
        )
    }

    pub fn task_toggled(id: &str, title: &str, completed: bool) -> Self {
        if completed {
            Self::new(
                ActivityKind::Task,
                id,
                "completed",
                format!("Task completed: \"{}\"", title),
            )
        } else {
            Self::new(
                ActivityKind::Task,
                id,
                "reopened",
                format!("Task reopened: \"{}\"", title),
            )
        }
    }

    pub fn task_deleted(id: &str, title: &str) -> Self {
        Self::new(
            ActivityKind::Task,
            id,
            "deleted",
            format!("Task deleted: \"{}\"", title),
        )
    }

    /// `target` is the lead name or deal title the note hangs off, if any.
    pub fn note_added(id: &str, target: Option<(&str, ActivityKind)>) -> Self {
        let description = match target {
            Some((name, ActivityKind::Deal)) => format!("Note added to \"{}\" deal", name),
            Some((name, _)) => format!("Note added to \"{}\" lead", name),
            None => "Note added".to_string(),
        };
        Self::new(ActivityKind::Note, id, "created", description)
    }

    pub fn into_log(self, id: String, created_at: String) -> ActivityLog {
        ActivityLog {
            id,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            action_type: self.action_type.to_string(),
            description: self.description,
            metadata: self.metadata,
            created_at,
        }
    }
}
