use serde::{Deserialize, Serialize};

use crate::stage::{DealStage, LeadStatus, Priority};

/// Settings stored in ~/.crmdesk/config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_workspace_name")]
    pub workspace_name: String,
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    #[serde(default = "default_true")]
    pub dark_mode: bool,
}

fn default_workspace_name() -> String {
    "My Workspace".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_name: default_workspace_name(),
            email_notifications: true,
            dark_mode: true,
        }
    }
}

/// A prospective customer tracked through a qualification status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub status: LeadStatus,
    /// Where the lead came from (Website, Referral, ...).
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub next_action: Option<String>,
    #[serde(default)]
    pub next_action_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A sales opportunity linked to a lead.
///
/// `lead_id` is a lookup-only reference: the lead may have been deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    pub title: String,
    pub lead_id: String,
    pub value: f64,
    pub stage: DealStage,
    /// Win probability in percent, 0..=100.
    pub probability: u8,
    #[serde(default)]
    pub expected_close_date: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Deal {
    /// `value * probability / 100`
    pub fn weighted_value(&self) -> f64 {
        self.value * f64::from(self.probability) / 100.0
    }
}

/// A to-do optionally linked to a lead and/or deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// ISO date (`YYYY-MM-DD`).
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub lead_id: Option<String>,
    #[serde(default)]
    pub deal_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Free-text note attached to a lead and/or deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub lead_id: Option<String>,
    #[serde(default)]
    pub deal_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config: Config = serde_json::from_str(r#"{"darkMode": false}"#).unwrap();
        assert_eq!(config.workspace_name, "My Workspace");
        assert!(config.email_notifications);
        assert!(!config.dark_mode);
    }

    #[test]
    fn lead_optional_fields_may_be_omitted() {
        let lead: Lead = serde_json::from_str(
            r#"{"id":"9","name":"Ada","status":"qualified",
                "created_at":"2024-12-01T10:00:00Z","updated_at":"2024-12-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(lead.status, LeadStatus::Qualified);
        assert!(lead.company.is_none());
        assert!(lead.priority.is_none());
    }

    #[test]
    fn unknown_lead_status_is_rejected_at_the_boundary() {
        let parsed: Result<Lead, _> = serde_json::from_str(
            r#"{"id":"9","name":"Ada","status":"archived",
                "created_at":"x","updated_at":"x"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn weighted_value_uses_percent() {
        let deal = Deal {
            id: "1".into(),
            title: "Pilot".into(),
            lead_id: "1".into(),
            value: 45000.0,
            stage: DealStage::Proposal,
            probability: 60,
            expected_close_date: None,
            note: None,
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert_eq!(deal.weighted_value(), 27000.0);
    }
}
