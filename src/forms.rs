//! Form drafts and their validation.
//!
//! Drafts hold what the user typed, as strings. `validate()` turns a draft
//! into a typed input or the first validation error; nothing is mutated
//! until an input has been produced.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::stage::{DealStage, LeadStatus, Priority};
use crate::types::{Deal, Lead, Task};
use crate::util::non_empty;

/// Probability pre-filled in a new deal form before a stage is picked.
pub const DEFAULT_NEW_DEAL_PROBABILITY: &str = "20";

/// Lead sources offered by the lead form.
pub const LEAD_SOURCES: [&str; 6] = [
    "Website",
    "Referral",
    "LinkedIn",
    "Cold Outreach",
    "Conference",
    "Other",
];

// =============================================================================
// Lead
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadForm {
    pub name: String,
    pub company: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub status: LeadStatus,
    pub source: String,
    pub priority: Option<Priority>,
    pub next_action: String,
    pub next_action_date: String,
}

impl Default for LeadForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            company: String::new(),
            contact_name: String::new(),
            email: String::new(),
            phone: String::new(),
            status: LeadStatus::New,
            source: String::new(),
            priority: Some(Priority::Medium),
            next_action: String::new(),
            next_action_date: String::new(),
        }
    }
}

/// Validated lead fields.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadInput {
    pub name: String,
    pub company: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: LeadStatus,
    pub source: Option<String>,
    pub priority: Option<Priority>,
    pub next_action: Option<String>,
    pub next_action_date: Option<String>,
}

impl LeadForm {
    /// Prefill for editing an existing lead.
    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            name: lead.name.clone(),
            company: lead.company.clone().unwrap_or_default(),
            contact_name: lead.contact_name.clone().unwrap_or_default(),
            email: lead.email.clone().unwrap_or_default(),
            phone: lead.phone.clone().unwrap_or_default(),
            status: lead.status,
            source: lead.source.clone().unwrap_or_default(),
            priority: lead.priority,
            next_action: lead.next_action.clone().unwrap_or_default(),
            next_action_date: lead.next_action_date.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<LeadInput, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::LeadNameRequired);
        }
        Ok(LeadInput {
            name: self.name.clone(),
            company: non_empty(&self.company),
            contact_name: non_empty(&self.contact_name),
            email: non_empty(&self.email),
            phone: non_empty(&self.phone),
            status: self.status,
            source: non_empty(&self.source),
            priority: self.priority,
            next_action: non_empty(&self.next_action),
            next_action_date: non_empty(&self.next_action_date),
        })
    }
}

// =============================================================================
// Deal
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DealForm {
    pub title: String,
    pub lead_id: String,
    pub value: String,
    pub stage: DealStage,
    pub probability: String,
    pub expected_close_date: String,
    pub note: String,
}

impl Default for DealForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            lead_id: String::new(),
            value: String::new(),
            stage: DealStage::New,
            probability: DEFAULT_NEW_DEAL_PROBABILITY.to_string(),
            expected_close_date: String::new(),
            note: String::new(),
        }
    }
}

/// Validated deal fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DealInput {
    pub title: String,
    pub lead_id: String,
    pub value: f64,
    pub stage: DealStage,
    pub probability: u8,
    pub expected_close_date: Option<String>,
    pub note: Option<String>,
}

impl DealForm {
    /// Empty form, optionally opened from a lead's page.
    pub fn for_lead(lead_id: Option<&str>) -> Self {
        Self {
            lead_id: lead_id.unwrap_or_default().to_string(),
            ..Self::default()
        }
    }

    /// Prefill for editing an existing deal.
    pub fn from_deal(deal: &Deal) -> Self {
        Self {
            title: deal.title.clone(),
            lead_id: deal.lead_id.clone(),
            value: deal.value.to_string(),
            stage: deal.stage,
            probability: deal.probability.to_string(),
            expected_close_date: deal.expected_close_date.clone().unwrap_or_default(),
            note: deal.note.clone().unwrap_or_default(),
        }
    }

    /// Picking a stage in the form also fills in that stage's probability.
    /// The user can still overwrite the probability afterwards.
    pub fn select_stage(&mut self, stage: DealStage) {
        self.stage = stage;
        self.probability = stage.default_probability().to_string();
    }

    pub fn validate(&self) -> Result<DealInput, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::DealTitleRequired);
        }
        if self.lead_id.trim().is_empty() {
            return Err(ValidationError::LeadNotSelected);
        }
        let value = parse_amount(&self.value)?;
        let probability = parse_probability(&self.probability)?;

        Ok(DealInput {
            title: self.title.clone(),
            lead_id: self.lead_id.clone(),
            value,
            stage: self.stage,
            probability,
            expected_close_date: non_empty(&self.expected_close_date),
            note: non_empty(&self.note),
        })
    }
}

fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidDealValue)?;
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidDealValue);
    }
    Ok(value)
}

fn parse_probability(raw: &str) -> Result<u8, ValidationError> {
    let pct: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidProbability)?;
    u8::try_from(pct)
        .ok()
        .filter(|p| *p <= 100)
        .ok_or(ValidationError::ProbabilityOutOfRange)
}

// =============================================================================
// Task
// =============================================================================

/// Due dates are stored as zero-padded `YYYY-MM-DD`; task buckets compare
/// them as strings.
fn parse_due_date(raw: &str) -> Result<String, ValidationError> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDueDate)?;
    let canonical = date.format("%Y-%m-%d").to_string();
    if canonical != raw {
        return Err(ValidationError::InvalidDueDate);
    }
    Ok(canonical)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub lead_id: String,
    pub deal_id: String,
}

/// Validated task fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub lead_id: Option<String>,
    pub deal_id: Option<String>,
}

impl TaskForm {
    /// Empty form, optionally opened from a lead or deal page.
    pub fn linked(lead_id: Option<&str>, deal_id: Option<&str>) -> Self {
        Self {
            lead_id: lead_id.unwrap_or_default().to_string(),
            deal_id: deal_id.unwrap_or_default().to_string(),
            ..Self::default()
        }
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: task.due_date.clone().unwrap_or_default(),
            lead_id: task.lead_id.clone().unwrap_or_default(),
            deal_id: task.deal_id.clone().unwrap_or_default(),
        }
    }

    pub fn validate(&self) -> Result<TaskInput, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::TaskTitleRequired);
        }
        let due_date = match non_empty(&self.due_date) {
            Some(raw) => Some(parse_due_date(&raw)?),
            None => None,
        };
        Ok(TaskInput {
            title: self.title.clone(),
            description: non_empty(&self.description),
            due_date,
            lead_id: non_empty(&self.lead_id),
            deal_id: non_empty(&self.deal_id),
        })
    }
}
