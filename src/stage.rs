//! Lead statuses, deal stages, and priorities.
//!
//! Both pipelines are free-form: any state can move to any other state,
//! including out of `closed_won` / `closed_lost`. Closed stages only matter
//! to aggregation, which leaves them out of the open pipeline.

use serde::{Deserialize, Serialize};

/// Qualification status of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Qualified,
    InDiscussion,
    ProposalSent,
    FollowUpRequired,
}

impl LeadStatus {
    /// Board column order.
    pub const ALL: [LeadStatus; 5] = [
        LeadStatus::New,
        LeadStatus::Qualified,
        LeadStatus::InDiscussion,
        LeadStatus::ProposalSent,
        LeadStatus::FollowUpRequired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Qualified => "qualified",
            LeadStatus::InDiscussion => "in_discussion",
            LeadStatus::ProposalSent => "proposal_sent",
            LeadStatus::FollowUpRequired => "follow_up_required",
        }
    }

    /// Label used in the status filter and the lead form.
    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::InDiscussion => "In Discussion",
            LeadStatus::ProposalSent => "Proposal Sent",
            LeadStatus::FollowUpRequired => "Follow-up Required",
        }
    }

    /// Shorter label used on badges and board column headers.
    pub fn column_title(&self) -> &'static str {
        match self {
            LeadStatus::FollowUpRequired => "Follow-up",
            other => other.label(),
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(LeadStatus::New),
            "qualified" => Ok(LeadStatus::Qualified),
            "in_discussion" => Ok(LeadStatus::InDiscussion),
            "proposal_sent" => Ok(LeadStatus::ProposalSent),
            "follow_up_required" => Ok(LeadStatus::FollowUpRequired),
            _ => Err(format!("Unknown lead status: {}", s)),
        }
    }
}

/// Pipeline stage of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    New,
    Qualified,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl DealStage {
    /// Board column order.
    pub const ALL: [DealStage; 6] = [
        DealStage::New,
        DealStage::Qualified,
        DealStage::Proposal,
        DealStage::Negotiation,
        DealStage::ClosedWon,
        DealStage::ClosedLost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DealStage::New => "new",
            DealStage::Qualified => "qualified",
            DealStage::Proposal => "proposal",
            DealStage::Negotiation => "negotiation",
            DealStage::ClosedWon => "closed_won",
            DealStage::ClosedLost => "closed_lost",
        }
    }

    /// Label used in the stage filter, the deal form, and toasts.
    pub fn label(&self) -> &'static str {
        match self {
            DealStage::New => "New",
            DealStage::Qualified => "Qualified",
            DealStage::Proposal => "Proposal",
            DealStage::Negotiation => "Negotiation",
            DealStage::ClosedWon => "Closed Won",
            DealStage::ClosedLost => "Closed Lost",
        }
    }

    /// Shorter label used on badges and board column headers.
    pub fn column_title(&self) -> &'static str {
        match self {
            DealStage::ClosedWon => "Won",
            DealStage::ClosedLost => "Lost",
            other => other.label(),
        }
    }

    /// Win probability (percent) the deal form fills in when this stage is picked.
    pub fn default_probability(&self) -> u8 {
        match self {
            DealStage::New => 10,
            DealStage::Qualified => 30,
            DealStage::Proposal => 50,
            DealStage::Negotiation => 70,
            DealStage::ClosedWon => 100,
            DealStage::ClosedLost => 0,
        }
    }

    /// Closed deals are excluded from open-pipeline sums. Nothing stops a
    /// deal from leaving a closed stage.
    pub fn is_closed(&self) -> bool {
        matches!(self, DealStage::ClosedWon | DealStage::ClosedLost)
    }
}

impl std::fmt::Display for DealStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DealStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(DealStage::New),
            "qualified" => Ok(DealStage::Qualified),
            "proposal" => Ok(DealStage::Proposal),
            "negotiation" => Ok(DealStage::Negotiation),
            "closed_won" => Ok(DealStage::ClosedWon),
            "closed_lost" => Ok(DealStage::ClosedLost),
            _ => Err(format!("Unknown deal stage: {}", s)),
        }
    }
}

/// Lead priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// Badge label for any raw status string: lead statuses, deal stages,
/// priorities, and the task states `completed` / `pending`.
///
/// Unknown values render as themselves.
pub fn badge_label(raw: &str) -> String {
    if let Ok(status) = raw.parse::<LeadStatus>() {
        return status.column_title().to_string();
    }
    if let Ok(stage) = raw.parse::<DealStage>() {
        return stage.column_title().to_string();
    }
    if let Ok(priority) = raw.parse::<Priority>() {
        return priority.label().to_string();
    }
    match raw {
        "completed" => "Completed".to_string(),
        "pending" => "Pending".to_string(),
        other => other.to_string(),
    }
}
