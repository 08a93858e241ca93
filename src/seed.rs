//! Demo dataset loaded when no snapshot is given.

use crate::stage::{DealStage, LeadStatus, Priority};
use crate::store::EntityStore;
use crate::types::{Deal, Lead, Task};

pub fn demo_store() -> EntityStore {
    EntityStore {
        leads: demo_leads(),
        deals: demo_deals(),
        tasks: demo_tasks(),
        notes: Vec::new(),
    }
}

#[allow(clippy::too_many_arguments)]
fn lead(
    id: &str,
    name: &str,
    company: &str,
    email: &str,
    phone: &str,
    status: LeadStatus,
    source: &str,
    priority: Priority,
    next_action: (&str, &str),
    stamps: (&str, &str),
) -> Lead {
    Lead {
        id: id.to_string(),
        name: name.to_string(),
        company: Some(company.to_string()),
        contact_name: Some(name.to_string()),
        email: Some(email.to_string()),
        phone: Some(phone.to_string()),
        status,
        source: Some(source.to_string()),
        priority: Some(priority),
        next_action: Some(next_action.0.to_string()),
        next_action_date: Some(next_action.1.to_string()),
        created_at: stamps.0.to_string(),
        updated_at: stamps.1.to_string(),
    }
}

fn demo_leads() -> Vec<Lead> {
    vec![
        lead(
            "1",
            "John Smith",
            "Acme Corporation",
            "john@acme.com",
            "+1 555-0101",
            LeadStatus::Qualified,
            "Website",
            Priority::High,
            ("Schedule demo call", "2024-12-10"),
            ("2024-12-01T10:00:00Z", "2024-12-05T14:30:00Z"),
        ),
        lead(
            "2",
            "Sarah Johnson",
            "TechStart Inc",
            "sarah@techstart.io",
            "+1 555-0102",
            LeadStatus::ProposalSent,
            "Referral",
            Priority::High,
            ("Follow up on proposal", "2024-12-08"),
            ("2024-11-28T09:00:00Z", "2024-12-04T11:00:00Z"),
        ),
        lead(
            "3",
            "Mike Chen",
            "Global Industries",
            "mchen@global.com",
            "+1 555-0103",
            LeadStatus::New,
            "LinkedIn",
            Priority::Medium,
            ("Send intro email", "2024-12-06"),
            ("2024-12-05T08:00:00Z", "2024-12-05T08:00:00Z"),
        ),
        lead(
            "4",
            "Emily Davis",
            "Startup Labs",
            "emily@startuplabs.co",
            "+1 555-0104",
            LeadStatus::InDiscussion,
            "Conference",
            Priority::Medium,
            ("Send case studies", "2024-12-12"),
            ("2024-11-20T15:00:00Z", "2024-12-03T16:00:00Z"),
        ),
        lead(
            "5",
            "David Wilson",
            "Enterprise Solutions",
            "dwilson@enterprise.com",
            "+1 555-0105",
            LeadStatus::FollowUpRequired,
            "Cold Outreach",
            Priority::Low,
            ("Check in next week", "2024-12-15"),
            ("2024-11-15T10:00:00Z", "2024-12-01T09:00:00Z"),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn deal(
    id: &str,
    title: &str,
    lead_id: &str,
    value: f64,
    stage: DealStage,
    probability: u8,
    expected_close_date: &str,
    note: Option<&str>,
    stamps: (&str, &str),
) -> Deal {
    Deal {
        id: id.to_string(),
        title: title.to_string(),
        lead_id: lead_id.to_string(),
        value,
        stage,
        probability,
        expected_close_date: Some(expected_close_date.to_string()),
        note: note.map(ToString::to_string),
        created_at: stamps.0.to_string(),
        updated_at: stamps.1.to_string(),
    }
}

fn demo_deals() -> Vec<Deal> {
    vec![
        deal(
            "1",
            "Acme Enterprise Package",
            "1",
            45000.0,
            DealStage::Proposal,
            60,
            "2024-12-20",
            Some("Large deal, needs VP approval"),
            ("2024-12-02T10:00:00Z", "2024-12-05T14:00:00Z"),
        ),
        deal(
            "2",
            "TechStart SaaS License",
            "2",
            24000.0,
            DealStage::Negotiation,
            75,
            "2024-12-15",
            Some("Annual contract, discussing terms"),
            ("2024-11-30T09:00:00Z", "2024-12-04T11:00:00Z"),
        ),
        deal(
            "3",
            "Global Industries Pilot",
            "3",
            15000.0,
            DealStage::New,
            20,
            "2025-01-15",
            None,
            ("2024-12-05T08:00:00Z", "2024-12-05T08:00:00Z"),
        ),
        deal(
            "4",
            "Startup Labs Growth Plan",
            "4",
            36000.0,
            DealStage::Qualified,
            40,
            "2024-12-30",
            Some("Interested in multi-year"),
            ("2024-11-25T15:00:00Z", "2024-12-03T16:00:00Z"),
        ),
    ]
}

fn task(
    id: &str,
    title: &str,
    description: Option<&str>,
    due_date: &str,
    is_completed: bool,
    links: (&str, Option<&str>),
    stamps: (&str, &str),
) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        description: description.map(ToString::to_string),
        due_date: Some(due_date.to_string()),
        is_completed,
        lead_id: Some(links.0.to_string()),
        deal_id: links.1.map(ToString::to_string),
        created_at: stamps.0.to_string(),
        updated_at: stamps.1.to_string(),
    }
}

fn demo_tasks() -> Vec<Task> {
    vec![
        task(
            "1",
            "Follow up with Acme Corp about proposal",
            Some("Call John to discuss the enterprise package details"),
            "2024-12-06",
            false,
            ("1", Some("1")),
            ("2024-12-03T10:00:00Z", "2024-12-03T10:00:00Z"),
        ),
        task(
            "2",
            "Send pricing document to TechStart",
            None,
            "2024-12-07",
            false,
            ("2", Some("2")),
            ("2024-12-04T09:00:00Z", "2024-12-04T09:00:00Z"),
        ),
        task(
            "3",
            "Schedule demo with Global Industries",
            Some("Mike requested a product demo"),
            "2024-12-10",
            false,
            ("3", None),
            ("2024-12-05T08:00:00Z", "2024-12-05T08:00:00Z"),
        ),
        task(
            "4",
            "Review contract terms",
            None,
            "2024-12-05",
            true,
            ("2", Some("2")),
            ("2024-12-01T14:00:00Z", "2024-12-05T11:00:00Z"),
        ),
    ]
}
