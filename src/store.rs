//! In-memory entity collections owned by a session.
//!
//! Collections keep insertion order (new records go to the front). Cross-entity
//! references are lookup-only: nothing cascades, and a reference to a missing
//! record resolves to a placeholder.

use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PipelineError;
use crate::types::{Deal, Lead, Note, Task};
use crate::util::iso_date;

/// Shown wherever a lead or deal reference no longer resolves.
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    #[serde(default)]
    pub leads: Vec<Lead>,
    #[serde(default)]
    pub deals: Vec<Deal>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store snapshot from a JSON file.
    ///
    /// A record that does not parse (an unrecognised status, a missing
    /// field) is skipped with a warning; the rest of the snapshot loads.
    /// Only a file that is not a JSON snapshot at all is an error.
    pub fn load_from(path: &Path) -> Result<Self, PipelineError> {
        let content = fs::read_to_string(path)?;
        let raw: RawSnapshot = serde_json::from_str(&content)?;
        let store = EntityStore {
            leads: parse_records("lead", raw.leads),
            deals: parse_records("deal", raw.deals),
            tasks: parse_records("task", raw.tasks),
            notes: parse_records("note", raw.notes),
        };
        log::debug!(
            "Loaded snapshot {}: {} leads, {} deals, {} tasks",
            path.display(),
            store.leads.len(),
            store.deals.len(),
            store.tasks.len()
        );
        Ok(store)
    }

    /// Write the store as pretty JSON.
    pub fn save_to(&self, path: &Path) -> Result<(), PipelineError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn lead(&self, id: &str) -> Option<&Lead> {
        self.leads.iter().find(|l| l.id == id)
    }

    pub fn deal(&self, id: &str) -> Option<&Deal> {
        self.deals.iter().find(|d| d.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Lead name for display, or "Unknown" when the lead is gone.
    pub fn lead_name(&self, lead_id: &str) -> &str {
        self.lead(lead_id)
            .map(|l| l.name.as_str())
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// Deal title for an optional link. `None` when unlinked or dangling.
    pub fn deal_title(&self, deal_id: Option<&str>) -> Option<&str> {
        deal_id.and_then(|id| self.deal(id)).map(|d| d.title.as_str())
    }

    /// Lead name for an optional link. `None` when unlinked or dangling.
    pub fn linked_lead_name(&self, lead_id: Option<&str>) -> Option<&str> {
        lead_id.and_then(|id| self.lead(id)).map(|l| l.name.as_str())
    }

    pub fn deals_for_lead(&self, lead_id: &str) -> Vec<&Deal> {
        self.deals.iter().filter(|d| d.lead_id == lead_id).collect()
    }

    pub fn tasks_for_lead(&self, lead_id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.lead_id.as_deref() == Some(lead_id))
            .collect()
    }

    pub fn tasks_for_deal(&self, deal_id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.deal_id.as_deref() == Some(deal_id))
            .collect()
    }

    pub fn notes_for_lead(&self, lead_id: &str) -> Vec<&Note> {
        self.notes
            .iter()
            .filter(|n| n.lead_id.as_deref() == Some(lead_id))
            .collect()
    }

    /// True if any collection already holds a record with this id.
    pub fn contains_id(&self, id: &str) -> bool {
        self.leads.iter().any(|l| l.id == id)
            || self.deals.iter().any(|d| d.id == id)
            || self.tasks.iter().any(|t| t.id == id)
            || self.notes.iter().any(|n| n.id == id)
    }

    // =========================================================================
    // Storage boundary: replace by id, prepend, remove
    // =========================================================================

    /// Swap in a new version of the lead with the same id. Returns the old one.
    pub fn replace_lead(&mut self, lead: Lead) -> Option<Lead> {
        let slot = self.leads.iter_mut().find(|l| l.id == lead.id)?;
        Some(std::mem::replace(slot, lead))
    }

    pub fn replace_deal(&mut self, deal: Deal) -> Option<Deal> {
        let slot = self.deals.iter_mut().find(|d| d.id == deal.id)?;
        Some(std::mem::replace(slot, deal))
    }

    pub fn replace_task(&mut self, task: Task) -> Option<Task> {
        let slot = self.tasks.iter_mut().find(|t| t.id == task.id)?;
        Some(std::mem::replace(slot, task))
    }

    /// Drop a lead. Deals, tasks, and notes pointing at it are left as they are.
    pub fn remove_lead(&mut self, id: &str) -> Option<Lead> {
        let pos = self.leads.iter().position(|l| l.id == id)?;
        Some(self.leads.remove(pos))
    }

    /// Drop a deal. Tasks and notes linked to it keep their dangling id.
    pub fn remove_deal(&mut self, id: &str) -> Option<Deal> {
        let pos = self.deals.iter().position(|d| d.id == id)?;
        Some(self.deals.remove(pos))
    }

    pub fn remove_task(&mut self, id: &str) -> Option<Task> {
        let pos = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(pos))
    }

    pub fn prepend_lead(&mut self, lead: Lead) {
        self.leads.insert(0, lead);
    }

    pub fn prepend_deal(&mut self, deal: Deal) {
        self.deals.insert(0, deal);
    }

    pub fn prepend_task(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    pub fn prepend_note(&mut self, note: Note) {
        self.notes.insert(0, note);
    }
}

/// Snapshot file with records left unparsed.
#[derive(Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    leads: Vec<Value>,
    #[serde(default)]
    deals: Vec<Value>,
    #[serde(default)]
    tasks: Vec<Value>,
    #[serde(default)]
    notes: Vec<Value>,
}

fn parse_records<T: DeserializeOwned>(kind: &str, raw: Vec<Value>) -> Vec<T> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(i, value)| {
            let id = value
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or("?")
                .to_string();
            match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("Skipping {} {} (entry {}) in snapshot: {}", kind, id, i, e);
                    None
                }
            }
        })
        .collect()
}

// =============================================================================
// Time and identity
// =============================================================================

/// Source of "now" for timestamps and of "today" for task buckets.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Today's date as `YYYY-MM-DD` (UTC).
    fn today(&self) -> String {
        iso_date(self.now())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    at: Rc<Cell<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            at: Rc::new(Cell::new(at)),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.at.set(at);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.at.set(self.at.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.at.get()
    }
}

/// Assigns ids to newly created records.
pub trait IdGenerator {
    fn next_id(&mut self, now: DateTime<Utc>) -> String;
}

/// Millisecond timestamp ids. Two creates within the same millisecond
/// collide; the session logs a warning when that happens.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampIds;

impl IdGenerator for TimestampIds {
    fn next_id(&mut self, now: DateTime<Utc>) -> String {
        now.timestamp_millis().to_string()
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self, _now: DateTime<Utc>) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic ids with a prefix (`t-1`, `t-2`, ...).
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, _now: DateTime<Utc>) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
