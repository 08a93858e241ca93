//! Drag-and-drop reassignment on the board views.
//!
//! One card can be dragged at a time: `Idle -> Dragging(id) -> Idle`. Dropping
//! on a column dispatches the status/stage change for the dragged card and
//! always returns to `Idle`, whether or not the change succeeded. Dropping a
//! card on its own column is allowed and only re-stamps `updated_at`.

use serde::Serialize;

use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(String),
}

/// Something a board can move records between columns of.
pub trait BoardTarget<S> {
    fn reassign(&mut self, record_id: &str, column: S) -> Result<(), PipelineError>;
}

/// Result of a drop.
#[derive(Debug)]
pub enum DropOutcome<S> {
    /// Nothing was being dragged.
    Ignored,
    Moved { record_id: String, column: S },
    Failed { record_id: String, error: PipelineError },
}

#[derive(Debug)]
pub struct BoardController<S> {
    state: DragState,
    _column: std::marker::PhantomData<S>,
}

impl<S> Default for BoardController<S> {
    fn default() -> Self {
        Self {
            state: DragState::Idle,
            _column: std::marker::PhantomData,
        }
    }
}

impl<S: Copy + std::fmt::Display> BoardController<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn dragged(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging(id) => Some(id),
            DragState::Idle => None,
        }
    }

    /// Start dragging a card. A second drag start replaces the first.
    pub fn drag_start(&mut self, record_id: &str) {
        self.state = DragState::Dragging(record_id.to_string());
    }

    /// Drag cancelled or released outside a column.
    pub fn drag_end(&mut self) {
        self.state = DragState::Idle;
    }

    pub fn drop_on(&mut self, column: S, target: &mut impl BoardTarget<S>) -> DropOutcome<S> {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging(record_id) = state else {
            return DropOutcome::Ignored;
        };

        match target.reassign(&record_id, column) {
            Ok(()) => {
                log::debug!("Board drop: {} -> {}", record_id, column);
                DropOutcome::Moved { record_id, column }
            }
            Err(error) => {
                log::warn!("Board drop failed for {}: {}", record_id, error);
                DropOutcome::Failed { record_id, error }
            }
        }
    }
}

/// One board column: records in that state plus its header figures.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn<'a, S, R> {
    pub state: S,
    pub title: &'static str,
    pub records: Vec<&'a R>,
    pub count: usize,
    /// Sum of deal values; `None` for lead columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

/// Group records into columns in the given order, keeping record order.
pub fn group_by_column<'a, S, R>(
    columns: &[S],
    records: &[&'a R],
    state_of: impl Fn(&R) -> S,
    title_of: impl Fn(&S) -> &'static str,
    value_of: Option<&dyn Fn(&R) -> f64>,
) -> Vec<BoardColumn<'a, S, R>>
where
    S: Copy + PartialEq,
{
    columns
        .iter()
        .map(|&state| {
            let in_column: Vec<&'a R> = records
                .iter()
                .copied()
                .filter(|r| state_of(*r) == state)
                .collect();
            let total = value_of.map(|value| in_column.iter().map(|r| value(*r)).sum::<f64>());
            BoardColumn {
                state,
                title: title_of(&state),
                count: in_column.len(),
                records: in_column,
                total,
            }
        })
        .collect()
}
