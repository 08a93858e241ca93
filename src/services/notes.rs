// Notes service
// Free-text notes attached to a lead, a deal, or both.

use crate::activity::{ActivityEvent, ActivityKind};
use crate::error::{Notice, PipelineError, ValidationError};
use crate::state::Session;
use crate::types::Note;
use crate::util::non_empty;

/// Add a note. Links are stored as given; a dangling id is kept.
pub fn add_note(
    session: &mut Session,
    content: &str,
    lead_id: Option<&str>,
    deal_id: Option<&str>,
) -> Result<Note, PipelineError> {
    let Some(content) = non_empty(content.trim()) else {
        return Err(session.reject(ValidationError::NoteContentRequired));
    };

    let now = session.now_iso();
    let note = Note {
        id: session.next_id(),
        content,
        lead_id: lead_id.and_then(non_empty),
        deal_id: deal_id.and_then(non_empty),
        created_at: now.clone(),
        updated_at: now,
    };

    // Deal title wins over lead name in the feed when both resolve.
    let store = &session.store;
    let target = store
        .deal_title(note.deal_id.as_deref())
        .map(|title| (title.to_string(), ActivityKind::Deal))
        .or_else(|| {
            store
                .linked_lead_name(note.lead_id.as_deref())
                .map(|name| (name.to_string(), ActivityKind::Lead))
        });
    let event = ActivityEvent::note_added(
        &note.id,
        target.as_ref().map(|(name, kind)| (name.as_str(), *kind)),
    );

    session.store.prepend_note(note.clone());
    session.record(event);
    session.notify(Notice::success("Note added"));
    Ok(note)
}
