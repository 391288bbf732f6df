//! Journal mutations with typed failures.

use tracing::debug;

use lotledger_domain::{Event, EventDraft, EventId, Journal};

use crate::CoreError;

/// Wraps [`Journal`] operations so unknown ids surface as [`CoreError::NotFound`].
pub struct JournalService;

impl JournalService {
    /// Stores `draft` under a fresh id and returns it.
    pub fn append(journal: &mut Journal, draft: EventDraft) -> Result<EventId, CoreError> {
        let id = journal.append(draft)?;
        debug!(event_id = %id, "journal append");
        Ok(id)
    }

    /// Removes the event with `id`, returning it for a possible restore.
    pub fn remove(journal: &mut Journal, id: EventId) -> Result<Event, CoreError> {
        let removed = journal.remove(id).ok_or(CoreError::NotFound(id))?;
        debug!(event_id = %id, "journal remove");
        Ok(removed)
    }

    /// Overwrites the event with `id`, returning the previous contents.
    pub fn replace(
        journal: &mut Journal,
        id: EventId,
        draft: EventDraft,
    ) -> Result<Event, CoreError> {
        let previous = journal.replace(id, draft).ok_or(CoreError::NotFound(id))?;
        debug!(event_id = %id, "journal replace");
        Ok(previous)
    }

    pub fn restore(journal: &mut Journal, event: Event) {
        journal.restore(event);
    }

    pub fn list_ordered(journal: &Journal) -> Vec<Event> {
        journal.list_ordered()
    }
}
