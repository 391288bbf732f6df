//! The event journal document: the system of record for purchases and liquidations.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;
use crate::event::{Event, EventDraft};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Deserialized journals pass through [`JournalRecord`] so `next_id` is
/// reconciled with the stored events before anyone can append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "JournalRecord")]
pub struct Journal {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u8,
    pub next_id: EventId,
    #[serde(with = "events_as_list")]
    events: BTreeMap<EventId, Event>,
}

/// On-disk shape of a journal, before id bookkeeping is checked.
#[derive(Deserialize)]
struct JournalRecord {
    id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default = "Journal::schema_version_default")]
    schema_version: u8,
    #[serde(default = "Journal::first_id")]
    next_id: EventId,
    #[serde(default, with = "events_as_list")]
    events: BTreeMap<EventId, Event>,
}

impl TryFrom<JournalRecord> for Journal {
    type Error = JournalError;

    fn try_from(record: JournalRecord) -> Result<Self, Self::Error> {
        let mut journal = Journal {
            id: record.id,
            name: record.name,
            created_at: record.created_at,
            updated_at: record.updated_at,
            schema_version: record.schema_version,
            next_id: record.next_id,
            events: record.events,
        };
        journal.reconcile_next_id()?;
        Ok(journal)
    }
}

/// Id bookkeeping failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalError {
    /// `next_id` points at an id that already holds an event.
    IdInUse(EventId),
    /// No id remains after this one.
    IdsExhausted(EventId),
}

impl fmt::Display for JournalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JournalError::IdInUse(id) => write!(f, "event id {} is already in use", id),
            JournalError::IdsExhausted(id) => {
                write!(f, "event id {} leaves no room for further events", id)
            }
        }
    }
}

impl std::error::Error for JournalError {}

impl Journal {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
            next_id: Self::first_id(),
            events: BTreeMap::new(),
        }
    }

    /// Assigns the next identifier to `draft`, stores it, and returns the id.
    /// Never overwrites an existing event.
    pub fn append(&mut self, draft: EventDraft) -> Result<EventId, JournalError> {
        let id = self.next_id;
        if self.events.contains_key(&id) {
            return Err(JournalError::IdInUse(id));
        }
        self.next_id = id.next().ok_or(JournalError::IdsExhausted(id))?;
        self.events.insert(id, draft.into_event(id));
        self.touch();
        Ok(id)
    }

    /// Raises `next_id` above every stored id.
    pub fn reconcile_next_id(&mut self) -> Result<(), JournalError> {
        let Some(&highest) = self.events.keys().next_back() else {
            return Ok(());
        };
        let floor = highest.next().ok_or(JournalError::IdsExhausted(highest))?;
        if self.next_id < floor {
            self.next_id = floor;
        }
        Ok(())
    }

    /// Deletes the event with `id`, handing it back so callers can restore it.
    pub fn remove(&mut self, id: EventId) -> Option<Event> {
        let removed = self.events.remove(&id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Puts a previously removed or replaced event back under its original id.
    pub fn restore(&mut self, event: Event) -> Option<Event> {
        let id = event.id();
        if id >= self.next_id {
            if let Some(next) = id.next() {
                self.next_id = next;
            }
        }
        let previous = self.events.insert(id, event);
        self.touch();
        previous
    }

    /// Replaces the contents stored under `id`, returning the previous event.
    pub fn replace(&mut self, id: EventId, draft: EventDraft) -> Option<Event> {
        if !self.events.contains_key(&id) {
            return None;
        }
        let previous = self.events.insert(id, draft.into_event(id));
        self.touch();
        previous
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.get(&id)
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.events.contains_key(&id)
    }

    /// All events sorted by `(timestamp, id)` ascending; the sole input to replay.
    pub fn list_ordered(&self) -> Vec<Event> {
        let mut ordered: Vec<Event> = self.events.values().cloned().collect();
        ordered.sort_by_key(Event::ordering_key);
        ordered
    }

    /// Events in id order, as they were entered.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    pub fn first_id() -> EventId {
        EventId(1)
    }
}

mod events_as_list {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use crate::common::{EventId, Identifiable};
    use crate::event::Event;

    pub fn serialize<S>(events: &BTreeMap<EventId, Event>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(events.values())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<EventId, Event>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let list = Vec::<Event>::deserialize(deserializer)?;
        let mut events = BTreeMap::new();
        for event in list {
            let id = event.id();
            if events.insert(id, event).is_some() {
                return Err(serde::de::Error::custom(format!(
                    "duplicate event id {id} in journal"
                )));
            }
        }
        Ok(events)
    }
}
