//! Domain models for purchase and liquidation events.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Acquisition of a discrete lot of commodity.
pub struct PurchaseEvent {
    pub id: EventId,
    pub quantity: f64,
    pub unit_price: f64,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Sale of commodity to be matched against open lots.
pub struct LiquidationEvent {
    pub id: EventId,
    pub quantity: f64,
    pub selling_price: f64,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// A single journal entry.
pub enum Event {
    Purchase(PurchaseEvent),
    Liquidation(LiquidationEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Purchase,
    Liquidation,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventKind::Purchase => "Purchase",
            EventKind::Liquidation => "Liquidation",
        };
        f.write_str(label)
    }
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Purchase(_) => EventKind::Purchase,
            Event::Liquidation(_) => EventKind::Liquidation,
        }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            Event::Purchase(event) => event.timestamp,
            Event::Liquidation(event) => event.timestamp,
        }
    }

    pub fn quantity(&self) -> f64 {
        match self {
            Event::Purchase(event) => event.quantity,
            Event::Liquidation(event) => event.quantity,
        }
    }

    /// Unit price for purchases, selling price for liquidations.
    pub fn price(&self) -> f64 {
        match self {
            Event::Purchase(event) => event.unit_price,
            Event::Liquidation(event) => event.selling_price,
        }
    }

    /// Replay order key. The id breaks ties between events sharing a timestamp.
    pub fn ordering_key(&self) -> (NaiveDateTime, EventId) {
        (self.timestamp(), self.id())
    }

    pub fn as_purchase(&self) -> Option<&PurchaseEvent> {
        match self {
            Event::Purchase(event) => Some(event),
            Event::Liquidation(_) => None,
        }
    }

    pub fn as_liquidation(&self) -> Option<&LiquidationEvent> {
        match self {
            Event::Liquidation(event) => Some(event),
            Event::Purchase(_) => None,
        }
    }

    /// Returns the request that would recreate this event under a fresh id.
    pub fn to_draft(&self) -> EventDraft {
        match self {
            Event::Purchase(event) => EventDraft::Purchase {
                quantity: event.quantity,
                unit_price: event.unit_price,
                timestamp: event.timestamp,
            },
            Event::Liquidation(event) => EventDraft::Liquidation {
                quantity: event.quantity,
                selling_price: event.selling_price,
                timestamp: event.timestamp,
            },
        }
    }
}

impl Identifiable for Event {
    fn id(&self) -> EventId {
        match self {
            Event::Purchase(event) => event.id,
            Event::Liquidation(event) => event.id,
        }
    }
}

impl Displayable for Event {
    fn display_label(&self) -> String {
        format!(
            "{} {} {} @ {} on {}",
            self.id(),
            self.kind(),
            self.quantity(),
            self.price(),
            format_timestamp(self.timestamp())
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// Event contents awaiting an identifier from the journal.
pub enum EventDraft {
    Purchase {
        quantity: f64,
        unit_price: f64,
        timestamp: NaiveDateTime,
    },
    Liquidation {
        quantity: f64,
        selling_price: f64,
        timestamp: NaiveDateTime,
    },
}

impl EventDraft {
    pub fn purchase(quantity: f64, unit_price: f64, timestamp: NaiveDateTime) -> Self {
        EventDraft::Purchase {
            quantity,
            unit_price,
            timestamp: truncate_to_second(timestamp),
        }
    }

    pub fn liquidation(quantity: f64, selling_price: f64, timestamp: NaiveDateTime) -> Self {
        EventDraft::Liquidation {
            quantity,
            selling_price,
            timestamp: truncate_to_second(timestamp),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            EventDraft::Purchase { .. } => EventKind::Purchase,
            EventDraft::Liquidation { .. } => EventKind::Liquidation,
        }
    }

    pub fn quantity(&self) -> f64 {
        match self {
            EventDraft::Purchase { quantity, .. } | EventDraft::Liquidation { quantity, .. } => {
                *quantity
            }
        }
    }

    pub fn price(&self) -> f64 {
        match self {
            EventDraft::Purchase { unit_price, .. } => *unit_price,
            EventDraft::Liquidation { selling_price, .. } => *selling_price,
        }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        match self {
            EventDraft::Purchase { timestamp, .. } | EventDraft::Liquidation { timestamp, .. } => {
                *timestamp
            }
        }
    }

    /// Binds the draft to `id`, producing a journal event.
    pub fn into_event(self, id: EventId) -> Event {
        match self {
            EventDraft::Purchase {
                quantity,
                unit_price,
                timestamp,
            } => Event::Purchase(PurchaseEvent {
                id,
                quantity,
                unit_price,
                timestamp: truncate_to_second(timestamp),
            }),
            EventDraft::Liquidation {
                quantity,
                selling_price,
                timestamp,
            } => Event::Liquidation(LiquidationEvent {
                id,
                quantity,
                selling_price,
                timestamp: truncate_to_second(timestamp),
            }),
        }
    }
}
