//! Event log
//!
//! Bounded history of what happened to which organism, for hosts to display.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::components::{OrganismId, Parents};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Founded,
    /// `organism` was born; `parents` names both parents.
    Birth,
    /// Died without a partner.
    Death,
    /// Died and left `other` without a partner.
    Widowed,
    Pairing,
    /// `other` was drawn but shares an ancestor with `organism`.
    RelatedRejected,
    /// No partner found before the attempt cap.
    SearchExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub event_type: EventType,
    pub generation: u32,
    pub organism: OrganismId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<OrganismId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Parents>,
}

#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<Event>,
    capacity: usize,
}

impl EventLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn push(&mut self, event: Event) {
        if self.capacity == 0 {
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn record(
        &mut self,
        event_type: EventType,
        generation: u32,
        organism: OrganismId,
        other: Option<OrganismId>,
    ) {
        self.push(Event {
            event_type,
            generation,
            organism,
            other,
            parents: None,
        });
    }

    pub fn record_birth(&mut self, generation: u32, child: OrganismId, parents: Parents) {
        self.push(Event {
            event_type: EventType::Birth,
            generation,
            organism: child,
            other: None,
            parents: Some(parents),
        });
    }

    /// Most recent `count` events, newest first.
    pub fn get_recent(&self, count: usize) -> Vec<Event> {
        self.events.iter().rev().take(count).copied().collect()
    }

    pub fn count_of(&self, event_type: EventType) -> usize {
        self.events
            .iter()
            .filter(|e| e.event_type == event_type)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
