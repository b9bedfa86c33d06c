//! Lock-free single-slot inbox for asynchronous control events.
//!
//! Selector taps arrive from interrupt/task context while the
//! coordinator runs its poll loop. The inbox is the explicit
//! single-producer/single-consumer handoff between the two: the
//! producer overwrites the slot (latest event wins), the consumer
//! drains it at the top of every iteration with an atomic swap.

use core::sync::atomic::{AtomicU32, Ordering};

/// What happened on a channel's selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    /// The per-channel selector was tapped. Carries dual semantics in
    /// the coordinator: select the channel if it is inactive, advance
    /// its waveform if it is already active.
    SelectorTap,
}

/// A typed control event: which channel, and what happened to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlEvent {
    pub channel: u8,
    pub kind: EventKind,
}

/// Sentinel for an empty slot. Encoded events always carry the
/// occupancy bit, so no event collides with this value.
const EMPTY: u32 = 0;

const OCCUPIED: u32 = 0x8000_0000;

/// Single-slot SPSC mailbox over one atomic word.
///
/// `post` uses release ordering and `take` acquire, so the consumer
/// observes the event fields exactly as the producer wrote them. A
/// second `post` before the consumer runs replaces the pending event.
pub struct ControlInbox {
    slot: AtomicU32,
}

impl Default for ControlInbox {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlInbox {
    /// An empty inbox. `const`, so it can live in a `static`.
    pub const fn new() -> Self {
        Self {
            slot: AtomicU32::new(EMPTY),
        }
    }

    /// Publish an event, replacing any still-pending one.
    pub fn post(&self, event: ControlEvent) {
        self.slot.store(encode(event), Ordering::Release);
    }

    /// Remove and return the pending event, if any.
    pub fn take(&self) -> Option<ControlEvent> {
        match self.slot.swap(EMPTY, Ordering::AcqRel) {
            EMPTY => None,
            raw => Some(decode(raw)),
        }
    }
}

fn encode(event: ControlEvent) -> u32 {
    let kind = match event.kind {
        EventKind::SelectorTap => 0u32,
    };
    OCCUPIED | ((event.channel as u32) << 8) | kind
}

fn decode(raw: u32) -> ControlEvent {
    ControlEvent {
        channel: ((raw >> 8) & 0xFF) as u8,
        kind: EventKind::SelectorTap,
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_inbox_yields_nothing() {
        let inbox = ControlInbox::new();
        assert_eq!(inbox.take(), None);
    }

    #[test]
    fn post_take_roundtrip() {
        let inbox = ControlInbox::new();
        let event = ControlEvent {
            channel: 2,
            kind: EventKind::SelectorTap,
        };
        inbox.post(event);
        assert_eq!(inbox.take(), Some(event));
        assert_eq!(inbox.take(), None, "take must clear the slot");
    }

    #[test]
    fn channel_zero_is_distinguishable_from_empty() {
        let inbox = ControlInbox::new();
        inbox.post(ControlEvent {
            channel: 0,
            kind: EventKind::SelectorTap,
        });
        assert!(inbox.take().is_some());
    }

    #[test]
    fn second_post_replaces_pending_event() {
        let inbox = ControlInbox::new();
        inbox.post(ControlEvent {
            channel: 1,
            kind: EventKind::SelectorTap,
        });
        inbox.post(ControlEvent {
            channel: 3,
            kind: EventKind::SelectorTap,
        });
        assert_eq!(inbox.take().unwrap().channel, 3);
        assert_eq!(inbox.take(), None);
    }
}
