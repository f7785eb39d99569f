//! Outward cursor notifications
//!
//! Replaces topic strings on a process-wide bus with a typed channel. The
//! host subscribes once and drains events in its own loop.

use crossbeam::channel::{self, Receiver, Sender};

/// A finished, non-empty range selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Time where the drag began, in seconds (may be later than `end_time`)
    pub start_time: f64,
    pub end_time: f64,
}

/// Events published by the cursor
#[derive(Debug, Clone, PartialEq)]
pub enum CursorEvent {
    /// Layout received; the cursor can now be drawn
    Ready { duration: f64, segments: usize },

    /// User released a drag that selected a time range
    Selected(Selection),

    /// A playback chain started
    PlaybackStarted,

    /// Playback reached the end of the timeline
    PlaybackEnded,

    /// Playback was stopped by the host
    PlaybackStopped,
}

/// Event bus for cursor notifications
pub struct EventBus {
    sender: Sender<CursorEvent>,
    receiver: Receiver<CursorEvent>,
}

impl EventBus {
    /// Create a new event bus with bounded capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = channel::bounded(capacity);
        Self { sender, receiver }
    }

    /// Get a receiver for subscribing to events
    pub fn subscribe(&self) -> Receiver<CursorEvent> {
        self.receiver.clone()
    }

    /// Publish without blocking; a full bus drops the event with a warning
    ///
    /// The bus holds its own receiver, so it never disconnects.
    pub fn notify(&self, event: CursorEvent) {
        if let Err(e) = self.sender.try_send(event) {
            log::warn!("Cursor event dropped: {:?}", e.into_inner());
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
