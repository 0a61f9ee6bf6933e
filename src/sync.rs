//! Shared objects between tasks
//!
//! The keypad, push-button, controller and link tasks exchange data only
//! through these types. All of them take `&self`, so they can live in
//! `static`s without an extra mutex.

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};

use crate::config::OUTBOUND_QUEUE_DEPTH;
use crate::protocol::UnencodedFrame;
use crate::types::KeyEvent;

/// Key event-flag set with wait-any, auto-clear semantics
///
/// The keypad posts one flag per press. A take returns the lowest pending
/// flag and clears the whole set, so at most one event is handed over per
/// take and nothing is replayed later.
pub struct KeyMailbox {
    flags: AtomicU16,
}

impl KeyMailbox {
    /// Create an empty mailbox
    #[must_use]
    pub const fn new() -> Self {
        Self {
            flags: AtomicU16::new(0),
        }
    }

    /// Post a key event
    pub fn post(&self, key: KeyEvent) {
        self.flags.fetch_or(key.flag(), Ordering::Release);
    }

    /// Take the pending key event, clearing all flags
    pub fn take(&self) -> Option<KeyEvent> {
        let flags = self.flags.swap(0, Ordering::Acquire);
        KeyEvent::from_flags(flags)
    }

    /// Check for a pending event without consuming it
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.flags.load(Ordering::Relaxed) & KeyEvent::ALL_FLAGS != 0
    }
}

impl Default for KeyMailbox {
    fn default() -> Self {
        Self::new()
    }
}

/// Binary join trigger, consumed once
pub struct JoinSignal {
    raised: AtomicBool,
}

impl JoinSignal {
    /// Create a lowered signal
    #[must_use]
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Raise the signal (idempotent until taken)
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Consume the signal, returning whether it was raised
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::Acquire)
    }

    /// Check the signal without consuming it
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Relaxed)
    }
}

impl Default for JoinSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame rejected because the outbound queue is full
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueFull(pub UnencodedFrame);

#[cfg(feature = "embedded")]
impl defmt::Format for QueueFull {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "QueueFull");
    }
}

/// Bounded FIFO of unencoded frames between the controller and the link
///
/// The controller never waits on it: a full queue drops the new frame and
/// bumps [`OutboundQueue::dropped`]. The link either polls with
/// [`OutboundQueue::pop`] or awaits [`OutboundQueue::next`] under a timeout.
pub struct OutboundQueue {
    frames: Channel<CriticalSectionRawMutex, UnencodedFrame, OUTBOUND_QUEUE_DEPTH>,
    dropped: AtomicU32,
}

impl OutboundQueue {
    /// Create an empty queue
    #[must_use]
    pub const fn new() -> Self {
        Self {
            frames: Channel::new(),
            dropped: AtomicU32::new(0),
        }
    }

    /// Enqueue a frame without waiting
    ///
    /// # Errors
    ///
    /// Returns [`QueueFull`] carrying the rejected frame when the queue
    /// already holds [`OUTBOUND_QUEUE_DEPTH`] frames.
    pub fn push(&self, frame: UnencodedFrame) -> Result<(), QueueFull> {
        self.frames.try_send(frame).map_err(|TrySendError::Full(frame)| {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            QueueFull(frame)
        })
    }

    /// Dequeue the oldest frame, if any
    pub fn pop(&self) -> Option<UnencodedFrame> {
        self.frames.try_receive().ok()
    }

    /// Wait for the next frame
    pub async fn next(&self) -> UnencodedFrame {
        self.frames.receive().await
    }

    /// Number of queued frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames dropped because the queue was full
    #[must_use]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for OutboundQueue {
    fn default() -> Self {
        Self::new()
    }
}
