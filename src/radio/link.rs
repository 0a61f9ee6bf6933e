//! Radio Link State Machine
//!
//! ```text
//! INIT ──► IDLE ──join / frame──► ENCODE ──► TRANSMIT ──┐
//!           ▲ └─nothing─┘                                │
//!           └────────────────────────────────────────────┘
//! ```
//!
//! A pending join always wins over queued frames. The queue is only read
//! when no join is pending, so a join is never lost to a queued frame.

use super::FrameTransmitter;
use crate::hamming::encode_frame;
use crate::protocol::{EncodedFrame, UnencodedFrame};
use crate::types::SenderAddress;

/// Frame offered to the link while it is idle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkInput {
    /// Nothing arrived within the wait
    Nothing,
    /// The join button was pressed
    Join,
    /// A frame was taken from the outbound queue
    Frame(UnencodedFrame),
}

impl LinkInput {
    /// Select the input for an idle cycle
    ///
    /// `next_frame` is only called when `join` is false.
    pub fn select(join: bool, next_frame: impl FnOnce() -> Option<UnencodedFrame>) -> Self {
        if join {
            Self::Join
        } else {
            next_frame().map_or(Self::Nothing, Self::Frame)
        }
    }
}

/// Radio link states
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LinkState {
    /// Power-on
    #[default]
    Init,
    /// Waiting for a join or a queued frame
    Idle,
    /// Frame copied in, waiting to be encoded
    Encode(UnencodedFrame),
    /// Encoded frame waiting to be sent
    Transmit(EncodedFrame),
}

#[cfg(feature = "embedded")]
impl defmt::Format for LinkState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Init => defmt::write!(f, "INIT"),
            Self::Idle => defmt::write!(f, "IDLE"),
            Self::Encode(_) => defmt::write!(f, "ENCODE"),
            Self::Transmit(_) => defmt::write!(f, "TRANSMIT"),
        }
    }
}

/// Result of one link transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkAction {
    /// No work this cycle
    None,
    /// A frame was accepted for sending
    Accepted,
    /// A frame was encoded
    Encoded,
    /// The transceiver accepted the frame
    Sent,
    /// The transceiver rejected the frame; it is dropped
    SendFailed,
}

#[cfg(feature = "embedded")]
impl defmt::Format for LinkAction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::None => defmt::write!(f, "None"),
            Self::Accepted => defmt::write!(f, "Accepted"),
            Self::Encoded => defmt::write!(f, "Encoded"),
            Self::Sent => defmt::write!(f, "Sent"),
            Self::SendFailed => defmt::write!(f, "SendFailed"),
        }
    }
}

/// Link diagnostic counters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct LinkStats {
    /// Control frames handed to the transceiver
    pub frames_sent: u32,
    /// Join frames handed to the transceiver
    pub joins_sent: u32,
    /// Sends the transceiver rejected
    pub send_failures: u32,
}

/// Radio link: state machine, join bookkeeping and counters
#[derive(Clone, Debug)]
pub struct RadioLink {
    state: LinkState,
    sender: SenderAddress,
    join_in_progress: bool,
    stats: LinkStats,
}

impl RadioLink {
    /// Create a link in the INIT state
    #[must_use]
    pub const fn new(sender: SenderAddress) -> Self {
        Self {
            state: LinkState::Init,
            sender,
            join_in_progress: false,
            stats: LinkStats {
                frames_sent: 0,
                joins_sent: 0,
                send_failures: 0,
            },
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> LinkState {
        self.state
    }

    /// Check if the link will read input on the next step
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.state, LinkState::Idle)
    }

    /// Check if the frame in flight is a join announcement
    #[must_use]
    pub const fn join_in_progress(&self) -> bool {
        self.join_in_progress
    }

    /// Diagnostic counters
    #[must_use]
    pub const fn stats(&self) -> LinkStats {
        self.stats
    }

    /// Run one transition
    ///
    /// `input` is only read in IDLE. `radio` is only used in TRANSMIT.
    pub fn step<T: FrameTransmitter>(&mut self, input: LinkInput, radio: &mut T) -> LinkAction {
        match self.state {
            LinkState::Init => {
                self.state = LinkState::Idle;
                LinkAction::None
            }

            LinkState::Idle => match input {
                LinkInput::Nothing => LinkAction::None,
                LinkInput::Join => {
                    crate::log_debug!("link: join requested");
                    self.join_in_progress = true;
                    self.state = LinkState::Encode(UnencodedFrame::join(self.sender));
                    LinkAction::Accepted
                }
                LinkInput::Frame(frame) => {
                    self.state = LinkState::Encode(frame);
                    LinkAction::Accepted
                }
            },

            LinkState::Encode(frame) => {
                self.state = LinkState::Transmit(encode_frame(&frame));
                LinkAction::Encoded
            }

            LinkState::Transmit(encoded) => {
                let was_join = self.join_in_progress;
                self.join_in_progress = false;
                self.state = LinkState::Idle;

                if radio.send(&encoded).is_ok() {
                    if was_join {
                        self.stats.joins_sent = self.stats.joins_sent.wrapping_add(1);
                    } else {
                        self.stats.frames_sent = self.stats.frames_sent.wrapping_add(1);
                    }
                    LinkAction::Sent
                } else {
                    self.stats.send_failures = self.stats.send_failures.wrapping_add(1);
                    crate::log_warn!("link: send failed ({} total)", self.stats.send_failures);
                    LinkAction::SendFailed
                }
            }
        }
    }

    /// Drive one input from IDLE through ENCODE and TRANSMIT
    ///
    /// Returns the outcome of the transmit step, or [`LinkAction::None`]
    /// if the link was not idle or `input` was [`LinkInput::Nothing`].
    pub fn run_cycle<T: FrameTransmitter>(&mut self, input: LinkInput, radio: &mut T) -> LinkAction {
        if !self.is_idle() || self.step(input, radio) != LinkAction::Accepted {
            return LinkAction::None;
        }
        self.step(LinkInput::Nothing, radio);
        self.step(LinkInput::Nothing, radio)
    }
}
