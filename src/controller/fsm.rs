//! Controller State Machine
//!
//! ```text
//! INIT ──► IDLE ──key──► DISPLAYING ──► TRANSMITTING ──┐
//!           ▲  └─none─┘                                 │
//!           └───────────────────────────────────────────┘
//! ```
//!
//! Each call to [`Controller::step`] performs one transition and reports the
//! side effect to carry out as a [`ControllerAction`]. The owning task
//! forwards display commands to the display and frames to the radio queue.

use super::actuation::ActuationState;
use crate::protocol::UnencodedFrame;
use crate::types::{Cursor, DisplayCommand, KeyEvent, SenderAddress, CURSOR_LABEL};

/// Controller state machine states
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ControllerState {
    /// Power-on, left on the first step
    #[default]
    Init,
    /// Waiting for a key event
    Idle,
    /// Updating the actuation state and display for a key
    Displaying(KeyEvent),
    /// Emitting the control frame for a key
    Transmitting(KeyEvent),
}

#[cfg(feature = "embedded")]
impl defmt::Format for ControllerState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Init => defmt::write!(f, "INIT"),
            Self::Idle => defmt::write!(f, "IDLE"),
            Self::Displaying(key) => defmt::write!(f, "DISPLAYING({})", key),
            Self::Transmitting(key) => defmt::write!(f, "TRANSMITTING({})", key),
        }
    }
}

/// Side effect produced by a controller transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerAction {
    /// Nothing to do this cycle
    None,
    /// Send a command to the display
    Display(DisplayCommand),
    /// Push a frame onto the outbound radio queue
    Enqueue(UnencodedFrame),
}

#[cfg(feature = "embedded")]
impl defmt::Format for ControllerAction {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::None => defmt::write!(f, "None"),
            Self::Display(cmd) => defmt::write!(f, "Display({})", cmd),
            Self::Enqueue(frame) => defmt::write!(f, "Enqueue({})", frame),
        }
    }
}

/// Controller: state machine plus the state it persists across cycles
#[derive(Clone, Debug)]
pub struct Controller {
    /// Current state machine state
    state: ControllerState,
    /// Persistent actuation state
    actuation: ActuationState,
    /// Last grid cursor shown on the display
    cursor: Cursor,
    /// Address written into every frame
    sender: SenderAddress,
}

impl Controller {
    /// Create a controller in the INIT state
    #[must_use]
    pub fn new(sender: SenderAddress) -> Self {
        Self {
            state: ControllerState::Init,
            actuation: ActuationState::new(),
            cursor: Cursor::default(),
            sender,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// Current actuation state
    #[must_use]
    pub const fn actuation(&self) -> ActuationState {
        self.actuation
    }

    /// Cursor of the last selected grid point
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Sender address used in frames
    #[must_use]
    pub const fn sender(&self) -> SenderAddress {
        self.sender
    }

    /// Check if the controller is waiting for a key
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.state, ControllerState::Idle)
    }

    /// Run one transition
    ///
    /// `key` is only consumed in IDLE; callers poll the key mailbox only
    /// while [`Self::is_idle`] holds.
    pub fn step(&mut self, key: Option<KeyEvent>) -> ControllerAction {
        match self.state {
            ControllerState::Init => {
                self.state = ControllerState::Idle;
                ControllerAction::None
            }

            ControllerState::Idle => {
                if let Some(key) = key {
                    self.state = ControllerState::Displaying(key);
                }
                ControllerAction::None
            }

            ControllerState::Displaying(key) => {
                self.actuation = self.actuation.apply(key);
                if let Some(cursor) = key.cursor() {
                    self.cursor = cursor;
                }
                crate::log_debug!(
                    "controller: key {} -> z={} angle={}",
                    key.code(),
                    self.actuation.z(),
                    self.actuation.angle()
                );
                self.state = ControllerState::Transmitting(key);
                ControllerAction::Display(self.display_command())
            }

            ControllerState::Transmitting(key) => {
                self.state = ControllerState::Idle;
                ControllerAction::Enqueue(self.actuation.frame_for(key, self.sender))
            }
        }
    }

    /// Display command for the current state
    #[must_use]
    pub const fn display_command(&self) -> DisplayCommand {
        DisplayCommand {
            cursor_col: self.cursor.col,
            cursor_row: self.cursor.row,
            label: CURSOR_LABEL,
            z: self.actuation.z(),
            angle: self.actuation.angle(),
        }
    }

    /// Drive a key through DISPLAYING and TRANSMITTING
    ///
    /// Returns the display command and frame the key produced. Does nothing
    /// and returns `None` unless the controller is idle.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<(DisplayCommand, UnencodedFrame)> {
        if !self.is_idle() {
            return None;
        }
        self.step(Some(key));
        let ControllerAction::Display(display) = self.step(None) else {
            return None;
        };
        let ControllerAction::Enqueue(frame) = self.step(None) else {
            return None;
        };
        Some((display, frame))
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Controller {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Controller({}, {})", self.state, self.actuation);
    }
}
