//! Actuation State
//!
//! Target position, rotation and actuator state held by the controller.
//! Transitions return new instances so every key press maps to exactly one
//! state change.

use crate::protocol::{ControlMessage, UnencodedFrame};
use crate::types::{GridPoint, KeyEvent, MessageType, SenderAddress};

/// Persistent actuation state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ActuationState {
    /// Target X position
    x: u16,
    /// Target Y position
    y: u16,
    /// Target Z position (0..=90, step 10)
    z: u8,
    /// Rotation angle (0..=170, step 10)
    angle: u8,
    /// Actuator (vacuum) engaged
    actuator_on: bool,
}

impl ActuationState {
    /// Highest Z position
    pub const Z_MAX: u8 = 90;

    /// Largest rotation angle
    pub const ANGLE_MAX: u8 = 170;

    /// Z and angle step size
    pub const STEP: u8 = 10;

    /// Create the power-on state (everything at zero, actuator off)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            x: 0,
            y: 0,
            z: 0,
            angle: 0,
            actuator_on: false,
        }
    }

    /// Target X position
    #[must_use]
    pub const fn x(&self) -> u16 {
        self.x
    }

    /// Target Y position
    #[must_use]
    pub const fn y(&self) -> u16 {
        self.y
    }

    /// Target Z position
    #[must_use]
    pub const fn z(&self) -> u8 {
        self.z
    }

    /// Rotation angle
    #[must_use]
    pub const fn angle(&self) -> u8 {
        self.angle
    }

    /// Actuator engaged
    #[must_use]
    pub const fn actuator_on(&self) -> bool {
        self.actuator_on
    }

    /// Move to a grid point (returns new state)
    #[must_use]
    pub const fn with_point(self, point: GridPoint) -> Self {
        Self {
            x: point.x,
            y: point.y,
            ..self
        }
    }

    /// Lower Z by one step, no-op below one step (returns new state)
    #[must_use]
    pub const fn lower(self) -> Self {
        if self.z >= Self::STEP {
            Self {
                z: self.z - Self::STEP,
                ..self
            }
        } else {
            self
        }
    }

    /// Raise Z by one step, clamped at [`Self::Z_MAX`] (returns new state)
    #[must_use]
    pub const fn raise(self) -> Self {
        if self.z <= Self::Z_MAX - Self::STEP {
            Self {
                z: self.z + Self::STEP,
                ..self
            }
        } else {
            self
        }
    }

    /// Rotate by one step, clamped at [`Self::ANGLE_MAX`] (returns new state)
    #[must_use]
    pub const fn rotate(self) -> Self {
        let angle = self.angle.saturating_add(Self::STEP);
        Self {
            angle: if angle > Self::ANGLE_MAX {
                Self::ANGLE_MAX
            } else {
                angle
            },
            ..self
        }
    }

    /// Toggle the actuator (returns new state)
    #[must_use]
    pub const fn toggle_actuator(self) -> Self {
        Self {
            actuator_on: !self.actuator_on,
            ..self
        }
    }

    /// Apply a key press to the state, returning the new state
    #[must_use]
    pub const fn apply(self, key: KeyEvent) -> Self {
        match key {
            KeyEvent::KA => self.lower(),
            KeyEvent::KB => self.raise(),
            KeyEvent::KC => self.rotate(),
            KeyEvent::K0 => self.toggle_actuator(),
            KeyEvent::K1
            | KeyEvent::K2
            | KeyEvent::K3
            | KeyEvent::K4
            | KeyEvent::K5
            | KeyEvent::K6
            | KeyEvent::K7
            | KeyEvent::K8
            | KeyEvent::K9 => match key.grid_point() {
                Some(point) => self.with_point(point),
                None => self,
            },
        }
    }

    /// Control message reporting this state after `key` was handled
    #[must_use]
    pub const fn message_for(&self, key: KeyEvent) -> ControlMessage {
        match key.message_type() {
            MessageType::Join => ControlMessage::Join,
            MessageType::Rot => ControlMessage::Rot { angle: self.angle },
            MessageType::Vac => ControlMessage::Vac {
                on: self.actuator_on,
            },
            MessageType::Xyz => ControlMessage::Xyz {
                x: self.x,
                y: self.y,
                z: self.z,
            },
        }
    }

    /// Frame reporting this state after `key` was handled
    #[must_use]
    pub fn frame_for(&self, key: KeyEvent, sender: SenderAddress) -> UnencodedFrame {
        self.message_for(key).to_frame(sender)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ActuationState {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Actuation(x={}, y={}, z={}, angle={}, on={})",
            self.x,
            self.y,
            self.z,
            self.angle,
            self.actuator_on
        );
    }
}
