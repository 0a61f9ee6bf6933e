//! Shared types used across the controller firmware
//!
//! This module defines the domain types exchanged between the keypad,
//! the controller state machine, the display and the radio link.

use core::fmt;

/// Symbolic keypad event
///
/// Only the thirteen keys wired to a controller action exist here. The
/// remaining keypad positions (D, E, F) have no event and are filtered out
/// by [`KeyEvent::from_code`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    /// Toggle the actuator
    K0,
    /// Grid point (0, 150)
    K1,
    /// Grid point (75, 150)
    K2,
    /// Grid point (150, 150)
    K3,
    /// Grid point (0, 75)
    K4,
    /// Grid point (75, 75)
    K5,
    /// Grid point (150, 75)
    K6,
    /// Grid point (0, 0)
    K7,
    /// Grid point (75, 0)
    K8,
    /// Grid point (150, 0)
    K9,
    /// Lower Z by one step
    KA,
    /// Raise Z by one step
    KB,
    /// Rotate by one step
    KC,
}

impl KeyEvent {
    /// All key events, in event-flag bit order
    pub const ALL: [Self; 13] = [
        Self::K1,
        Self::K2,
        Self::K3,
        Self::KA,
        Self::K4,
        Self::K5,
        Self::K6,
        Self::KB,
        Self::K7,
        Self::K8,
        Self::K9,
        Self::KC,
        Self::K0,
    ];

    /// Mask covering every key event flag
    pub const ALL_FLAGS: u16 = (1 << 13) - 1;

    /// Map a raw keypad code (0x0-0xF) to a key event
    ///
    /// Codes 0xD, 0xE and 0xF have no controller action and yield `None`.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x0 => Some(Self::K0),
            0x1 => Some(Self::K1),
            0x2 => Some(Self::K2),
            0x3 => Some(Self::K3),
            0x4 => Some(Self::K4),
            0x5 => Some(Self::K5),
            0x6 => Some(Self::K6),
            0x7 => Some(Self::K7),
            0x8 => Some(Self::K8),
            0x9 => Some(Self::K9),
            0xA => Some(Self::KA),
            0xB => Some(Self::KB),
            0xC => Some(Self::KC),
            _ => None,
        }
    }

    /// Raw keypad code of this key
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::K0 => 0x0,
            Self::K1 => 0x1,
            Self::K2 => 0x2,
            Self::K3 => 0x3,
            Self::K4 => 0x4,
            Self::K5 => 0x5,
            Self::K6 => 0x6,
            Self::K7 => 0x7,
            Self::K8 => 0x8,
            Self::K9 => 0x9,
            Self::KA => 0xA,
            Self::KB => 0xB,
            Self::KC => 0xC,
        }
    }

    /// Event-flag bit for this key
    #[must_use]
    pub const fn flag(self) -> u16 {
        let bit = match self {
            Self::K1 => 0,
            Self::K2 => 1,
            Self::K3 => 2,
            Self::KA => 3,
            Self::K4 => 4,
            Self::K5 => 5,
            Self::K6 => 6,
            Self::KB => 7,
            Self::K7 => 8,
            Self::K8 => 9,
            Self::K9 => 10,
            Self::KC => 11,
            Self::K0 => 12,
        };
        1 << bit
    }

    /// Decode the lowest set event flag
    #[must_use]
    pub fn from_flags(flags: u16) -> Option<Self> {
        let flags = flags & Self::ALL_FLAGS;
        if flags == 0 {
            return None;
        }
        Self::ALL.get(flags.trailing_zeros() as usize).copied()
    }

    /// Grid point selected by this key, if it is one of K1-K9
    #[must_use]
    pub const fn grid_point(self) -> Option<GridPoint> {
        match self {
            Self::K1 => Some(GridPoint::new(0, 150)),
            Self::K2 => Some(GridPoint::new(75, 150)),
            Self::K3 => Some(GridPoint::new(150, 150)),
            Self::K4 => Some(GridPoint::new(0, 75)),
            Self::K5 => Some(GridPoint::new(75, 75)),
            Self::K6 => Some(GridPoint::new(150, 75)),
            Self::K7 => Some(GridPoint::new(0, 0)),
            Self::K8 => Some(GridPoint::new(75, 0)),
            Self::K9 => Some(GridPoint::new(150, 0)),
            Self::K0 | Self::KA | Self::KB | Self::KC => None,
        }
    }

    /// Display cursor matching this key's grid point
    #[must_use]
    pub const fn cursor(self) -> Option<Cursor> {
        match self {
            Self::K1 => Some(Cursor::new(1, 3)),
            Self::K2 => Some(Cursor::new(12, 3)),
            Self::K3 => Some(Cursor::new(25, 3)),
            Self::K4 => Some(Cursor::new(1, 13)),
            Self::K5 => Some(Cursor::new(13, 13)),
            Self::K6 => Some(Cursor::new(25, 13)),
            Self::K7 => Some(Cursor::new(1, 23)),
            Self::K8 => Some(Cursor::new(13, 23)),
            Self::K9 => Some(Cursor::new(25, 23)),
            Self::K0 | Self::KA | Self::KB | Self::KC => None,
        }
    }

    /// Message type emitted after this key is handled
    #[must_use]
    pub const fn message_type(self) -> MessageType {
        match self {
            Self::KC => MessageType::Rot,
            Self::K0 => MessageType::Vac,
            _ => MessageType::Xyz,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for KeyEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::KA => defmt::write!(f, "Key(A)"),
            Self::KB => defmt::write!(f, "Key(B)"),
            Self::KC => defmt::write!(f, "Key(C)"),
            other => defmt::write!(f, "Key({})", other.code()),
        }
    }
}

/// Radio message type tag (byte 0 of every frame)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    /// Controller presence announcement
    Join = 0x20,
    /// Target position
    Xyz = 0x22,
    /// Rotation angle
    Rot = 0x23,
    /// Actuator (vacuum) on/off
    Vac = 0x24,
}

impl MessageType {
    /// Wire tag value
    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    /// Parse a wire tag
    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0x20 => Some(Self::Join),
            0x22 => Some(Self::Xyz),
            0x23 => Some(Self::Rot),
            0x24 => Some(Self::Vac),
            _ => None,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for MessageType {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Join => defmt::write!(f, "JOIN"),
            Self::Xyz => defmt::write!(f, "XYZ"),
            Self::Rot => defmt::write!(f, "ROT"),
            Self::Vac => defmt::write!(f, "VAC"),
        }
    }
}

/// Four-byte sender address carried in bytes 1-4 of every frame
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SenderAddress([u8; 4]);

impl SenderAddress {
    /// Create an address from raw bytes
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Raw address bytes
    #[must_use]
    pub const fn bytes(self) -> [u8; 4] {
        self.0
    }
}

impl fmt::Debug for SenderAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "SenderAddress({a:02X}:{b:02X}:{c:02X}:{d:02X})")
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SenderAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=[u8]:02X}", self.0);
    }
}

/// One of the nine addressable (x, y) positions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPoint {
    /// X position
    pub x: u16,
    /// Y position
    pub y: u16,
}

impl GridPoint {
    /// Create a grid point
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Display cursor position (column, row) in screen pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    /// Column
    pub col: u8,
    /// Row
    pub row: u8,
}

impl Cursor {
    /// Create a cursor position
    #[must_use]
    pub const fn new(col: u8, row: u8) -> Self {
        Self { col, row }
    }
}

impl Default for Cursor {
    /// Cursor of the (0, 0) grid point, where the actuator starts
    fn default() -> Self {
        Self::new(1, 23)
    }
}

/// Label drawn at the display cursor
pub const CURSOR_LABEL: &str = "+";

/// Display update produced on every DISPLAYING transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayCommand {
    /// Cursor column
    pub cursor_col: u8,
    /// Cursor row
    pub cursor_row: u8,
    /// Text drawn at the cursor
    pub label: &'static str,
    /// Current Z position
    pub z: u8,
    /// Current rotation angle
    pub angle: u8,
}

#[cfg(feature = "embedded")]
impl defmt::Format for DisplayCommand {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Display(({}, {}) z={} angle={})",
            self.cursor_col,
            self.cursor_row,
            self.z,
            self.angle
        );
    }
}
