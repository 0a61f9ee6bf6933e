//! Radio Frame Protocol
//!
//! Fixed-size control frames sent from the controller to the actuator.
//!
//! ```text
//! offset  0     1..5      5..          8..11   11..14  14..16
//!        type  sender   ASCII tag    X / ang     Y       Z
//! ```
//!
//! Numeric fields are ASCII decimal digits, unused bytes are zero.

use core::fmt;

use crate::types::{MessageType, SenderAddress};

/// Unencoded frame length in bytes
pub const FRAME_LEN: usize = 16;

/// Hamming-encoded frame length in bytes
pub const ENCODED_FRAME_LEN: usize = FRAME_LEN * 2;

const SENDER_OFFSET: usize = 1;
const TAG_OFFSET: usize = 5;
const X_OFFSET: usize = 8;
const Y_OFFSET: usize = 11;
const Z_OFFSET: usize = 14;
const ANGLE_OFFSET: usize = 8;

const TAG_XYZ: &[u8] = b"XYZ";
const TAG_ROT: &[u8] = b"ROT";
const TAG_VON: &[u8] = b"VON";
const TAG_VOFF: &[u8] = b"VOFF";
const TAG_JOIN: &[u8] = b"JOIN";

/// Three ASCII decimal digits (hundreds, tens, ones) of `value`
#[must_use]
pub const fn ascii_digits3(value: u16) -> [u8; 3] {
    [
        (value / 100 % 10) as u8 + b'0',
        (value / 10 % 10) as u8 + b'0',
        (value % 10) as u8 + b'0',
    ]
}

/// Two ASCII decimal digits (tens, ones) of `value`
#[must_use]
pub const fn ascii_digits2(value: u8) -> [u8; 2] {
    [value / 10 % 10 + b'0', value % 10 + b'0']
}

/// Fixed 16-byte frame before forward error correction
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct UnencodedFrame([u8; FRAME_LEN]);

impl UnencodedFrame {
    /// Wrap raw frame bytes
    #[must_use]
    pub const fn new(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw frame bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// Message type tag, if it is a known one
    #[must_use]
    pub const fn message_type(&self) -> Option<MessageType> {
        MessageType::from_tag(self.0[0])
    }

    /// Sender address field
    #[must_use]
    pub const fn sender(&self) -> SenderAddress {
        SenderAddress::new([self.0[1], self.0[2], self.0[3], self.0[4]])
    }

    fn header(kind: MessageType, sender: SenderAddress, tag: &[u8]) -> Self {
        let mut frame = Self([0; FRAME_LEN]);
        frame.0[0] = kind.tag();
        frame.put(SENDER_OFFSET, &sender.bytes());
        frame.put(TAG_OFFSET, tag);
        frame
    }

    fn put(&mut self, offset: usize, data: &[u8]) {
        self.0[offset..offset + data.len()].copy_from_slice(data);
    }

    /// Position frame carrying the current X, Y and Z
    #[must_use]
    pub fn xyz(sender: SenderAddress, x: u16, y: u16, z: u8) -> Self {
        let mut frame = Self::header(MessageType::Xyz, sender, TAG_XYZ);
        frame.put(X_OFFSET, &ascii_digits3(x));
        frame.put(Y_OFFSET, &ascii_digits3(y));
        frame.put(Z_OFFSET, &ascii_digits2(z));
        frame
    }

    /// Rotation frame carrying the current angle
    #[must_use]
    pub fn rot(sender: SenderAddress, angle: u8) -> Self {
        let mut frame = Self::header(MessageType::Rot, sender, TAG_ROT);
        frame.put(ANGLE_OFFSET, &ascii_digits3(u16::from(angle)));
        frame
    }

    /// Actuator frame, "VON" when switched on and "VOFF" when switched off
    #[must_use]
    pub fn vac(sender: SenderAddress, on: bool) -> Self {
        Self::header(MessageType::Vac, sender, if on { TAG_VON } else { TAG_VOFF })
    }

    /// Join announcement frame
    #[must_use]
    pub fn join(sender: SenderAddress) -> Self {
        Self::header(MessageType::Join, sender, TAG_JOIN)
    }
}

impl Default for UnencodedFrame {
    fn default() -> Self {
        Self([0; FRAME_LEN])
    }
}

impl fmt::Debug for UnencodedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnencodedFrame({:02X?})", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for UnencodedFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Frame({=[u8]:02X})", self.0);
    }
}

/// Hamming-encoded 32-byte frame, ready for the radio
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct EncodedFrame([u8; ENCODED_FRAME_LEN]);

impl EncodedFrame {
    /// Wrap raw encoded bytes
    #[must_use]
    pub const fn new(bytes: [u8; ENCODED_FRAME_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw encoded bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ENCODED_FRAME_LEN] {
        &self.0
    }

    /// Mutable access, used to model channel noise
    pub fn as_bytes_mut(&mut self) -> &mut [u8; ENCODED_FRAME_LEN] {
        &mut self.0
    }
}

impl fmt::Debug for EncodedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedFrame({:02X?})", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for EncodedFrame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Encoded({=[u8]:02X})", self.0);
    }
}

/// Control message carried by a frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlMessage {
    /// Move to a position
    Xyz {
        /// X position
        x: u16,
        /// Y position
        y: u16,
        /// Z position
        z: u8,
    },
    /// Rotate to an angle
    Rot {
        /// Rotation angle in degrees
        angle: u8,
    },
    /// Switch the actuator
    Vac {
        /// Actuator on
        on: bool,
    },
    /// Controller joined the network
    Join,
}

impl ControlMessage {
    /// Message type tag used on the wire
    #[must_use]
    pub const fn message_type(self) -> MessageType {
        match self {
            Self::Xyz { .. } => MessageType::Xyz,
            Self::Rot { .. } => MessageType::Rot,
            Self::Vac { .. } => MessageType::Vac,
            Self::Join => MessageType::Join,
        }
    }

    /// Build the frame for this message
    #[must_use]
    pub fn to_frame(self, sender: SenderAddress) -> UnencodedFrame {
        match self {
            Self::Xyz { x, y, z } => UnencodedFrame::xyz(sender, x, y, z),
            Self::Rot { angle } => UnencodedFrame::rot(sender, angle),
            Self::Vac { on } => UnencodedFrame::vac(sender, on),
            Self::Join => UnencodedFrame::join(sender),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ControlMessage {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Xyz { x, y, z } => defmt::write!(f, "XYZ({}, {}, {})", x, y, z),
            Self::Rot { angle } => defmt::write!(f, "ROT({})", angle),
            Self::Vac { on } => defmt::write!(f, "VAC({})", on),
            Self::Join => defmt::write!(f, "JOIN"),
        }
    }
}

/// Frame parse failure
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// Byte 0 is not a known message type
    UnknownType(u8),
    /// ASCII payload tag does not match the message type
    BadTag(MessageType),
    /// A numeric field holds a non-digit byte
    BadDigit {
        /// Offset of the offending byte
        offset: usize,
    },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType(tag) => write!(f, "unknown message type 0x{tag:02X}"),
            Self::BadTag(kind) => write!(f, "payload tag does not match {kind:?}"),
            Self::BadDigit { offset } => write!(f, "non-digit byte at offset {offset}"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for FrameError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::UnknownType(tag) => defmt::write!(f, "UnknownType(0x{:02X})", tag),
            Self::BadTag(kind) => defmt::write!(f, "BadTag({})", kind),
            Self::BadDigit { offset } => defmt::write!(f, "BadDigit(@{})", offset),
        }
    }
}

fn digits(bytes: &[u8; FRAME_LEN], offset: usize, len: usize) -> Result<u16, FrameError> {
    bytes[offset..offset + len]
        .iter()
        .enumerate()
        .try_fold(0u16, |acc, (i, &b)| {
            if b.is_ascii_digit() {
                Ok(acc * 10 + u16::from(b - b'0'))
            } else {
                Err(FrameError::BadDigit { offset: offset + i })
            }
        })
}

fn has_tag(bytes: &[u8; FRAME_LEN], tag: &[u8]) -> bool {
    &bytes[TAG_OFFSET..TAG_OFFSET + tag.len()] == tag
}

/// Parse a decoded frame back into its sender and control message
///
/// # Errors
///
/// Returns a [`FrameError`] when the type tag is unknown, the ASCII payload
/// tag does not belong to the type, or a numeric field contains non-digits.
pub fn parse(frame: &UnencodedFrame) -> Result<(SenderAddress, ControlMessage), FrameError> {
    let bytes = frame.as_bytes();
    let kind = frame
        .message_type()
        .ok_or(FrameError::UnknownType(bytes[0]))?;

    let message = match kind {
        MessageType::Xyz => {
            if !has_tag(bytes, TAG_XYZ) {
                return Err(FrameError::BadTag(kind));
            }
            let x = digits(bytes, X_OFFSET, 3)?;
            let y = digits(bytes, Y_OFFSET, 3)?;
            // Two digits never exceed 99
            let z = digits(bytes, Z_OFFSET, 2)? as u8;
            ControlMessage::Xyz { x, y, z }
        }
        MessageType::Rot => {
            if !has_tag(bytes, TAG_ROT) {
                return Err(FrameError::BadTag(kind));
            }
            let angle = digits(bytes, ANGLE_OFFSET, 3)?;
            ControlMessage::Rot {
                angle: u8::try_from(angle).map_err(|_| FrameError::BadDigit { offset: ANGLE_OFFSET })?,
            }
        }
        MessageType::Vac => {
            if has_tag(bytes, TAG_VOFF) {
                ControlMessage::Vac { on: false }
            } else if has_tag(bytes, TAG_VON) {
                ControlMessage::Vac { on: true }
            } else {
                return Err(FrameError::BadTag(kind));
            }
        }
        MessageType::Join => {
            if !has_tag(bytes, TAG_JOIN) {
                return Err(FrameError::BadTag(kind));
            }
            ControlMessage::Join
        }
    };

    Ok((frame.sender(), message))
}
