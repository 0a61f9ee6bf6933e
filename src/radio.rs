//! Radio Link
//!
//! Moves frames from the controller to the air: picks the next frame (a
//! local join announcement or a queued control frame), Hamming-encodes it
//! and hands the encoded bytes to the transceiver.

pub mod link;

use crate::protocol::EncodedFrame;

/// Radio transmit primitive
///
/// Implemented by the transceiver driver on target and by recorders in
/// host tests.
pub trait FrameTransmitter {
    /// Transceiver error type
    type Error;

    /// Transmit one encoded frame
    ///
    /// # Errors
    ///
    /// Returns the transceiver error when the frame could not be handed
    /// to the hardware.
    fn send(&mut self, frame: &EncodedFrame) -> Result<(), Self::Error>;
}

impl<T: FrameTransmitter + ?Sized> FrameTransmitter for &mut T {
    type Error = T::Error;

    fn send(&mut self, frame: &EncodedFrame) -> Result<(), Self::Error> {
        (**self).send(frame)
    }
}
