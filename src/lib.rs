//! Actuator Controller Firmware Library
//!
//! Core logic for a keypad-driven position/rotation/actuator controller.
//! Key presses update a persistent actuation state, which is reported to
//! the actuator over a radio link protected by a Hamming(7,4) code with an
//! overall parity bit.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐  KeyMailbox  ┌────────────┐  Channel  ┌──────────┐
//! │  Keypad  │─────────────►│ Controller │──────────►│ Display  │
//! └──────────┘              │    FSM     │           └──────────┘
//!                           └─────┬──────┘
//!                                 │ outbound frame queue (10)
//! ┌──────────┐  JoinSignal  ┌─────▼──────┐  Hamming  ┌──────────┐
//! │ Join PB  │─────────────►│  Link FSM  │──────────►│  nRF24   │
//! └──────────┘              └────────────┘  16 → 32  └──────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Immutable-by-default**: state transitions return new instances
//! - **Functional core, imperative shell**: state machines return actions,
//!   the embassy tasks in `main.rs` carry them out
//! - **No unsafe in application code**
//! - **Explicit error handling**: fallible operations return `Result`

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Logging macros (defmt on target)
pub mod logging;

/// Peripheral Drivers
///
/// SSD1306 OLED and nRF24L01+ transceiver.
#[cfg(feature = "embedded")]
pub mod drivers;

/// Hamming(7,4) forward error correction
pub mod hamming;

/// Radio frame builder and parser
pub mod protocol;

/// Controller state machine and actuation state
pub mod controller;

/// Radio link state machine
pub mod radio;

/// Keypad and push-button input
pub mod input;

/// Objects shared between tasks
pub mod sync;

/// Display layout
pub mod ui;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    pub use crate::controller::actuation::ActuationState;
    pub use crate::controller::fsm::{Controller, ControllerAction};
    pub use crate::hamming::{decode_frame, encode_frame};
    pub use crate::protocol::{ControlMessage, EncodedFrame, UnencodedFrame};
    pub use crate::radio::FrameTransmitter;
}
