//! Controller Logic
//!
//! Turns keypad events into actuation state changes, display updates and
//! outgoing control frames.

pub mod actuation;
pub mod fsm;
