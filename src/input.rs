//! Operator Input
//!
//! Host-testable front ends for the 4x4 keypad and the join push-button.
//! The tasks in `main.rs` drive the pins; these types decide what counts
//! as a press.

pub mod button;
pub mod keypad;
