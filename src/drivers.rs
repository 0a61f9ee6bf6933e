//! Peripheral Drivers
//!
//! Drivers for the external parts on the controller board: the SSD1306
//! OLED and the nRF24L01+ transceiver.

pub mod display;
pub mod nrf24;
