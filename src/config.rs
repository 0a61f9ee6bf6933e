//! System configuration and hardware constants
//!
//! Deployment addresses, task pacing, queue sizing and debounce guards for
//! the actuator controller. Everything tunable lives here.

use crate::types::SenderAddress;

/// Sender address written into bytes 1-4 of every frame
pub const SENDER_ADDRESS: SenderAddress = SenderAddress::new([0x47, 0x41, 0x85, 0x89]);

/// Transceiver TX address (5 bytes, LSB first on the wire)
pub const RADIO_TX_ADDRESS: [u8; 5] = [0x30, 0x10, 0x00, 0x00, 0x58];

/// Transceiver RF channel (2400 MHz + channel)
pub const RADIO_CHANNEL: u8 = 58;

/// Transceiver SPI clock
pub const RADIO_SPI_FREQUENCY_HZ: u32 = 1_000_000;

/// Outbound frame queue depth
pub const OUTBOUND_QUEUE_DEPTH: usize = 10;

/// Display command queue depth
pub const DISPLAY_QUEUE_DEPTH: usize = 4;

/// Controller task period in milliseconds
pub const CONTROLLER_PERIOD_MS: u64 = 50;

/// Radio link task period in milliseconds
pub const RADIO_PERIOD_MS: u64 = 8;

/// Keypad scan step period in milliseconds
pub const KEYPAD_PERIOD_MS: u64 = 2;

/// Delay between driving a keypad column and sampling the rows
pub const KEYPAD_SETTLE_US: u64 = 10;

/// Bounded wait for queue send/receive in milliseconds
pub const QUEUE_WAIT_MS: u64 = 10;

/// Join push-button guard time in milliseconds
pub const BUTTON_GUARD_MS: u64 = 200;

/// Consecutive scan cycles a key must be held before it is reported
pub const KEYPAD_DEBOUNCE_CYCLES: u8 = 3;

/// I2C bus frequency for the display
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// SSD1306 OLED I2C address
pub const DISPLAY_I2C_ADDR: u8 = 0x3C;

/// Display width in pixels
pub const DISPLAY_WIDTH: u32 = 128;

/// Display height in pixels
pub const DISPLAY_HEIGHT: u32 = 32;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments (NUCLEO-F429ZI)

    /// Join push-button (user button, rising edge)
    pub const JOIN_BUTTON: &str = "PC13";

    /// Status LED
    pub const LED_STATUS: &str = "PB0";

    /// Keypad column outputs 1-4
    pub const KEYPAD_COLS: [&str; 4] = ["PE9", "PE11", "PE13", "PE14"];

    /// Keypad row inputs 1-4
    pub const KEYPAD_ROWS: [&str; 4] = ["PE8", "PE10", "PE12", "PE15"];

    /// I2C1 SCL (display)
    pub const I2C1_SCL: &str = "PB8";

    /// I2C1 SDA (display)
    pub const I2C1_SDA: &str = "PB9";

    /// SPI1 SCK (transceiver)
    pub const SPI1_SCK: &str = "PA5";

    /// SPI1 MISO (transceiver)
    pub const SPI1_MISO: &str = "PA6";

    /// SPI1 MOSI (transceiver)
    pub const SPI1_MOSI: &str = "PA7";

    /// Transceiver chip select
    pub const RADIO_CS: &str = "PD14";

    /// Transceiver chip enable
    pub const RADIO_CE: &str = "PD15";
}
