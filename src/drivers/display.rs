//! OLED Display Driver
//!
//! SSD1306 128x32 over I2C in buffered graphics mode. Each display command
//! redraws the whole screen and flushes it.

use embedded_hal::i2c::I2c;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

use crate::config::{DISPLAY_HEIGHT, DISPLAY_I2C_ADDR};
use crate::types::DisplayCommand;
use crate::ui::{draw, DisplaySink, Screen};

/// Display operation failed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayFault {
    /// Controller did not accept the init sequence
    Init,
    /// Drawing into the frame buffer failed
    Draw,
    /// Frame buffer transfer failed
    Flush,
}

impl defmt::Format for DisplayFault {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Init => defmt::write!(f, "Init"),
            Self::Draw => defmt::write!(f, "Draw"),
            Self::Flush => defmt::write!(f, "Flush"),
        }
    }
}

/// OLED display driver
pub struct OledDisplay<I2C> {
    inner: Ssd1306<I2CInterface<I2C>, DisplaySize128x32, BufferedGraphicsMode<DisplaySize128x32>>,
}

impl<I2C: I2c> OledDisplay<I2C> {
    /// Create and initialise the display at [`DISPLAY_I2C_ADDR`]
    ///
    /// # Errors
    ///
    /// Returns [`DisplayFault::Init`] if the controller does not respond.
    pub fn new(i2c: I2C) -> Result<Self, DisplayFault> {
        let interface = I2CDisplayInterface::new_custom_address(i2c, DISPLAY_I2C_ADDR);
        let mut inner = Ssd1306::new(interface, DisplaySize128x32, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        inner.init().map_err(|_| DisplayFault::Init)?;
        Ok(Self { inner })
    }
}

impl<I2C: I2c> DisplaySink for OledDisplay<I2C> {
    type Error = DisplayFault;

    fn render(&mut self, cmd: &DisplayCommand) -> Result<(), DisplayFault> {
        let screen = Screen::layout(cmd, DISPLAY_HEIGHT);
        draw(&screen, &mut self.inner).map_err(|_| DisplayFault::Draw)?;
        self.inner.flush().map_err(|_| DisplayFault::Flush)
    }
}
