//! User Interface
//!
//! Screen layout for the 128x32 OLED. [`Screen::layout`] turns a
//! [`DisplayCommand`] into positioned text and the grid box; drawing the
//! layout onto a frame buffer is a thin loop on target.
//!
//! ```text
//! ┌────────────┐
//! │ +          │      Z:  40
//! │            │      Angle:  120
//! └────────────┘
//! ```

use core::fmt::Write;

use heapless::{String, Vec};

use crate::types::DisplayCommand;

/// Grid box width in pixels
pub const GRID_BOX_WIDTH: u32 = 30;

/// Static "Z:" label position
pub const Z_LABEL_POS: (i32, i32) = (60, 5);

/// Z value position
pub const Z_VALUE_POS: (i32, i32) = (80, 5);

/// Static "Angle:" label position
pub const ANGLE_LABEL_POS: (i32, i32) = (60, 18);

/// Angle value position
pub const ANGLE_VALUE_POS: (i32, i32) = (100, 18);

/// Longest text item (a three-digit value or "Angle:")
pub const TEXT_CAPACITY: usize = 6;

/// Number of text items on the screen
pub const TEXT_ITEMS: usize = 5;

/// Text drawn at a top-left pixel position
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextItem {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
    /// Text
    pub text: String<TEXT_CAPACITY>,
}

impl TextItem {
    fn new(pos: (i32, i32), text: &str) -> Self {
        let mut s = String::new();
        // Truncates silently; every caller stays within capacity
        for c in text.chars() {
            if s.push(c).is_err() {
                break;
            }
        }
        Self {
            x: pos.0,
            y: pos.1,
            text: s,
        }
    }

    fn number(pos: (i32, i32), value: u8) -> Self {
        let mut text = String::new();
        // u8 is at most three digits
        let _ = write!(text, "{value}");
        Self {
            x: pos.0,
            y: pos.1,
            text,
        }
    }
}

/// Complete screen content for one display command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Screen {
    /// Grid box size (width, height), anchored at the origin
    pub grid_box: (u32, u32),
    /// Text items in drawing order
    pub items: Vec<TextItem, TEXT_ITEMS>,
}

impl Screen {
    /// Lay out a display command on a screen `height` pixels tall
    #[must_use]
    pub fn layout(cmd: &DisplayCommand, height: u32) -> Self {
        let mut items = Vec::new();
        for item in [
            TextItem::new(Z_LABEL_POS, "Z:"),
            TextItem::new(ANGLE_LABEL_POS, "Angle:"),
            TextItem::new(
                (i32::from(cmd.cursor_col), i32::from(cmd.cursor_row)),
                cmd.label,
            ),
            TextItem::number(Z_VALUE_POS, cmd.z),
            TextItem::number(ANGLE_VALUE_POS, cmd.angle),
        ] {
            // Capacity matches the array above
            let _ = items.push(item);
        }

        Self {
            grid_box: (GRID_BOX_WIDTH, height),
            items,
        }
    }

    /// Find the text at a position
    #[must_use]
    pub fn text_at(&self, x: i32, y: i32) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.x == x && item.y == y)
            .map(|item| item.text.as_str())
    }
}

/// Display sink for controller output
pub trait DisplaySink {
    /// Display error type
    type Error;

    /// Render a display command
    ///
    /// # Errors
    ///
    /// Returns the display error when the screen could not be updated.
    fn render(&mut self, cmd: &DisplayCommand) -> Result<(), Self::Error>;
}

/// Draw a screen onto an embedded-graphics target
///
/// # Errors
///
/// Propagates the draw target's error.
#[cfg(feature = "embedded")]
pub fn draw<D>(screen: &Screen, target: &mut D) -> Result<(), D::Error>
where
    D: embedded_graphics::draw_target::DrawTarget<Color = embedded_graphics::pixelcolor::BinaryColor>,
{
    use embedded_graphics::mono_font::ascii::FONT_6X10;
    use embedded_graphics::mono_font::MonoTextStyle;
    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
    use embedded_graphics::text::{Baseline, Text};

    target.clear(BinaryColor::Off)?;

    let (w, h) = screen.grid_box;
    Rectangle::new(Point::zero(), Size::new(w, h))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(target)?;

    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    for item in &screen.items {
        Text::with_baseline(&item.text, Point::new(item.x, item.y), style, Baseline::Top)
            .draw(target)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CURSOR_LABEL;

    #[test]
    fn values_land_next_to_labels() {
        let cmd = DisplayCommand {
            cursor_col: 12,
            cursor_row: 3,
            label: CURSOR_LABEL,
            z: 40,
            angle: 170,
        };
        let screen = Screen::layout(&cmd, 32);
        assert_eq!(screen.text_at(80, 5), Some("40"));
        assert_eq!(screen.text_at(100, 18), Some("170"));
        assert_eq!(screen.text_at(12, 3), Some("+"));
        assert_eq!(screen.grid_box, (30, 32));
    }
}
