//! Build-time configuration shared by the event counter and the renderer.
//!
//! Nothing in here is global: a [`CalendarConfig`] is built once and lent to
//! both components.

use chrono::Weekday;
use embedded_graphics::{
    image::ImageRaw,
    mono_font::{ascii::FONT_6X10, MonoFont},
    pixelcolor::BinaryColor,
    prelude::PixelColor,
};

use crate::draw::assets;

/// Default for [`LayoutConfig::max_events`]
pub const MAX_EVENTS: u8 = 3;

/// Default for [`EventsConfig::max_pages`]
pub const MAX_PAGES: u32 = 64;

/// Colors used for one day: its number and its event dots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette<C> {
    pub text: C,
    pub dots: C,
}

#[derive(Clone)]
pub struct LayoutConfig<C> {
    /// Color of the blank canvas
    pub background: C,
    /// Color of regular day numbers
    pub text_color: C,
    /// Color of the current day marker and of regular event dots
    pub highlight_color: C,
    /// Color of the day number and dots drawn over the current day marker
    pub on_highlight_color: C,
    pub marker: ImageRaw<'static, BinaryColor>,
    pub dot: ImageRaw<'static, BinaryColor>,
    /// Horizontal gap between two dots, also used as the gap under the text
    pub dot_margin: u32,
    pub font: &'static MonoFont<'static>,
    /// Fraction of the text height the day number is lifted above its anchor
    pub text_y_offset_ratio: f32,
    /// Dots drawn per day at most, extra events are dropped
    pub max_events: u8,
    pub week_start: Weekday,
}

impl<C: PixelColor> LayoutConfig<C> {
    pub fn new(background: C, text_color: C, highlight_color: C, on_highlight_color: C) -> Self {
        Self {
            background,
            text_color,
            highlight_color,
            on_highlight_color,
            marker: assets::squircle(),
            dot: assets::dot(),
            dot_margin: 1,
            font: &FONT_6X10,
            text_y_offset_ratio: 0.6,
            max_events: MAX_EVENTS,
            week_start: Weekday::Sun,
        }
    }

    /// Vertical distance between a day anchor and the top of its number
    pub fn text_y_offset(&self) -> i32 {
        (self.font.character_size.height as f32 * self.text_y_offset_ratio) as i32
    }

    pub fn palette(&self, is_today: bool) -> Palette<C> {
        if is_today {
            Palette {
                text: self.on_highlight_color,
                dots: self.on_highlight_color,
            }
        } else {
            Palette {
                text: self.text_color,
                dots: self.highlight_color,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventsConfig {
    /// Pages requested from the source before giving up
    pub max_pages: u32,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            max_pages: MAX_PAGES,
        }
    }
}

#[derive(Clone)]
pub struct CalendarConfig<C> {
    pub layout: LayoutConfig<C>,
    pub events: EventsConfig,
}

impl<C: PixelColor> CalendarConfig<C> {
    pub fn new(background: C, text_color: C, highlight_color: C, on_highlight_color: C) -> Self {
        Self {
            layout: LayoutConfig::new(background, text_color, highlight_color, on_highlight_color),
            events: EventsConfig::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use embedded_graphics::pixelcolor::Rgb888;

    use super::{CalendarConfig, Palette};

    const WHITE: Rgb888 = Rgb888::new(255, 255, 255);
    const BLACK: Rgb888 = Rgb888::new(0, 0, 0);
    const RED: Rgb888 = Rgb888::new(255, 0, 0);

    #[test]
    fn palettes() {
        let config = CalendarConfig::new(WHITE, BLACK, RED, WHITE);
        assert_eq!(
            config.layout.palette(false),
            Palette {
                text: BLACK,
                dots: RED
            }
        );
        assert_eq!(
            config.layout.palette(true),
            Palette {
                text: WHITE,
                dots: WHITE
            }
        );
    }

    #[test]
    fn text_offset_is_truncated() {
        let config = CalendarConfig::new(WHITE, BLACK, RED, WHITE);
        // FONT_6X10 is 10 pixels tall
        assert_eq!(config.layout.text_y_offset(), 6);
    }

    #[test]
    fn layout_defaults() {
        let config = CalendarConfig::new(WHITE, BLACK, RED, WHITE);
        assert_eq!(config.layout.dot_margin, 1);
        assert_eq!(config.layout.max_events, 3);
        assert_eq!(config.layout.text_y_offset_ratio, 0.6);
        assert_eq!(config.events.max_pages, 64);
    }
}
