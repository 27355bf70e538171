//! Placement of the days of a month on the canvas.
//!
//! Positions only depend on the grid position of a day, the canvas size and
//! the grid constants. Months spanning less than six weeks keep the same row
//! spacing and leave a larger margin at the bottom instead of stretching.

use arrayvec::ArrayVec;
use chrono::{Datelike, NaiveDate};
use embedded_graphics::prelude::{PixelColor, Size};

use crate::calendar_utils::{CalendarMonth, MonthGrid, DAYS_IN_WEEK, WEEKS_IN_MONTH};
use crate::config::{LayoutConfig, Palette};
use crate::events::DayCount;

/// Center of a day cell, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

/// Distance between two neighbouring anchors.
///
/// One extra column and row are reserved so every edge gets a half cell
/// margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strides {
    pub x: f32,
    pub y: f32,
}

impl Strides {
    pub fn for_canvas(canvas: Size) -> Self {
        Self {
            x: canvas.width as f32 / (DAYS_IN_WEEK + 1) as f32,
            y: canvas.height as f32 / (WEEKS_IN_MONTH + 1) as f32,
        }
    }

    pub fn anchor(&self, week_index: usize, day_index: usize) -> Anchor {
        Anchor {
            x: (day_index + 1) as f32 * self.x,
            y: (week_index + 1) as f32 * self.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayCell<C> {
    pub day: u8,
    pub week_index: usize,
    pub day_index: usize,
    pub anchor: Anchor,
    pub is_today: bool,
    pub palette: Palette<C>,
    /// Event dots to draw, clamped to the configured maximum
    pub dots: u8,
}

/// Everything needed to draw one month, one cell per day
#[derive(Debug, Clone)]
pub struct RenderPlan<C> {
    grid: MonthGrid,
    cells: ArrayVec<DayCell<C>, { DAYS_IN_WEEK * WEEKS_IN_MONTH }>,
}

impl<C: PixelColor> RenderPlan<C> {
    pub fn new(
        layout: &LayoutConfig<C>,
        canvas: Size,
        today: NaiveDate,
        counts: &DayCount,
    ) -> Self {
        let grid = CalendarMonth::from_date(today).month_grid(layout.week_start);
        let strides = Strides::for_canvas(canvas);

        let cells = grid
            .slots()
            .map(|(week_index, day_index, day)| {
                let is_today = u32::from(day) == today.day();
                DayCell {
                    day,
                    week_index,
                    day_index,
                    anchor: strides.anchor(week_index, day_index),
                    is_today,
                    palette: layout.palette(is_today),
                    dots: clamp_dots(counts.get(day), layout.max_events),
                }
            })
            .collect();

        Self { grid, cells }
    }

    pub fn grid(&self) -> &MonthGrid {
        &self.grid
    }

    pub fn cells(&self) -> &[DayCell<C>] {
        &self.cells
    }

    pub fn cell(&self, day: u8) -> Option<&DayCell<C>> {
        self.cells.iter().find(|cell| cell.day == day)
    }
}

pub fn clamp_dots(events: u32, max_events: u8) -> u8 {
    events.min(max_events.into()) as u8
}

/// Horizontal offsets of `count` dots from the anchor, centering the row
pub fn dot_offsets(count: u8, dot_width: u32, margin: u32) -> impl Iterator<Item = f32> {
    let count = u32::from(count);
    let row_width = (count * dot_width + count.saturating_sub(1) * margin) as f32;
    (0..count).map(move |idx| (idx * (dot_width + margin)) as f32 - row_width / 2.0)
}

#[cfg(test)]
mod test {
    use embedded_graphics::prelude::Size;

    use super::{clamp_dots, dot_offsets, Strides};

    #[test]
    fn strides_reserve_half_cell_margins() {
        let strides = Strides::for_canvas(Size::new(700, 350));
        assert_eq!(strides.x, 87.5);
        assert_eq!(strides.y, 50.0);

        assert_eq!(strides.anchor(0, 0).x, 87.5);
        assert_eq!(strides.anchor(0, 6).x, 612.5);
        assert_eq!(strides.anchor(0, 0).y, 50.0);
        assert_eq!(strides.anchor(5, 0).y, 300.0);
    }

    #[test]
    fn dots_are_clamped() {
        let clamped: alloc::vec::Vec<_> = [0, 1, 3, 3, 10]
            .into_iter()
            .map(|events| clamp_dots(events, 3))
            .collect();
        assert_eq!(clamped, [0, 1, 3, 3, 3]);
    }

    #[test]
    fn dot_row_is_centered() {
        assert_eq!(dot_offsets(0, 3, 1).count(), 0);
        assert_eq!(dot_offsets(1, 3, 1).collect::<alloc::vec::Vec<_>>(), [-1.5]);
        assert_eq!(
            dot_offsets(3, 4, 4).collect::<alloc::vec::Vec<_>>(),
            [-10.0, -2.0, 6.0]
        );
    }
}
