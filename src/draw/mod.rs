pub mod assets;
pub mod canvas;
pub mod layout;

use core::fmt::{self, Write};

use chrono::{DateTime, NaiveDate, TimeZone};
use embedded_graphics::{
    image::Image,
    mono_font::MonoTextStyle,
    prelude::*,
    text::{renderer::TextRenderer, Baseline, Text},
};
use log::info;

use self::canvas::Tinted;
use self::layout::{dot_offsets, Anchor, DayCell, RenderPlan};
use crate::config::CalendarConfig;
use crate::events::{CountError, DayCount, EventCounter, EventSource};

#[derive(Debug)]
pub enum RenderError<E, D> {
    /// Events could not be counted, nothing was drawn
    Count(CountError<E>),
    /// The draw target refused a draw call
    Draw(D),
}

impl<E: fmt::Display, D: fmt::Debug> fmt::Display for RenderError<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(err) => write!(f, "{err}"),
            Self::Draw(err) => write!(f, "draw target error: {err:?}"),
        }
    }
}

/// Month view with a row of dots under every day that has events
pub struct CalendarRenderer<'a, C> {
    config: &'a CalendarConfig<C>,
}

impl<'a, C: PixelColor> CalendarRenderer<'a, C> {
    pub fn new(config: &'a CalendarConfig<C>) -> Self {
        Self { config }
    }

    /// Count the events of the month `now` is in, then draw it.
    ///
    /// Drawing only starts once every page has been fetched. The target is
    /// left untouched when counting fails.
    pub async fn render<S, D, Tz>(
        &self,
        source: &mut S,
        target: &mut D,
        now: &DateTime<Tz>,
    ) -> Result<(), RenderError<S::Error, D::Error>>
    where
        S: EventSource,
        D: DrawTarget<Color = C>,
        Tz: TimeZone,
    {
        let counts = EventCounter::new(&self.config.events)
            .count_events(source, now)
            .await
            .map_err(RenderError::Count)?;
        self.draw(target, now.date_naive(), &counts)
            .map_err(RenderError::Draw)
    }

    pub fn plan(&self, canvas: Size, today: NaiveDate, counts: &DayCount) -> RenderPlan<C> {
        RenderPlan::new(&self.config.layout, canvas, today, counts)
    }

    /// Clear `target` and draw the month of `today` on it
    pub fn draw<D>(
        &self,
        target: &mut D,
        today: NaiveDate,
        counts: &DayCount,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let canvas = target.bounding_box().size;
        info!("Drawing {today} on a {}x{} canvas", canvas.width, canvas.height);

        target.clear(self.config.layout.background)?;
        let plan = self.plan(canvas, today, counts);
        for cell in plan.cells() {
            self.draw_day(target, cell)?;
        }
        Ok(())
    }

    fn draw_day<D>(&self, target: &mut D, cell: &DayCell<C>) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = C>,
    {
        let layout = &self.config.layout;
        let Anchor { x, y } = cell.anchor;
        let text_y_offset = layout.text_y_offset() as f32;

        if cell.is_today {
            let size = layout.marker.size();
            let position = Point::new(
                (x - size.width as f32 / 2.0) as i32,
                (y - size.height as f32 / 2.0) as i32,
            );
            Image::new(&layout.marker, position)
                .draw(&mut Tinted::new(target, layout.highlight_color))?;
        }

        let mut label = heapless::String::<2>::new();
        // Days never have more than two digits
        let _ = write!(label, "{}", cell.day);
        let style = MonoTextStyle::new(layout.font, cell.palette.text);
        let text_width = style
            .measure_string(&label, Point::zero(), Baseline::Top)
            .bounding_box
            .size
            .width;
        let text_position = Point::new(
            (x - text_width as f32 / 2.0) as i32,
            (y - text_y_offset) as i32,
        );
        Text::with_baseline(&label, text_position, style, Baseline::Top).draw(target)?;

        let dot_width = layout.dot.size().width;
        let dot_y = (y + text_y_offset + layout.dot_margin as f32 - dot_width as f32 / 2.0) as i32;
        let mut tinted = Tinted::new(target, cell.palette.dots);
        for offset in dot_offsets(cell.dots, dot_width, layout.dot_margin) {
            Image::new(&layout.dot, Point::new((x + offset) as i32, dot_y)).draw(&mut tinted)?;
        }

        Ok(())
    }
}
