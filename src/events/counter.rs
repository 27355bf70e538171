use alloc::string::String;
use core::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use log::{debug, info};

use super::{parse_event, CalendarEvent, EventSource};
use crate::calendar_utils::MonthDate;
use crate::config::EventsConfig;

/// Amount of events touching each day of a month.
///
/// Reading a day that was never incremented, or that does not exist, gives 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayCount([u32; 31]);

impl DayCount {
    pub const fn new() -> Self {
        Self([0; 31])
    }

    /// Count for a 1-based day of the month
    pub fn get(&self, day: u8) -> u32 {
        usize::from(day)
            .checked_sub(1)
            .and_then(|idx| self.0.get(idx))
            .copied()
            .unwrap_or(0)
    }

    /// Add one to a 1-based day of the month, out of range days are ignored
    pub fn increment(&mut self, day: u8) {
        if let Some(count) = usize::from(day)
            .checked_sub(1)
            .and_then(|idx| self.0.get_mut(idx))
        {
            *count = count.saturating_add(1);
        }
    }

    /// Days with at least one event, in increasing order
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        (1..=31)
            .zip(self.0.iter().copied())
            .filter(|&(_, count)| count > 0)
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }
}

/// Time span requested from the source for one month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub month: MonthDate,
    /// Midnight starting the first day
    pub time_min: DateTime<FixedOffset>,
    /// Midnight starting the last day
    pub time_max: DateTime<FixedOffset>,
}

impl MonthRange {
    /// Range of the month `reference` is in, expressed in its current UTC offset
    pub fn of<Tz: TimeZone>(reference: &DateTime<Tz>) -> Self {
        let reference = reference.fixed_offset();
        let offset = *reference.offset();
        let month = MonthDate::new_from_date(reference.date_naive());
        let midnight = |date: NaiveDate| {
            offset
                .from_local_datetime(&date.and_time(NaiveTime::default()))
                .single()
                .expect("fixed offsets have no gaps or folds")
        };

        Self {
            month,
            time_min: midnight(month.to_start_day_naive()),
            time_max: midnight(month.to_end_day_naive()),
        }
    }
}

#[derive(Debug)]
pub enum CountError<E> {
    /// The source failed to return a page
    Source(E),
    /// The source still had a page cursor after the configured amount of pages
    TooManyPages { limit: u32 },
}

impl<E: fmt::Display> fmt::Display for CountError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(err) => write!(f, "calendar source error: {err}"),
            Self::TooManyPages { limit } => {
                write!(f, "calendar source returned more than {limit} pages")
            }
        }
    }
}

/// Reduces the events of a month to a [`DayCount`].
///
/// Only the start and end day of an event are counted, a five days long
/// event adds one to its first and one to its last day and nothing in
/// between. Endpoints outside the month still count on their day number.
/// Events repeated across pages are counted again.
pub struct EventCounter<'a> {
    config: &'a EventsConfig,
}

impl<'a> EventCounter<'a> {
    pub fn new(config: &'a EventsConfig) -> Self {
        Self { config }
    }

    pub async fn count_events<S, Tz>(
        &self,
        source: &mut S,
        reference: &DateTime<Tz>,
    ) -> Result<DayCount, CountError<S::Error>>
    where
        S: EventSource,
        Tz: TimeZone,
    {
        let range = MonthRange::of(reference);
        info!(
            "Counting events for year {} month {}",
            range.month.year(),
            range.month.month().number_from_month()
        );

        let mut counts = DayCount::new();
        let mut page_token: Option<String> = None;
        let mut pages = 0;

        loop {
            let page = source
                .list_events(&range.time_min, &range.time_max, page_token.as_deref())
                .await
                .map_err(CountError::Source)?;
            pages += 1;
            debug!("Page {pages}: {} events", page.items.len());

            for event in &page.items {
                count_event(&mut counts, event);
            }

            page_token = page.next_page_token.filter(|token| !token.is_empty());
            if page_token.is_none() {
                break;
            }
            if pages >= self.config.max_pages {
                return Err(CountError::TooManyPages {
                    limit: self.config.max_pages,
                });
            }
        }

        info!("Counted {} event days over {pages} pages", counts.total());
        Ok(counts)
    }
}

fn count_event(counts: &mut DayCount, event: &CalendarEvent) {
    let parsed = parse_event(event);
    let Some((start, end)) = parsed.dates() else {
        debug!("Skipping unparseable event {event:?}");
        return;
    };

    // Endpoints are keyed by day of month only, an end in the next month
    // lands on that day number
    let (start, end) = (start.day() as u8, end.day() as u8);
    counts.increment(start);
    if end != start {
        counts.increment(end);
    }
}
