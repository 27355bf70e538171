//! Calendar events and the source they are fetched from

mod counter;
mod parse;

use alloc::{string::String, vec::Vec};

use chrono::{DateTime, FixedOffset};
pub use counter::{CountError, DayCount, EventCounter, MonthRange};
pub use parse::{parse_event, ParsedEvent};

/// Start or end of an event.
///
/// A well-formed marker carries exactly one of the two representations:
/// `date_time` (RFC 3339) for timed events, `date` (`YYYY-MM-DD`) for
/// all-day events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
}

impl EventTime {
    pub fn timed(date_time: &str) -> Self {
        Self {
            date_time: Some(date_time.into()),
            date: None,
        }
    }

    pub fn all_day(date: &str) -> Self {
        Self {
            date_time: None,
            date: Some(date.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct CalendarEvent {
    #[cfg_attr(feature = "serde", serde(default))]
    pub start: EventTime,
    #[cfg_attr(feature = "serde", serde(default))]
    pub end: EventTime,
}

impl CalendarEvent {
    pub fn new(start: EventTime, end: EventTime) -> Self {
        Self { start, end }
    }
}

/// One response of a paginated event listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EventPage {
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: Vec<CalendarEvent>,
    /// Present when more results are available
    pub next_page_token: Option<String>,
}

/// Remote calendar the events are fetched from.
///
/// Authentication, retries and timeouts are the implementor's business, the
/// counter calls this once per page and gives up on the first error.
#[allow(async_fn_in_trait)]
pub trait EventSource {
    type Error;

    /// List events intersecting `[time_min, time_max]`, continuing after
    /// `page_token` when one is given
    async fn list_events(
        &mut self,
        time_min: &DateTime<FixedOffset>,
        time_max: &DateTime<FixedOffset>,
        page_token: Option<&str>,
    ) -> Result<EventPage, Self::Error>;
}
