mod counter;

use alloc::{string::String, vec::Vec};

use chrono::{DateTime, FixedOffset};

use crate::events::{CalendarEvent, EventPage, EventSource, EventTime};

#[macro_export]
macro_rules! date {
    ( $date: expr ) => {{
        use chrono::NaiveDate;
        NaiveDate::parse_from_str($date, "%Y-%m-%d").expect("invalid date literal")
    }};
}

#[macro_export]
macro_rules! datetime {
    ( $datetime: expr ) => {{
        use chrono::DateTime;
        DateTime::parse_from_rfc3339($datetime).expect("invalid datetime literal")
    }};
}

fn timed(start: &str, end: &str) -> CalendarEvent {
    CalendarEvent::new(EventTime::timed(start), EventTime::timed(end))
}

fn all_day(start: &str, end: &str) -> CalendarEvent {
    CalendarEvent::new(EventTime::all_day(start), EventTime::all_day(end))
}

fn page(items: Vec<CalendarEvent>, next_page_token: Option<&str>) -> EventPage {
    EventPage {
        items,
        next_page_token: next_page_token.map(String::from),
    }
}

#[derive(Debug, PartialEq, Eq)]
struct SourceFailure;

impl core::fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "source failure")
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Request {
    time_min: DateTime<FixedOffset>,
    time_max: DateTime<FixedOffset>,
    page_token: Option<String>,
}

/// Serves canned pages in order and records every request
#[derive(Default)]
struct PagedSource {
    pages: Vec<EventPage>,
    /// Answer with an error instead of the page at this index
    fail_at: Option<usize>,
    /// Once the canned pages run out, keep answering with a page pointing
    /// to yet another page
    endless: bool,
    requests: Vec<Request>,
}

impl PagedSource {
    fn new(pages: Vec<EventPage>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }
}

impl EventSource for PagedSource {
    type Error = SourceFailure;

    async fn list_events(
        &mut self,
        time_min: &DateTime<FixedOffset>,
        time_max: &DateTime<FixedOffset>,
        page_token: Option<&str>,
    ) -> Result<EventPage, Self::Error> {
        let idx = self.requests.len();
        self.requests.push(Request {
            time_min: *time_min,
            time_max: *time_max,
            page_token: page_token.map(String::from),
        });

        if self.fail_at == Some(idx) {
            return Err(SourceFailure);
        }
        match self.pages.get(idx) {
            Some(page) => Ok(page.clone()),
            None if self.endless => Ok(page(Vec::new(), Some("more"))),
            None => Err(SourceFailure),
        }
    }
}
