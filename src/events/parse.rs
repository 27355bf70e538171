use chrono::{DateTime, FixedOffset, NaiveDate};

use super::CalendarEvent;

const ALL_DAY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedEvent {
    Timed {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
    AllDay {
        start: NaiveDate,
        end: NaiveDate,
    },
    Unparseable,
}

impl ParsedEvent {
    /// Calendar dates of the start and end, in the offset the source reported
    pub fn dates(&self) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Self::Timed { start, end } => Some((start.date_naive(), end.date_naive())),
            Self::AllDay { start, end } => Some((*start, *end)),
            Self::Unparseable => None,
        }
    }
}

/// Read an event as timed first, then as all-day.
///
/// Both markers have to use the same representation. Strings that fail to
/// parse make the whole event [`ParsedEvent::Unparseable`].
pub fn parse_event(event: &CalendarEvent) -> ParsedEvent {
    let (start, end) = (&event.start, &event.end);

    if let (Some(start), Some(end)) = (&start.date_time, &end.date_time) {
        return match (
            DateTime::parse_from_rfc3339(start),
            DateTime::parse_from_rfc3339(end),
        ) {
            (Ok(start), Ok(end)) => ParsedEvent::Timed { start, end },
            _ => ParsedEvent::Unparseable,
        };
    }

    if let (Some(start), Some(end)) = (&start.date, &end.date) {
        return match (
            NaiveDate::parse_from_str(start, ALL_DAY_FORMAT),
            NaiveDate::parse_from_str(end, ALL_DAY_FORMAT),
        ) {
            (Ok(start), Ok(end)) => ParsedEvent::AllDay { start, end },
            _ => ParsedEvent::Unparseable,
        };
    }

    ParsedEvent::Unparseable
}
