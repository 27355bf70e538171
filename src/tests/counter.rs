use alloc::{vec, vec::Vec};

use embassy_futures::block_on;

use super::{all_day, page, timed, PagedSource, SourceFailure};
use crate::config::EventsConfig;
use crate::datetime;
use crate::events::{CalendarEvent, CountError, DayCount, EventCounter, EventTime};

fn count(source: &mut PagedSource) -> Result<DayCount, CountError<SourceFailure>> {
    let config = EventsConfig::default();
    let reference = datetime!("2024-03-14T09:00:00+01:00");
    block_on(EventCounter::new(&config).count_events(source, &reference))
}

fn count_single_page(items: Vec<CalendarEvent>) -> DayCount {
    count(&mut PagedSource::new(vec![page(items, None)])).unwrap()
}

fn nonzero(counts: &DayCount) -> Vec<(u8, u32)> {
    counts.iter().collect()
}

#[test]
fn same_day_event_counts_once() {
    let counts = count_single_page(vec![timed(
        "2024-03-05T10:00:00+01:00",
        "2024-03-05T11:30:00+01:00",
    )]);
    assert_eq!(nonzero(&counts), [(5, 1)]);
}

#[test]
fn event_across_midnight_counts_both_days() {
    let counts = count_single_page(vec![timed(
        "2024-03-05T22:00:00+01:00",
        "2024-03-06T02:00:00+01:00",
    )]);
    assert_eq!(nonzero(&counts), [(5, 1), (6, 1)]);
}

#[test]
fn long_event_only_touches_its_boundaries() {
    let counts = count_single_page(vec![timed(
        "2024-03-03T09:00:00+01:00",
        "2024-03-07T17:00:00+01:00",
    )]);
    assert_eq!(nonzero(&counts), [(3, 1), (7, 1)]);
    assert_eq!(counts.get(4), 0);
    assert_eq!(counts.get(5), 0);
    assert_eq!(counts.get(6), 0);
}

#[test]
fn all_day_events() {
    // All-day end dates are exclusive on the wire, a single all-day event
    // still touches two days
    let counts = count_single_page(vec![
        all_day("2024-03-12", "2024-03-13"),
        all_day("2024-03-12", "2024-03-12"),
    ]);
    assert_eq!(nonzero(&counts), [(12, 2), (13, 1)]);
}

#[test]
fn counts_accumulate() {
    let counts = count_single_page(vec![
        timed("2024-03-20T08:00:00+01:00", "2024-03-20T09:00:00+01:00"),
        timed("2024-03-20T12:00:00+01:00", "2024-03-20T13:00:00+01:00"),
        all_day("2024-03-20", "2024-03-21"),
        timed("2024-03-19T23:00:00+01:00", "2024-03-20T01:00:00+01:00"),
    ]);
    assert_eq!(nonzero(&counts), [(19, 1), (20, 4), (21, 1)]);
}

#[test]
fn malformed_events_are_skipped() {
    let counts = count_single_page(vec![
        CalendarEvent::default(),
        timed("2024-03-02T10:00:00+01:00", "not a date"),
        CalendarEvent::new(
            EventTime::timed("2024-03-02T10:00:00+01:00"),
            EventTime::all_day("2024-03-03"),
        ),
        all_day("2024-03-02", "2024-02-30"),
        timed("2024-03-02T10:00:00+01:00", "2024-03-02T11:00:00+01:00"),
    ]);
    assert_eq!(nonzero(&counts), [(2, 1)]);
}

#[test]
fn endpoints_outside_the_month_count_on_their_day_number() {
    let counts = count_single_page(vec![
        all_day("2024-02-27", "2024-03-02"),
        timed("2024-03-30T20:00:00+01:00", "2024-04-01T10:00:00+01:00"),
    ]);
    assert_eq!(nonzero(&counts), [(1, 1), (2, 1), (27, 1), (30, 1)]);
}

#[test]
fn endpoints_on_the_same_day_number_count_once() {
    let counts = count_single_page(vec![all_day("2024-03-05", "2024-04-05")]);
    assert_eq!(nonzero(&counts), [(5, 1)]);
}

#[test]
fn follows_page_cursor() {
    let mut source = PagedSource::new(vec![
        page(
            vec![timed(
                "2024-03-01T10:00:00+01:00",
                "2024-03-01T11:00:00+01:00",
            )],
            Some("second"),
        ),
        page(vec![], Some("third")),
        page(vec![all_day("2024-03-30", "2024-03-31")], None),
    ]);
    let counts = count(&mut source).unwrap();
    assert_eq!(nonzero(&counts), [(1, 1), (30, 1), (31, 1)]);

    let tokens: Vec<_> = source
        .requests
        .iter()
        .map(|request| request.page_token.as_deref())
        .collect();
    assert_eq!(tokens, [None, Some("second"), Some("third")]);

    for request in &source.requests {
        assert_eq!(request.time_min, datetime!("2024-03-01T00:00:00+01:00"));
        assert_eq!(request.time_max, datetime!("2024-03-31T00:00:00+01:00"));
    }
}

#[test]
fn empty_cursor_ends_pagination() {
    let mut source = PagedSource::new(vec![page(vec![], Some(""))]);
    assert!(count(&mut source).is_ok());
    assert_eq!(source.requests.len(), 1);
}

#[test]
fn events_repeated_across_pages_are_counted_twice() {
    let event = timed("2024-03-08T10:00:00+01:00", "2024-03-08T11:00:00+01:00");
    let mut source = PagedSource::new(vec![
        page(vec![event.clone()], Some("next")),
        page(vec![event], None),
    ]);
    assert_eq!(nonzero(&count(&mut source).unwrap()), [(8, 2)]);
}

#[test]
fn source_errors_are_propagated() {
    let mut source = PagedSource::new(vec![
        page(vec![], Some("next")),
        page(vec![], None),
    ]);
    source.fail_at = Some(1);
    assert!(matches!(
        count(&mut source),
        Err(CountError::Source(SourceFailure))
    ));
    assert_eq!(source.requests.len(), 2);
}

#[test]
fn page_ceiling() {
    let mut source = PagedSource {
        endless: true,
        ..Default::default()
    };
    let config = EventsConfig { max_pages: 4 };
    let reference = datetime!("2024-03-14T09:00:00+01:00");
    let result = block_on(EventCounter::new(&config).count_events(&mut source, &reference));

    assert!(matches!(result, Err(CountError::TooManyPages { limit: 4 })));
    assert_eq!(source.requests.len(), 4);
}

#[test]
fn last_allowed_page_without_cursor_succeeds() {
    let mut source = PagedSource::new(vec![
        page(vec![], Some("next")),
        page(vec![all_day("2024-03-09", "2024-03-09")], None),
    ]);
    let config = EventsConfig { max_pages: 2 };
    let reference = datetime!("2024-03-14T09:00:00+01:00");
    let counts = block_on(EventCounter::new(&config).count_events(&mut source, &reference));
    assert_eq!(nonzero(&counts.unwrap()), [(9, 1)]);
}

#[test]
fn error_messages() {
    let err: CountError<SourceFailure> = CountError::TooManyPages { limit: 64 };
    assert_eq!(
        alloc::format!("{err}"),
        "calendar source returned more than 64 pages"
    );
    let err: CountError<SourceFailure> = CountError::Source(SourceFailure);
    assert_eq!(alloc::format!("{err}"), "calendar source error: source failure");
}
