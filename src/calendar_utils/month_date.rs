use chrono::{Datelike, Month, Months, NaiveDate};
use num_traits::FromPrimitive;

/// A calendar month, stored as its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDate(NaiveDate);

impl MonthDate {
    pub fn new(year: i32, month: Month) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month.number_from_month(), 1).map(Self)
    }

    pub fn new_from_date(date: NaiveDate) -> Self {
        Self(
            date.with_day(1)
                .expect("first of the month should always exist"),
        )
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> Month {
        Month::from_u32(self.0.month()).expect("chrono months are always in 1..=12")
    }

    pub const fn to_start_day_naive(self) -> NaiveDate {
        self.0
    }

    /// Last day of this month, leap years included
    pub fn to_end_day_naive(self) -> NaiveDate {
        self.0
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            // December of the last year chrono supports
            .unwrap_or_else(|| self.0.with_day(31).unwrap_or(self.0))
    }

    /// Get the amount of days in this month
    pub fn days_amount(self) -> u8 {
        self.to_end_day_naive().day() as u8
    }
}
