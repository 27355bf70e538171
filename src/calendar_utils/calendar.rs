use chrono::{Datelike, Month, NaiveDate, Weekday};

use super::{MonthDate, MonthGrid};

/// Data used to describe a calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    date: MonthDate,
}

impl CalendarMonth {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            date: MonthDate::new_from_date(date),
        }
    }

    #[inline(always)]
    pub fn month_date(self) -> MonthDate {
        self.date
    }

    pub const fn start_date(&self) -> NaiveDate {
        self.date.to_start_day_naive()
    }

    /// Get the amount of days in this month
    pub fn days_amount(&self) -> u8 {
        self.date.days_amount()
    }

    /// Get the day of the week this month starts on
    pub fn start_weekday(&self) -> Weekday {
        self.start_date().weekday()
    }

    /// Get the month this month is from
    pub fn month(&self) -> Month {
        self.date.month()
    }

    /// Get the year this month is from
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Lay out the month in rows of weeks starting on `week_start`
    pub fn month_grid(&self, week_start: Weekday) -> MonthGrid {
        let first_column = (self.start_weekday().num_days_from_monday() + 7
            - week_start.num_days_from_monday())
            % 7;
        MonthGrid::new(first_column as u8, self.days_amount())
    }
}

#[cfg(test)]
mod test {
    use chrono::{Datelike, Weekday};

    use super::CalendarMonth;
    use crate::date;

    #[test]
    fn grid_columns_follow_week_start() {
        // 2024-05-01 is a Wednesday
        let calendar = CalendarMonth::from_date(date!("2024-05-20"));
        assert_eq!(calendar.start_weekday(), Weekday::Wed);

        let sunday_first = calendar.month_grid(Weekday::Sun);
        assert_eq!(sunday_first.weeks()[0][3], Some(1));

        let monday_first = calendar.month_grid(Weekday::Mon);
        assert_eq!(monday_first.weeks()[0][2], Some(1));
    }

    #[test]
    fn grid_positions_match_weekdays() {
        let calendar = CalendarMonth::from_date(date!("2025-08-01"));
        let grid = calendar.month_grid(Weekday::Sun);
        for (_, column, day) in grid.slots() {
            let date = calendar.start_date().with_day(day.into()).unwrap();
            assert_eq!(date.weekday().num_days_from_sunday() as usize, column);
        }
    }
}
