//! A bunch of utils for working with calendar stuff

pub mod calendar;
mod month_date;
mod month_grid;

pub use calendar::CalendarMonth;
pub use month_date::MonthDate;
pub use month_grid::{MonthGrid, Week, DAYS_IN_WEEK, WEEKS_IN_MONTH};
