use arrayvec::ArrayVec;

/// Amount of columns in a grid row
pub const DAYS_IN_WEEK: usize = 7;

/// Maximum amount of (partial) weeks a month can span
pub const WEEKS_IN_MONTH: usize = 6;

/// One row of the grid. `None` marks a day belonging to an adjacent month.
pub type Week = [Option<u8>; DAYS_IN_WEEK];

/// Day numbers of a month laid out in weeks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    weeks: ArrayVec<Week, WEEKS_IN_MONTH>,
}

impl MonthGrid {
    /// Lay out `days_amount` days with the first one placed at column `first_column`
    pub(crate) fn new(first_column: u8, days_amount: u8) -> Self {
        debug_assert!((first_column as usize) < DAYS_IN_WEEK);
        debug_assert!((28..=31).contains(&days_amount));

        let mut weeks = ArrayVec::new();
        let mut week: Week = [None; DAYS_IN_WEEK];
        let mut column = first_column as usize;

        for day in 1..=days_amount {
            week[column] = Some(day);
            column += 1;
            if column == DAYS_IN_WEEK {
                weeks.push(week);
                week = [None; DAYS_IN_WEEK];
                column = 0;
            }
        }
        if column != 0 {
            weeks.push(week);
        }

        Self { weeks }
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    /// Amount of rows, between 4 and 6
    pub fn rows(&self) -> usize {
        self.weeks.len()
    }

    /// Iterate over the days with their `(week_index, day_index)` grid position
    pub fn slots(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.weeks.iter().enumerate().flat_map(|(week_index, week)| {
            week.iter()
                .enumerate()
                .filter_map(move |(day_index, day)| day.map(|day| (week_index, day_index, day)))
        })
    }
}

#[cfg(test)]
mod test {
    use super::MonthGrid;

    #[test]
    fn starts_on_first_column() {
        let grid = MonthGrid::new(0, 28);
        assert_eq!(grid.rows(), 4);
        assert!(grid.weeks().iter().flatten().all(Option::is_some));
    }

    #[test]
    fn spills_into_sixth_row() {
        let grid = MonthGrid::new(6, 31);
        assert_eq!(grid.rows(), 6);
        assert_eq!(grid.weeks()[0], [None, None, None, None, None, None, Some(1)]);
        assert_eq!(
            grid.weeks()[5],
            [Some(30), Some(31), None, None, None, None, None]
        );
    }

    #[test]
    fn slots_skip_empty_days() {
        let grid = MonthGrid::new(3, 30);
        let mut slots = grid.slots();
        assert_eq!(slots.next(), Some((0, 3, 1)));
        assert_eq!(slots.next(), Some((0, 4, 2)));
        assert_eq!(grid.slots().last(), Some((4, 4, 30)));
        assert_eq!(grid.slots().count(), 30);
    }
}
