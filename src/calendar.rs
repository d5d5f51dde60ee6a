//! Month grid and date labels for the dashboard.

use chrono::{Datelike, NaiveDate};

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell {
    Blank,
    Day { date: NaiveDate, today: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub title: String,
    /// Leading blanks for the weekdays before the 1st, then one cell per day.
    pub cells: Vec<CalendarCell>,
}

/// Grid for the month containing `today`, weeks starting on Sunday.
pub fn month_grid(today: NaiveDate) -> MonthGrid {
    let first = today.with_day(1).unwrap_or(today);
    let leading = first.weekday().num_days_from_sunday() as usize;

    let mut cells = vec![CalendarCell::Blank; leading];
    cells.extend(
        first
            .iter_days()
            .take_while(|d| d.month() == first.month())
            .map(|date| CalendarCell::Day {
                date,
                today: date == today,
            }),
    );

    MonthGrid {
        title: first.format("%B %Y").to_string(),
        cells,
    }
}

/// Long date shown under the greeting, e.g. `Monday, 3 March 2025`.
pub fn date_display(date: NaiveDate) -> String {
    date.format("%A, %-d %B %Y").to_string()
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
