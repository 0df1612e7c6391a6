use std::fmt;

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

use crate::error::{PaylensError, Result};
use crate::models::PeriodSpan;

/// The month currently shown on the pay calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

/// The month before `(year, month)`, if its year fits in an `i32`.
fn month_before(year: i32, month: u32) -> Option<(i32, u32)> {
    if month == 1 {
        year.checked_sub(1).map(|y| (y, 12))
    } else {
        Some((year, month - 1))
    }
}

fn month_after(year: i32, month: u32) -> Option<(i32, u32)> {
    if month == 12 {
        year.checked_add(1).map(|y| (y, 1))
    } else {
        Some((year, month + 1))
    }
}

fn first_of(ym: Option<(i32, u32)>) -> Option<NaiveDate> {
    ym.and_then(|(y, m)| NaiveDate::from_ymd_opt(y, m, 1))
}

/// A month is usable when its padded grid fits in the date range: the month
/// before must exist for the leading days, and the first week of the month
/// after for the trailing ones.
fn representable(year: i32, month: u32) -> bool {
    (1..=12).contains(&month)
        && NaiveDate::from_ymd_opt(year, month, 1).is_some()
        && first_of(month_before(year, month)).is_some()
        && first_of(month_after(year, month))
            .and_then(|d| d.checked_add_signed(Duration::days(6)))
            .is_some()
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !representable(year, month) {
            return Err(PaylensError::InvalidMonth(format!("{year}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    /// Parse `YYYY-MM`.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || PaylensError::InvalidMonth(raw.to_string());
        let (y, m) = raw.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The month before, or this month at the start of the date range.
    pub fn prev(&self) -> Self {
        month_before(self.year, self.month)
            .and_then(|(y, m)| Self::new(y, m).ok())
            .unwrap_or(*self)
    }

    /// The month after, or this month at the end of the date range.
    pub fn next(&self) -> Self {
        month_after(self.year, self.month)
            .and_then(|(y, m)| Self::new(y, m).ok())
            .unwrap_or(*self)
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        first_of(month_after(self.year, self.month))
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn title(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl fmt::Display for MonthCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_pay_date: bool,
    pub periods: Vec<&'a PeriodSpan>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGrid<'a> {
    pub cursor: MonthCursor,
    pub days: Vec<CalendarDay<'a>>,
}

impl<'a> MonthGrid<'a> {
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarDay<'a>]> {
        self.days.chunks(7)
    }
}

/// Inclusive at both ends.
pub fn covers(period: &PeriodSpan, day: NaiveDate) -> bool {
    period.start_date <= day && day <= period.end_date
}

/// Sunday-first week grid spanning the whole month. Leading and trailing
/// days from the neighbouring months pad it to complete weeks.
pub fn month_grid<'a>(cursor: MonthCursor, periods: &'a [PeriodSpan]) -> MonthGrid<'a> {
    let first = cursor.first_day();
    let last = cursor.last_day();
    let lead = i64::from(first.weekday().num_days_from_sunday());
    let trail = 6 - i64::from(last.weekday().num_days_from_sunday());
    let start = first
        .checked_sub_signed(Duration::days(lead))
        .unwrap_or(first);
    let end = last
        .checked_add_signed(Duration::days(trail))
        .unwrap_or(last);

    let days = start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| CalendarDay {
            date,
            in_month: cursor.contains(date),
            is_pay_date: periods.iter().any(|p| p.pay_date == date),
            periods: periods.iter().filter(|p| covers(p, date)).collect(),
        })
        .collect();

    MonthGrid { cursor, days }
}

/// Periods whose start date falls in the month. Unlike the grid, a period
/// that started last month and runs into this one is not listed.
pub fn periods_starting_in(cursor: MonthCursor, periods: &[PeriodSpan]) -> Vec<&PeriodSpan> {
    periods
        .iter()
        .filter(|p| cursor.contains(p.start_date))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PeriodStatus;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn period(id: &str, start: NaiveDate, end: NaiveDate, pay: NaiveDate) -> PeriodSpan {
        PeriodSpan {
            id: id.to_string(),
            label: id.to_string(),
            start_date: start,
            end_date: end,
            pay_date: pay,
            status: PeriodStatus::Draft,
        }
    }

    #[test]
    fn test_leap_february_grid() {
        let cursor = MonthCursor::new(2024, 2).unwrap();
        let grid = month_grid(cursor, &[]);
        assert_eq!(grid.days.len() % 7, 0);
        assert!(grid.days.iter().any(|c| c.date == d(2024, 2, 29)));
        assert!(grid.days.iter().any(|c| c.date == d(2024, 2, 1)));
        // Feb 1 2024 is a Thursday; the grid starts on Sunday Jan 28.
        assert_eq!(grid.days[0].date, d(2024, 1, 28));
        assert!(!grid.days[0].in_month);
        assert_eq!(grid.days.last().unwrap().date, d(2024, 3, 2));
        assert_eq!(grid.weeks().count(), 5);
    }

    #[test]
    fn test_every_month_grid_is_whole_weeks() {
        let mut cursor = MonthCursor::new(2023, 1).unwrap();
        for _ in 0..36 {
            let grid = month_grid(cursor, &[]);
            assert_eq!(grid.days.len() % 7, 0, "{cursor}");
            assert!(grid.days.iter().any(|c| c.date == cursor.first_day()));
            assert!(grid.days.iter().any(|c| c.date == cursor.last_day()));
            assert_eq!(grid.days[0].date.weekday(), chrono::Weekday::Sun);
            cursor = cursor.next();
        }
    }

    #[test]
    fn test_month_starting_sunday_has_no_lead() {
        // Feb 2015 starts on Sunday and ends on Saturday: exactly four weeks.
        let grid = month_grid(MonthCursor::new(2015, 2).unwrap(), &[]);
        assert_eq!(grid.days.len(), 28);
        assert!(grid.days.iter().all(|c| c.in_month));
    }

    #[test]
    fn test_cell_membership_is_inclusive() {
        let periods = vec![period("P1", d(2024, 3, 1), d(2024, 3, 15), d(2024, 3, 20))];
        let grid = month_grid(MonthCursor::new(2024, 3).unwrap(), &periods);
        let cell = |date: NaiveDate| grid.days.iter().find(|c| c.date == date).unwrap();
        assert_eq!(cell(d(2024, 3, 1)).periods.len(), 1);
        assert_eq!(cell(d(2024, 3, 15)).periods.len(), 1);
        assert!(cell(d(2024, 3, 16)).periods.is_empty());
        assert!(cell(d(2024, 3, 20)).is_pay_date);
        assert!(!cell(d(2024, 3, 15)).is_pay_date);
    }

    #[test]
    fn test_overlapping_periods_share_a_cell() {
        let periods = vec![
            period("A", d(2024, 3, 1), d(2024, 3, 15), d(2024, 3, 20)),
            period("B", d(2024, 3, 10), d(2024, 3, 25), d(2024, 3, 30)),
        ];
        let grid = month_grid(MonthCursor::new(2024, 3).unwrap(), &periods);
        let cell = grid.days.iter().find(|c| c.date == d(2024, 3, 12)).unwrap();
        let ids: Vec<&str> = cell.periods.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_starting_in_differs_from_overlap() {
        let periods = vec![
            period("Dec2", d(2023, 12, 16), d(2024, 1, 5), d(2024, 1, 10)),
            period("Jan1", d(2024, 1, 6), d(2024, 1, 20), d(2024, 1, 25)),
        ];
        let cursor = MonthCursor::new(2024, 1).unwrap();
        let starting = periods_starting_in(cursor, &periods);
        assert_eq!(starting.len(), 1);
        assert_eq!(starting[0].id, "Jan1");

        let grid = month_grid(cursor, &periods);
        let jan3 = grid.days.iter().find(|c| c.date == d(2024, 1, 3)).unwrap();
        assert_eq!(jan3.periods[0].id, "Dec2");
    }

    #[test]
    fn test_navigation_wraps_years() {
        let dec = MonthCursor::new(2023, 12).unwrap();
        assert_eq!(dec.next(), MonthCursor::new(2024, 1).unwrap());
        let jan = MonthCursor::new(2024, 1).unwrap();
        assert_eq!(jan.prev(), dec);
        assert_eq!(jan.next().prev(), jan);
    }

    #[test]
    fn test_parse_month() {
        let c = MonthCursor::parse("2024-02").unwrap();
        assert_eq!((c.year(), c.month()), (2024, 2));
        assert_eq!(c.to_string(), "2024-02");
        assert_eq!(c.title(), "February 2024");
        assert_eq!(c.last_day(), d(2024, 2, 29));
        assert!(MonthCursor::parse("2024-13").is_err());
        assert!(MonthCursor::parse("February").is_err());
    }

    #[test]
    fn test_months_at_the_edge_of_the_date_range() {
        let max = NaiveDate::MAX;
        assert!(MonthCursor::new(max.year(), 12).is_err());
        assert!(MonthCursor::parse(&format!("{}-12", max.year())).is_err());

        let mut c = MonthCursor::new(max.year(), 6).unwrap();
        for _ in 0..20 {
            c = c.next();
        }
        assert_eq!((c.year(), c.month()), (max.year(), 11));
        assert_eq!(c.last_day(), NaiveDate::from_ymd_opt(max.year(), 11, 30).unwrap());
        assert_eq!(month_grid(c, &[]).days.len() % 7, 0);

        let min = NaiveDate::MIN;
        assert!(MonthCursor::new(min.year(), 1).is_err());
        let start = MonthCursor::new(min.year(), 2).unwrap();
        assert_eq!(start.prev(), start);
        assert_eq!(month_grid(start, &[]).days.len() % 7, 0);
    }
}
