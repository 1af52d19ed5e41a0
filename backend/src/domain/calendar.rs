//! Calendar window arithmetic for the scheduling view.
//!
//! All date calculations for the visible window live here: the Monday-start
//! week around a reference date, the full 7-column month grid including the
//! leading/trailing days borrowed from adjacent months, and the per-day
//! grouping of fetched appointments.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use shared::{planner::day_index, Appointment, CalendarDay, CalendarMode};

/// Inclusive start/end of the window for a reference date and mode.
pub fn window(reference: NaiveDate, mode: CalendarMode) -> (NaiveDate, NaiveDate) {
    match mode {
        CalendarMode::Week => week_window(reference),
        CalendarMode::Month => month_window(reference),
    }
}

/// The Monday-start week containing the reference date.
pub fn week_window(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = monday_on_or_before(reference);
    (start, start + Days::new(6))
}

/// The full calendar-grid span for the reference date's month: the Monday
/// on/before the 1st through the Sunday on/after the last day.
pub fn month_window(reference: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = reference.with_day(1).unwrap_or(reference);
    let last = first
        .checked_add_months(Months::new(1))
        .map(|next| next - Days::new(1))
        .unwrap_or(reference);
    (monday_on_or_before(first), sunday_on_or_after(last))
}

fn monday_on_or_before(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

fn sunday_on_or_after(date: NaiveDate) -> NaiveDate {
    let offset = match date.weekday() {
        Weekday::Sun => 0,
        other => 6 - u64::from(other.num_days_from_monday()),
    };
    date + Days::new(offset)
}

/// Every date of the inclusive window, in order.
pub fn days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut current = start;
    while current <= end {
        out.push(current);
        current = current + Days::new(1);
    }
    out
}

/// Group a fetched window into per-day cells with revenue sums.
pub fn group_by_day(
    start: NaiveDate,
    end: NaiveDate,
    appointments: &[Appointment],
) -> Vec<CalendarDay> {
    days(start, end)
        .into_iter()
        .map(|date| day_index(&date.format("%Y-%m-%d").to_string(), appointments))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn appointment(id: &str, day: &str, revenue: f64) -> Appointment {
        Appointment {
            id: id.to_string(),
            appointment_date: day.to_string(),
            appointment_time: "14:00".to_string(),
            duration_minutes: 30,
            status: "Scheduled".to_string(),
            potential_revenue: revenue,
            location: None,
            notes: None,
            customer: None,
            product: None,
        }
    }

    #[test]
    fn week_window_is_seven_days_starting_monday() {
        // 2024-06-12 is a Wednesday.
        let (start, end) = week_window(date("2024-06-12"));
        assert_eq!(start, date("2024-06-10"));
        assert_eq!(end, date("2024-06-16"));
        assert_eq!(start.weekday(), Weekday::Mon);
        assert_eq!(days(start, end).len(), 7);
    }

    #[test]
    fn week_window_on_a_monday_starts_that_day() {
        let (start, end) = week_window(date("2024-06-10"));
        assert_eq!(start, date("2024-06-10"));
        assert_eq!(end, date("2024-06-16"));
    }

    #[test]
    fn month_window_covers_the_full_grid() {
        // June 2024: the 1st is a Saturday, the 30th a Sunday.
        let (start, end) = month_window(date("2024-06-15"));
        assert_eq!(start, date("2024-05-27"));
        assert_eq!(end, date("2024-06-30"));
        assert_eq!(start.weekday(), Weekday::Mon);
        assert_eq!(end.weekday(), Weekday::Sun);
        assert_eq!(days(start, end).len() % 7, 0);
    }

    #[test]
    fn month_window_when_month_already_aligns() {
        // July 2024 starts on a Monday; April 2024 ends on a Tuesday.
        let (start, _) = month_window(date("2024-07-01"));
        assert_eq!(start, date("2024-07-01"));

        let (_, end) = month_window(date("2024-04-10"));
        assert_eq!(end, date("2024-05-05"));
    }

    #[test]
    fn month_window_handles_leap_february() {
        let (start, end) = month_window(date("2024-02-29"));
        assert_eq!(start, date("2024-01-29"));
        assert_eq!(end, date("2024-03-03"));
    }

    #[test]
    fn month_window_handles_december_rollover() {
        let (start, end) = month_window(date("2024-12-15"));
        assert_eq!(start, date("2024-11-25"));
        assert_eq!(end, date("2025-01-05"));
    }

    #[test]
    fn grid_is_always_a_whole_number_of_weeks() {
        for anchor in ["2023-02-14", "2024-02-14", "2024-08-01", "2025-05-31", "2026-01-01"] {
            let (start, end) = month_window(date(anchor));
            assert_eq!(start.weekday(), Weekday::Mon, "anchor {anchor}");
            assert_eq!(end.weekday(), Weekday::Sun, "anchor {anchor}");
            assert_eq!(days(start, end).len() % 7, 0, "anchor {anchor}");
        }
    }

    #[test]
    fn group_by_day_assigns_each_appointment_to_its_date() {
        let appointments = vec![
            appointment("a", "2024-06-10", 50.0),
            appointment("b", "2024-06-10", 75.5),
            appointment("c", "2024-06-12", 30.0),
        ];
        let grouped = group_by_day(date("2024-06-10"), date("2024-06-16"), &appointments);
        assert_eq!(grouped.len(), 7);
        assert_eq!(grouped[0].appointments.len(), 2);
        assert_eq!(grouped[0].total_potential_revenue, 125.5);
        assert_eq!(grouped[1].appointments.len(), 0);
        assert_eq!(grouped[1].total_potential_revenue, 0.0);
        assert_eq!(grouped[2].appointments[0].id, "c");
    }
}
