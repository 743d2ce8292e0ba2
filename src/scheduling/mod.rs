//! Pure scheduling core for the production dashboard.
//!
//! Everything in this module is plain input to plain output: the board window,
//! day-bucket assignment and workday urgency arithmetic take a reference date
//! and order snapshots and return values the presentation layer renders. No
//! database handle, no clock reads.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Calendar weeks shown on the board: one past week, the current one and two
/// ahead.
pub const BOARD_WEEKS: usize = 4;

/// Buckets per board row, Monday through Friday.
pub const WORKDAYS_PER_WEEK: usize = 5;

/// Monday of the week `date` falls in.
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// The 20 bucket dates of the dashboard window, in board order: 4 rows of
/// Monday to Friday, the first row being the week before the current one.
pub fn board_dates(today: NaiveDate) -> Vec<NaiveDate> {
    let first_monday = week_monday(today) - Duration::days(7);
    (0..BOARD_WEEKS)
        .flat_map(|week| {
            (0..WORKDAYS_PER_WEEK)
                .map(move |day| first_monday + Duration::days((week * 7 + day) as i64))
        })
        .collect()
}

/// Signed count of Monday-Friday days strictly between `start` and `end`,
/// negative when `end` lies in the past relative to `start`.
///
/// Walks the calendar one day at a time in either direction, which keeps the
/// weekend handling identical for both signs and is plenty fast for the date
/// ranges a dashboard deals in.
pub fn workdays_between(start: NaiveDate, end: NaiveDate) -> i64 {
    if start == end {
        return 0;
    }
    let step = if end > start { 1 } else { -1 };
    let mut count = 0;
    let mut current = start;
    while current != end {
        current += Duration::days(step);
        if current.weekday().num_days_from_monday() < 5 {
            count += step;
        }
    }
    count
}

/// Urgency colour band of an order card, derived from the workdays left until
/// its delivery date. Recomputed on every render, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyBand {
    Overdue,
    DueToday,
    OneDay,
    TwoDays,
    ThreeDays,
    FourDays,
    Relaxed,
}

impl UrgencyBand {
    /// Bands in order of precedence: overdue first, then day counts, anything
    /// five workdays out or more is relaxed.
    pub fn from_workdays(workdays_left: i64) -> Self {
        match workdays_left {
            w if w < 0 => UrgencyBand::Overdue,
            0 => UrgencyBand::DueToday,
            1 => UrgencyBand::OneDay,
            2 => UrgencyBand::TwoDays,
            3 => UrgencyBand::ThreeDays,
            4 => UrgencyBand::FourDays,
            _ => UrgencyBand::Relaxed,
        }
    }

    /// Workdays left and band in one call.
    pub fn classify(today: NaiveDate, delivery_date: NaiveDate) -> (i64, Self) {
        let left = workdays_between(today, delivery_date);
        (left, Self::from_workdays(left))
    }

    /// Card accent colour for the band.
    pub fn accent_color(self) -> &'static str {
        match self {
            UrgencyBand::Overdue => "#ff6666",
            UrgencyBand::DueToday => "#ffe600",
            UrgencyBand::OneDay => "#ffc966",
            UrgencyBand::TwoDays => "#b2d7ff",
            UrgencyBand::ThreeDays => "#b5e7b2",
            UrgencyBand::FourDays => "#cccccc",
            UrgencyBand::Relaxed => "#ffffff",
        }
    }
}

/// One calendar-day bucket of the board.
#[derive(Clone, Debug)]
pub struct DayBucket<T> {
    pub date: NaiveDate,
    pub entries: Vec<T>,
}

/// Distributes `items` into the 20-day board window around `today`.
///
/// An item lands in the single bucket whose date equals its delivery date;
/// items dated outside the window are dropped from the result (they stay in
/// the store, the board is only a viewing window). Filtering out fulfilled
/// orders is the caller's job, this function is date-only.
pub fn assign_to_buckets<T, F>(today: NaiveDate, items: Vec<T>, delivery_date: F) -> Vec<DayBucket<T>>
where
    F: Fn(&T) -> NaiveDate,
{
    let mut buckets: Vec<DayBucket<T>> = board_dates(today)
        .into_iter()
        .map(|date| DayBucket {
            date,
            entries: Vec::new(),
        })
        .collect();

    for item in items {
        let date = delivery_date(&item);
        if let Some(bucket) = buckets.iter_mut().find(|b| b.date == date) {
            bucket.entries.push(item);
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_monday_snaps_back_within_the_week() {
        // 2024-06-13 is a Thursday
        assert_eq!(week_monday(date(2024, 6, 13)), date(2024, 6, 10));
        assert_eq!(week_monday(date(2024, 6, 10)), date(2024, 6, 10));
        assert_eq!(week_monday(date(2024, 6, 16)), date(2024, 6, 10));
    }

    #[test]
    fn board_has_twenty_weekday_buckets() {
        let dates = board_dates(date(2024, 6, 13));
        assert_eq!(dates.len(), BOARD_WEEKS * WORKDAYS_PER_WEEK);
        assert_eq!(dates[0], date(2024, 6, 3)); // Monday one week back
        assert_eq!(dates[4], date(2024, 6, 7)); // Friday of that week
        assert_eq!(dates[5], date(2024, 6, 10)); // current Monday
        assert_eq!(*dates.last().unwrap(), date(2024, 6, 28));
        assert!(dates
            .iter()
            .all(|d| d.weekday() != Weekday::Sat && d.weekday() != Weekday::Sun));
    }

    #[test]
    fn workdays_same_day_is_zero() {
        assert_eq!(workdays_between(date(2024, 6, 13), date(2024, 6, 13)), 0);
        // also on a weekend date
        assert_eq!(workdays_between(date(2024, 6, 15), date(2024, 6, 15)), 0);
    }

    #[test]
    fn workdays_within_a_week() {
        // Monday to Friday of the same week
        assert_eq!(workdays_between(date(2024, 6, 10), date(2024, 6, 14)), 4);
        // Thursday to Friday
        assert_eq!(workdays_between(date(2024, 6, 13), date(2024, 6, 14)), 1);
    }

    #[test]
    fn workdays_skip_weekends() {
        // Friday to next Monday counts one workday
        assert_eq!(workdays_between(date(2024, 6, 14), date(2024, 6, 17)), 1);
        // Friday to next Friday is a full week
        assert_eq!(workdays_between(date(2024, 6, 14), date(2024, 6, 21)), 5);
        // Saturday to Sunday crosses no workday
        assert_eq!(workdays_between(date(2024, 6, 15), date(2024, 6, 16)), 0);
    }

    #[test]
    fn workdays_are_antisymmetric() {
        let a = date(2024, 6, 5);
        let b = date(2024, 7, 2);
        assert_eq!(workdays_between(a, b), -workdays_between(b, a));
    }

    #[test]
    fn urgency_bands_cover_the_day_counts() {
        assert_eq!(UrgencyBand::from_workdays(-3), UrgencyBand::Overdue);
        assert_eq!(UrgencyBand::from_workdays(0), UrgencyBand::DueToday);
        assert_eq!(UrgencyBand::from_workdays(1), UrgencyBand::OneDay);
        assert_eq!(UrgencyBand::from_workdays(2), UrgencyBand::TwoDays);
        assert_eq!(UrgencyBand::from_workdays(3), UrgencyBand::ThreeDays);
        assert_eq!(UrgencyBand::from_workdays(4), UrgencyBand::FourDays);
        assert_eq!(UrgencyBand::from_workdays(5), UrgencyBand::Relaxed);
        assert_eq!(UrgencyBand::from_workdays(40), UrgencyBand::Relaxed);
    }

    #[test]
    fn assignment_places_each_item_in_its_date_bucket() {
        let today = date(2024, 6, 13);
        let monday = week_monday(today);
        let items = vec![monday, monday, monday + Duration::days(1)];
        let buckets = assign_to_buckets(today, items, |d| *d);

        let monday_bucket = buckets.iter().find(|b| b.date == monday).unwrap();
        assert_eq!(monday_bucket.entries.len(), 2);
        let tuesday_bucket = buckets
            .iter()
            .find(|b| b.date == monday + Duration::days(1))
            .unwrap();
        assert_eq!(tuesday_bucket.entries.len(), 1);
    }

    #[test]
    fn assignment_drops_items_outside_the_window() {
        let today = date(2024, 6, 13);
        let far_future = today + Duration::days(90);
        let long_past = today - Duration::days(90);
        let saturday = date(2024, 6, 15);
        let buckets = assign_to_buckets(today, vec![far_future, long_past, saturday], |d| *d);
        assert!(buckets.iter().all(|b| b.entries.is_empty()));
    }
}
