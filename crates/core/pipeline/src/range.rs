use chrono::{
    DateTime, Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc,
};
use clubhub_models::v0::CalendarView;

/// Longest upcoming list, in days
pub const MAX_LIST_DAYS: i64 = 3660;

/// Inclusive range of instants fetched for a calendar view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Navigation direction for the calendar header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Convert a wall-clock time in `tz` to UTC
///
/// Ambiguous times resolve to the earlier instant. Times inside a DST gap
/// move forward to the first valid local time.
pub fn local_to_utc<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
    let mut candidate = naive;
    for _ in 0..4 {
        if let Some(at) = tz.from_local_datetime(&candidate).earliest() {
            return at.with_timezone(&Utc);
        }

        candidate += Duration::minutes(30);
    }

    Utc.from_utc_datetime(&naive)
}

/// First instant of a local day
pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    local_to_utc(date.and_time(NaiveTime::MIN), tz)
}

/// Last millisecond of a local day
pub fn end_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    match date.succ_opt() {
        Some(next) => start_of_day(next, tz) - Duration::milliseconds(1),
        None => start_of_day(date, tz),
    }
}

/// `date` moved by `days`, or `date` itself if that leaves the calendar
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    let moved = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };

    moved.unwrap_or(date)
}

/// Sunday on or before `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    add_days(date, -i64::from(date.weekday().num_days_from_sunday()))
}

/// Saturday on or after `date`
pub fn week_end(date: NaiveDate) -> NaiveDate {
    add_days(week_start(date), 6)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    add_days(date, -i64::from(date.day0()))
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    first_of_month(date)
        .checked_add_months(Months::new(1))
        .map(|next| add_days(next, -1))
        .unwrap_or(date)
}

impl DateRange {
    /// Range covering local dates `first..=last`
    pub fn days<Tz: TimeZone>(first: NaiveDate, last: NaiveDate, tz: &Tz) -> DateRange {
        DateRange {
            start: start_of_day(first, tz),
            end: end_of_day(last, tz),
        }
    }

    /// Month grid around `anchor`, padded out to whole Sunday to Saturday weeks
    pub fn month<Tz: TimeZone>(anchor: NaiveDate, tz: &Tz) -> DateRange {
        DateRange::days(
            week_start(first_of_month(anchor)),
            week_end(last_of_month(anchor)),
            tz,
        )
    }

    /// Sunday to Saturday week containing `anchor`
    pub fn week<Tz: TimeZone>(anchor: NaiveDate, tz: &Tz) -> DateRange {
        DateRange::days(week_start(anchor), week_end(anchor), tz)
    }

    /// Upcoming list, from the start of `today` through `days` days ahead
    ///
    /// `days` is clamped to `0..=MAX_LIST_DAYS`.
    pub fn list<Tz: TimeZone>(today: NaiveDate, days: i64, tz: &Tz) -> DateRange {
        DateRange::days(today, add_days(today, days.clamp(0, MAX_LIST_DAYS)), tz)
    }

    /// Range fetched for a calendar view
    pub fn for_view<Tz: TimeZone>(
        view: CalendarView,
        anchor: NaiveDate,
        list_days: i64,
        tz: &Tz,
    ) -> DateRange {
        match view {
            CalendarView::Month => DateRange::month(anchor, tz),
            CalendarView::Week => DateRange::week(anchor, tz),
            CalendarView::List => DateRange::list(anchor, list_days, tz),
        }
    }

    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        self.start <= *at && *at <= self.end
    }

    /// Every local date the range touches, in order
    pub fn local_dates<Tz: TimeZone>(&self, tz: &Tz) -> Vec<NaiveDate> {
        let first = self.start.with_timezone(tz).date_naive();
        let last = self.end.with_timezone(tz).date_naive();

        first
            .iter_days()
            .take_while(|date| *date <= last)
            .collect()
    }
}

/// Anchor date after moving one page in `direction`
///
/// Months move to the first of the neighbouring month so short months do
/// not clamp the anchor.
pub fn navigate(
    view: CalendarView,
    anchor: NaiveDate,
    direction: Direction,
    list_days: i64,
) -> NaiveDate {
    match view {
        CalendarView::Month => {
            let first = first_of_month(anchor);
            let moved = match direction {
                Direction::Previous => first.checked_sub_months(Months::new(1)),
                Direction::Next => first.checked_add_months(Months::new(1)),
            };

            moved.unwrap_or(first)
        }
        CalendarView::Week => step(anchor, direction, 7),
        CalendarView::List => step(anchor, direction, list_days.clamp(1, MAX_LIST_DAYS)),
    }
}

fn step(anchor: NaiveDate, direction: Direction, days: i64) -> NaiveDate {
    match direction {
        Direction::Previous => add_days(anchor, -days),
        Direction::Next => add_days(anchor, days),
    }
}
