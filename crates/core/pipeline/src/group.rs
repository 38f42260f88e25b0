use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};
use clubhub_models::v0::Event;

use crate::{sort_events, DateRange};

/// Events starting on one local calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub events: Vec<Event>,
}

/// Bucket events by the local day they start on
///
/// Buckets come out in date order and events keep chronological order
/// within their day. Days without events are not included.
pub fn group_by_day<Tz, I>(events: I, tz: &Tz) -> Vec<DayBucket>
where
    Tz: TimeZone,
    I: IntoIterator<Item = Event>,
{
    let mut events: Vec<Event> = events.into_iter().collect();
    sort_events(&mut events);

    let mut buckets: Vec<DayBucket> = Vec::new();
    for event in events {
        let date = event.starts_at.with_timezone(tz).date_naive();
        match buckets.last_mut() {
            Some(bucket) if bucket.date == date => bucket.events.push(event),
            _ => buckets.push(DayBucket {
                date,
                events: vec![event],
            }),
        }
    }

    buckets
}

/// One bucket for every day in `range`, empty days included
///
/// Used to lay out the month and week grids.
pub fn grid_days<Tz, I>(range: &DateRange, events: I, tz: &Tz) -> Vec<DayBucket>
where
    Tz: TimeZone,
    I: IntoIterator<Item = Event>,
{
    let mut by_day: BTreeMap<NaiveDate, Vec<Event>> = group_by_day(events, tz)
        .into_iter()
        .map(|bucket| (bucket.date, bucket.events))
        .collect();

    range
        .local_dates(tz)
        .into_iter()
        .map(|date| DayBucket {
            date,
            events: by_day.remove(&date).unwrap_or_default(),
        })
        .collect()
}

/// Events of a single day, or an empty slice
pub fn events_on_day(buckets: &[DayBucket], date: NaiveDate) -> &[Event] {
    buckets
        .iter()
        .find(|bucket| bucket.date == date)
        .map(|bucket| bucket.events.as_slice())
        .unwrap_or_default()
}

/// Bucket events under each of their tags, in tag order
///
/// An event with several tags appears under each of them.
pub fn group_by_tag<'a, I>(events: I) -> BTreeMap<String, Vec<&'a Event>>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut by_tag: BTreeMap<String, Vec<&Event>> = BTreeMap::new();
    for event in events {
        for tag in &event.tags {
            by_tag.entry(tag.clone()).or_default().push(event);
        }
    }

    by_tag
}
