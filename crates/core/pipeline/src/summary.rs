use std::collections::BTreeSet;

use chrono::TimeZone;
use clubhub_models::v0::{Event, EventRequest, RequestStatus};

/// Request totals shown above the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardCounts {
    pub open: usize,
    pub fulfilled: usize,
}

/// Every distinct tag across `events`, sorted
pub fn unique_tags<'a, I>(events: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Event>,
{
    events
        .into_iter()
        .flat_map(|event| event.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Count open and fulfilled requests, ignoring deleted ones
pub fn board_counts<'a, I>(requests: I) -> BoardCounts
where
    I: IntoIterator<Item = &'a EventRequest>,
{
    requests
        .into_iter()
        .filter(|request| !request.is_deleted())
        .fold(BoardCounts::default(), |mut counts, request| {
            match request.status {
                RequestStatus::Open => counts.open += 1,
                RequestStatus::Fulfilled => counts.fulfilled += 1,
                RequestStatus::Closed => {}
            }
            counts
        })
}

/// Time label for an event, `9:00 AM - 2:00 PM` or just the start
pub fn format_event_time<Tz>(event: &Event, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    const FORMAT: &str = "%-I:%M %p";

    let start = event.starts_at.with_timezone(tz).format(FORMAT);
    match &event.ends_at {
        Some(ends_at) => format!("{start} - {}", ends_at.with_timezone(tz).format(FORMAT)),
        None => start.to_string(),
    }
}
