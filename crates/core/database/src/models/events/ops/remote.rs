use chrono::{DateTime, Utc};
use clubhub_pipeline::sort_events;
use clubhub_result::{Error, Result};

use crate::drivers::Call;
use crate::v0::{Event, FilterSpec};
use crate::{EventRecord, EventRow, RemoteDb};

use super::AbstractEvents;

/// Parameters of `get_events_for_range`, empty selections are sent as null
#[derive(Serialize)]
struct EventsForRange<'a> {
    p_start_date: String,
    p_end_date: String,
    p_major_ids: Option<Vec<&'a str>>,
    p_tags: Option<Vec<&'a str>>,
    p_club_ids: Option<Vec<&'a str>>,
    p_location_types: Option<Vec<&'static str>>,
    p_search_query: Option<String>,
}

fn non_empty<'a, I: IntoIterator<Item = &'a String>>(items: I) -> Option<Vec<&'a str>> {
    let items: Vec<&str> = items.into_iter().map(String::as_str).collect();
    (!items.is_empty()).then_some(items)
}

fn convert<T>(rows: Vec<T>) -> Result<Vec<Event>>
where
    Event: TryFrom<T, Error = Error>,
{
    rows.into_iter().map(Event::try_from).collect()
}

#[async_trait]
impl AbstractEvents for RemoteDb {
    /// Fetch visible events starting within `[start, end]`, earliest first
    async fn fetch_events_for_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: &FilterSpec,
    ) -> Result<Vec<Event>> {
        let params = EventsForRange {
            p_start_date: start.to_rfc3339(),
            p_end_date: end.to_rfc3339(),
            p_major_ids: non_empty(&filter.majors),
            p_tags: non_empty(&filter.tags),
            p_club_ids: non_empty(&filter.clubs),
            p_location_types: (!filter.location_types.is_empty()).then(|| {
                filter
                    .location_types
                    .iter()
                    .map(|kind| kind.as_str())
                    .collect()
            }),
            p_search_query: filter.search_query(),
        };

        let rows: Option<Vec<EventRow>> = self
            .rpc(Call::Read, "get_events_for_range", &params, None)
            .await?;

        let mut events = convert(rows.unwrap_or_default())?;
        sort_events(&mut events);
        Ok(events)
    }

    /// Fetch an event by its id
    async fn fetch_event(&self, id: &str) -> Result<Event> {
        let records: Vec<EventRecord> = self
            .select(
                "events",
                &[
                    (
                        "select",
                        "*,clubs(name),event_tags(tag),event_majors(major_id)".to_string(),
                    ),
                    ("id", format!("eq.{id}")),
                    ("limit", "1".to_string()),
                ],
                None,
            )
            .await?;

        convert(records)?
            .into_iter()
            .next()
            .ok_or_else(|| create_error!(UnknownEvent))
    }
}
