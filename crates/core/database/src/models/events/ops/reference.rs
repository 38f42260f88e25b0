use chrono::{DateTime, Utc};
use clubhub_pipeline::{matches_remote, matches_search, sort_events};
use clubhub_result::Result;

use crate::v0::{Event, EventStatus, FilterSpec};
use crate::ReferenceDb;

use super::AbstractEvents;

#[async_trait]
impl AbstractEvents for ReferenceDb {
    /// Fetch visible events starting within `[start, end]`, earliest first
    async fn fetch_events_for_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: &FilterSpec,
    ) -> Result<Vec<Event>> {
        self.enter("fetch_events_for_range").await?;

        let pushed_down = FilterSpec {
            hide_cancelled: false,
            time_of_day: Default::default(),
            ..filter.clone()
        };
        let query = filter.search_query();

        let events = self.events.lock().await;
        let mut matching: Vec<Event> = events
            .values()
            .filter(|event| event.status != EventStatus::Draft)
            .filter(|event| start <= event.starts_at && event.starts_at <= end)
            .filter(|event| matches_remote(event, &pushed_down))
            .filter(|event| {
                query
                    .as_deref()
                    .map_or(true, |query| matches_search(event, query))
            })
            .cloned()
            .collect();

        // map iteration order is arbitrary, fix ties by id
        matching.sort_by(|a, b| a.id.cmp(&b.id));
        sort_events(&mut matching);
        Ok(matching)
    }

    /// Fetch an event by its id
    async fn fetch_event(&self, id: &str) -> Result<Event> {
        self.enter("fetch_event").await?;

        let events = self.events.lock().await;
        events
            .get(id)
            .filter(|event| event.status != EventStatus::Draft)
            .cloned()
            .ok_or_else(|| create_error!(UnknownEvent))
    }
}
