use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use clubhub_coalesced::{CoalescionService, CoalescionServiceConfig};
use clubhub_config::{Cache, Calendar};
use clubhub_database::Database;
use clubhub_models::v0::{CalendarView, Event, FilterSpec};
use clubhub_pipeline::{filter_events, group_by_day, navigate, sort_events, DateRange, DayBucket, Direction};
use clubhub_result::Result;

use super::store::Store;
use crate::local_offset;

/// Parameters a cached event list was fetched for
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub filter: FilterSpec,
}

impl QueryKey {
    pub fn new(range: &DateRange, filter: &FilterSpec) -> QueryKey {
        QueryKey {
            start: range.start,
            end: range.end,
            filter: filter.clone(),
        }
    }
}

type EventList = Arc<Vec<Event>>;

/// Calendar events, cached per date range and filter
#[derive(Clone)]
pub struct EventFeed {
    database: Database,
    tz: FixedOffset,
    list_days: i64,
    coalescion: CoalescionService<(u64, QueryKey), Result<EventList>>,
    store: Store<QueryKey, Vec<Event>>,
}

impl EventFeed {
    pub fn new(database: Database, cache: &Cache, calendar: &Calendar) -> EventFeed {
        EventFeed {
            database,
            tz: local_offset(calendar),
            list_days: calendar.list_days,
            coalescion: CoalescionService::from_config(CoalescionServiceConfig {
                max_concurrent: Some(cache.max_concurrent),
            }),
            store: Store::new(cache.events_stale(), cache.gc(), cache.capacity),
        }
    }

    /// Viewer's clock
    pub fn tz(&self) -> &FixedOffset {
        &self.tz
    }

    /// Range shown by `view` around `anchor`
    pub fn range(&self, view: CalendarView, anchor: NaiveDate) -> DateRange {
        DateRange::for_view(view, anchor, self.list_days, &self.tz)
    }

    /// Events in `range` passing every filter in `filter`, earliest first
    pub async fn events(&self, range: &DateRange, filter: &FilterSpec) -> Result<EventList> {
        let key = QueryKey::new(range, filter);

        if let Some(events) = self.store.fresh(&key).await {
            debug!("Event cache hit for {} - {}", key.start, key.end);
            return Ok(events);
        }

        debug!("Event cache miss for {} - {}", key.start, key.end);
        let generation = self.store.generation();
        let result = self
            .coalescion
            .execute((generation, key.clone()), || {
                let database = self.database.clone();
                let store = self.store.clone();
                let tz = self.tz;
                let key = key.clone();

                async move {
                    let fetched = database
                        .fetch_events_for_range(key.start, key.end, &key.filter)
                        .await?;

                    let mut events = filter_events(fetched, &key.filter, &tz);
                    sort_events(&mut events);

                    let events = Arc::new(events);
                    if !store.insert(generation, key, events.clone()).await {
                        debug!("Dropped events fetched before an invalidation");
                    }
                    Ok(events)
                }
            })
            .await
            .map_err(|error| {
                warn!("Could not schedule event fetch: {error:?}");
                create_error!(InternalError)
            })?;

        (*result).clone()
    }

    /// Events for a view, grouped into local day buckets
    pub async fn days(
        &self,
        view: CalendarView,
        anchor: NaiveDate,
        filter: &FilterSpec,
    ) -> Result<Vec<DayBucket>> {
        let events = self.events(&self.range(view, anchor), filter).await?;
        Ok(group_by_day(events.iter().cloned(), &self.tz))
    }

    /// Warm the cache for the page after `anchor`
    ///
    /// Nothing displays the prefetched page yet, so failures are only logged.
    pub async fn prefetch(&self, view: CalendarView, anchor: NaiveDate, filter: &FilterSpec) {
        let next = navigate(view, anchor, Direction::Next, self.list_days);
        let range = self.range(view, next);

        match self.events(&range, filter).await {
            Ok(events) => debug!("Prefetched {} events from {next}", events.len()),
            Err(error) => warn!("Prefetch from {next} failed: {error:?}"),
        }
    }

    /// Drop every cached result
    pub async fn invalidate(&self) {
        self.store.clear().await;
    }

    /// Number of cached results, fresh or stale
    pub async fn cached(&self) -> usize {
        self.store.len().await
    }
}
