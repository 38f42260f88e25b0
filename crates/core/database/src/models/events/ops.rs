use chrono::{DateTime, Utc};
use clubhub_result::Result;

use crate::v0::{Event, FilterSpec};

mod reference;
#[cfg(feature = "remote")]
mod remote;

#[async_trait]
pub trait AbstractEvents: Sync + Send {
    /// Fetch visible events starting within `[start, end]`, earliest first
    ///
    /// Majors, tags, clubs, location types and search are applied by the
    /// backend. Time of day and hiding cancelled events are left to the caller.
    async fn fetch_events_for_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        filter: &FilterSpec,
    ) -> Result<Vec<Event>>;

    /// Fetch an event by its id
    async fn fetch_event(&self, id: &str) -> Result<Event>;
}
