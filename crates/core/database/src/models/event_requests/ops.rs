use clubhub_result::Result;

use crate::v0::{DataCreateEventRequest, EventRequest, EventRequestDetails, Session};

mod reference;
#[cfg(feature = "remote")]
mod remote;

#[async_trait]
pub trait AbstractEventRequests: Sync + Send {
    /// Fetch open and fulfilled requests that are not deleted, newest first
    async fn fetch_event_requests(&self) -> Result<Vec<EventRequest>>;

    /// Fetch a request by its id
    async fn fetch_event_request(&self, id: &str) -> Result<EventRequest>;

    /// Fetch a request with its major name, fulfilling event and the viewer's vote
    async fn fetch_event_request_details(
        &self,
        id: &str,
        viewer: Option<&Session>,
    ) -> Result<EventRequestDetails>;

    /// Fetch open requests a club could act on, newest first
    ///
    /// These target every major or one of the club's majors. A club without
    /// majors only sees requests for every major.
    async fn fetch_club_relevant_requests(&self, club_id: &str) -> Result<Vec<EventRequest>>;

    /// Create a request, returning its id
    async fn insert_event_request(
        &self,
        session: &Session,
        data: &DataCreateEventRequest,
    ) -> Result<String>;

    /// Soft-delete a request, only its creator may do this
    async fn delete_event_request(
        &self,
        session: &Session,
        id: &str,
        reason: Option<&str>,
    ) -> Result<()>;

    /// Mark an open request as fulfilled by an event
    async fn fulfill_event_request(&self, session: &Session, id: &str, event_id: &str)
        -> Result<()>;
}
