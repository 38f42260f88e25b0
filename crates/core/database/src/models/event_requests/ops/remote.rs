use clubhub_result::Result;

use crate::drivers::Call;
use crate::v0::{DataCreateEventRequest, EventRequest, EventRequestDetails, Session};
use crate::{AbstractMajors, EventRequestDetailsRow, EventRequestRow, RemoteDb};

use super::AbstractEventRequests;

const VIEW: &str = "event_requests_with_counts";

fn convert(rows: Vec<EventRequestRow>) -> Result<Vec<EventRequest>> {
    rows.into_iter().map(EventRequest::try_from).collect()
}

#[derive(Serialize)]
struct CreateEventRequest<'a> {
    p_description: &'a str,
    p_major_id: Option<&'a str>,
    p_is_all_majors: bool,
    p_tags: &'a [String],
}

#[derive(Serialize)]
struct DeleteEventRequest<'a> {
    p_request_id: &'a str,
    p_reason: Option<&'a str>,
}

#[derive(Serialize)]
struct FulfillEventRequest<'a> {
    p_request_id: &'a str,
    p_event_id: &'a str,
}

#[derive(Serialize)]
struct RequestDetails<'a> {
    p_request_id: &'a str,
}

#[async_trait]
impl AbstractEventRequests for RemoteDb {
    /// Fetch open and fulfilled requests that are not deleted, newest first
    async fn fetch_event_requests(&self) -> Result<Vec<EventRequest>> {
        let rows = self
            .select(
                VIEW,
                &[
                    ("select", "*".to_string()),
                    ("deleted_at", "is.null".to_string()),
                    ("status", "in.(open,fulfilled)".to_string()),
                    ("order", "created_at.desc".to_string()),
                ],
                None,
            )
            .await?;

        convert(rows)
    }

    /// Fetch a request by its id
    async fn fetch_event_request(&self, id: &str) -> Result<EventRequest> {
        let rows = self
            .select(
                VIEW,
                &[
                    ("select", "*".to_string()),
                    ("id", format!("eq.{id}")),
                    ("limit", "1".to_string()),
                ],
                None,
            )
            .await?;

        convert(rows)?
            .pop()
            .ok_or_else(|| create_error!(UnknownRequest))
    }

    /// Fetch a request with its major name, fulfilling event and the viewer's vote
    async fn fetch_event_request_details(
        &self,
        id: &str,
        viewer: Option<&Session>,
    ) -> Result<EventRequestDetails> {
        let details: Option<EventRequestDetailsRow> = self
            .rpc(
                Call::Read,
                "get_event_request_details",
                &RequestDetails { p_request_id: id },
                viewer,
            )
            .await?;

        details
            .ok_or_else(|| create_error!(UnknownRequest))?
            .try_into()
    }

    /// Fetch open requests a club could act on, newest first
    async fn fetch_club_relevant_requests(&self, club_id: &str) -> Result<Vec<EventRequest>> {
        let majors = self.fetch_club_majors(club_id).await?;

        let mut query = vec![
            ("select", "*".to_string()),
            ("deleted_at", "is.null".to_string()),
            ("status", "eq.open".to_string()),
            ("order", "created_at.desc".to_string()),
        ];

        if majors.is_empty() {
            query.push(("is_all_majors", "eq.true".to_string()));
        } else {
            query.push((
                "or",
                format!("(is_all_majors.eq.true,major_id.in.({}))", majors.join(",")),
            ));
        }

        convert(self.select(VIEW, &query, None).await?)
    }

    /// Create a request, returning its id
    async fn insert_event_request(
        &self,
        session: &Session,
        data: &DataCreateEventRequest,
    ) -> Result<String> {
        let params = CreateEventRequest {
            p_description: &data.description,
            p_major_id: if data.is_all_majors {
                None
            } else {
                data.major_id.as_deref()
            },
            p_is_all_majors: data.is_all_majors,
            p_tags: &data.tags,
        };

        self.rpc(Call::Write, "create_event_request", &params, Some(session))
            .await
    }

    /// Soft-delete a request, only its creator may do this
    async fn delete_event_request(
        &self,
        session: &Session,
        id: &str,
        reason: Option<&str>,
    ) -> Result<()> {
        self.rpc_void(
            "delete_event_request",
            &DeleteEventRequest {
                p_request_id: id,
                p_reason: reason,
            },
            session,
        )
        .await
    }

    /// Mark an open request as fulfilled by an event
    async fn fulfill_event_request(
        &self,
        session: &Session,
        id: &str,
        event_id: &str,
    ) -> Result<()> {
        self.rpc_void(
            "fulfill_event_request",
            &FulfillEventRequest {
                p_request_id: id,
                p_event_id: event_id,
            },
            session,
        )
        .await
    }
}
