use std::collections::BTreeSet;

use chrono::Utc;
use clubhub_result::Result;
use ulid::Ulid;

use crate::v0::{
    normalise_tags, DataCreateEventRequest, EventRequest, EventRequestDetails,
    FulfilledEventSummary, RequestStatus, Session,
};
use crate::ReferenceDb;

use super::AbstractEventRequests;

impl ReferenceDb {
    /// Requests matching `predicate` with their vote counts filled in, newest first
    async fn requests_with_counts<F>(&self, predicate: F) -> Vec<EventRequest>
    where
        F: Fn(&EventRequest) -> bool,
    {
        let votes = self.votes.lock().await;
        let requests = self.event_requests.lock().await;

        let mut matching: Vec<EventRequest> = requests
            .values()
            .filter(|request| predicate(request))
            .cloned()
            .map(|mut request| {
                request.vote_count = votes
                    .keys()
                    .filter(|(request_id, _)| request_id == &request.id)
                    .count() as u32;
                request
            })
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        matching
    }
}

#[async_trait]
impl AbstractEventRequests for ReferenceDb {
    /// Fetch open and fulfilled requests that are not deleted, newest first
    async fn fetch_event_requests(&self) -> Result<Vec<EventRequest>> {
        self.enter("fetch_event_requests").await?;

        Ok(self
            .requests_with_counts(|request| {
                !request.is_deleted()
                    && matches!(request.status, RequestStatus::Open | RequestStatus::Fulfilled)
            })
            .await)
    }

    /// Fetch a request by its id
    async fn fetch_event_request(&self, id: &str) -> Result<EventRequest> {
        self.enter("fetch_event_request").await?;

        self.requests_with_counts(|request| request.id == id)
            .await
            .pop()
            .ok_or_else(|| create_error!(UnknownRequest))
    }

    /// Fetch a request with its major name, fulfilling event and the viewer's vote
    async fn fetch_event_request_details(
        &self,
        id: &str,
        viewer: Option<&Session>,
    ) -> Result<EventRequestDetails> {
        self.enter("fetch_event_request_details").await?;

        let request = self
            .requests_with_counts(|request| request.id == id)
            .await
            .pop()
            .ok_or_else(|| create_error!(UnknownRequest))?;

        let major_name = match request.audience.major_id() {
            Some(major_id) => self
                .majors
                .lock()
                .await
                .get(major_id)
                .map(|major| major.name.clone()),
            None => None,
        };

        let fulfilled_event = match &request.fulfilled_event_id {
            Some(event_id) => self.events.lock().await.get(event_id).map(|event| {
                FulfilledEventSummary {
                    id: event.id.clone(),
                    title: event.title.clone(),
                    starts_at: event.starts_at,
                    location_name: event.location.name.clone(),
                    location_type: event.location.kind,
                    club_name: event.club_name.clone().unwrap_or_default(),
                    club_slug: event.club_id.clone(),
                }
            }),
            None => None,
        };

        let user_has_voted = match viewer {
            Some(session) => self
                .votes
                .lock()
                .await
                .contains_key(&(request.id.clone(), session.user_id.clone())),
            None => false,
        };

        Ok(EventRequestDetails {
            request,
            major_name,
            fulfilled_event,
            user_has_voted,
        })
    }

    /// Fetch open requests a club could act on, newest first
    async fn fetch_club_relevant_requests(&self, club_id: &str) -> Result<Vec<EventRequest>> {
        self.enter("fetch_club_relevant_requests").await?;

        let majors: BTreeSet<String> = self
            .club_majors
            .lock()
            .await
            .get(club_id)
            .cloned()
            .unwrap_or_default();

        Ok(self
            .requests_with_counts(|request| {
                !request.is_deleted()
                    && request.status == RequestStatus::Open
                    && request.audience.matches(&majors)
            })
            .await)
    }

    /// Create a request, returning its id
    async fn insert_event_request(
        &self,
        session: &Session,
        data: &DataCreateEventRequest,
    ) -> Result<String> {
        self.enter("insert_event_request").await?;
        self.authorise(session).await?;

        let description = data.description.trim();
        if description.is_empty() {
            return Err(create_validation_error!(
                "description",
                "Description is required"
            ));
        }

        let audience = data
            .audience()
            .ok_or_else(|| create_validation_error!("major_id", "Major is required"))?;

        let request = EventRequest {
            id: Ulid::new().to_string(),
            description: description.to_string(),
            audience,
            tags: normalise_tags(&data.tags).into_iter().collect(),
            status: RequestStatus::Open,
            fulfilled_event_id: None,
            created_by: session.user_id.clone(),
            created_at: Utc::now(),
            vote_count: 0,
            deleted_at: None,
            deleted_by: None,
            delete_reason: None,
        };

        let id = request.id.clone();
        self.event_requests
            .lock()
            .await
            .insert(id.clone(), request);

        Ok(id)
    }

    /// Soft-delete a request, only its creator may do this
    async fn delete_event_request(
        &self,
        session: &Session,
        id: &str,
        reason: Option<&str>,
    ) -> Result<()> {
        self.enter("delete_event_request").await?;
        self.authorise(session).await?;

        let mut requests = self.event_requests.lock().await;
        let request = requests
            .get_mut(id)
            .filter(|request| !request.is_deleted())
            .ok_or_else(|| create_error!(UnknownRequest))?;

        if !request.is_creator(&session.user_id) {
            return Err(create_error!(NotOwner));
        }

        request.deleted_at = Some(Utc::now());
        request.deleted_by = Some(session.user_id.clone());
        request.delete_reason = reason.map(str::to_string);
        Ok(())
    }

    /// Mark an open request as fulfilled by an event
    async fn fulfill_event_request(
        &self,
        session: &Session,
        id: &str,
        event_id: &str,
    ) -> Result<()> {
        self.enter("fulfill_event_request").await?;
        self.authorise(session).await?;

        if !self.events.lock().await.contains_key(event_id) {
            return Err(create_error!(UnknownEvent));
        }

        let mut requests = self.event_requests.lock().await;
        let request = requests
            .get_mut(id)
            .filter(|request| !request.is_deleted())
            .ok_or_else(|| create_error!(UnknownRequest))?;

        if request.status != RequestStatus::Open {
            return Err(create_error!(RequestClosed));
        }

        request.status = RequestStatus::Fulfilled;
        request.fulfilled_event_id = Some(event_id.to_string());
        Ok(())
    }
}
