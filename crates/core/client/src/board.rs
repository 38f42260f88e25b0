use clubhub_config::Cache;
use clubhub_database::Database;
use clubhub_models::v0::{
    DataCreateEventRequest, EventRequest, EventRequestDetails, FilterSpec, RequestSort, Session,
};
use clubhub_pipeline::{board_counts, filter_requests, sort_requests, BoardCounts};
use clubhub_result::{ErrorCategory, Result};

use crate::{Notice, RequestFeed, VoteState, VoteToggle};

/// Actions behind the event request board
#[derive(Clone)]
pub struct RequestBoard {
    database: Database,
    feed: RequestFeed,
}

impl RequestBoard {
    pub fn new(database: Database, cache: &Cache) -> RequestBoard {
        RequestBoard {
            feed: RequestFeed::new(database.clone(), cache),
            database,
        }
    }

    pub fn feed(&self) -> &RequestFeed {
        &self.feed
    }

    /// Signed-in viewer, or [`ErrorType::NotAuthenticated`](clubhub_result::ErrorType)
    pub async fn viewer(&self) -> Result<Session> {
        self.database.fetch_session().await
    }

    /// Requests passing `filter`, in `sort` order
    pub async fn view(&self, filter: &FilterSpec, sort: RequestSort) -> Result<Vec<EventRequest>> {
        let requests = self.feed.requests().await?;
        let mut requests = filter_requests(requests.iter().cloned(), filter);
        sort_requests(&mut requests, sort);
        Ok(requests)
    }

    /// Open and fulfilled totals across the whole board
    pub async fn counts(&self) -> Result<BoardCounts> {
        let requests = self.feed.requests().await?;
        Ok(board_counts(requests.iter()))
    }

    /// Validate and post a new request, returning its id
    pub async fn create(&self, data: DataCreateEventRequest) -> Result<String> {
        let data = data.normalise()?;
        let session = self.viewer().await?;

        let id = self.database.insert_event_request(&session, &data).await?;
        info!("Posted event request {id}");

        self.feed.invalidate().await;
        Ok(id)
    }

    /// Soft-delete a request, only its creator may do this
    pub async fn delete(&self, id: &str, reason: Option<&str>) -> Result<()> {
        let session = self.viewer().await?;
        let reason = reason.map(str::trim).filter(|reason| !reason.is_empty());

        self.database
            .delete_event_request(&session, id, reason)
            .await?;
        info!("Deleted event request {id}");

        self.feed.invalidate().await;
        Ok(())
    }

    /// Request with related records, and whether the viewer voted for it
    pub async fn details(&self, id: &str) -> Result<EventRequestDetails> {
        let viewer = self.viewer().await.ok();
        self.database
            .fetch_event_request_details(id, viewer.as_ref())
            .await
    }

    /// Toggle the viewer's upvote, showing the result before the backend answers
    ///
    /// Signed-out viewers get [`Notice::SignInRequired`] without any change
    /// to `toggle`. A failed mutation rolls `toggle` back.
    pub async fn toggle_vote(
        &self,
        id: &str,
        toggle: &VoteToggle,
    ) -> std::result::Result<VoteState, Notice> {
        let session = match self.viewer().await {
            Ok(session) => session,
            Err(error) if error.category() == ErrorCategory::AuthRequired => {
                return Err(Notice::SignInRequired)
            }
            Err(error) => return Err(Notice::from(&error)),
        };

        toggle.begin().map_err(Notice::from)?;

        match self.database.toggle_vote(&session, id).await {
            Ok(voted) => {
                let state = toggle.confirm(voted);
                self.feed.invalidate().await;
                Ok(state)
            }
            Err(error) => {
                let restored = toggle.rollback();
                warn!(
                    "Vote on {id} failed, rolled back to {} votes: {error:?}",
                    restored.count
                );
                Err(Notice::from(&error))
            }
        }
    }
}
