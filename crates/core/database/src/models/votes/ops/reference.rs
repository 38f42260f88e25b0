use chrono::Utc;
use clubhub_result::Result;

use crate::v0::{Session, Vote};
use crate::ReferenceDb;

use super::AbstractVotes;

#[async_trait]
impl AbstractVotes for ReferenceDb {
    /// Whether `user_id` has upvoted a request
    async fn has_voted(&self, request_id: &str, user_id: &str) -> Result<bool> {
        self.enter("has_voted").await?;

        let votes = self.votes.lock().await;
        Ok(votes.contains_key(&(request_id.to_string(), user_id.to_string())))
    }

    /// Upvote a request, doing nothing if the vote already exists
    async fn insert_vote(&self, session: &Session, request_id: &str) -> Result<()> {
        self.enter("insert_vote").await?;
        self.authorise(session).await?;

        let mut votes = self.votes.lock().await;
        let exists = self
            .event_requests
            .lock()
            .await
            .get(request_id)
            .is_some_and(|request| !request.is_deleted());

        if !exists {
            return Err(create_error!(UnknownRequest));
        }

        votes
            .entry((request_id.to_string(), session.user_id.clone()))
            .or_insert_with(|| Vote {
                request_id: request_id.to_string(),
                user_id: session.user_id.clone(),
                created_at: Utc::now(),
            });

        Ok(())
    }

    /// Remove the viewer's upvote from a request
    async fn delete_vote(&self, session: &Session, request_id: &str) -> Result<()> {
        self.enter("delete_vote").await?;
        self.authorise(session).await?;

        self.votes
            .lock()
            .await
            .remove(&(request_id.to_string(), session.user_id.clone()));

        Ok(())
    }
}
