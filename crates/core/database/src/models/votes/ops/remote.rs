use clubhub_result::Result;

use crate::v0::Session;
use crate::{RemoteDb, VoteRow};

use super::AbstractVotes;

const TABLE: &str = "event_request_votes";

#[async_trait]
impl AbstractVotes for RemoteDb {
    /// Whether `user_id` has upvoted a request
    async fn has_voted(&self, request_id: &str, user_id: &str) -> Result<bool> {
        let stored = self.stored_session().await;
        let rows: Vec<VoteRow> = self
            .select(
                TABLE,
                &[
                    ("select", "request_id,user_id".to_string()),
                    ("request_id", format!("eq.{request_id}")),
                    ("user_id", format!("eq.{user_id}")),
                    ("limit", "1".to_string()),
                ],
                stored.as_ref(),
            )
            .await?;

        Ok(!rows.is_empty())
    }

    /// Upvote a request, doing nothing if the vote already exists
    async fn insert_vote(&self, session: &Session, request_id: &str) -> Result<()> {
        self.insert_ignoring_duplicates(
            TABLE,
            &VoteRow {
                request_id: request_id.to_string(),
                user_id: session.user_id.clone(),
            },
            session,
        )
        .await
    }

    /// Remove the viewer's upvote from a request
    async fn delete_vote(&self, session: &Session, request_id: &str) -> Result<()> {
        self.delete_rows(
            TABLE,
            &[
                ("request_id", format!("eq.{request_id}")),
                ("user_id", format!("eq.{}", session.user_id)),
            ],
            session,
        )
        .await
    }
}
