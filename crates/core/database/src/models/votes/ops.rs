use clubhub_result::Result;

use crate::v0::Session;

mod reference;
#[cfg(feature = "remote")]
mod remote;

#[async_trait]
pub trait AbstractVotes: Sync + Send {
    /// Whether `user_id` has upvoted a request
    async fn has_voted(&self, request_id: &str, user_id: &str) -> Result<bool>;

    /// Upvote a request, doing nothing if the vote already exists
    async fn insert_vote(&self, session: &Session, request_id: &str) -> Result<()>;

    /// Remove the viewer's upvote from a request
    async fn delete_vote(&self, session: &Session, request_id: &str) -> Result<()>;

    /// Flip the viewer's upvote, returning whether the vote now exists
    async fn toggle_vote(&self, session: &Session, request_id: &str) -> Result<bool> {
        if self.has_voted(request_id, &session.user_id).await? {
            self.delete_vote(session, request_id).await?;
            Ok(false)
        } else {
            self.insert_vote(session, request_id).await?;
            Ok(true)
        }
    }
}
