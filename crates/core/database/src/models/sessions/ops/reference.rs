use clubhub_result::Result;

use crate::v0::Session;
use crate::ReferenceDb;

use super::AbstractSessions;

#[async_trait]
impl AbstractSessions for ReferenceDb {
    /// Fetch the signed-in session, or fail with `NotAuthenticated`
    async fn fetch_session(&self) -> Result<Session> {
        self.enter("fetch_session").await?;

        self.session
            .lock()
            .await
            .clone()
            .ok_or_else(|| create_error!(NotAuthenticated))
    }
}
