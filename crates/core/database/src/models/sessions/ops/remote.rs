use clubhub_result::{ErrorType, Result};

use crate::v0::Session;
use crate::RemoteDb;

use super::AbstractSessions;

#[async_trait]
impl AbstractSessions for RemoteDb {
    /// Fetch the signed-in session, or fail with `NotAuthenticated`
    ///
    /// The stored token is checked with the backend, a rejected token is
    /// forgotten.
    async fn fetch_session(&self) -> Result<Session> {
        let session = self
            .stored_session()
            .await
            .ok_or_else(|| create_error!(NotAuthenticated))?;

        match self.fetch_user_id(&session).await {
            Ok(user_id) => Ok(Session {
                user_id,
                access_token: session.access_token,
            }),
            Err(error) => {
                if error.error_type == ErrorType::NotAuthenticated {
                    info!("Stored session was rejected, signing out");
                    self.set_session(None).await;
                }

                Err(error)
            }
        }
    }
}
