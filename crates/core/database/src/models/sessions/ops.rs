use clubhub_result::Result;

use crate::v0::Session;

mod reference;
#[cfg(feature = "remote")]
mod remote;

#[async_trait]
pub trait AbstractSessions: Sync + Send {
    /// Fetch the signed-in session, or fail with `NotAuthenticated`
    async fn fetch_session(&self) -> Result<Session>;
}
