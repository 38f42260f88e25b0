use clubhub_result::Result;

use crate::v0::Major;

mod reference;
#[cfg(feature = "remote")]
mod remote;

#[async_trait]
pub trait AbstractMajors: Sync + Send {
    /// Fetch every major, sorted by name
    async fn fetch_majors(&self) -> Result<Vec<Major>>;

    /// Fetch the ids of the majors a club is associated with
    async fn fetch_club_majors(&self, club_id: &str) -> Result<Vec<String>>;
}
