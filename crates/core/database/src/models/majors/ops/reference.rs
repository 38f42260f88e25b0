use clubhub_result::Result;

use crate::v0::Major;
use crate::ReferenceDb;

use super::AbstractMajors;

#[async_trait]
impl AbstractMajors for ReferenceDb {
    /// Fetch every major, sorted by name
    async fn fetch_majors(&self) -> Result<Vec<Major>> {
        self.enter("fetch_majors").await?;

        let mut majors: Vec<Major> = self.majors.lock().await.values().cloned().collect();
        majors.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(majors)
    }

    /// Fetch the ids of the majors a club is associated with
    async fn fetch_club_majors(&self, club_id: &str) -> Result<Vec<String>> {
        self.enter("fetch_club_majors").await?;

        Ok(self
            .club_majors
            .lock()
            .await
            .get(club_id)
            .map(|majors| majors.iter().cloned().collect())
            .unwrap_or_default())
    }
}
