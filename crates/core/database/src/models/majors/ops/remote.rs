use clubhub_result::Result;

use crate::v0::Major;
use crate::{ClubMajorRow, RemoteDb};

use super::AbstractMajors;

#[async_trait]
impl AbstractMajors for RemoteDb {
    /// Fetch every major, sorted by name
    async fn fetch_majors(&self) -> Result<Vec<Major>> {
        self.select(
            "majors",
            &[
                ("select", "id,name".to_string()),
                ("order", "name.asc".to_string()),
            ],
            None,
        )
        .await
    }

    /// Fetch the ids of the majors a club is associated with
    async fn fetch_club_majors(&self, club_id: &str) -> Result<Vec<String>> {
        let rows: Vec<ClubMajorRow> = self
            .select(
                "club_majors",
                &[
                    ("select", "major_id".to_string()),
                    ("club_id", format!("eq.{club_id}")),
                ],
                None,
            )
            .await?;

        Ok(rows.into_iter().map(|row| row.major_id).collect())
    }
}
