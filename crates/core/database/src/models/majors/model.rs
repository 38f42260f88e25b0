auto_derived!(
    /// Row of the `club_majors` join table
    pub struct ClubMajorRow {
        pub major_id: String,
    }
);

#[cfg(test)]
mod tests {
    use crate::v0::Major;
    use crate::ClubMajorRow;

    #[test]
    fn club_major_rows_decode() {
        let row: ClubMajorRow =
            serde_json::from_value(serde_json::json!({ "major_id": "cs" })).unwrap();
        assert_eq!(row.major_id, "cs");
    }

    #[tokio::test]
    async fn majors_are_sorted_by_name() {
        database_test!(|db| async move {
            crate::fixture!(db, "board");
            db.as_reference()
                .unwrap()
                .seed_majors([Major {
                    id: "bio".to_string(),
                    name: "Biology".to_string(),
                }])
                .await;

            let names: Vec<String> = db
                .fetch_majors()
                .await
                .unwrap()
                .into_iter()
                .map(|major| major.name)
                .collect();

            assert_eq!(names, vec!["Art History", "Biology", "Computer Science"]);
        });
    }

    #[tokio::test]
    async fn club_majors_by_club() {
        database_test!(|db| async move {
            crate::fixture!(db, "board");

            assert_eq!(
                db.fetch_club_majors("robotics").await.unwrap(),
                vec!["cs".to_string()]
            );
            assert!(db.fetch_club_majors("chess").await.unwrap().is_empty());
        });
    }
}
