use clubhub_result::{Error, Result};

use crate::util::rows::{parse_count, parse_enum, parse_optional_timestamp, parse_timestamp};
use crate::v0::{Audience, EventRequest, EventRequestDetails, FulfilledEventSummary};

const COLLECTION: &str = "event_requests";

auto_derived!(
    /// Row of the `event_requests_with_counts` view
    pub struct EventRequestRow {
        pub id: String,
        pub description: String,
        #[serde(default)]
        pub major_id: Option<String>,
        #[serde(default)]
        pub is_all_majors: bool,
        pub status: String,
        #[serde(default)]
        pub fulfilled_event_id: Option<String>,
        pub created_by: String,
        pub created_at: String,
        #[serde(default)]
        pub deleted_at: Option<String>,
        #[serde(default)]
        pub deleted_by: Option<String>,
        #[serde(default)]
        pub delete_reason: Option<String>,
        #[serde(default)]
        pub vote_count: Option<i64>,
        #[serde(default)]
        pub tags: Option<Vec<String>>,
    }

    /// Fulfilled event as embedded by `get_event_request_details`
    pub struct FulfilledEventRow {
        pub id: String,
        pub title: String,
        pub starts_at: String,
        #[serde(default)]
        pub location_name: Option<String>,
        pub location_type: String,
        pub club_name: String,
        pub club_slug: String,
    }

    /// Result of `get_event_request_details`
    pub struct EventRequestDetailsRow {
        #[serde(flatten)]
        pub row: EventRequestRow,
        #[serde(default)]
        pub major_name: Option<String>,
        #[serde(default)]
        pub fulfilled_event: Option<FulfilledEventRow>,
        #[serde(default)]
        pub user_has_voted: Option<bool>,
    }
);

impl TryFrom<EventRequestRow> for EventRequest {
    type Error = Error;

    fn try_from(row: EventRequestRow) -> Result<EventRequest> {
        let audience = Audience::from_columns(row.major_id, row.is_all_majors).ok_or_else(|| {
            create_error!(InvalidRecord {
                collection: COLLECTION.to_string(),
                reason: format!("request {} has neither a major nor all majors", row.id)
            })
        })?;

        Ok(EventRequest {
            audience,
            status: parse_enum(COLLECTION, "status", &row.status)?,
            created_at: parse_timestamp(COLLECTION, "created_at", &row.created_at)?,
            deleted_at: parse_optional_timestamp(
                COLLECTION,
                "deleted_at",
                row.deleted_at.as_deref(),
            )?,
            vote_count: parse_count(COLLECTION, "vote_count", row.vote_count.unwrap_or(0))?,
            tags: row.tags.unwrap_or_default().into_iter().collect(),
            id: row.id,
            description: row.description,
            fulfilled_event_id: row.fulfilled_event_id,
            created_by: row.created_by,
            deleted_by: row.deleted_by,
            delete_reason: row.delete_reason,
        })
    }
}

impl TryFrom<FulfilledEventRow> for FulfilledEventSummary {
    type Error = Error;

    fn try_from(row: FulfilledEventRow) -> Result<FulfilledEventSummary> {
        Ok(FulfilledEventSummary {
            starts_at: parse_timestamp("events", "starts_at", &row.starts_at)?,
            location_type: parse_enum("events", "location_type", &row.location_type)?,
            id: row.id,
            title: row.title,
            location_name: row.location_name,
            club_name: row.club_name,
            club_slug: row.club_slug,
        })
    }
}

impl TryFrom<EventRequestDetailsRow> for EventRequestDetails {
    type Error = Error;

    fn try_from(details: EventRequestDetailsRow) -> Result<EventRequestDetails> {
        Ok(EventRequestDetails {
            request: details.row.try_into()?,
            major_name: details.major_name,
            fulfilled_event: details
                .fulfilled_event
                .map(FulfilledEventSummary::try_from)
                .transpose()?,
            user_has_voted: details.user_has_voted.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use clubhub_result::ErrorType;

    use crate::v0::{Audience, EventRequest, EventRequestDetails, RequestStatus};
    use crate::{EventRequestDetailsRow, EventRequestRow};

    fn row() -> serde_json::Value {
        serde_json::json!({
            "id": "pizza-social",
            "description": "Pizza social",
            "major_id": null,
            "is_all_majors": true,
            "status": "open",
            "fulfilled_event_id": null,
            "created_by": "bob",
            "created_at": "2024-02-03T12:00:00+00:00",
            "deleted_at": null,
            "deleted_by": null,
            "delete_reason": null,
            "vote_count": 5,
            "tags": ["food", "social"]
        })
    }

    #[test]
    fn view_row_converts() {
        let row: EventRequestRow = serde_json::from_value(row()).unwrap();
        let request = EventRequest::try_from(row).unwrap();

        assert_eq!(request.audience, Audience::AllMajors);
        assert_eq!(request.status, RequestStatus::Open);
        assert_eq!(request.vote_count, 5);
        assert!(!request.is_deleted());
    }

    #[test]
    fn missing_vote_count_is_zero() {
        let mut value = row();
        value.as_object_mut().unwrap().remove("vote_count");

        let row: EventRequestRow = serde_json::from_value(value).unwrap();
        assert_eq!(EventRequest::try_from(row).unwrap().vote_count, 0);
    }

    #[test]
    fn audience_must_be_set() {
        let mut value = row();
        value["is_all_majors"] = false.into();

        let row: EventRequestRow = serde_json::from_value(value).unwrap();
        assert!(matches!(
            EventRequest::try_from(row).unwrap_err().error_type,
            ErrorType::InvalidRecord { .. }
        ));
    }

    #[test]
    fn details_carry_fulfilled_event() {
        let mut value = row();
        let object = value.as_object_mut().unwrap();
        object.insert("status".to_string(), "fulfilled".into());
        object.insert("user_has_voted".to_string(), true.into());
        object.insert(
            "fulfilled_event".to_string(),
            serde_json::json!({
                "id": "mixer",
                "title": "Pizza Mixer",
                "starts_at": "2024-03-02T18:30:00+00:00",
                "location_name": null,
                "location_type": "on_campus",
                "club_name": "Student Union",
                "club_slug": "student-union"
            }),
        );

        let row: EventRequestDetailsRow = serde_json::from_value(value).unwrap();
        let details = EventRequestDetails::try_from(row).unwrap();

        assert!(details.user_has_voted);
        assert!(details.request.is_fulfilled());
        assert_eq!(details.fulfilled_event.unwrap().club_slug, "student-union");
    }
}

#[cfg(test)]
mod database {
    use clubhub_result::ErrorType;

    use crate::v0::{DataCreateEventRequest, RequestStatus};

    #[tokio::test]
    async fn board_excludes_deleted_requests() {
        database_test!(|db| async move {
            crate::fixture!(db, "board");

            let requests = db.fetch_event_requests().await.unwrap();
            let board: Vec<(&str, u32)> = requests
                .iter()
                .map(|request| (request.id.as_str(), request.vote_count))
                .collect();

            assert_eq!(
                board,
                vec![
                    ("pizza-social", 5),
                    ("resume-workshop", 5),
                    ("sketch-night", 2)
                ]
            );
        });
    }

    #[tokio::test]
    async fn club_relevance_follows_club_majors() {
        database_test!(|db| async move {
            crate::fixture!(db, "board");

            let robotics = db.fetch_club_relevant_requests("robotics").await.unwrap();
            let ids: Vec<&str> = robotics.iter().map(|r| r.id.as_str()).collect();
            assert_eq!(ids, vec!["pizza-social", "resume-workshop"]);

            let chess = db.fetch_club_relevant_requests("chess").await.unwrap();
            let ids: Vec<&str> = chess.iter().map(|r| r.id.as_str()).collect();
            assert_eq!(ids, vec!["pizza-social"]);
        });
    }

    #[tokio::test]
    async fn details_join_related_records() {
        database_test!(|db| async move {
            crate::fixture!(db, "board");

            let details = db
                .fetch_event_request_details("sketch-night", None)
                .await
                .unwrap();

            assert_eq!(details.major_name.as_deref(), Some("Art History"));
            assert_eq!(details.fulfilled_event.unwrap().club_slug, "art-society");
            assert!(!details.user_has_voted);

            let error = db
                .fetch_event_request_details("nothing", None)
                .await
                .unwrap_err();
            assert_eq!(error.error_type, ErrorType::UnknownRequest);
        });
    }

    #[tokio::test]
    async fn create_then_delete() {
        database_test!(|db| async move {
            crate::fixture!(db, "board");
            let reference = db.as_reference().unwrap();
            let alice = reference.sign_in("alice").await;

            let id = db
                .insert_event_request(
                    &alice,
                    &DataCreateEventRequest {
                        description: "Intro to Rust".to_string(),
                        is_all_majors: true,
                        tags: vec!["Workshop".to_string()],
                        understood: true,
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            let created = db.fetch_event_request(&id).await.unwrap();
            assert_eq!(created.created_by, "alice");
            assert!(created.tags.contains("workshop"));
            assert_eq!(created.vote_count, 0);

            let mallory = reference.sign_in("mallory").await;
            let error = db
                .delete_event_request(&mallory, &id, None)
                .await
                .unwrap_err();
            assert_eq!(error.error_type, ErrorType::NotOwner);

            // alice's token stopped working when mallory signed in
            let error = db
                .delete_event_request(&alice, &id, None)
                .await
                .unwrap_err();
            assert_eq!(error.error_type, ErrorType::NotAuthenticated);

            let alice = reference.sign_in("alice").await;
            db.delete_event_request(&alice, &id, Some("duplicate"))
                .await
                .unwrap();

            let board = db.fetch_event_requests().await.unwrap();
            assert!(board.iter().all(|request| request.id != id));
        });
    }

    #[tokio::test]
    async fn fulfil_once() {
        database_test!(|db| async move {
            crate::fixture!(db, "board");
            let session = db.as_reference().unwrap().sign_in("officer").await;

            db.fulfill_event_request(&session, "resume-workshop", "gallery-walk")
                .await
                .unwrap();

            let request = db.fetch_event_request("resume-workshop").await.unwrap();
            assert_eq!(request.status, RequestStatus::Fulfilled);
            assert_eq!(request.fulfilled_event_id.as_deref(), Some("gallery-walk"));

            let error = db
                .fulfill_event_request(&session, "resume-workshop", "gallery-walk")
                .await
                .unwrap_err();
            assert_eq!(error.error_type, ErrorType::RequestClosed);
        });
    }
}
