use std::collections::BTreeSet;

use clubhub_result::{Error, Result};

use crate::util::rows::{parse_count, parse_enum, parse_optional_timestamp, parse_timestamp};
use crate::v0::{Event, Location};

const COLLECTION: &str = "events";

auto_derived!(
    /// Event row as returned by `get_events_for_range`, flattened with its club, tags and majors
    pub struct EventRow {
        pub id: String,
        pub club_id: String,
        #[serde(default)]
        pub club_name: Option<String>,
        pub title: String,
        #[serde(default)]
        pub description: Option<String>,
        pub starts_at: String,
        #[serde(default)]
        pub ends_at: Option<String>,
        #[serde(default)]
        pub location_name: Option<String>,
        #[serde(default)]
        pub location_address: Option<String>,
        pub location_type: String,
        #[serde(default)]
        pub online_url: Option<String>,
        pub visibility: String,
        pub status: String,
        #[serde(default)]
        pub is_all_majors: bool,
        #[serde(default)]
        pub capacity: Option<i64>,
        #[serde(default)]
        pub requires_rsvp: bool,
        #[serde(default)]
        pub rsvp_url: Option<String>,
        #[serde(default)]
        pub is_featured: bool,
        pub created_at: String,
        pub updated_at: String,
        #[serde(default)]
        pub tags: Option<Vec<String>>,
        #[serde(default)]
        pub major_ids: Option<Vec<String>>,
    }

    /// Club name embedded in an event record
    pub struct ClubName {
        pub name: String,
    }

    /// Tag embedded in an event record
    pub struct EventTagRow {
        pub tag: String,
    }

    /// Major link embedded in an event record
    pub struct EventMajorRow {
        pub major_id: String,
    }

    /// Event record from the `events` table with its joins embedded
    pub struct EventRecord {
        #[serde(flatten)]
        pub row: EventRow,
        #[serde(default)]
        pub clubs: Option<ClubName>,
        #[serde(default)]
        pub event_tags: Vec<EventTagRow>,
        #[serde(default)]
        pub event_majors: Vec<EventMajorRow>,
    }
);

impl TryFrom<EventRow> for Event {
    type Error = Error;

    fn try_from(row: EventRow) -> Result<Event> {
        let title = row.title.trim().to_string();
        if title.is_empty() {
            return Err(create_error!(InvalidRecord {
                collection: COLLECTION.to_string(),
                reason: format!("event {} has no title", row.id)
            }));
        }

        Ok(Event {
            starts_at: parse_timestamp(COLLECTION, "starts_at", &row.starts_at)?,
            ends_at: parse_optional_timestamp(COLLECTION, "ends_at", row.ends_at.as_deref())?,
            location: Location {
                kind: parse_enum(COLLECTION, "location_type", &row.location_type)?,
                name: row.location_name,
                address: row.location_address,
                url: row.online_url,
            },
            visibility: parse_enum(COLLECTION, "visibility", &row.visibility)?,
            status: parse_enum(COLLECTION, "status", &row.status)?,
            capacity: row
                .capacity
                .map(|capacity| parse_count(COLLECTION, "capacity", capacity))
                .transpose()?,
            created_at: parse_timestamp(COLLECTION, "created_at", &row.created_at)?,
            updated_at: parse_timestamp(COLLECTION, "updated_at", &row.updated_at)?,
            tags: row
                .tags
                .unwrap_or_default()
                .into_iter()
                .collect::<BTreeSet<_>>(),
            major_ids: row.major_ids.unwrap_or_default(),
            id: row.id,
            club_id: row.club_id,
            club_name: row.club_name,
            title,
            description: row.description,
            is_all_majors: row.is_all_majors,
            requires_rsvp: row.requires_rsvp,
            rsvp_url: row.rsvp_url,
            is_featured: row.is_featured,
        })
    }
}

impl TryFrom<EventRecord> for Event {
    type Error = Error;

    fn try_from(record: EventRecord) -> Result<Event> {
        let EventRecord {
            mut row,
            clubs,
            event_tags,
            event_majors,
        } = record;

        if row.club_name.is_none() {
            row.club_name = clubs.map(|club| club.name);
        }

        if row.tags.is_none() {
            row.tags = Some(event_tags.into_iter().map(|tag| tag.tag).collect());
        }

        if row.major_ids.is_none() {
            row.major_ids = Some(
                event_majors
                    .into_iter()
                    .map(|major| major.major_id)
                    .collect(),
            );
        }

        row.try_into()
    }
}

#[cfg(test)]
mod tests {
    use clubhub_result::ErrorType;

    use crate::v0::{Event, EventStatus, LocationType};
    use crate::{EventRecord, EventRow};

    fn row() -> serde_json::Value {
        serde_json::json!({
            "id": "robot-demo",
            "club_id": "robotics",
            "club_name": "Robotics Club",
            "title": "Robot Demo Day",
            "description": null,
            "starts_at": "2024-03-01T09:00:00+00:00",
            "ends_at": null,
            "location_name": "Engineering Hall",
            "location_address": null,
            "location_type": "on_campus",
            "online_url": null,
            "visibility": "public",
            "status": "published",
            "banner_url": null,
            "is_all_majors": false,
            "capacity": 40,
            "requires_rsvp": true,
            "rsvp_url": null,
            "is_featured": false,
            "created_at": "2024-02-01T00:00:00+00:00",
            "updated_at": "2024-02-01T00:00:00+00:00",
            "tags": ["demo", "engineering", "demo"],
            "major_ids": ["cs"]
        })
    }

    #[test]
    fn joined_row_converts() {
        let row: EventRow = serde_json::from_value(row()).unwrap();
        let event = Event::try_from(row).unwrap();

        assert_eq!(event.location.kind, LocationType::OnCampus);
        assert_eq!(event.status, EventStatus::Published);
        assert_eq!(event.capacity, Some(40));
        assert_eq!(event.tags.len(), 2);
        assert!(event.is_point_in_time());
    }

    #[test]
    fn scheduled_is_published() {
        let mut value = row();
        value["status"] = "scheduled".into();

        let row: EventRow = serde_json::from_value(value).unwrap();
        assert_eq!(Event::try_from(row).unwrap().status, EventStatus::Published);
    }

    #[test]
    fn unknown_location_type_is_rejected() {
        let mut value = row();
        value["location_type"] = "moon".into();

        let row: EventRow = serde_json::from_value(value).unwrap();
        let error = Event::try_from(row).unwrap_err();
        assert!(matches!(error.error_type, ErrorType::InvalidRecord { .. }));
    }

    #[test]
    fn embedded_joins_fill_missing_columns() {
        let mut value = row();
        let object = value.as_object_mut().unwrap();
        object.remove("club_name");
        object.remove("tags");
        object.remove("major_ids");
        object.insert("clubs".to_string(), serde_json::json!({ "name": "Robotics Club" }));
        object.insert(
            "event_tags".to_string(),
            serde_json::json!([{ "tag": "demo" }]),
        );
        object.insert(
            "event_majors".to_string(),
            serde_json::json!([{ "major_id": "cs" }]),
        );

        let record: EventRecord = serde_json::from_value(value).unwrap();
        let event = Event::try_from(record).unwrap();

        assert_eq!(event.club_name.as_deref(), Some("Robotics Club"));
        assert!(event.tags.contains("demo"));
        assert_eq!(event.major_ids, vec!["cs".to_string()]);
    }
}
