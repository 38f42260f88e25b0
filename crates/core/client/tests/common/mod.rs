#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use clubhub_config::{Cache, Calendar, Settings};
use clubhub_database::v0::{
    Audience, Event, EventRequest, EventStatus, Location, LocationType, RequestStatus, Visibility,
};
use clubhub_database::{Database, DatabaseInfo, ReferenceDb};

pub async fn database() -> Database {
    DatabaseInfo::Reference
        .connect()
        .await
        .expect("Database connection failed.")
}

pub fn reference(db: &Database) -> &ReferenceDb {
    db.as_reference().expect("reference database")
}

pub fn cache() -> Cache {
    Settings::defaults().cache
}

pub fn calendar() -> Calendar {
    Settings::defaults().calendar
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn event(id: &str, starts_at: DateTime<Utc>) -> Event {
    Event {
        id: id.to_string(),
        club_id: "club-robotics".to_string(),
        club_name: Some("Robotics Club".to_string()),
        title: format!("Event {id}"),
        description: None,
        starts_at,
        ends_at: None,
        location: Location {
            kind: LocationType::OnCampus,
            name: Some("Engineering Hall".to_string()),
            address: None,
            url: None,
        },
        visibility: Visibility::Public,
        status: EventStatus::Published,
        is_all_majors: true,
        major_ids: vec![],
        tags: Default::default(),
        capacity: None,
        requires_rsvp: false,
        rsvp_url: None,
        is_featured: false,
        created_at: starts_at,
        updated_at: starts_at,
    }
}

pub fn request(id: &str, created_by: &str, created_at: DateTime<Utc>) -> EventRequest {
    EventRequest {
        id: id.to_string(),
        description: format!("Request {id}"),
        audience: Audience::AllMajors,
        tags: Default::default(),
        status: RequestStatus::Open,
        fulfilled_event_id: None,
        created_by: created_by.to_string(),
        created_at,
        vote_count: 0,
        deleted_at: None,
        deleted_by: None,
        delete_reason: None,
    }
}
