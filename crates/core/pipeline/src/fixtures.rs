use chrono::{DateTime, TimeZone, Utc};
use clubhub_models::v0::{
    Audience, Event, EventRequest, EventStatus, Location, LocationType, RequestStatus, Visibility,
};

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
            name: Some("Hall A".to_string()),
            address: None,
            url: None,
        },
        visibility: Visibility::Public,
        status: EventStatus::Published,
        is_all_majors: false,
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

pub fn request(id: &str, vote_count: u32, created_at: DateTime<Utc>) -> EventRequest {
    EventRequest {
        id: id.to_string(),
        description: format!("Request {id}"),
        audience: Audience::AllMajors,
        tags: Default::default(),
        status: RequestStatus::Open,
        fulfilled_event_id: None,
        created_by: "user-1".to_string(),
        created_at,
        vote_count,
        deleted_at: None,
        deleted_by: None,
        delete_reason: None,
    }
}
