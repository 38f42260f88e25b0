use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

auto_derived!(
    /// Where an event takes place
    #[derive(Copy, Hash, PartialOrd, Ord)]
    #[serde(rename_all = "snake_case")]
    pub enum LocationType {
        OnCampus,
        OffCampus,
        Online,
        Hybrid,
    }

    /// Who can see an event
    #[derive(Copy, Hash)]
    #[serde(rename_all = "snake_case")]
    pub enum Visibility {
        Public,
        MembersOnly,
        Unlisted,
    }

    /// Lifecycle of an event, owned by the backend
    #[derive(Copy, Hash)]
    #[serde(rename_all = "snake_case")]
    pub enum EventStatus {
        Draft,
        #[serde(alias = "scheduled")]
        Published,
        Cancelled,
    }

    /// Event location
    pub struct Location {
        /// Kind of location
        #[serde(rename = "type")]
        pub kind: LocationType,
        /// Venue or room name
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub name: Option<String>,
        /// Street address
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub address: Option<String>,
        /// Meeting link for online and hybrid events
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub url: Option<String>,
    }

    /// Calendar event, flattened with its club, tags and majors
    pub struct Event {
        /// Event Id
        pub id: String,
        /// Id of the club hosting this event
        pub club_id: String,
        /// Name of the club hosting this event
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub club_name: Option<String>,

        /// Event title
        pub title: String,
        /// Event description
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub description: Option<String>,

        /// Start time
        pub starts_at: DateTime<Utc>,
        /// End time, point-in-time events have none
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub ends_at: Option<DateTime<Utc>>,

        /// Location
        pub location: Location,
        /// Visibility
        pub visibility: Visibility,
        /// Status
        pub status: EventStatus,

        /// Whether this event is relevant to every major
        #[serde(skip_serializing_if = "crate::if_false", default)]
        pub is_all_majors: bool,
        /// Majors this event targets
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        pub major_ids: Vec<String>,
        /// Free-form tags
        #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
        pub tags: BTreeSet<String>,

        /// Maximum number of attendees
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub capacity: Option<u32>,
        /// Whether attendees must RSVP
        #[serde(skip_serializing_if = "crate::if_false", default)]
        pub requires_rsvp: bool,
        /// External RSVP link
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub rsvp_url: Option<String>,
        /// Whether this event is highlighted
        #[serde(skip_serializing_if = "crate::if_false", default)]
        pub is_featured: bool,

        /// Creation time
        pub created_at: DateTime<Utc>,
        /// Last update time
        pub updated_at: DateTime<Utc>,
    }
);

impl Event {
    /// Whether this event should carry the cancelled marker
    pub fn is_cancelled(&self) -> bool {
        self.status == EventStatus::Cancelled
    }

    /// Whether this event has no end time
    pub fn is_point_in_time(&self) -> bool {
        self.ends_at.is_none()
    }

    /// Whether this event targets any of the given majors
    pub fn targets_any_major(&self, majors: &BTreeSet<String>) -> bool {
        self.is_all_majors || self.major_ids.iter().any(|id| majors.contains(id))
    }
}

impl LocationType {
    pub const ALL: [LocationType; 4] = [
        LocationType::OnCampus,
        LocationType::OffCampus,
        LocationType::Online,
        LocationType::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::OnCampus => "on_campus",
            LocationType::OffCampus => "off_campus",
            LocationType::Online => "online",
            LocationType::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LocationType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown location type `{s}`"))
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventStatus::Draft => write!(f, "draft"),
            EventStatus::Published => write!(f, "published"),
            EventStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}
