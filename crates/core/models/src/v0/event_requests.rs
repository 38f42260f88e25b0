use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clubhub_result::Result;
use validator::Validate;

use super::LocationType;

auto_derived!(
    /// Who an event request is aimed at
    #[derive(Hash)]
    #[serde(tag = "type")]
    pub enum Audience {
        /// Every major
        AllMajors,
        /// One specific major
        Major { major_id: String },
    }

    /// Lifecycle of an event request
    #[derive(Copy, Hash)]
    #[serde(rename_all = "snake_case")]
    pub enum RequestStatus {
        Open,
        Fulfilled,
        Closed,
    }

    /// Suggestion for a future event, upvoted by the community
    pub struct EventRequest {
        /// Request Id
        pub id: String,
        /// What the requester would like to see
        pub description: String,
        /// Majors this request is aimed at
        pub audience: Audience,
        /// Free-form tags
        #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
        pub tags: BTreeSet<String>,
        /// Status
        pub status: RequestStatus,
        /// Event that fulfilled this request
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub fulfilled_event_id: Option<String>,
        /// Id of the user who created this request
        pub created_by: String,
        /// Creation time
        pub created_at: DateTime<Utc>,
        /// Number of upvotes
        #[serde(skip_serializing_if = "crate::if_zero_u32", default)]
        pub vote_count: u32,
        /// Soft-delete marker
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub deleted_at: Option<DateTime<Utc>>,
        /// Id of the user who deleted this request
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub deleted_by: Option<String>,
        /// Reason given on deletion
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub delete_reason: Option<String>,
    }

    /// Summary of the event that fulfilled a request
    pub struct FulfilledEventSummary {
        pub id: String,
        pub title: String,
        pub starts_at: DateTime<Utc>,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub location_name: Option<String>,
        pub location_type: LocationType,
        pub club_name: String,
        pub club_slug: String,
    }

    /// Event request with related data for the details panel
    pub struct EventRequestDetails {
        #[serde(flatten)]
        pub request: EventRequest,
        /// Name of the targeted major
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub major_name: Option<String>,
        /// Event that fulfilled this request
        #[serde(skip_serializing_if = "Option::is_none", default)]
        pub fulfilled_event: Option<FulfilledEventSummary>,
        /// Whether the current viewer has upvoted this request
        #[serde(skip_serializing_if = "crate::if_false", default)]
        pub user_has_voted: bool,
    }

    /// Board ordering
    #[derive(Copy, Hash, Default)]
    #[serde(rename_all = "kebab-case")]
    pub enum RequestSort {
        /// Most votes first, newest first among equals
        #[default]
        MostUpvoted,
        /// Newest first
        Newest,
        /// Fulfilled requests first, then most votes
        #[serde(rename = "fulfilled")]
        FulfilledFirst,
    }

    /// New event request
    #[derive(Default, Validate)]
    pub struct DataCreateEventRequest {
        /// What the requester would like to see
        #[validate(length(min = 1, max = 1000))]
        pub description: String,
        /// Targeted major, ignored when `is_all_majors` is set
        pub major_id: Option<String>,
        /// Whether the request is aimed at every major
        #[serde(default)]
        pub is_all_majors: bool,
        /// Free-form tags
        #[validate(length(max = 10))]
        #[serde(default)]
        pub tags: Vec<String>,
        /// Requester confirmed that requests cannot be edited after posting
        #[serde(default)]
        pub understood: bool,
    }
);

impl Audience {
    /// Build from the nullable column pair used by the backend
    pub fn from_columns(major_id: Option<String>, is_all_majors: bool) -> Option<Audience> {
        match (is_all_majors, major_id) {
            (true, _) => Some(Audience::AllMajors),
            (false, Some(major_id)) => Some(Audience::Major { major_id }),
            (false, None) => None,
        }
    }

    /// Whether a request with this audience passes a major filter
    pub fn matches(&self, majors: &BTreeSet<String>) -> bool {
        match self {
            Audience::AllMajors => true,
            Audience::Major { major_id } => majors.contains(major_id),
        }
    }

    pub fn major_id(&self) -> Option<&str> {
        match self {
            Audience::AllMajors => None,
            Audience::Major { major_id } => Some(major_id),
        }
    }

    pub fn is_all_majors(&self) -> bool {
        matches!(self, Audience::AllMajors)
    }
}

impl EventRequest {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn is_fulfilled(&self) -> bool {
        self.status == RequestStatus::Fulfilled
    }

    /// Whether the given user may delete this request
    pub fn is_creator(&self, user_id: &str) -> bool {
        self.created_by == user_id
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Open => write!(f, "open"),
            RequestStatus::Fulfilled => write!(f, "fulfilled"),
            RequestStatus::Closed => write!(f, "closed"),
        }
    }
}

impl RequestSort {
    pub fn label(&self) -> &'static str {
        match self {
            RequestSort::MostUpvoted => "Most upvoted",
            RequestSort::Newest => "Newest",
            RequestSort::FulfilledFirst => "Fulfilled first",
        }
    }
}

impl FromStr for RequestSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "most-upvoted" => Ok(RequestSort::MostUpvoted),
            "newest" => Ok(RequestSort::Newest),
            "fulfilled" | "fulfilled-first" => Ok(RequestSort::FulfilledFirst),
            _ => Err(format!("unknown sort mode `{s}`")),
        }
    }
}

/// Normalise a list of tags: trimmed, lowercased, without blanks or repeats
pub fn normalise_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = BTreeSet::new();
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().to_lowercase())
        .filter(|tag| !tag.is_empty() && seen.insert(tag.clone()))
        .collect()
}

impl DataCreateEventRequest {
    /// Check this request client-side, before any network call
    ///
    /// Returns the request with a trimmed description and normalised tags.
    pub fn normalise(self) -> Result<DataCreateEventRequest> {
        let data = DataCreateEventRequest {
            description: self.description.trim().to_string(),
            major_id: if self.is_all_majors {
                None
            } else {
                self.major_id.filter(|id| !id.trim().is_empty())
            },
            tags: normalise_tags(&self.tags),
            ..self
        };

        if data.description.is_empty() {
            return Err(create_validation_error!(
                "description",
                "Please provide a description for your request."
            ));
        }

        if !data.is_all_majors && data.major_id.is_none() {
            return Err(create_validation_error!(
                "major_id",
                "Please select a major or choose 'All majors'."
            ));
        }

        if !data.understood {
            return Err(create_validation_error!(
                "understood",
                "Please confirm that you understand you cannot edit after posting."
            ));
        }

        data.validate().map_err(|error| {
            let field = error
                .field_errors()
                .keys()
                .next()
                .map(|field| field.to_string())
                .unwrap_or_default();

            create_error!(FailedValidation {
                field,
                error: error.to_string()
            })
        })?;

        Ok(data)
    }

    /// Audience described by this request
    pub fn audience(&self) -> Option<Audience> {
        Audience::from_columns(self.major_id.clone(), self.is_all_majors)
    }
}
