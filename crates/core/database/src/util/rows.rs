use chrono::{DateTime, Utc};
use clubhub_result::Result;
use serde::de::DeserializeOwned;

/// Parse an RFC 3339 timestamp from a backend row
pub fn parse_timestamp(collection: &str, field: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|error| {
            create_error!(InvalidRecord {
                collection: collection.to_string(),
                reason: format!("`{field}` is not a timestamp ({error}): {value}")
            })
        })
}

/// Parse an optional timestamp, treating null as absent
pub fn parse_optional_timestamp(
    collection: &str,
    field: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|value| parse_timestamp(collection, field, value))
        .transpose()
}

/// Parse an enum column by its serialised name
///
/// Unknown strings are rejected instead of falling back to a default.
pub fn parse_enum<T: DeserializeOwned>(collection: &str, field: &str, value: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).map_err(|_| {
        create_error!(InvalidRecord {
            collection: collection.to_string(),
            reason: format!("unknown `{field}` value `{value}`")
        })
    })
}

/// Convert a count column that must not be negative
pub fn parse_count(collection: &str, field: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        create_error!(InvalidRecord {
            collection: collection.to_string(),
            reason: format!("`{field}` out of range: {value}")
        })
    })
}

#[cfg(test)]
mod tests {
    use clubhub_result::ErrorType;

    use crate::util::rows::*;
    use crate::v0::LocationType;

    #[test]
    fn timestamps_accept_offsets() {
        let at = parse_timestamp("events", "starts_at", "2024-03-01T09:00:00-05:00").unwrap();
        assert_eq!(at.to_rfc3339(), "2024-03-01T14:00:00+00:00");
    }

    #[test]
    fn garbage_is_an_invalid_record() {
        let error = parse_timestamp("events", "starts_at", "next tuesday").unwrap_err();
        assert!(matches!(
            error.error_type,
            ErrorType::InvalidRecord { ref collection, .. } if collection == "events"
        ));

        assert!(parse_enum::<LocationType>("events", "location_type", "moon").is_err());
        assert_eq!(
            parse_enum::<LocationType>("events", "location_type", "on_campus").unwrap(),
            LocationType::OnCampus
        );
        assert!(parse_count("event_requests", "vote_count", -1).is_err());
    }
}
