use std::fmt::Write;

use chrono::FixedOffset;
use clubhub_models::v0::{EventRequest, RequestSort};
use clubhub_pipeline::{format_event_time, BoardCounts, DateRange, DayBucket};

/// Agenda text, one heading per day
pub fn days(range: &DateRange, days: &[DayBucket], tz: &FixedOffset) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Events {} to {}",
        range.start.with_timezone(tz).date_naive(),
        range.end.with_timezone(tz).date_naive()
    );

    if days.is_empty() {
        let _ = writeln!(out, "\nNo events match your filters.");
        return out;
    }

    for day in days {
        let _ = writeln!(out, "\n{}", day.date.format("%A, %B %-d"));

        for event in &day.events {
            let _ = write!(out, "  {:<20} {}", format_event_time(event, tz), event.title);

            if let Some(club) = &event.club_name {
                let _ = write!(out, " ({club})");
            }

            if event.is_cancelled() {
                let _ = write!(out, " [cancelled]");
            }

            if !event.tags.is_empty() {
                let tags: Vec<&str> = event.tags.iter().map(String::as_str).collect();
                let _ = write!(out, " #{}", tags.join(" #"));
            }

            let _ = writeln!(out);
        }
    }

    out
}

/// Board text, one line per request
pub fn board(sort: RequestSort, counts: &BoardCounts, requests: &[EventRequest]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} open, {} fulfilled, sorted by {}",
        counts.open,
        counts.fulfilled,
        sort.label().to_lowercase()
    );

    if requests.is_empty() {
        let _ = writeln!(out, "\nNo requests match your filters.");
        return out;
    }

    let _ = writeln!(out);
    for request in requests {
        let _ = write!(out, "{:>4}  {}", request.vote_count, request.description);

        if request.is_fulfilled() {
            let _ = write!(out, " [fulfilled]");
        } else if request.is_deleted() {
            let _ = write!(out, " [deleted]");
        }

        let _ = writeln!(out);
    }

    out
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use clubhub_models::v0::{
        Audience, Event, EventRequest, EventStatus, Location, LocationType, RequestSort,
        RequestStatus, Visibility,
    };
    use clubhub_pipeline::{BoardCounts, DateRange, DayBucket};

    fn utc() -> chrono::FixedOffset {
        chrono::FixedOffset::east_opt(0).unwrap()
    }

    fn event() -> Event {
        let starts_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        Event {
            id: "robot-demo".to_string(),
            club_id: "club-robotics".to_string(),
            club_name: Some("Robotics Club".to_string()),
            title: "Robot demo".to_string(),
            description: None,
            starts_at,
            ends_at: None,
            location: Location {
                kind: LocationType::OnCampus,
                name: None,
                address: None,
                url: None,
            },
            visibility: Visibility::Public,
            status: EventStatus::Cancelled,
            is_all_majors: true,
            major_ids: vec![],
            tags: ["demo".to_string()].into(),
            capacity: None,
            requires_rsvp: false,
            rsvp_url: None,
            is_featured: false,
            created_at: starts_at,
            updated_at: starts_at,
        }
    }

    #[test]
    fn days_list_events_under_their_date() {
        let range = DateRange {
            start: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 59).unwrap(),
        };
        let days = vec![DayBucket {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            events: vec![event()],
        }];

        let text = super::days(&range, &days, &utc());
        assert!(text.starts_with("Events 2024-03-01 to 2024-03-07"));
        assert!(text.contains("Friday, March 1"));
        assert!(text.contains("9:00 AM"));
        assert!(text.contains("Robot demo (Robotics Club) [cancelled] #demo"));
    }

    #[test]
    fn board_lists_votes_and_status() {
        let request = EventRequest {
            id: "sketch".to_string(),
            description: "Sketch night".to_string(),
            audience: Audience::AllMajors,
            tags: Default::default(),
            status: RequestStatus::Fulfilled,
            fulfilled_event_id: None,
            created_by: "carol".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 20, 9, 0, 0).unwrap(),
            vote_count: 12,
            deleted_at: None,
            deleted_by: None,
            delete_reason: None,
        };

        let text = super::board(
            RequestSort::MostUpvoted,
            &BoardCounts {
                open: 0,
                fulfilled: 1,
            },
            &[request],
        );

        assert!(text.starts_with("0 open, 1 fulfilled, sorted by most upvoted"));
        assert!(text.contains("  12  Sketch night [fulfilled]"));
    }
}
