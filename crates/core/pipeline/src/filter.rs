use chrono::{DateTime, TimeZone, Timelike, Utc};
use clubhub_models::v0::{Event, EventRequest, FilterSpec, TimeOfDay};

/// Hour of `at` on the viewer's clock
pub fn local_hour<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> u32 {
    at.with_timezone(tz).hour()
}

/// Time-of-day bucket an event starts in
pub fn time_of_day<Tz: TimeZone>(event: &Event, tz: &Tz) -> TimeOfDay {
    TimeOfDay::from_hour(local_hour(&event.starts_at, tz))
}

/// Filters the backend can also apply: cancelled, majors, tags, clubs, location
///
/// Used on its own by drivers that emulate the backend, and as the first
/// half of [`filter_events`].
pub fn matches_remote(event: &Event, spec: &FilterSpec) -> bool {
    if spec.hide_cancelled && event.is_cancelled() {
        return false;
    }

    if !spec.majors.is_empty() && !event.targets_any_major(&spec.majors) {
        return false;
    }

    if !spec.tags.is_empty() && !event.tags.iter().any(|tag| spec.tags.contains(tag)) {
        return false;
    }

    if !spec.clubs.is_empty() && !spec.clubs.contains(&event.club_id) {
        return false;
    }

    spec.location_types.is_empty() || spec.location_types.contains(&event.location.kind)
}

/// Case-insensitive substring match over title, description, club name and tags
///
/// `query` must already be lowercased.
pub fn matches_search(event: &Event, query: &str) -> bool {
    event.title.to_lowercase().contains(query)
        || event
            .description
            .as_deref()
            .is_some_and(|description| description.to_lowercase().contains(query))
        || event
            .club_name
            .as_deref()
            .is_some_and(|club| club.to_lowercase().contains(query))
        || event
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(query))
}

/// Filters that only the client applies: time of day and search
pub fn matches_local<Tz: TimeZone>(event: &Event, spec: &FilterSpec, tz: &Tz) -> bool {
    if !spec.time_of_day.is_empty() && !spec.time_of_day.contains(&time_of_day(event, tz)) {
        return false;
    }

    match spec.search_query() {
        Some(query) => matches_search(event, &query),
        None => true,
    }
}

/// Apply every active filter field to a list of events, keeping input order
pub fn filter_events<Tz, I>(events: I, spec: &FilterSpec, tz: &Tz) -> Vec<Event>
where
    Tz: TimeZone,
    I: IntoIterator<Item = Event>,
{
    events
        .into_iter()
        .filter(|event| matches_remote(event, spec) && matches_local(event, spec, tz))
        .collect()
}

/// Whether a request passes the board filters
pub fn matches_request(request: &EventRequest, spec: &FilterSpec) -> bool {
    if spec.hide_cancelled && request.is_deleted() {
        return false;
    }

    if !spec.majors.is_empty() && !request.audience.matches(&spec.majors) {
        return false;
    }

    if !spec.tags.is_empty() && !request.tags.iter().any(|tag| spec.tags.contains(tag)) {
        return false;
    }

    match spec.search_query() {
        Some(query) => {
            request.description.to_lowercase().contains(&query)
                || request
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&query))
        }
        None => true,
    }
}

/// Apply the board filters to a list of requests, keeping input order
pub fn filter_requests<I>(requests: I, spec: &FilterSpec) -> Vec<EventRequest>
where
    I: IntoIterator<Item = EventRequest>,
{
    requests
        .into_iter()
        .filter(|request| matches_request(request, spec))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};
    use clubhub_models::v0::{Audience, EventStatus, FilterSpec, LocationType, TimeOfDay};

    use crate::filter::*;
    use crate::fixtures::{at, event, request};

    fn ids(events: &[clubhub_models::v0::Event]) -> Vec<&str> {
        events.iter().map(|event| event.id.as_str()).collect()
    }

    #[test]
    fn empty_spec_keeps_everything() {
        let events = vec![event("a", at(2024, 3, 1, 9, 0)), event("b", at(2024, 3, 2, 20, 0))];
        let filtered = filter_events(events.clone(), &FilterSpec::default(), &Utc);
        assert_eq!(filtered, events);
    }

    #[test]
    fn majors_pass_all_majors_or_overlap() {
        let mut all = event("all", at(2024, 3, 1, 9, 0));
        all.is_all_majors = true;
        let mut cs = event("cs", at(2024, 3, 1, 10, 0));
        cs.major_ids = vec!["cs".to_string(), "math".to_string()];
        let mut art = event("art", at(2024, 3, 1, 11, 0));
        art.major_ids = vec!["art".to_string()];
        let none = event("none", at(2024, 3, 1, 12, 0));

        let spec = FilterSpec {
            majors: ["math".to_string()].into(),
            ..Default::default()
        };

        let filtered = filter_events(vec![all, cs, art, none], &spec, &Utc);
        assert_eq!(ids(&filtered), vec!["all", "cs"]);
        assert!(filtered
            .iter()
            .all(|event| event.is_all_majors
                || event.major_ids.iter().any(|id| spec.majors.contains(id))));
    }

    #[test]
    fn tags_match_exactly() {
        let mut food = event("food", at(2024, 3, 1, 9, 0));
        food.tags = ["food".to_string()].into();
        let mut foodie = event("foodie", at(2024, 3, 1, 9, 0));
        foodie.tags = ["Food".to_string(), "foodie".to_string()].into();

        let spec = FilterSpec {
            tags: ["food".to_string()].into(),
            ..Default::default()
        };

        assert_eq!(ids(&filter_events(vec![food, foodie], &spec, &Utc)), vec!["food"]);
    }

    #[test]
    fn clubs_and_location_types() {
        let robotics = event("robotics", at(2024, 3, 1, 9, 0));
        let mut chess = event("chess", at(2024, 3, 1, 9, 0));
        chess.club_id = "club-chess".to_string();
        chess.location.kind = LocationType::Online;

        let spec = FilterSpec {
            clubs: ["club-chess".to_string()].into(),
            ..Default::default()
        };
        assert_eq!(
            ids(&filter_events(vec![robotics.clone(), chess.clone()], &spec, &Utc)),
            vec!["chess"]
        );

        let spec = FilterSpec {
            location_types: [LocationType::OnCampus, LocationType::Hybrid].into(),
            ..Default::default()
        };
        assert_eq!(
            ids(&filter_events(vec![robotics, chess], &spec, &Utc)),
            vec!["robotics"]
        );
    }

    #[test]
    fn cancelled_events_stay_unless_hidden() {
        let mut cancelled = event("cancelled", at(2024, 3, 1, 9, 0));
        cancelled.status = EventStatus::Cancelled;
        let live = event("live", at(2024, 3, 1, 10, 0));

        let shown = filter_events(vec![cancelled.clone(), live.clone()], &FilterSpec::default(), &Utc);
        assert_eq!(ids(&shown), vec!["cancelled", "live"]);
        assert!(shown[0].is_cancelled());

        let spec = FilterSpec {
            hide_cancelled: true,
            ..Default::default()
        };
        assert_eq!(ids(&filter_events(vec![cancelled, live], &spec, &Utc)), vec!["live"]);
    }

    #[test]
    fn time_of_day_uses_local_hour() {
        // 15:00 UTC is 07:00 at UTC-8
        let utc_afternoon = event("a", at(2024, 3, 1, 15, 0));
        let pacific = FixedOffset::west_opt(8 * 3600).unwrap();

        let spec = FilterSpec {
            time_of_day: [TimeOfDay::Morning].into(),
            ..Default::default()
        };

        assert!(filter_events(vec![utc_afternoon.clone()], &spec, &Utc).is_empty());
        assert_eq!(filter_events(vec![utc_afternoon], &spec, &pacific).len(), 1);
    }

    #[test]
    fn search_is_case_insensitive_over_text_fields() {
        let mut by_title = event("title", at(2024, 3, 1, 9, 0));
        by_title.title = "Intro to ROS".to_string();
        let mut by_description = event("description", at(2024, 3, 1, 9, 0));
        by_description.description = Some("Bring your ros2 laptop".to_string());
        let mut by_tag = event("tag", at(2024, 3, 1, 9, 0));
        by_tag.tags = ["ROS".to_string()].into();
        let mut by_club = event("club", at(2024, 3, 1, 9, 0));
        by_club.club_name = Some("Rosewood Society".to_string());
        let mut miss = event("miss", at(2024, 3, 1, 9, 0));
        miss.club_name = None;

        let spec = FilterSpec {
            search: "  Ros ".to_string(),
            ..Default::default()
        };

        assert_eq!(
            ids(&filter_events(
                vec![by_title, by_description, by_tag, by_club, miss],
                &spec,
                &Utc
            )),
            vec!["title", "description", "tag", "club"]
        );
    }

    #[test]
    fn requests_filter_by_major_audience() {
        let all = request("all", 1, at(2024, 3, 1, 9, 0));
        let mut cs = request("cs", 1, at(2024, 3, 1, 9, 0));
        cs.audience = Audience::Major {
            major_id: "cs".to_string(),
        };
        let mut art = request("art", 1, at(2024, 3, 1, 9, 0));
        art.audience = Audience::Major {
            major_id: "art".to_string(),
        };

        let spec = FilterSpec {
            majors: ["cs".to_string()].into(),
            ..Default::default()
        };

        let filtered = filter_requests(vec![all, cs, art], &spec);
        let ids: Vec<&str> = filtered.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["all", "cs"]);
        assert!(filtered
            .iter()
            .all(|request| request.audience.is_all_majors()
                || request
                    .audience
                    .major_id()
                    .is_some_and(|id| spec.majors.contains(id))));
    }

    #[test]
    fn requests_search_and_deleted() {
        let mut pizza = request("pizza", 1, at(2024, 3, 1, 9, 0));
        pizza.description = "Pizza social".to_string();
        let mut tagged = request("tagged", 1, at(2024, 3, 1, 9, 0));
        tagged.tags = ["pizza-night".to_string()].into();
        let mut deleted = request("deleted", 1, at(2024, 3, 1, 9, 0));
        deleted.description = "Pizza again".to_string();
        deleted.deleted_at = Some(at(2024, 3, 2, 9, 0));

        let spec = FilterSpec {
            search: "PIZZA".to_string(),
            ..Default::default()
        };
        assert_eq!(
            filter_requests(vec![pizza.clone(), tagged.clone(), deleted.clone()], &spec).len(),
            3
        );

        let spec = FilterSpec {
            hide_cancelled: true,
            ..spec
        };
        assert_eq!(filter_requests(vec![pizza, tagged, deleted], &spec).len(), 2);
    }
}
