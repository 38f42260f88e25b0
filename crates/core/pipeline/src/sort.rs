use std::cmp::Ordering;

use clubhub_models::v0::{Event, EventRequest, RequestSort};

/// Sort events by start time, ascending
///
/// Events starting at the same instant keep their input order.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by_key(|event| event.starts_at);
}

/// Ordering of two requests under a board sort mode
pub fn compare_requests(mode: RequestSort, a: &EventRequest, b: &EventRequest) -> Ordering {
    let most_votes = b.vote_count.cmp(&a.vote_count);
    let newest = b.created_at.cmp(&a.created_at);

    match mode {
        RequestSort::MostUpvoted => most_votes.then(newest),
        RequestSort::Newest => newest,
        RequestSort::FulfilledFirst => b
            .is_fulfilled()
            .cmp(&a.is_fulfilled())
            .then(most_votes)
            .then(newest),
    }
}

/// Sort requests for the board
pub fn sort_requests(requests: &mut [EventRequest], mode: RequestSort) {
    requests.sort_by(|a, b| compare_requests(mode, a, b));
}

#[cfg(test)]
mod tests {
    use clubhub_models::v0::{RequestSort, RequestStatus};

    use crate::fixtures::{at, event, request};
    use crate::sort::*;

    #[test]
    fn events_ascend_by_start() {
        let mut events = vec![
            event("late", at(2024, 3, 1, 14, 0)),
            event("early", at(2024, 3, 1, 9, 0)),
            event("tied", at(2024, 3, 1, 14, 0)),
        ];
        sort_events(&mut events);

        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late", "tied"]);
    }

    #[test]
    fn equal_votes_put_newest_first() {
        let t1 = at(2024, 3, 1, 9, 0);
        let t2 = at(2024, 3, 2, 9, 0);
        let mut requests = vec![request("t1", 5, t1), request("t2", 5, t2)];

        sort_requests(&mut requests, RequestSort::MostUpvoted);
        assert_eq!(requests[0].id, "t2");
        assert_eq!(requests[1].id, "t1");
    }

    #[test]
    fn most_upvoted_is_non_increasing() {
        let mut requests: Vec<_> = [(3, 1), (9, 2), (3, 5), (0, 4), (9, 3), (1, 1)]
            .into_iter()
            .enumerate()
            .map(|(i, (votes, day))| request(&i.to_string(), votes, at(2024, 3, day, 12, 0)))
            .collect();

        sort_requests(&mut requests, RequestSort::MostUpvoted);

        for pair in requests.windows(2) {
            assert!(pair[0].vote_count >= pair[1].vote_count);
            if pair[0].vote_count == pair[1].vote_count {
                assert!(pair[0].created_at >= pair[1].created_at);
            }
        }
    }

    #[test]
    fn newest_ignores_votes() {
        let mut requests = vec![
            request("old", 50, at(2024, 1, 1, 0, 0)),
            request("new", 0, at(2024, 2, 1, 0, 0)),
        ];
        sort_requests(&mut requests, RequestSort::Newest);
        assert_eq!(requests[0].id, "new");
    }

    #[test]
    fn fulfilled_first_then_votes() {
        let mut fulfilled = request("fulfilled", 1, at(2024, 1, 1, 0, 0));
        fulfilled.status = RequestStatus::Fulfilled;
        let mut requests = vec![
            request("low", 2, at(2024, 1, 1, 0, 0)),
            request("high", 8, at(2024, 1, 1, 0, 0)),
            fulfilled,
        ];

        sort_requests(&mut requests, RequestSort::FulfilledFirst);

        let ids: Vec<&str> = requests.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["fulfilled", "high", "low"]);
    }
}
