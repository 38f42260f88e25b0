use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clubhub_result::Result;
use futures::lock::Mutex;

use crate::v0::{Event, EventRequest, Major, Session, Vote};

/// Failure the reference database should produce on its next calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Transport failure, as if the backend were unreachable
    Network,
    /// Session rejected by the backend
    Auth,
}

/// Injected failure, optionally limited to one operation
#[derive(Debug, Clone)]
struct FaultRule {
    operation: Option<String>,
    fault: Fault,
    remaining: usize,
}

database_derived!(
    /// Reference implementation
    #[derive(Default)]
    pub struct ReferenceDb {
        pub events: Arc<Mutex<HashMap<String, Event>>>,
        pub event_requests: Arc<Mutex<HashMap<String, EventRequest>>>,
        pub votes: Arc<Mutex<HashMap<(String, String), Vote>>>,
        pub majors: Arc<Mutex<HashMap<String, Major>>>,
        pub club_majors: Arc<Mutex<HashMap<String, BTreeSet<String>>>>,
        pub session: Arc<Mutex<Option<Session>>>,

        faults: Arc<Mutex<Vec<FaultRule>>>,
        queries: Arc<AtomicUsize>,
        latency_ms: Arc<AtomicU64>,
    }
);

impl ReferenceDb {
    /// Account for one backend call, applying latency and injected faults
    pub(crate) async fn enter(&self, operation: &str) -> Result<()> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        let fault = {
            let mut faults = self.faults.lock().await;
            let position = faults.iter().position(|rule| {
                rule.operation
                    .as_deref()
                    .map_or(true, |target| target == operation)
            });

            position.map(|index| {
                let rule = &mut faults[index];
                rule.remaining -= 1;
                let fault = rule.fault;
                if rule.remaining == 0 {
                    faults.remove(index);
                }
                fault
            })
        };

        match fault {
            Some(Fault::Network) => {
                debug!("Injected network fault on {operation}");
                Err(create_error!(NetworkError {
                    reason: format!("injected fault on {operation}")
                }))
            }
            Some(Fault::Auth) => {
                debug!("Injected auth fault on {operation}");
                Err(create_error!(NotAuthenticated))
            }
            None => Ok(()),
        }
    }

    /// Check that `session` is the one currently signed in
    pub(crate) async fn authorise(&self, session: &Session) -> Result<()> {
        match &*self.session.lock().await {
            Some(current) if current == session => Ok(()),
            _ => Err(create_error!(NotAuthenticated)),
        }
    }

    /// Make the next `times` calls fail with `fault`
    pub async fn fail_next(&self, fault: Fault, times: usize) {
        if times > 0 {
            self.faults.lock().await.push(FaultRule {
                operation: None,
                fault,
                remaining: times,
            });
        }
    }

    /// Make the next call to `operation` fail with `fault`
    pub async fn fail_operation(&self, operation: &str, fault: Fault) {
        self.faults.lock().await.push(FaultRule {
            operation: Some(operation.to_string()),
            fault,
            remaining: 1,
        });
    }

    /// Delay every call by `latency`
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Number of calls made so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Sign in as `user_id`, returning the new session
    pub async fn sign_in(&self, user_id: &str) -> Session {
        let session = Session {
            user_id: user_id.to_string(),
            access_token: ulid::Ulid::new().to_string(),
        };

        *self.session.lock().await = Some(session.clone());
        session
    }

    /// Drop the current session, outstanding tokens stop working
    pub async fn sign_out(&self) {
        *self.session.lock().await = None;
    }

    pub async fn seed_events<I: IntoIterator<Item = Event>>(&self, events: I) {
        let mut map = self.events.lock().await;
        for event in events {
            map.insert(event.id.clone(), event);
        }
    }

    pub async fn seed_event_requests<I: IntoIterator<Item = EventRequest>>(&self, requests: I) {
        let mut map = self.event_requests.lock().await;
        for request in requests {
            map.insert(request.id.clone(), request);
        }
    }

    pub async fn seed_majors<I: IntoIterator<Item = Major>>(&self, majors: I) {
        let mut map = self.majors.lock().await;
        for major in majors {
            map.insert(major.id.clone(), major);
        }
    }

    pub async fn seed_club_majors<I>(&self, club_id: &str, majors: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.club_majors
            .lock()
            .await
            .entry(club_id.to_string())
            .or_default()
            .extend(majors);
    }

    /// Add votes from other users so a request starts with `count` votes
    pub async fn seed_votes(&self, request_id: &str, count: usize) {
        let mut votes = self.votes.lock().await;
        for index in 0..count {
            let user_id = format!("seed-{index}");
            votes.insert(
                (request_id.to_string(), user_id.clone()),
                Vote {
                    request_id: request_id.to_string(),
                    user_id,
                    created_at: chrono::Utc::now(),
                },
            );
        }
    }
}
