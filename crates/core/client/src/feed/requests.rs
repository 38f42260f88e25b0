use std::sync::Arc;

use clubhub_coalesced::{CoalescionService, CoalescionServiceConfig};
use clubhub_config::Cache;
use clubhub_database::Database;
use clubhub_models::v0::EventRequest;
use clubhub_result::Result;

use super::store::Store;

type RequestList = Arc<Vec<EventRequest>>;

/// The board has a single listing, shared by every filter and sort
const BOARD: &str = "board";

/// Event request board listing, cached under a single key
#[derive(Clone)]
pub struct RequestFeed {
    database: Database,
    coalescion: CoalescionService<(u64, &'static str), Result<RequestList>>,
    store: Store<&'static str, Vec<EventRequest>>,
}

impl RequestFeed {
    pub fn new(database: Database, cache: &Cache) -> RequestFeed {
        RequestFeed {
            database,
            coalescion: CoalescionService::from_config(CoalescionServiceConfig {
                max_concurrent: Some(cache.max_concurrent),
            }),
            store: Store::new(cache.requests_stale(), cache.gc(), 1),
        }
    }

    /// Every live request with its vote count, newest first
    pub async fn requests(&self) -> Result<RequestList> {
        if let Some(requests) = self.store.fresh(&BOARD).await {
            debug!("Board cache hit");
            return Ok(requests);
        }

        debug!("Board cache miss");
        let generation = self.store.generation();
        let result = self
            .coalescion
            .execute((generation, BOARD), || {
                let database = self.database.clone();
                let store = self.store.clone();

                async move {
                    let requests = Arc::new(database.fetch_event_requests().await?);
                    if !store.insert(generation, BOARD, requests.clone()).await {
                        debug!("Dropped board fetched before an invalidation");
                    }
                    Ok(requests)
                }
            })
            .await
            .map_err(|error| {
                warn!("Could not schedule board fetch: {error:?}");
                create_error!(InternalError)
            })?;

        (*result).clone()
    }

    /// Drop the cached listing, the next read refetches
    pub async fn invalidate(&self) {
        self.store.clear().await;
    }
}
