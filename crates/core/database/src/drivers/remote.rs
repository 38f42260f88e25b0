use std::sync::Arc;

use clubhub_config::Remote;
use clubhub_result::{Error, ErrorType, Result};
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use crate::v0::Session;

/// Error body returned by the backend on failure
#[derive(Deserialize, Debug, Default)]
struct BackendError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Whether a call may be repeated after a transient failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    /// Idempotent read, retried with backoff
    Read,
    /// Mutation, sent exactly once
    Write,
}

/// Postgres error for a relation that does not exist
const UNDEFINED_TABLE: &str = "42P01";

database_derived!(
    /// Hosted backend reached over HTTPS
    pub struct RemoteDb {
        client: Client,
        base_url: Arc<str>,
        anon_key: Arc<str>,
        settings: Arc<Remote>,
        session: Arc<RwLock<Option<Session>>>,
    }
);

impl RemoteDb {
    /// Build a client with explicit timeouts from `settings`
    pub fn new(url: &str, anon_key: &str, settings: &Remote) -> reqwest::Result<RemoteDb> {
        let client = Client::builder()
            .user_agent(concat!("ClubHub/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout())
            .connect_timeout(settings.connect_timeout())
            .build()?;

        Ok(RemoteDb {
            client,
            base_url: Arc::from(url.trim_end_matches('/')),
            anon_key: Arc::from(anon_key),
            settings: Arc::new(settings.clone()),
            session: Default::default(),
        })
    }

    /// Replace the stored session, `None` signs out
    pub async fn set_session(&self, session: Option<Session>) {
        *self.session.write().await = session;
    }

    pub(crate) async fn stored_session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str, session: Option<&Session>) -> RequestBuilder {
        let token = session
            .map(|session| session.access_token.as_str())
            .unwrap_or(&*self.anon_key);

        self.client
            .request(method, self.url(path))
            .header("apikey", &*self.anon_key)
            .bearer_auth(token)
    }

    /// Send a request, turning transport and status failures into errors
    async fn send_once(
        &self,
        builder: RequestBuilder,
        operation: &str,
        collection: &str,
    ) -> Result<Response> {
        let response = builder.send().await.map_err(|error| {
            create_error!(NetworkError {
                reason: error.to_string()
            })
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: BackendError = response.json().await.unwrap_or_default();
        Err(classify(status, body, operation, collection))
    }

    /// Send a request built by `build`, retrying reads per the configured policy
    pub(crate) async fn send<F>(
        &self,
        call: Call,
        operation: &str,
        collection: &str,
        build: F,
    ) -> Result<Response>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        let retries = match call {
            Call::Read => self.settings.max_retries,
            Call::Write => 0,
        };

        let mut attempt = 0;
        loop {
            match self.send_once(build(), operation, collection).await {
                Err(error) if attempt < retries && should_retry(&error) => {
                    attempt += 1;
                    let delay = self.settings.backoff(attempt);
                    warn!(
                        "{operation} on {collection} failed ({error}), retry {attempt}/{retries} in {delay:?}"
                    );
                    tokio::time::sleep(delay).await;
                }
                result => return result,
            }
        }
    }

    async fn decode<T: DeserializeOwned>(
        response: Response,
        operation: &str,
        collection: &str,
    ) -> Result<T> {
        response.json().await.map_err(|error| {
            error!("Failed to decode {operation} on {collection}: {error}");
            create_error!(InvalidRecord {
                collection: collection.to_string(),
                reason: error.to_string()
            })
        })
    }

    /// Call a stored procedure and decode its result
    pub(crate) async fn rpc<B, T>(
        &self,
        call: Call,
        name: &str,
        body: &B,
        session: Option<&Session>,
    ) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let path = format!("rest/v1/rpc/{name}");
        let response = self
            .send(call, "rpc", name, || {
                self.request(Method::POST, &path, session).json(body)
            })
            .await?;

        RemoteDb::decode(response, "rpc", name).await
    }

    /// Call a stored procedure that returns nothing
    pub(crate) async fn rpc_void<B>(&self, name: &str, body: &B, session: &Session) -> Result<()>
    where
        B: Serialize + Sync,
    {
        let path = format!("rest/v1/rpc/{name}");
        self.send(Call::Write, "rpc", name, || {
            self.request(Method::POST, &path, Some(session)).json(body)
        })
        .await
        .map(|_| ())
    }

    /// Read rows from a table or view
    ///
    /// A missing relation reads as empty so a backend without the board
    /// migrations still renders.
    pub(crate) async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
        session: Option<&Session>,
    ) -> Result<Vec<T>> {
        let path = format!("rest/v1/{table}");
        let response = self
            .send(Call::Read, "select", table, || {
                self.request(Method::GET, &path, session).query(query)
            })
            .await;

        match response {
            Ok(response) => RemoteDb::decode(response, "select", table).await,
            Err(Error {
                error_type: ErrorType::MissingCollection { .. },
                ..
            }) => {
                warn!("{table} does not exist on the backend, treating as empty");
                Ok(vec![])
            }
            Err(error) => Err(error),
        }
    }

    /// Insert a row, ignoring one that already exists
    pub(crate) async fn insert_ignoring_duplicates<B>(
        &self,
        table: &str,
        body: &B,
        session: &Session,
    ) -> Result<()>
    where
        B: Serialize + Sync,
    {
        let path = format!("rest/v1/{table}");
        self.send(Call::Write, "insert", table, || {
            self.request(Method::POST, &path, Some(session))
                .header("Prefer", "resolution=ignore-duplicates,return=minimal")
                .json(body)
        })
        .await
        .map(|_| ())
    }

    /// Delete the rows matching `query`
    pub(crate) async fn delete_rows(
        &self,
        table: &str,
        query: &[(&str, String)],
        session: &Session,
    ) -> Result<()> {
        let path = format!("rest/v1/{table}");
        self.send(Call::Write, "delete", table, || {
            self.request(Method::DELETE, &path, Some(session))
                .header("Prefer", "return=minimal")
                .query(query)
        })
        .await
        .map(|_| ())
    }

    /// Look up the user behind an access token
    pub(crate) async fn fetch_user_id(&self, session: &Session) -> Result<String> {
        #[derive(Deserialize)]
        struct AuthUser {
            id: String,
        }

        let response = self
            .send(Call::Read, "fetch", "user", || {
                self.request(Method::GET, "auth/v1/user", Some(session))
                    .header(header::ACCEPT, "application/json")
            })
            .await?;

        let user: AuthUser = RemoteDb::decode(response, "fetch", "user").await?;
        Ok(user.id)
    }
}

/// Whether an error means the session is missing, expired or rejected
fn is_auth_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("must be authenticated")
        || message.contains("not authenticated")
        || message.contains("authentication")
        || message.contains("jwt")
}

fn classify(status: StatusCode, body: BackendError, operation: &str, collection: &str) -> Error {
    let message = body.message.unwrap_or_default();

    if status == StatusCode::UNAUTHORIZED
        || status == StatusCode::FORBIDDEN
        || is_auth_message(&message)
    {
        return create_error!(NotAuthenticated);
    }

    if body.code.as_deref() == Some(UNDEFINED_TABLE) || message.contains("does not exist") {
        return create_error!(MissingCollection {
            collection: collection.to_string()
        });
    }

    if status == StatusCode::NOT_FOUND {
        return create_error!(NotFound);
    }

    error!("{operation} on {collection} failed with {status}: {message}");
    if status.is_server_error() {
        create_database_error!(operation, collection)
    } else {
        create_error!(InvalidRecord {
            collection: collection.to_string(),
            reason: format!("{status}: {message}")
        })
    }
}

/// Transport failures and server errors may clear up on their own
fn should_retry(error: &Error) -> bool {
    matches!(
        error.error_type,
        ErrorType::NetworkError { .. } | ErrorType::DatabaseError { .. }
    )
}
