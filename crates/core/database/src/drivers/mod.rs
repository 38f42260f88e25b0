#[cfg(feature = "remote")]
mod remote;
mod reference;

use clubhub_config::config;

#[cfg(feature = "remote")]
pub use self::remote::*;
pub use self::reference::*;

/// Database information to use to create a client
pub enum DatabaseInfo {
    /// Auto-detect the database in use
    Auto,
    /// Use the in-memory reference database
    Reference,
    /// Connect to the hosted backend
    #[cfg(feature = "remote")]
    Remote { url: String, anon_key: String },
}

/// Database
#[derive(Clone)]
pub enum Database {
    /// In-memory reference database
    Reference(ReferenceDb),
    /// Hosted backend over HTTPS
    #[cfg(feature = "remote")]
    Remote(RemoteDb),
}

impl DatabaseInfo {
    /// Create a database client from the given database information
    #[async_recursion]
    pub async fn connect(self) -> Result<Database, String> {
        match self {
            DatabaseInfo::Auto => {
                let config = config().await;

                if config.database.url.is_empty() {
                    info!("No backend URL configured, using the reference database.");
                    DatabaseInfo::Reference.connect().await
                } else {
                    #[cfg(feature = "remote")]
                    return DatabaseInfo::Remote {
                        url: config.database.url,
                        anon_key: config.database.anon_key,
                    }
                    .connect()
                    .await;

                    #[cfg(not(feature = "remote"))]
                    return Err("Remote driver not enabled.".to_string());
                }
            }
            DatabaseInfo::Reference => Ok(Database::Reference(Default::default())),
            #[cfg(feature = "remote")]
            DatabaseInfo::Remote { url, anon_key } => {
                let config = config().await;
                let db = RemoteDb::new(&url, &anon_key, &config.remote)
                    .map_err(|error| format!("Failed to init backend client: {error}"))?;

                Ok(Database::Remote(db))
            }
        }
    }
}

impl Database {
    /// Reference database, if this is one
    pub fn as_reference(&self) -> Option<&ReferenceDb> {
        match self {
            Database::Reference(db) => Some(db),
            #[cfg(feature = "remote")]
            _ => None,
        }
    }
}
