use std::time::Duration;

use cached::proc_macro::cached;
use config::{Config, Environment, File, FileFormat};
use futures_locks::RwLock;
use once_cell::sync::Lazy;
use serde::Deserialize;

#[cfg(feature = "report-macros")]
pub use dotenv;
#[cfg(feature = "report-macros")]
pub use pretty_env_logger;

static DEFAULTS: &str = include_str!("../ClubHub.toml");

static CONFIG_BUILDER: Lazy<RwLock<Config>> = Lazy::new(|| {
    RwLock::new({
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULTS, FileFormat::Toml));

        if std::path::Path::new("ClubHub.toml").exists() {
            builder = builder.add_source(File::new("ClubHub.toml", FileFormat::Toml));
        }

        builder
            .add_source(
                Environment::with_prefix("CLUBHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .expect("configuration sources should be valid TOML")
    })
});

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Database {
    /// Base URL of the hosted backend, empty for the reference driver
    pub url: String,
    /// Public (anonymous) API key sent with every request
    pub anon_key: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Cache {
    pub events_stale_secs: u64,
    pub requests_stale_secs: u64,
    pub gc_secs: u64,
    pub capacity: usize,
    pub max_concurrent: usize,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    pub utc_offset_minutes: i32,
    pub list_days: i64,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database: Database,
    pub remote: Remote,
    pub cache: Cache,
    pub calendar: Calendar,
}

impl Remote {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Delay before the given retry attempt (1-based), doubling each time
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(
            self.retry_backoff_ms
                .saturating_mul(1u64 << attempt.saturating_sub(1).min(16)),
        )
    }
}

impl Cache {
    pub fn events_stale(&self) -> Duration {
        Duration::from_secs(self.events_stale_secs)
    }

    pub fn requests_stale(&self) -> Duration {
        Duration::from_secs(self.requests_stale_secs)
    }

    pub fn gc(&self) -> Duration {
        Duration::from_secs(self.gc_secs)
    }
}

impl Settings {
    /// Settings built from the embedded defaults only
    pub fn defaults() -> Settings {
        Config::builder()
            .add_source(File::from_str(DEFAULTS, FileFormat::Toml))
            .build()
            .and_then(|config| config.try_deserialize::<Settings>())
            .expect("embedded defaults should deserialise")
    }
}

pub async fn init() {
    log::info!(":: ClubHub Configuration ::\n{:?}", config().await);
}

pub async fn read() -> Config {
    CONFIG_BUILDER.read().await.clone()
}

#[cached(time = 30)]
pub async fn config() -> Settings {
    read()
        .await
        .try_deserialize::<Settings>()
        .expect("configuration should match the settings schema")
}

/// Configure logging and common environment variables
#[cfg(feature = "report-macros")]
pub fn setup_logging() {
    dotenv::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    pretty_env_logger::init();
}

#[cfg(feature = "report-macros")]
#[macro_export]
macro_rules! configure {
    () => {
        $crate::setup_logging();
        $crate::init().await;
    };
}
