//! Shares one execution of an async task between every caller asking for the
//! same key while it is in flight.
mod config;
mod error;
mod service;

pub use config::CoalescionServiceConfig;
pub use error::Error;
pub use service::CoalescionService;
