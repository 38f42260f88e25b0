//! Pure transformations from fetched records to what a view renders.
//!
//! Everything here is generic over a [`chrono::TimeZone`] so day boundaries
//! and time-of-day buckets follow the viewer's local clock.
pub mod filter;
pub mod group;
pub mod range;
pub mod sort;
pub mod summary;

pub use filter::*;
pub use group::*;
pub use range::*;
pub use sort::*;
pub use summary::*;

#[cfg(test)]
pub(crate) mod fixtures;
