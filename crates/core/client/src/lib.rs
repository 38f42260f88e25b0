//! Cached data feeds and board actions shared by every ClubHub front-end.
#[macro_use]
extern crate log;

#[macro_use]
extern crate clubhub_result;

mod board;
mod feed;
mod notice;
mod vote;

pub use board::*;
pub use feed::*;
pub use notice::*;
pub use vote::*;

use chrono::{FixedOffset, Offset, Utc};
use clubhub_config::Calendar;

/// Viewer's clock offset, falling back to UTC when out of range
pub fn local_offset(calendar: &Calendar) -> FixedOffset {
    FixedOffset::east_opt(calendar.utc_offset_minutes.saturating_mul(60))
        .unwrap_or_else(|| Utc.fix())
}
