mod event_requests;
mod events;
mod majors;
mod sessions;
mod votes;

pub use event_requests::*;
pub use events::*;
pub use majors::*;
pub use sessions::*;
pub use votes::*;

use crate::{Database, ReferenceDb};

#[cfg(feature = "remote")]
use crate::RemoteDb;

pub trait AbstractDatabase:
    Sync
    + Send
    + event_requests::AbstractEventRequests
    + events::AbstractEvents
    + majors::AbstractMajors
    + sessions::AbstractSessions
    + votes::AbstractVotes
{
}

impl AbstractDatabase for ReferenceDb {}

#[cfg(feature = "remote")]
impl AbstractDatabase for RemoteDb {}

impl std::ops::Deref for Database {
    type Target = dyn AbstractDatabase;

    fn deref(&self) -> &Self::Target {
        match &self {
            Database::Reference(dummy) => dummy,
            #[cfg(feature = "remote")]
            Database::Remote(remote) => remote,
        }
    }
}
