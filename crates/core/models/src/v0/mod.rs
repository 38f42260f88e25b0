mod event_requests;
mod events;
mod filters;
mod majors;
mod sessions;
mod votes;

pub use event_requests::*;
pub use events::*;
pub use filters::*;
pub use majors::*;
pub use sessions::*;
pub use votes::*;
