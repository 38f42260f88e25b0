mod events;
mod requests;
mod store;

pub use events::*;
pub use requests::*;
