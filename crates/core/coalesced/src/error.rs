use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
/// Coalescion service error.
pub enum Error {
    /// The task producing the value went away without sending one
    RecvError,
    /// Reached the `max_concurrent` amount of keys in flight at once
    MaxConcurrent,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RecvError => write!(f, "Unable to receive data from the channel"),
            Error::MaxConcurrent => write!(f, "Max number of tasks running at once"),
        }
    }
}

impl std::error::Error for Error {}
