use chrono::{DateTime, Utc};

auto_derived!(
    /// Upvote on an event request
    ///
    /// Its existence means the user upvoted; there is at most one per
    /// (request, user) pair.
    pub struct Vote {
        /// Request Id
        pub request_id: String,
        /// Id of the voting user
        pub user_id: String,
        /// When the vote was cast
        pub created_at: DateTime<Utc>,
    }
);
