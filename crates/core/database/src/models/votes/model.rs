auto_derived!(
    /// Row of the `event_request_votes` table
    pub struct VoteRow {
        pub request_id: String,
        pub user_id: String,
    }
);
