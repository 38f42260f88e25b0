auto_derived!(
    /// Authenticated session for the current viewer
    pub struct Session {
        /// Id of the signed-in user
        pub user_id: String,
        /// Bearer token sent with mutating calls
        pub access_token: String,
    }
);
