auto_derived!(
    /// Academic major
    pub struct Major {
        /// Major Id
        pub id: String,
        /// Display name
        pub name: String,
    }
);
