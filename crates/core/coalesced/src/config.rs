#[derive(Clone, PartialEq, Eq, Debug)]
/// Config values for [`CoalescionService`](crate::CoalescionService).
pub struct CoalescionServiceConfig {
    /// How many distinct keys may be in flight at once
    pub max_concurrent: Option<usize>,
}

impl Default for CoalescionServiceConfig {
    fn default() -> Self {
        Self {
            max_concurrent: Some(100),
        }
    }
}
