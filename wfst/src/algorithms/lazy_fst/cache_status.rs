/// Lazily computed value: either already materialized or still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus<T> {
    Computed(T),
    NotComputed,
}

impl<T> CacheStatus<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            CacheStatus::Computed(v) => Some(v),
            CacheStatus::NotComputed => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, CacheStatus::Computed(_))
    }
}
