use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity that owns a food-log row.
///
/// Stored as two mutually exclusive columns (`user_id`, `visitor_id`); this type
/// makes "exactly one is set" a structural property instead of a convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum LogOwner {
    Registered(i64),
    Guest(Uuid),
}

impl LogOwner {
    /// Column values as `(user_id, visitor_id)`
    pub fn columns(self) -> (Option<i64>, Option<String>) {
        match self {
            LogOwner::Registered(user_id) => (Some(user_id), None),
            LogOwner::Guest(visitor_id) => (None, Some(visitor_id.to_string())),
        }
    }

    pub fn new_guest() -> Self {
        LogOwner::Guest(Uuid::new_v4())
    }
}

impl fmt::Display for LogOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogOwner::Registered(id) => write!(f, "user:{id}"),
            LogOwner::Guest(id) => write!(f, "guest:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_are_mutually_exclusive() {
        assert_eq!(LogOwner::Registered(7).columns(), (Some(7), None));

        let guest = LogOwner::new_guest();
        let (user_id, visitor_id) = guest.columns();
        assert!(user_id.is_none());
        assert!(visitor_id.is_some());
    }
}
