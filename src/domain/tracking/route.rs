//! GPS route entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_label, TrackingValidationError};
use crate::domain::storage::Record;

/// A named GPS track owned by one user; its coordinates live in `points`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Route {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn validate(&self) -> Result<(), TrackingValidationError> {
        validate_label("name", &self.name)
    }
}

impl Record for Route {
    const TABLE: &'static str = "routes";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_route() {
        let route = Route::new("user-1", "Alpine loop");
        assert_eq!(route.name, "Alpine loop");
        assert!(route.is_owned_by("user-1"));
        assert!(route.validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let route = Route::new("user-1", "");
        assert_eq!(
            route.validate(),
            Err(TrackingValidationError::Empty("name"))
        );
    }
}
