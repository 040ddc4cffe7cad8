//! Verified token claims

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claim set of a verified token, exactly as it appeared in the payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// Get a single claim by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Subject claim, used as the user identifier
    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// Expiration timestamp (Unix epoch seconds)
    pub fn expires_at(&self) -> Option<i64> {
        self.get("exp").and_then(Value::as_i64)
    }

    /// Email claim, when the identity provider includes one
    pub fn email(&self) -> Option<&str> {
        self.get("email").and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(claims: Map<String, Value>) -> Self {
        Self(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Claims {
        let value = json!({
            "sub": "8b1f6c2e-1111-4c3a-9d55-0a6f1e2b3c4d",
            "email": "rider@example.com",
            "exp": 1_900_000_000_i64,
            "role": "authenticated",
            "app_metadata": { "provider": "email" }
        });

        match value {
            Value::Object(map) => Claims::new(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_accessors() {
        let claims = sample();
        assert_eq!(
            claims.subject(),
            Some("8b1f6c2e-1111-4c3a-9d55-0a6f1e2b3c4d")
        );
        assert_eq!(claims.email(), Some("rider@example.com"));
        assert_eq!(claims.expires_at(), Some(1_900_000_000));
        assert_eq!(claims.len(), 5);
    }

    #[test]
    fn test_missing_subject() {
        let claims = Claims::default();
        assert!(claims.subject().is_none());
        assert!(claims.is_empty());
    }

    #[test]
    fn test_serializes_transparently() {
        let claims = sample();
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["role"], "authenticated");
        assert_eq!(json["app_metadata"]["provider"], "email");
    }
}
