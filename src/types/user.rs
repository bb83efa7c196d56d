//! Account records returned by follower and following listings

use serde::{Deserialize, Serialize};

use super::serde_helpers::deserialize_flexible_id;

/// One account in a follower or following listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Numeric account id, the key for relationship calls
    #[serde(deserialize_with = "deserialize_flexible_id")]
    pub pk: u64,
    /// Account handle, compared case-sensitively
    pub username: String,
    /// Display name, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl UserRecord {
    /// Create a new user record
    pub fn new(pk: u64, username: impl Into<String>) -> Self {
        Self {
            pk,
            username: username.into(),
            full_name: None,
        }
    }

    /// Set the display name
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_record_from_listing_entry() {
        let entry = json!({
            "pk": "1784932",
            "pk_id": "1784932",
            "username": "carol",
            "full_name": "Carol C",
            "is_private": false
        });

        let user: UserRecord = serde_json::from_value(entry).unwrap();
        assert_eq!(user, UserRecord::new(1784932, "carol").with_full_name("Carol C"));
    }

    #[test]
    fn test_user_record_without_full_name() {
        let user: UserRecord = serde_json::from_value(json!({"pk": 7, "username": "dave"})).unwrap();
        assert_eq!(user.full_name, None);
        assert_eq!(user.pk, 7);
    }
}
