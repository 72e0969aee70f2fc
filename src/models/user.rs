use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Identified;

/// A user profile as stored in the `users` collection, without its id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

pub type User = Identified<UserData>;

impl UserData {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_dob(mut self, dob: impl Into<String>) -> Self {
        self.dob = dob.into();
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = gender.into();
        self
    }

    pub fn with_picture(mut self, url: impl Into<String>) -> Self {
        self.picture = Some(url.into());
        self
    }

    pub fn with_timestamps(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self.updated_at = Some(at);
        self
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let user = &self.data;
        writeln!(f, "{} <{}>", user.name, user.email)?;
        writeln!(f, "ID: {}", self.id)?;
        if !user.dob.is_empty() {
            writeln!(f, "Date of birth: {}", user.dob)?;
        }
        if !user.gender.is_empty() {
            writeln!(f, "Gender: {}", user.gender)?;
        }
        if let Some(picture) = &user.picture {
            writeln!(f, "Picture: {}", picture)?;
        }
        if let Some(created_at) = user.created_at {
            writeln!(f, "Created: {}", created_at.format("%Y-%m-%d %H:%M:%S"))?;
        }
        if let Some(updated_at) = user.updated_at {
            writeln!(f, "Updated: {}", updated_at.format("%Y-%m-%d %H:%M:%S"))?;
        }
        Ok(())
    }
}

/// Partial user update. Only fields that are `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Copy of a deleted user kept in the `recycle` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecycleRecord {
    #[serde(flatten)]
    pub user: UserData,
    pub deleted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_data_skips_absent_optionals() {
        let user = UserData::new("Ana", "ana@example.com").with_gender("f");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            json!({"name": "Ana", "email": "ana@example.com", "dob": "", "gender": "f"})
        );
    }

    #[test]
    fn test_user_decodes_with_defaults() {
        let user: User =
            serde_json::from_value(json!({"id": "u1", "name": "Bo", "email": "bo@x.io"}))
                .unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.data.name, "Bo");
        assert!(user.data.dob.is_empty());
        assert!(user.data.picture.is_none());
    }

    #[test]
    fn test_user_requires_email() {
        let result = serde_json::from_value::<User>(json!({"id": "u1", "name": "Bo"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = UserPatch {
            email: Some("new@x.io".into()),
            ..UserPatch::default()
        };
        assert!(!patch.is_empty());
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"email": "new@x.io"}));
        assert!(UserPatch::default().is_empty());
    }

    #[test]
    fn test_recycle_record_is_flat() {
        let deleted_at: DateTime<Utc> = "2025-03-01T10:00:00Z".parse().unwrap();
        let record = RecycleRecord {
            user: UserData::new("Ana", "ana@example.com"),
            deleted_at,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], json!("Ana"));
        assert_eq!(json["deleted_at"], json!("2025-03-01T10:00:00Z"));
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_user_display() {
        let user = User::new("u1", UserData::new("Ana", "ana@example.com").with_dob("1990-04-02"));
        let output = format!("{}", user);
        assert!(output.contains("Ana <ana@example.com>"));
        assert!(output.contains("ID: u1"));
        assert!(output.contains("Date of birth: 1990-04-02"));
        assert!(!output.contains("Gender"));
    }
}
