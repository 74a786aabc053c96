//! Session data model
//!
//! These structs mirror the JSON the dashboard backend returns and the layout
//! persisted in device storage, so field names follow the wire format.

use derive_more::{Display, From};
use serde::{Deserialize, Deserializer, Serialize};

/// Name of a backend integration a user record or token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceTag(String);

impl ServiceTag {
    pub const DASHBOARD: &'static str = "dashboard";
    pub const OBWB: &'static str = "obwb";
    pub const OPTICAL: &'static str = "optical";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn dashboard() -> Self {
        Self::new(Self::DASHBOARD)
    }

    pub fn obwb() -> Self {
        Self::new(Self::OBWB)
    }

    pub fn optical() -> Self {
        Self::new(Self::OPTICAL)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ServiceTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl PartialEq<str> for ServiceTag {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ServiceTag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A user as known to one backend service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Linked Microsoft mailbox, `None` while no mailbox is connected.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub microsoft_user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub service: ServiceTag,
}

impl UserRecord {
    /// Same record re-tagged for another service.
    pub fn tagged(mut self, service: impl Into<ServiceTag>) -> Self {
        self.service = service.into();
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Up to two uppercase initials for avatars.
    pub fn initials(&self) -> String {
        let initials: String = [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() {
            self.email
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect())
                .unwrap_or_default()
        } else {
            initials
        }
    }
}

/// Backend service descriptor embedded in every [`ServiceToken`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceInfo {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub login_endpoint: Option<String>,
    #[serde(default)]
    pub signup_endpoint: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Bearer credential scoped to one backend integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceToken {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub service_id: i64,
    pub token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub service: ServiceInfo,
}

impl ServiceToken {
    /// Minimal token for a named service.
    pub fn new(service_name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            id: 0,
            user_id: 0,
            service_id: 0,
            token: token.into(),
            token_type: Some("bearer".to_string()),
            expires_at: None,
            is_active: true,
            created_at: None,
            updated_at: None,
            service: ServiceInfo {
                name: service_name.into(),
                is_active: true,
                ..ServiceInfo::default()
            },
        }
    }

    pub fn with_expires_at(mut self, expires_at: impl Into<String>) -> Self {
        self.expires_at = Some(expires_at.into());
        self
    }

    pub fn service_name(&self) -> &str {
        &self.service.name
    }
}

/// Fields of the session that survive a reload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub user: Option<UserRecord>,
    #[serde(
        rename = "userInServices",
        default,
        deserialize_with = "null_as_default"
    )]
    pub users_by_service: Vec<UserRecord>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_tokens: Vec<ServiceToken>,
}

impl Session {
    pub fn is_empty(&self) -> bool {
        self == &Session::default()
    }
}

/// Version written alongside the persisted session.
pub const PERSISTED_VERSION: u32 = 0;

/// Envelope stored under the session storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub state: Session,
    #[serde(default)]
    pub version: u32,
}

impl PersistedSession {
    pub fn new(state: Session) -> Self {
        Self {
            state,
            version: PERSISTED_VERSION,
        }
    }

    /// Parse a stored entry; anything unreadable is treated as an empty session.
    pub fn parse(raw: &str) -> Session {
        match serde_json::from_str::<PersistedSession>(raw) {
            Ok(persisted) => persisted.state,
            Err(err) => {
                tracing::warn!(error = %err, "discarding malformed persisted session");
                Session::default()
            }
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_from_backend_json() {
        let json = r#"{
            "id": 1,
            "email": "ana@example.com",
            "first_name": "Ana",
            "last_name": "Lee",
            "microsoft_user_id": "",
            "created_at": "2025-01-01T00:00:00",
            "updated_at": "2025-01-02T00:00:00"
        }"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.full_name(), "Ana Lee");
        assert_eq!(user.initials(), "AL");
        assert!(user.microsoft_user_id.is_none());
        assert_eq!(user.service, ServiceTag::default());
    }

    #[test]
    fn test_persisted_layout_uses_wire_names() {
        let session = Session {
            access_token: Some("abc".to_string()),
            ..Session::default()
        };
        let json = serde_json::to_value(PersistedSession::new(session)).unwrap();

        assert_eq!(json["version"], 0);
        assert_eq!(json["state"]["access_token"], "abc");
        assert!(json["state"]["userInServices"].is_array());
        assert!(json["state"]["service_tokens"].is_array());
    }

    #[test]
    fn test_parse_accepts_null_lists() {
        let raw = r#"{"state":{"user":null,"userInServices":null,"access_token":"t","refresh_token":null,"service_tokens":[]},"version":0}"#;
        let session = PersistedSession::parse(raw);

        assert!(session.users_by_service.is_empty());
        assert_eq!(session.access_token.as_deref(), Some("t"));
    }

    #[test]
    fn test_parse_malformed_is_empty() {
        assert!(PersistedSession::parse("{not json").is_empty());
        assert!(PersistedSession::parse("").is_empty());
        assert!(PersistedSession::parse("[1,2,3]").is_empty());
    }

    #[test]
    fn test_service_token_name_lookup_field() {
        let json = r#"{
            "user_id": 3, "service_id": 2, "token": "tok", "token_type": "bearer",
            "expires_at": "2030-01-01T00:00:00", "id": 9, "is_active": true,
            "created_at": "2025-01-01", "updated_at": "2025-01-01",
            "service": {"name": "obwb", "login_endpoint": "/login", "signup_endpoint": "/signup",
                        "id": 2, "is_active": true, "created_at": "2025-01-01", "updated_at": null}
        }"#;
        let token: ServiceToken = serde_json::from_str(json).unwrap();

        assert_eq!(token.service_name(), "obwb");
        assert_eq!(token.token, "tok");
        assert_eq!(token.expires_at.as_deref(), Some("2030-01-01T00:00:00"));
    }
}
