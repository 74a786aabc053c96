//! Authentication payloads

use serde::{Deserialize, Serialize};

use crate::core::session::{ServiceToken, UserRecord};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Returned by login and signup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    pub user: UserRecord,
    #[serde(default)]
    pub service_tokens: Vec<ServiceToken>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// OAuth consent URL for linking a Microsoft mailbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUrlResponse {
    pub auth_url: String,
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStatusResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user_id: String,
    pub connected: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailConnectionResponse {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub microsoft_user_id: Option<String>,
    #[serde(default)]
    pub connected: bool,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_parses() {
        let json = r#"{
            "access_token": "abc",
            "refresh_token": "def",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": {"id": 1, "email": "a@b.co", "first_name": "A", "last_name": "B",
                     "created_at": "2025-01-01", "updated_at": "2025-01-01", "microsoft_user_id": null},
            "service_tokens": []
        }"#;
        let auth: AuthResponse = serde_json::from_str(json).unwrap();

        assert_eq!(auth.access_token, "abc");
        assert_eq!(auth.user.id, 1);
        assert_eq!(auth.expires_in, Some(3600));
        assert!(auth.service_tokens.is_empty());
    }

    #[test]
    fn test_refresh_response_without_optional_fields() {
        let tokens: RefreshTokenResponse =
            serde_json::from_str(r#"{"access_token":"a","refresh_token":"r"}"#).unwrap();
        assert_eq!(tokens.access_token, "a");
        assert!(tokens.token_type.is_none());
    }
}
