// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between the live-chat dashboard client and server.
//! This module defines the persisted records and the HTTP request/response bodies.

use serde::{Deserialize, Serialize};

/// Token type reported by a successful login
pub const TOKEN_TYPE: &str = "bearer";

/// Placeholder stored in place of a chat count for inactive platforms
pub const CHATTING_PLACEHOLDER: &str = "-";

/// A single entry of the user store
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Login name, also used verbatim as the bearer token
    pub username: String,
    /// Plaintext password
    pub password: String,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Chat count of a platform, or the `"-"` placeholder when unknown
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "RawChatting", into = "RawChatting")]
pub enum Chatting {
    /// Number of active chats
    Count(u64),
    /// No figure available, serialized as `"-"`
    Unknown,
}

/// Wire shape of [`Chatting`]: a bare integer or a string
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(untagged)]
enum RawChatting {
    Count(u64),
    Text(String),
}

impl TryFrom<RawChatting> for Chatting {
    type Error = String;

    fn try_from(raw: RawChatting) -> Result<Self, Self::Error> {
        match raw {
            RawChatting::Count(n) => Ok(Chatting::Count(n)),
            RawChatting::Text(s) if s == CHATTING_PLACEHOLDER => Ok(Chatting::Unknown),
            RawChatting::Text(s) => Err(format!(
                "expected a chat count or \"{CHATTING_PLACEHOLDER}\", got {s:?}"
            )),
        }
    }
}

impl From<Chatting> for RawChatting {
    fn from(chatting: Chatting) -> Self {
        match chatting {
            Chatting::Count(n) => RawChatting::Count(n),
            Chatting::Unknown => RawChatting::Text(CHATTING_PLACEHOLDER.to_string()),
        }
    }
}

/// One dashboard row
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlatformRecord {
    /// Platform name
    pub platform: String,
    /// Chat count or placeholder
    pub chatting: Chatting,
}

/// OAuth2 password-flow form posted to `/login`
///
/// Only `username` and `password` are used; the remaining OAuth2 fields are
/// accepted so standard clients can post the full form.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub grant_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
}

/// Response to a successful login
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    /// The bearer token (the username)
    pub access_token: String,
    /// Always [`TOKEN_TYPE`]
    pub token_type: String,
}

impl LoginResponse {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: TOKEN_TYPE.to_string(),
        }
    }
}

/// Response of `GET /data`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DataResponse {
    /// Platform store contents, as stored
    pub data: serde_json::Value,
}

/// Body of `POST /add_user`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AddUserRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /change-password`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

/// Acknowledgement carrying a human-readable message
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageResponse {
    pub msg: String,
}

/// Acknowledgement of a successful mutation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chatting_wire_shape() {
        let rows = vec![
            PlatformRecord {
                platform: "NH88".to_string(),
                chatting: Chatting::Count(21),
            },
            PlatformRecord {
                platform: "W78".to_string(),
                chatting: Chatting::Unknown,
            },
        ];

        let value = serde_json::to_value(&rows).unwrap();
        assert_eq!(
            value,
            json!([
                {"platform": "NH88", "chatting": 21},
                {"platform": "W78", "chatting": "-"}
            ])
        );

        let back: Vec<PlatformRecord> = serde_json::from_value(value).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn test_chatting_rejects_other_strings() {
        let err = serde_json::from_value::<PlatformRecord>(json!({
            "platform": "X",
            "chatting": "n/a"
        }));
        assert!(err.is_err());

        let negative = serde_json::from_value::<PlatformRecord>(json!({
            "platform": "X",
            "chatting": -1
        }));
        assert!(negative.is_err());
    }

    #[test]
    fn test_login_form_optional_fields() {
        let form: LoginForm =
            serde_json::from_value(json!({"username": "bob", "password": "pw12"})).unwrap();
        assert_eq!(form.username, "bob");
        assert!(form.grant_type.is_none());
        assert!(form.scope.is_none());
    }

    #[test]
    fn test_login_response_is_bearer() {
        let resp = LoginResponse::bearer("admin");
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({"access_token": "admin", "token_type": "bearer"})
        );
    }
}
