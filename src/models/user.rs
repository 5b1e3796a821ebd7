//! Account and settings payloads

use serde::{Deserialize, Serialize};

/// The signed-in user, as persisted in the session store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub nickname: Option<String>,
}

impl User {
    /// Nickname when set, email otherwise
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.email)
    }
}

/// Response of `/auth/register` and `/auth/login`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub nickname: Option<String>,
    pub token: String,
}

impl AuthResponse {
    pub fn user(&self) -> User {
        User {
            user_id: self.user_id.clone(),
            email: self.email.clone(),
            nickname: self.nickname.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

/// Per-user preferences from `GET /auth/settings`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub dev_mode: bool,
    #[serde(default)]
    pub ai_api_key: Option<String>,
    #[serde(default)]
    pub ai_api_url: Option<String>,
    #[serde(default)]
    pub ai_model: Option<String>,
    #[serde(default)]
    pub ai_auto_title: bool,
}

/// Partial update for `PUT /auth/settings`; unset fields are left alone
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_auto_title: Option<bool>,
}

impl SettingsUpdate {
    pub fn dev_mode(enabled: bool) -> Self {
        Self {
            dev_mode: Some(enabled),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Mask a secret for display, keeping the first and last four characters
pub fn redact(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "****".to_string()
    }
}
