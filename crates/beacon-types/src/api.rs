use serde::{Deserialize, Serialize};

use crate::auth::AuthErrorKind;
use crate::models::Identity;

// -- Identity token claims --

/// Claims carried by the identity token the auth provider issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign_in_provider: Option<String>,
    #[serde(default)]
    pub auth_time: i64,
    /// Account creation time, seconds since epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    pub exp: usize,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity::new(&self.sub).with_contact(self.email.clone(), self.phone_number.clone())
    }

    /// The account was created by this very sign-in.
    pub fn is_first_sign_in(&self) -> bool {
        self.created_at == Some(self.auth_time)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    #[serde(flatten)]
    pub identity: Identity,
    pub sign_in_provider: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveAuthErrorRequest {
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthErrorResponse {
    pub error: AuthErrorKind,
    pub message: String,
}

impl From<AuthErrorKind> for AuthErrorResponse {
    fn from(kind: AuthErrorKind) -> Self {
        Self {
            error: kind,
            message: kind.message().to_string(),
        }
    }
}

// -- Channels --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateChannelRequest {
    pub name: String,
}

// -- Subscriptions --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscribeRequest {
    pub channel: String,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub text: String,
    /// Client clock, ms since epoch. The server clock is used when absent.
    pub timestamp: Option<i64>,
}

// -- Topic relay --

/// Body of `/subscribe` and `/unsubscribe`. Fields are optional so a
/// missing one is reported as a rejected request rather than a decode error.
#[derive(Debug, Default, Deserialize)]
pub struct TopicRequest {
    pub token: Option<String>,
    pub channel: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFcmTokenRequest {
    pub user_id: Option<String>,
    pub fcm_token: Option<String>,
}
