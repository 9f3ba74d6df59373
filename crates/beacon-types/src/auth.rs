//! Auth provider error codes, collapsed into a closed set of kinds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum AuthErrorKind {
    #[error("Invalid email address.")]
    InvalidEmail,
    #[error("This user account has been disabled.")]
    UserDisabled,
    #[error("No user found with this email.")]
    UserNotFound,
    #[error("Incorrect password.")]
    WrongPassword,
    #[error("Email is already registered. Try logging in.")]
    EmailAlreadyInUse,
    #[error("Password is too weak. Use at least 6 characters.")]
    WeakPassword,
    #[error("Invalid OTP. Please try again.")]
    InvalidOtp,
    #[error("Your session is invalid or has expired. Please sign in again.")]
    InvalidSession,
    #[error("Authentication failed. Please try again.")]
    Unknown,
}

impl AuthErrorKind {
    /// Maps a provider code such as `auth/wrong-password`. The `auth/`
    /// prefix is optional; anything unrecognised is `Unknown`.
    pub fn from_provider_code(code: &str) -> Self {
        let code = code.trim();
        match code.strip_prefix("auth/").unwrap_or(code) {
            "invalid-email" => Self::InvalidEmail,
            "user-disabled" => Self::UserDisabled,
            "user-not-found" => Self::UserNotFound,
            "wrong-password" | "invalid-credential" => Self::WrongPassword,
            "email-already-in-use" => Self::EmailAlreadyInUse,
            "weak-password" => Self::WeakPassword,
            "invalid-verification-code" | "code-expired" => Self::InvalidOtp,
            "id-token-expired" | "id-token-revoked" | "user-token-expired" => Self::InvalidSession,
            _ => Self::Unknown,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidEmail => "Invalid email address.",
            Self::UserDisabled => "This user account has been disabled.",
            Self::UserNotFound => "No user found with this email.",
            Self::WrongPassword => "Incorrect password.",
            Self::EmailAlreadyInUse => "Email is already registered. Try logging in.",
            Self::WeakPassword => "Password is too weak. Use at least 6 characters.",
            Self::InvalidOtp => "Invalid OTP. Please try again.",
            Self::InvalidSession => "Your session is invalid or has expired. Please sign in again.",
            Self::Unknown => "Authentication failed. Please try again.",
        }
    }
}

/// How the caller signed in, derived from the token's provider id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignInMethod {
    Email,
    Phone,
    Google,
    Other,
}

impl SignInMethod {
    pub fn from_provider_id(id: Option<&str>) -> Self {
        match id {
            Some("password") => Self::Email,
            Some("phone") => Self::Phone,
            Some("google.com") => Self::Google,
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Google => "google",
            Self::Other => "other",
        }
    }
}
