use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::User;

/// Notification asking a new account holder to verify their email address.
///
/// Carries the opaque verification token; the delivery adapter turns it
/// into a link.
#[derive(Debug, Clone)]
pub struct VerificationRequested {
    pub name: String,
    pub email: String,
    pub token: String,
}

impl VerificationRequested {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            token,
        }
    }
}

/// Welcome notification sent once on successful registration.
#[derive(Debug, Clone)]
pub struct AccountRegistered {
    pub name: String,
    pub email: String,
}

impl AccountRegistered {
    pub fn new(user: &User) -> Self {
        Self {
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
        }
    }
}

/// Best-effort alert sent after every successful login.
#[derive(Debug, Clone)]
pub struct LoginDetected {
    pub name: String,
    pub email: String,
    pub at: DateTime<Utc>,
}

impl LoginDetected {
    pub fn new(user: &User) -> Self {
        Self {
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            at: Utc::now(),
        }
    }
}

/// Notification carrying a password reset link.
#[derive(Debug, Clone)]
pub struct PasswordResetRequested {
    pub name: String,
    pub email: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl PasswordResetRequested {
    pub fn new(user: &User, token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
            token,
            expires_at,
        }
    }
}
