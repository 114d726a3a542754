//! HTML bodies for the notification emails.
//!
//! Each renderer returns a `(subject, html)` pair; link construction from
//! the configured base URL happens here so the domain layer only ever deals
//! in tokens.

use crate::domain::user::notifications::AccountRegistered;
use crate::domain::user::notifications::LoginDetected;
use crate::domain::user::notifications::PasswordResetRequested;
use crate::domain::user::notifications::VerificationRequested;

pub fn verification(base_url: &str, notice: &VerificationRequested) -> (String, String) {
    let verify_link = format!("{}/api/auth/verify/{}", base_url, notice.token);
    let html = format!(
        r#"
    <div style="font-family:sans-serif; text-align:center; padding:20px;">
      <h2>Welcome, {name}!</h2>
      <p>Click the button below to verify your email address:</p>
      <a href="{verify_link}"
         style="background-color:#4CAF50;color:white;padding:12px 20px;text-decoration:none;border-radius:5px;display:inline-block;margin-top:10px;">
         Verify Email
      </a>
      <p style="margin-top:20px; font-size:12px; color:gray;">If the button doesn't work, copy and paste this link into your browser:</p>
      <p style="font-size:12px; color:gray;">{verify_link}</p>
    </div>
  "#,
        name = notice.name,
    );
    ("Verify Your Account".to_string(), html)
}

pub fn welcome(notice: &AccountRegistered) -> (String, String) {
    let html = format!(
        r#"
    <div style="font-family:sans-serif; text-align:center; padding:20px;">
      <h2>Welcome, {name}!</h2>
      <p>Your account has been created successfully.</p>
      <p>Please verify your email by clicking the link sent to your inbox.</p>
    </div>
  "#,
        name = notice.name,
    );
    ("Welcome Aboard".to_string(), html)
}

pub fn login_alert(notice: &LoginDetected) -> (String, String) {
    let html = format!(
        r#"
    <div style="font-family:sans-serif; text-align:center; padding:20px;">
      <h3>Login Notification</h3>
      <p>Hello {name},</p>
      <p>Your account was accessed on <b>{at}</b>.</p>
      <p>If this wasn't you, please reset your password immediately.</p>
    </div>
  "#,
        name = notice.name,
        at = notice.at.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    ("New Login Detected".to_string(), html)
}

pub fn password_reset(base_url: &str, notice: &PasswordResetRequested) -> (String, String) {
    let reset_link = format!("{}/api/auth/reset/{}", base_url, notice.token);
    let html = format!(
        r#"
    <div style="font-family:sans-serif; text-align:center; padding:20px;">
      <h3>Password Reset Request</h3>
      <p>Click the button below to reset your password. The link is valid for one hour.</p>
      <a href="{reset_link}" style="background:#f44336;color:white;padding:10px 15px;text-decoration:none;border-radius:5px;">
        Reset Password
      </a>
      <p>If the button doesn't work, copy this link:</p>
      <p>{reset_link}</p>
    </div>
  "#,
    );
    ("Reset Your Password".to_string(), html)
}
