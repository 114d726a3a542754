use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::notifications::AccountRegistered;
use crate::domain::user::notifications::LoginDetected;
use crate::domain::user::notifications::PasswordResetRequested;
use crate::domain::user::notifications::VerificationRequested;
use crate::user::errors::AuthError;
use crate::user::errors::NotifierError;

/// Port for the authentication domain service.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account in the unverified state.
    ///
    /// Hashes the password, attaches a fresh verification token, persists
    /// the record, then dispatches verification and welcome notifications.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Hashing` - Password hashing failed
    /// * `DatabaseError` - Store operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, AuthError>;

    /// Consume a verification token, flipping the account to verified.
    ///
    /// Single-use: a second call with the same token fails.
    ///
    /// # Errors
    /// * `InvalidVerificationToken` - Token unknown or already consumed
    /// * `DatabaseError` - Store operation failed
    async fn verify_email(&self, token: &str) -> Result<User, AuthError>;

    /// Verify credentials and issue a session token.
    ///
    /// # Errors
    /// * `NotFound` - No account with this email
    /// * `AccountNotVerified` - Email not verified yet
    /// * `InvalidCredentials` - Password mismatch
    /// * `TokenSigning` - Session token issuance failed
    async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError>;

    /// Issue a password reset token valid for one hour.
    ///
    /// Overwrites any prior pending token; only the latest is valid.
    ///
    /// # Errors
    /// * `NotFound` - No account with this email
    /// * `DatabaseError` - Store operation failed
    async fn forgot_password(&self, email: &str) -> Result<(), AuthError>;

    /// Consume a reset token and replace the password hash.
    ///
    /// Hash replacement and token clearing commit atomically; the token
    /// cannot be reused and an expired token is indistinguishable from an
    /// unknown one.
    ///
    /// # Errors
    /// * `InvalidOrExpiredResetToken` - Token unknown, consumed, or expired
    /// * `Hashing` - Password hashing failed
    /// * `DatabaseError` - Store operation failed
    async fn reset_password(&self, token: &str, new_password: Password) -> Result<(), AuthError>;
}

/// Persistence operations for the user aggregate.
///
/// The consume/set operations are conditional writes: the store checks the
/// precondition and applies the mutation in one statement, so concurrent
/// callers race to at most one success.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Uniqueness constraint on email violated
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, user: User) -> Result<User, AuthError>;

    /// Retrieve a user by exact email match.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Atomically consume a verification token: if an unverified user holds
    /// exactly this token, mark them verified and clear the token.
    ///
    /// # Returns
    /// The updated user, or None if no unverified user holds the token.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn consume_verification_token(&self, token: &str) -> Result<Option<User>, AuthError>;

    /// Attach a reset token and expiry to the user with this email,
    /// replacing any pending one.
    ///
    /// # Returns
    /// The updated user, or None if no user has this email.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn set_reset_token(
        &self,
        email: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<User>, AuthError>;

    /// Atomically consume an unexpired reset token: replace the password
    /// hash and clear token and expiry in the same write.
    ///
    /// # Returns
    /// The updated user, or None if the token is unknown or expired at
    /// `now`.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn consume_reset_token(
        &self,
        token: &str,
        new_password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AuthError>;
}

/// Outbound notification delivery.
///
/// Delivery is best-effort: the service never lets a notifier failure roll
/// back or fail a committed state transition.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Deliver the email-verification notification.
    async fn send_verification(&self, notice: &VerificationRequested) -> Result<(), NotifierError>;

    /// Deliver the post-registration welcome notification.
    async fn send_welcome(&self, notice: &AccountRegistered) -> Result<(), NotifierError>;

    /// Deliver the login alert notification.
    async fn send_login_alert(&self, notice: &LoginDetected) -> Result<(), NotifierError>;

    /// Deliver the password-reset notification.
    async fn send_password_reset(
        &self,
        notice: &PasswordResetRequested,
    ) -> Result<(), NotifierError>;
}
