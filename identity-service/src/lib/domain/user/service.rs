use std::sync::Arc;

use auth::Authenticator;
use chrono::Duration;
use chrono::Utc;

use async_trait::async_trait;

use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::notifications::AccountRegistered;
use crate::domain::user::notifications::LoginDetected;
use crate::domain::user::notifications::PasswordResetRequested;
use crate::domain::user::notifications::VerificationRequested;
use crate::user::errors::AuthError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::Notifier;
use crate::user::ports::UserRepository;

/// Reset tokens are usable for one hour from issuance.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Authentication domain service.
///
/// Implements the register / verify / login / forgot / reset state
/// transitions over the user repository, with all collaborators injected at
/// construction. Notifications are dispatched on spawned tasks after the
/// repository write has committed, so a delivery failure can never undo or
/// fail a state transition.
pub struct AuthService<R, N>
where
    R: UserRepository,
    N: Notifier,
{
    repository: Arc<R>,
    notifier: Arc<N>,
    authenticator: Arc<Authenticator>,
    session_validity_hours: i64,
}

impl<R, N> AuthService<R, N>
where
    R: UserRepository,
    N: Notifier,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `notifier` - Notification delivery implementation
    /// * `authenticator` - Password hashing/verification + session token
    ///   issuance
    /// * `session_validity_hours` - Session token window (168 = 7 days)
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<N>,
        authenticator: Arc<Authenticator>,
        session_validity_hours: i64,
    ) -> Self {
        Self {
            repository,
            notifier,
            authenticator,
            session_validity_hours,
        }
    }
}

#[async_trait]
impl<R, N> AuthServicePort for AuthService<R, N>
where
    R: UserRepository,
    N: Notifier,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, AuthError> {
        let password_hash = self.authenticator.hash_password(command.password.as_str())?;
        let verification_token = auth::token::generate();

        let user = User::register(
            command.name,
            command.email,
            password_hash,
            verification_token.clone(),
        );

        let created = self.repository.create(user).await?;

        let notifier = Arc::clone(&self.notifier);
        let verification = VerificationRequested::new(&created, verification_token);
        let welcome = AccountRegistered::new(&created);
        tokio::spawn(async move {
            if let Err(e) = notifier.send_verification(&verification).await {
                tracing::error!(
                    email = %verification.email,
                    error = %e,
                    "Failed to send verification email"
                );
            }
            if let Err(e) = notifier.send_welcome(&welcome).await {
                tracing::error!(
                    email = %welcome.email,
                    error = %e,
                    "Failed to send welcome email"
                );
            }
        });

        Ok(created)
    }

    async fn verify_email(&self, token: &str) -> Result<User, AuthError> {
        self.repository
            .consume_verification_token(token)
            .await?
            .ok_or(AuthError::InvalidVerificationToken)
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser, AuthError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| AuthError::NotFound(email.to_string()))?;

        if !user.is_verified {
            return Err(AuthError::AccountNotVerified);
        }

        let claims = auth::Claims::for_user(user.id, self.session_validity_hours);
        let result = self
            .authenticator
            .authenticate(password, &user.password_hash, &claims)
            .map_err(|e| match e {
                auth::AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
                auth::AuthenticationError::PasswordError(err) => AuthError::Hashing(err.to_string()),
                auth::AuthenticationError::JwtError(err) => AuthError::TokenSigning(err.to_string()),
            })?;

        let notifier = Arc::clone(&self.notifier);
        let alert = LoginDetected::new(&user);
        tokio::spawn(async move {
            if let Err(e) = notifier.send_login_alert(&alert).await {
                tracing::error!(
                    email = %alert.email,
                    error = %e,
                    "Failed to send login alert email"
                );
            }
        });

        Ok(AuthenticatedUser {
            user,
            access_token: result.access_token,
        })
    }

    async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let token = auth::token::generate();
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);

        // Single conditional write: also overwrites any prior pending token
        let user = self
            .repository
            .set_reset_token(email, &token, expires_at)
            .await?
            .ok_or_else(|| AuthError::NotFound(email.to_string()))?;

        let notifier = Arc::clone(&self.notifier);
        let notice = PasswordResetRequested::new(&user, token, expires_at);
        tokio::spawn(async move {
            if let Err(e) = notifier.send_password_reset(&notice).await {
                tracing::error!(
                    email = %notice.email,
                    error = %e,
                    "Failed to send password reset email"
                );
            }
        });

        Ok(())
    }

    async fn reset_password(&self, token: &str, new_password: Password) -> Result<(), AuthError> {
        let new_hash = self.authenticator.hash_password(new_password.as_str())?;

        // Hash replacement and token clearing commit in one conditional
        // write; expiry is checked store-side against the timestamp given
        self.repository
            .consume_reset_token(token, &new_hash, Utc::now())
            .await?
            .ok_or(AuthError::InvalidOrExpiredResetToken)?;

        Ok(())
    }
}
