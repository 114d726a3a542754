use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtHandler;
use chrono::DateTime;
use chrono::Utc;
use identity_service::domain::user::models::ResetToken;
use identity_service::domain::user::models::User;
use identity_service::domain::user::notifications::AccountRegistered;
use identity_service::domain::user::notifications::LoginDetected;
use identity_service::domain::user::notifications::PasswordResetRequested;
use identity_service::domain::user::notifications::VerificationRequested;
use identity_service::domain::user::ports::Notifier;
use identity_service::domain::user::ports::UserRepository;
use identity_service::domain::user::service::AuthService;
use identity_service::inbound::http::router::create_router;
use identity_service::user::errors::AuthError;
use identity_service::user::errors::NotifierError;
use tokio::sync::mpsc;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns the real router on a random port, backed by
/// an in-memory store and a channel-backed notifier so the suite runs
/// without Postgres or an SMTP relay.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub repository: Arc<InMemoryUserRepository>,
    pub jwt_handler: JwtHandler,
    emails: tokio::sync::Mutex<mpsc::UnboundedReceiver<SentEmail>>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::default());
        let (notifier, emails) = ChannelNotifier::new();

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&repository),
            Arc::new(notifier),
            Arc::new(Authenticator::new(TEST_SECRET)),
            168,
        ));

        let router = create_router(auth_service, address.clone());

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            repository,
            jwt_handler: JwtHandler::new(TEST_SECRET),
            emails: tokio::sync::Mutex::new(emails),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Await the next dispatched email. Sends happen on spawned tasks after
    /// the HTTP response, so tests must wait rather than poll.
    pub async fn next_email(&self) -> SentEmail {
        let mut receiver = self.emails.lock().await;
        tokio::time::timeout(Duration::from_secs(5), receiver.recv())
            .await
            .expect("Timed out waiting for a notification email")
            .expect("Notifier channel closed")
    }

    /// Await the verification email for `email` and return its token,
    /// discarding other notifications along the way.
    pub async fn verification_token_for(&self, email: &str) -> String {
        loop {
            if let SentEmail::Verification { email: to, token } = self.next_email().await {
                if to == email {
                    return token;
                }
            }
        }
    }

    /// Await the password-reset email for `email` and return its token.
    pub async fn reset_token_for(&self, email: &str) -> String {
        loop {
            if let SentEmail::PasswordReset { email: to, token } = self.next_email().await {
                if to == email {
                    return token;
                }
            }
        }
    }
}

/// A notification captured by the test notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentEmail {
    Verification { email: String, token: String },
    Welcome { email: String },
    LoginAlert { email: String },
    PasswordReset { email: String, token: String },
}

/// Notifier double that forwards every send onto a channel.
pub struct ChannelNotifier {
    sender: mpsc::UnboundedSender<SentEmail>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SentEmail>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn capture(&self, email: SentEmail) -> Result<(), NotifierError> {
        self.sender
            .send(email)
            .map_err(|e| NotifierError::SendFailed(e.to_string()))
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn send_verification(&self, notice: &VerificationRequested) -> Result<(), NotifierError> {
        self.capture(SentEmail::Verification {
            email: notice.email.clone(),
            token: notice.token.clone(),
        })
    }

    async fn send_welcome(&self, notice: &AccountRegistered) -> Result<(), NotifierError> {
        self.capture(SentEmail::Welcome {
            email: notice.email.clone(),
        })
    }

    async fn send_login_alert(&self, notice: &LoginDetected) -> Result<(), NotifierError> {
        self.capture(SentEmail::LoginAlert {
            email: notice.email.clone(),
        })
    }

    async fn send_password_reset(
        &self,
        notice: &PasswordResetRequested,
    ) -> Result<(), NotifierError> {
        self.capture(SentEmail::PasswordReset {
            email: notice.email.clone(),
            token: notice.token.clone(),
        })
    }
}

/// In-memory UserRepository with the same conditional-write semantics as the
/// Postgres implementation.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Backdate the pending reset token for `email`, for expiry tests.
    pub fn expire_reset_token(&self, email: &str, expires_at: DateTime<Utc>) {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.email.as_str() == email)
            .expect("No such user");
        let pending = user
            .reset_token
            .as_mut()
            .expect("User has no pending reset token");
        pending.expires_at = expires_at;
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email.as_str() == email).cloned())
    }

    async fn consume_verification_token(&self, token: &str) -> Result<Option<User>, AuthError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users
            .iter_mut()
            .find(|u| !u.is_verified && u.verification_token.as_deref() == Some(token))
        else {
            return Ok(None);
        };
        user.is_verified = true;
        user.verification_token = None;
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn set_reset_token(
        &self,
        email: &str,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<Option<User>, AuthError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.email.as_str() == email) else {
            return Ok(None);
        };
        user.reset_token = Some(ResetToken {
            token: token.to_string(),
            expires_at,
        });
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        new_password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<User>, AuthError> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| {
            u.reset_token
                .as_ref()
                .is_some_and(|pending| pending.token == token && !pending.is_expired(now))
        }) else {
            return Ok(None);
        };
        user.password_hash = new_password_hash.to_string();
        user.reset_token = None;
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}
