use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::AuthenticatedUser;
use crate::domain::user::models::User;
use crate::domain::user::ports::AuthServicePort;
use crate::domain::user::ports::Notifier;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn login<R: UserRepository, N: Notifier>(
    State(state): State<AppState<R, N>>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    state
        .auth_service
        .login(&body.email, &body.password)
        .await
        .map_err(ApiError::from)
        .map(|ref authenticated| ApiSuccess::new(StatusCode::OK, authenticated.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub msg: String,
    pub token: String,
    pub user: PublicUserData,
}

/// Public profile slice returned on login: never the hash, never the tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUserData {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for PublicUserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
        }
    }
}

impl From<&AuthenticatedUser> for LoginResponseData {
    fn from(authenticated: &AuthenticatedUser) -> Self {
        Self {
            msg: "Login successful".to_string(),
            token: authenticated.access_token.clone(),
            user: (&authenticated.user).into(),
        }
    }
}
