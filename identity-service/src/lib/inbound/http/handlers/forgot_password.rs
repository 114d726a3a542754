use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::ports::AuthServicePort;
use crate::domain::user::ports::Notifier;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn forgot_password<R: UserRepository, N: Notifier>(
    State(state): State<AppState<R, N>>,
    Json(body): Json<ForgotPasswordRequestBody>,
) -> Result<ApiSuccess<ForgotPasswordResponseData>, ApiError> {
    state
        .auth_service
        .forgot_password(&body.email)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                ForgotPasswordResponseData {
                    msg: "Password reset email sent. Check your inbox.".to_string(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForgotPasswordRequestBody {
    email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForgotPasswordResponseData {
    pub msg: String,
}
