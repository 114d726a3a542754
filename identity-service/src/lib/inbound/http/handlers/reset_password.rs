use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::Password;
use crate::domain::user::ports::AuthServicePort;
use crate::domain::user::ports::Notifier;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

pub async fn reset_password<R: UserRepository, N: Notifier>(
    State(state): State<AppState<R, N>>,
    Path(token): Path<String>,
    Json(body): Json<ResetPasswordRequestBody>,
) -> Result<ApiSuccess<ResetPasswordResponseData>, ApiError> {
    let new_password =
        Password::new(body.password).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .auth_service
        .reset_password(&token, new_password)
        .await
        .map_err(ApiError::from)
        .map(|_| {
            ApiSuccess::new(
                StatusCode::OK,
                ResetPasswordResponseData {
                    msg: "Password reset successful. You can now log in.".to_string(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetPasswordRequestBody {
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetPasswordResponseData {
    pub msg: String,
}
