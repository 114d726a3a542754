use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::ports::AuthServicePort;
use crate::domain::user::ports::Notifier;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;
use crate::user::errors::AuthError;

/// Email verification landing endpoint. Clicked from an email, so it
/// answers with human-readable HTML rather than JSON.
pub async fn verify_email<R: UserRepository, N: Notifier>(
    State(state): State<AppState<R, N>>,
    Path(token): Path<String>,
) -> Response {
    match state.auth_service.verify_email(&token).await {
        Ok(_) => Html(verified_page(&state.base_url)).into_response(),
        Err(AuthError::InvalidVerificationToken) => (
            StatusCode::BAD_REQUEST,
            Html("<h3>Invalid or expired verification token.</h3>".to_string()),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Email verification failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<p>Internal server error</p>".to_string()),
            )
                .into_response()
        }
    }
}

fn verified_page(base_url: &str) -> String {
    format!(
        r#"
      <div style="text-align:center; font-family:sans-serif; padding:20px;">
        <h2>Email Verified Successfully</h2>
        <p>You can now <a href="{base_url}/login">log in</a> to your account.</p>
      </div>
    "#
    )
}
