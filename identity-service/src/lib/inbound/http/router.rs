use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::forgot_password::forgot_password;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::reset_password::reset_password;
use super::handlers::verify_email::verify_email;
use crate::domain::user::ports::Notifier;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::service::AuthService;

pub struct AppState<R, N>
where
    R: UserRepository,
    N: Notifier,
{
    pub auth_service: Arc<AuthService<R, N>>,
    pub base_url: String,
}

// Manual impl: deriving would bound R and N themselves on Clone
impl<R, N> Clone for AppState<R, N>
where
    R: UserRepository,
    N: Notifier,
{
    fn clone(&self) -> Self {
        Self {
            auth_service: Arc::clone(&self.auth_service),
            base_url: self.base_url.clone(),
        }
    }
}

pub fn create_router<R, N>(auth_service: Arc<AuthService<R, N>>, base_url: String) -> Router
where
    R: UserRepository,
    N: Notifier,
{
    let state = AppState {
        auth_service,
        base_url,
    };

    let auth_routes = Router::new()
        .route("/api/auth/register", post(register::<R, N>))
        .route("/api/auth/verify/:token", get(verify_email::<R, N>))
        .route("/api/auth/login", post(login::<R, N>))
        .route("/api/auth/forgot", post(forgot_password::<R, N>))
        .route("/api/auth/reset/:token", post(reset_password::<R, N>));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    auth_routes
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
