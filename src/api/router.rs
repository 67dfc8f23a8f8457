use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, health, invitation, pages, users};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Invitations
        .route("/api/v1/invitations", post(invitation::send_invitation))
        .route("/api/v1/invitations/accept", post(invitation::accept_invitation))
        .route("/api/v1/invitations/{invitation_id}", delete(invitation::revoke_invitation))
        .route("/api/v1/invite/{token}", get(invitation::get_invitation_by_token))

        // Users feed & role management
        .route("/api/v1/users", get(users::users_feed))
        .route("/api/v1/users/{user_id}/role", put(users::set_role_on_user))

        // Guarded pages
        .route("/login", get(pages::login_page))
        .route("/users", get(pages::users_page))
        .route("/managers", get(pages::managers_page))
        .route("/employees", get(pages::employees_page))
        .route("/invite/{token}", get(pages::invite_page))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
