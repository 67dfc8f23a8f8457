use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use crate::state::AppState;
use crate::api::extractors::maybe_auth::MaybeAuthUser;
use crate::domain::services::access::{self, Decision, RouteRule};
use crate::error::AppError;
use std::sync::Arc;

/// Runs the route guard and either serves the page marker or answers with
/// the role-based redirect. Page content itself is the frontend's concern;
/// the backend only decides access.
fn guarded_page(rule: &RouteRule, session: &MaybeAuthUser) -> Response {
    let roles = session.0.as_ref().map(|u| u.roles.as_slice());

    match access::evaluate(rule, roles) {
        Decision::Allow => Json(serde_json::json!({ "page": rule.name })).into_response(),
        Decision::Redirect(path) => Redirect::to(path).into_response(),
    }
}

pub async fn users_page(session: MaybeAuthUser) -> Response {
    guarded_page(&access::USERS_ROUTE, &session)
}

pub async fn managers_page(session: MaybeAuthUser) -> Response {
    guarded_page(&access::MANAGERS_ROUTE, &session)
}

pub async fn employees_page(session: MaybeAuthUser) -> Response {
    guarded_page(&access::EMPLOYEES_ROUTE, &session)
}

pub async fn login_page() -> impl IntoResponse {
    Json(serde_json::json!({ "page": "login" }))
}

/// Public redemption page, reachable from the emailed link.
pub async fn invite_page(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let invitation = state.invitation_repo.find_by_token(&token).await?
        .ok_or(AppError::NotFound("Invitation not found".into()))?;

    Ok(Json(serde_json::json!({
        "page": "invite",
        "invitation": {
            "id": invitation.id,
            "email": invitation.email,
            "role": invitation.role,
            "date": invitation.date,
        }
    })))
}
