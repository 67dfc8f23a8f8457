use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::SetRoleRequest;
use crate::api::dtos::responses::{InvitationFeedEntry, UserFeedEntry, UsersFeedResponse};
use crate::domain::services::access::{authorize, has_role, is_known_role, ROLE_ADMIN};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// The `users` feed: all accounts plus pending invitations. Non-admin
/// callers get an empty feed rather than an error, matching the
/// publication-style contract the frontend expects.
pub async fn users_feed(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    if !has_role(&caller.roles, ROLE_ADMIN) {
        return Ok(Json(UsersFeedResponse { users: vec![], invitations: vec![] }));
    }

    let users = state.user_repo.list().await?;
    let assignments = state.user_repo.list_role_assignments().await?;

    let mut roles_by_user: HashMap<String, Vec<String>> = HashMap::new();
    for (user_id, role) in assignments {
        roles_by_user.entry(user_id).or_default().push(role);
    }

    let users = users
        .into_iter()
        .map(|u| UserFeedEntry {
            roles: roles_by_user.remove(&u.id).unwrap_or_default(),
            id: u.id,
            email: u.email,
        })
        .collect();

    let invitations = state
        .invitation_repo
        .list()
        .await?
        .into_iter()
        .map(|i| InvitationFeedEntry { id: i.id, email: i.email, role: i.role, date: i.date })
        .collect();

    Ok(Json(UsersFeedResponse { users, invitations }))
}

pub async fn set_role_on_user(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(user_id): Path<String>,
    Json(payload): Json<SetRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&caller.roles, &[ROLE_ADMIN])?;

    if !is_known_role(&payload.role) {
        return Err(AppError::Validation(format!("Unknown role: {}", payload.role)));
    }

    let user = state.user_repo.find_by_id(&user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    state.user_repo.set_role(&user.id, &payload.role).await?;
    info!("Set role {} on user {}", payload.role, user.id);

    Ok(Json(serde_json::json!({
        "id": user.id,
        "roles": [payload.role],
    })))
}
