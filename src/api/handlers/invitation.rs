use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{AcceptInvitationRequest, SendInvitationRequest};
use crate::api::dtos::responses::{AcceptInvitationResponse, InvitePageResponse};
use crate::domain::services::access::{authorize, ROLE_ADMIN};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn send_invitation(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Json(payload): Json<SendInvitationRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&caller.roles, &[ROLE_ADMIN])?;

    let invitation = state.invitation_service.issue(&payload.email, &payload.role).await?;

    Ok(Json(serde_json::json!({
        "id": invitation.id,
        "email": invitation.email,
        "role": invitation.role,
        "date": invitation.date,
    })))
}

pub async fn accept_invitation(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AcceptInvitationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if !payload.password.is_supported() {
        return Err(AppError::Validation("Unsupported password digest".into()));
    }
    if payload.token.is_empty() {
        return Err(AppError::Validation("Token must not be empty".into()));
    }

    let user_id = state
        .invitation_service
        .redeem(&payload.email, &payload.password.digest, &payload.token)
        .await?;

    Ok(Json(AcceptInvitationResponse { user_id }))
}

pub async fn revoke_invitation(
    State(state): State<Arc<AppState>>,
    caller: AuthUser,
    Path(invitation_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&caller.roles, &[ROLE_ADMIN])?;

    state.invitation_service.revoke(&invitation_id).await?;
    info!("Revocation requested for invitation {}", invitation_id);

    Ok(Json(serde_json::json!({ "status": "revoked" })))
}

/// The `invite` feed: looks up the pending invitation for the redemption
/// page. Not role-gated; knowing the token is the capability.
pub async fn get_invitation_by_token(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let invitation = state.invitation_repo.find_by_token(&token).await?
        .ok_or(AppError::NotFound("Invitation not found".into()))?;

    Ok(Json(InvitePageResponse {
        id: invitation.id,
        email: invitation.email,
        role: invitation.role,
        date: invitation.date,
    }))
}
