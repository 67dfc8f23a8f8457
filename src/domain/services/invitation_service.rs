use std::sync::Arc;
use crate::config::Config;
use crate::domain::models::{invitation::Invitation, user::User};
use crate::domain::ports::{EmailService, InvitationRepository, UserRepository};
use crate::domain::services::access;
use crate::domain::services::auth_service::hash_password_digest;
use crate::error::AppError;
use tera::{Context, Tera};
use tracing::{info, warn};

const INVITATION_SUBJECT: &str = "Invitation to Banana Co.";
const INVITATION_TEMPLATE: &str = "invitation.html";

/// Issues, redeems and revokes invitations. Handlers receive this through
/// AppState; it owns no state beyond its collaborators.
pub struct InvitationService {
    invitations: Arc<dyn InvitationRepository>,
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn EmailService>,
    templates: Arc<Tera>,
    config: Config,
}

impl InvitationService {
    pub fn new(
        invitations: Arc<dyn InvitationRepository>,
        users: Arc<dyn UserRepository>,
        mailer: Arc<dyn EmailService>,
        templates: Arc<Tera>,
        config: Config,
    ) -> Self {
        Self { invitations, users, mailer, templates, config }
    }

    /// Creates a pending invitation and emails the redemption link. Issuing
    /// twice for one address yields two independent pending invitations.
    pub async fn issue(&self, email: &str, role: &str) -> Result<Invitation, AppError> {
        if email.trim().is_empty() {
            return Err(AppError::Validation("Email must not be empty".into()));
        }
        if !access::is_known_role(role) {
            return Err(AppError::Validation(format!("Unknown role: {}", role)));
        }

        let invitation = Invitation::new(email.to_string(), role.to_string());
        let created = self.invitations.insert(&invitation).await?;

        let html = self.render_invitation_email(&created.token)?;
        self.mailer.send(&created.email, INVITATION_SUBJECT, &html).await?;

        info!("Issued invitation {} for role {}", created.id, created.role);
        Ok(created)
    }

    /// Redeems a token: claims the invitation, creates the account, assigns
    /// the invited role. The claim is an atomic find-and-delete, so a token
    /// can be redeemed at most once even under concurrent attempts.
    pub async fn redeem(&self, email: &str, password_digest: &str, token: &str) -> Result<String, AppError> {
        let invitation = self
            .invitations
            .claim_by_token(token)
            .await?
            .ok_or_else(|| AppError::NotFound("Invitation not found".into()))?;

        // The unique email column still backstops the race window between
        // this check and the insert.
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".into()));
        }

        let password_hash = hash_password_digest(password_digest)?;
        let user = self.users.create(&User::new(email.to_string(), password_hash)).await?;

        // The account now exists; a failure past this point must be reported
        // distinctly so the orphaned user can be repaired.
        if let Err(e) = self.users.set_role(&user.id, &invitation.role).await {
            warn!("Role assignment failed after creating user {}: {:?}", user.id, e);
            return Err(AppError::PartialRedemption { user_id: user.id });
        }

        info!("Invitation {} redeemed by user {}", invitation.id, user.id);
        Ok(user.id)
    }

    /// Deletes a pending invitation. Revoking an id that no longer exists
    /// (already redeemed or already revoked) is a no-op, not an error.
    pub async fn revoke(&self, invitation_id: &str) -> Result<(), AppError> {
        let deleted = self.invitations.delete_by_id(invitation_id).await?;
        if deleted == 0 {
            info!("Revoke of {} matched no invitation", invitation_id);
        } else {
            info!("Revoked invitation {}", invitation_id);
        }
        Ok(())
    }

    fn render_invitation_email(&self, token: &str) -> Result<String, AppError> {
        let url = format!("http://{}/invite/{}", self.config.domain, token);

        let mut context = Context::new();
        context.insert("url", &url);

        self.templates
            .render(INVITATION_TEMPLATE, &context)
            .map_err(|e| AppError::InternalWithMsg(format!("Template render failed: {}", e)))
    }
}
