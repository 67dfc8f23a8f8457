use std::sync::Arc;
use crate::domain::ports::{EmailService, InvitationRepository, UserRepository};
use crate::domain::services::{auth_service::AuthService, invitation_service::InvitationService};
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub invitation_repo: Arc<dyn InvitationRepository>,
    pub invitation_service: Arc<InvitationService>,
    pub auth_service: Arc<AuthService>,
    pub email_service: Arc<dyn EmailService>,
    pub templates: Arc<Tera>,
}
