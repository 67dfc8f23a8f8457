use crate::domain::models::{invitation::Invitation, user::User};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait InvitationRepository: Send + Sync {
    async fn insert(&self, invitation: &Invitation) -> Result<Invitation, AppError>;
    async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>, AppError>;
    /// Atomic find-and-delete. At most one caller can claim a given token;
    /// everyone else sees None.
    async fn claim_by_token(&self, token: &str) -> Result<Option<Invitation>, AppError>;
    /// Returns the number of deleted rows. Zero is not an error.
    async fn delete_by_id(&self, id: &str) -> Result<u64, AppError>;
    async fn list(&self) -> Result<Vec<Invitation>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn roles_for_user(&self, user_id: &str) -> Result<Vec<String>, AppError>;
    /// Replaces the user's role set with the single given role.
    async fn set_role(&self, user_id: &str, role: &str) -> Result<(), AppError>;
    /// All (user_id, role) assignments, for building the users feed.
    async fn list_role_assignments(&self) -> Result<Vec<(String, String)>, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError>;
}
