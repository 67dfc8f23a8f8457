use crate::domain::{models::invitation::Invitation, ports::InvitationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteInvitationRepo {
    pool: SqlitePool,
}

impl SqliteInvitationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvitationRepository for SqliteInvitationRepo {
    async fn insert(&self, invitation: &Invitation) -> Result<Invitation, AppError> {
        sqlx::query_as::<_, Invitation>(
            "INSERT INTO invitations (id, email, role, token, date) VALUES (?, ?, ?, ?, ?) RETURNING id, email, role, token, date",
        )
            .bind(&invitation.id)
            .bind(&invitation.email)
            .bind(&invitation.role)
            .bind(&invitation.token)
            .bind(invitation.date)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Invitation>, AppError> {
        sqlx::query_as::<_, Invitation>(
            "SELECT id, email, role, token, date FROM invitations WHERE token = ?",
        )
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn claim_by_token(&self, token: &str) -> Result<Option<Invitation>, AppError> {
        // Single-statement delete keeps the claim atomic under concurrent
        // redemption attempts.
        sqlx::query_as::<_, Invitation>(
            "DELETE FROM invitations WHERE token = ? RETURNING id, email, role, token, date",
        )
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete_by_id(&self, id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM invitations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected())
    }

    async fn list(&self) -> Result<Vec<Invitation>, AppError> {
        sqlx::query_as::<_, Invitation>(
            "SELECT id, email, role, token, date FROM invitations ORDER BY date",
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
