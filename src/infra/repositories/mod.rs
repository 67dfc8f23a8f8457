pub mod sqlite_invitation_repo;
pub mod sqlite_user_repo;

pub mod postgres_invitation_repo;
pub mod postgres_user_repo;
