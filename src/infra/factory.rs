use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use sha2::{Digest, Sha256};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::models::user::User;
use crate::domain::ports::UserRepository;
use crate::domain::services::access::ROLE_ADMIN;
use crate::domain::services::auth_service::{hash_password_digest, AuthService};
use crate::domain::services::invitation_service::InvitationService;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_invitation_repo::PostgresInvitationRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_invitation_repo::SqliteInvitationRepo, sqlite_user_repo::SqliteUserRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
        config.mail_from.clone(),
    ));

    let mut tera = Tera::default();
    tera.add_raw_template("invitation.html", include_str!("../templates/invitation.html"))
        .expect("Failed to load invitation template");
    let templates = Arc::new(tera);

    let state = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepo::new(pool.clone()));
        let invitation_repo = Arc::new(PostgresInvitationRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(config.clone()));
        let invitation_service = Arc::new(InvitationService::new(
            invitation_repo.clone(),
            user_repo.clone(),
            email_service.clone(),
            templates.clone(),
            config.clone(),
        ));

        AppState {
            config: config.clone(),
            user_repo,
            invitation_repo,
            invitation_service,
            auth_service,
            email_service,
            templates,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepo::new(pool.clone()));
        let invitation_repo = Arc::new(SqliteInvitationRepo::new(pool.clone()));
        let auth_service = Arc::new(AuthService::new(config.clone()));
        let invitation_service = Arc::new(InvitationService::new(
            invitation_repo.clone(),
            user_repo.clone(),
            email_service.clone(),
            templates.clone(),
            config.clone(),
        ));

        AppState {
            config: config.clone(),
            user_repo,
            invitation_repo,
            invitation_service,
            auth_service,
            email_service,
            templates,
        }
    };

    seed_admin(&state).await;

    state
}

/// Startup account generation: makes sure the configured admin exists so a
/// fresh deployment has someone able to issue invitations.
async fn seed_admin(state: &AppState) {
    let (Some(email), Some(password)) = (
        state.config.admin_email.clone(),
        state.config.admin_password.clone(),
    ) else {
        return;
    };

    let existing = state.user_repo.find_by_email(&email).await
        .expect("Failed to query admin account");
    if existing.is_some() {
        return;
    }

    // Same convention as the login client: the server only ever sees the
    // sha-256 digest of the password.
    let digest = hex::encode(Sha256::digest(password.as_bytes()));
    let password_hash = hash_password_digest(&digest)
        .expect("Failed to hash admin password");

    let admin = state.user_repo.create(&User::new(email.clone(), password_hash)).await
        .expect("Failed to create admin account");
    state.user_repo.set_role(&admin.id, ROLE_ADMIN).await
        .expect("Failed to assign admin role");

    info!("Seeded admin account {}", email);
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
