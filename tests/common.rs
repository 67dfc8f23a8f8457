use invite_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::repositories::{
        sqlite_invitation_repo::SqliteInvitationRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    domain::models::user::User,
    domain::ports::{EmailService, UserRepository},
    domain::services::auth_service::{hash_password_digest, AuthService},
    domain::services::invitation_service::InvitationService,
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tera::Tera;
use tower::ServiceExt;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
}

/// Records outbound mail instead of delivering it, so tests can pull the
/// redemption link out of the rendered body. Flip `fail` to simulate a
/// relay outage.
pub struct MockEmailService {
    pub outbox: Arc<Mutex<Vec<SentEmail>>>,
    pub fail: Arc<AtomicBool>,
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, recipient: &str, subject: &str, html_body: &str) -> Result<(), AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::MailSend("simulated relay outage".into()));
        }
        self.outbox.lock().unwrap().push(SentEmail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        });
        Ok(())
    }
}

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub outbox: Arc<Mutex<Vec<SentEmail>>>,
    pub mail_failure: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let mut tera = Tera::default();
        tera.add_raw_template(
            "invitation.html",
            "<html>Invitation: <a href=\"{{ url }}\">{{ url }}</a></html>",
        ).unwrap();
        let templates = Arc::new(tera);

        let priv_key_pem = include_str!("keys/test_private.pem");
        let pub_key_pem = include_str!("keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            domain: "banana.test".to_string(),
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            mail_from: "Jan Bananasmith <jan@banana.co>".to_string(),
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            admin_email: None,
            admin_password: None,
        };

        let outbox = Arc::new(Mutex::new(Vec::new()));
        let mail_failure = Arc::new(AtomicBool::new(false));
        let email_service = Arc::new(MockEmailService {
            outbox: outbox.clone(),
            fail: mail_failure.clone(),
        });

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

        let state = Arc::new(AppState {
            config,
            user_repo,
            invitation_repo,
            invitation_service,
            auth_service,
            email_service,
            templates,
        });

        let router = create_router(state.clone());

        Self { router, pool, db_filename, state, outbox, mail_failure }
    }

    /// Client-side password digest, as the browser would compute it.
    pub fn digest(password: &str) -> String {
        hex::encode(Sha256::digest(password.as_bytes()))
    }

    /// Creates an account directly in the store, with the given single role
    /// (or none for a roleless account).
    pub async fn seed_user(&self, email: &str, password: &str, role: Option<&str>) -> String {
        let password_hash = hash_password_digest(&Self::digest(password)).unwrap();
        let user = self.state.user_repo.create(&User::new(email.to_string(), password_hash))
            .await
            .expect("Failed to seed user");

        if let Some(role) = role {
            self.state.user_repo.set_role(&user.id, role).await.expect("Failed to seed role");
        }

        user.id
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthHeaders {
        let body = serde_json::json!({
            "email": email,
            "password": { "digest": Self::digest(password), "algorithm": "sha-256" },
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
        ).await.unwrap();

        assert!(response.status().is_success(), "login failed: {}", response.status());

        let access_token = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("access_token="))
            .map(|v| v.split(';').next().unwrap().trim_start_matches("access_token=").to_string())
            .expect("No access_token cookie set");

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        let csrf_token = json["csrf_token"].as_str().unwrap().to_string();

        AuthHeaders { access_token, csrf_token }
    }

    pub async fn get(&self, uri: &str, auth: Option<&AuthHeaders>) -> axum::http::Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(auth) = auth {
            builder = builder.header(header::COOKIE, format!("access_token={}", auth.access_token));
        }
        self.router.clone().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        body: &Value,
        auth: Option<&AuthHeaders>,
    ) -> axum::http::Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(auth) = auth {
            builder = builder
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token);
        }

        self.router.clone()
            .oneshot(builder.body(Body::from(serde_json::to_vec(body).unwrap())).unwrap())
            .await
            .unwrap()
    }
}

pub async fn body_json(response: axum::http::Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
