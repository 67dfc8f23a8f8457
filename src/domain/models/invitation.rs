use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use rand::RngCore;

/// A pending invitation. The token is the redemption capability: 16 random
/// bytes hex-encoded, unique, and consumed (record deleted) on redemption.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Invitation {
    pub id: String,
    pub email: String,
    pub role: String,
    pub token: String,
    pub date: DateTime<Utc>,
}

impl Invitation {
    pub fn new(email: String, role: String) -> Self {
        let mut bytes = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut bytes);

        Self {
            id: Uuid::new_v4().to_string(),
            email,
            role,
            token: hex::encode(bytes),
            date: Utc::now(),
        }
    }
}
