use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct AcceptInvitationResponse {
    pub user_id: String,
}

#[derive(Serialize)]
pub struct UserFeedEntry {
    pub id: String,
    pub email: String,
    pub roles: Vec<String>,
}

#[derive(Serialize)]
pub struct InvitationFeedEntry {
    pub id: String,
    pub email: String,
    pub role: String,
    pub date: DateTime<Utc>,
}

/// The admin `users` feed: account records plus pending invitations. Both
/// lists are empty for non-admin callers.
#[derive(Serialize)]
pub struct UsersFeedResponse {
    pub users: Vec<UserFeedEntry>,
    pub invitations: Vec<InvitationFeedEntry>,
}

#[derive(Serialize)]
pub struct InvitePageResponse {
    pub id: String,
    pub email: String,
    pub role: String,
    pub date: DateTime<Utc>,
}
