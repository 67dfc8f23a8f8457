use serde::Deserialize;

/// Client-side password digest, Meteor-style: the browser hashes the
/// plaintext once with sha-256 and only the digest crosses the wire.
#[derive(Deserialize)]
pub struct PasswordDigest {
    pub digest: String,
    pub algorithm: String,
}

impl PasswordDigest {
    pub fn is_supported(&self) -> bool {
        self.algorithm == "sha-256" && !self.digest.is_empty()
    }
}

#[derive(Deserialize)]
pub struct SendInvitationRequest {
    pub email: String,
    pub role: String,
}

#[derive(Deserialize)]
pub struct AcceptInvitationRequest {
    pub email: String,
    pub password: PasswordDigest,
    pub token: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: PasswordDigest,
}

#[derive(Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}
