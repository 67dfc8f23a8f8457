pub mod auth;
pub mod invitation;
pub mod user;
