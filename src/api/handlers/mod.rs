pub mod auth;
pub mod health;
pub mod invitation;
pub mod pages;
pub mod users;
