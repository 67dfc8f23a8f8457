pub mod access;
pub mod auth_service;
pub mod invitation_service;
