pub mod admin;
pub mod auth;
pub mod confess;
pub mod health;
