pub mod auth;
pub mod tab;
