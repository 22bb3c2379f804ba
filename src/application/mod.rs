/// OAuth2 token flow shared by both clients
pub mod auth;
/// Blocking client
pub mod blocking;
/// Async client
pub mod client;
/// Application configuration module
pub mod config;
/// Service interfaces
pub mod interfaces;
/// Session state: tokens, current user and active business
pub mod session;
