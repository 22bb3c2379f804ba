/// OAuth2 tokens, grants and authorization responses
pub mod auth;
/// Active business context
pub mod context;
/// Header set, URL joining and status mapping
pub mod http;
/// Authenticated user, memberships and roles
pub mod identity;
/// Resource endpoint paths
pub mod requests;
/// Response envelope helpers
pub mod responses;
/// Token endpoint client authentication
pub mod signing;
