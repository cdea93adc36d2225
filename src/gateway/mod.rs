//! Gateway module - Authenticated HTTP access to the backend
//!
//! The gateway attaches the stored access token to each request. On a 401
//! it refreshes the token once, replays the request, and falls back to the
//! login page when the refresh itself fails.

mod base;
mod client;

pub use base::{GatewayError, GatewayState, RequestContext, REFRESH_PATH};
pub use client::Gateway;
