//! Security module - Token hygiene for logs and memory
//!
//! - Sanitizing tokens, emails and URLs before they reach a log line
//! - Zeroizing string storage for bearer tokens

mod sanitizer;
mod secure_string;

pub use sanitizer::{Sanitizer, SanitizerError};
pub use secure_string::SecureString;
