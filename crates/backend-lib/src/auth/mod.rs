// ============================
// livechat-backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.
//!
//! A token is the username it was issued for. There is no session store:
//! every protected request re-reads the user store to check the token.

pub mod bearer;
pub mod password;
mod service;

pub use bearer::BearerToken;
pub use password::{validate_new_password, MIN_PASSWORD_LENGTH};
pub use service::{AuthService, DefaultAuth};
