//! Session persistence and login
//!
//! [`SessionStore`] caches the client's session state on disk between runs;
//! [`AuthController`] restores it and walks the login state machine,
//! including the second-factor prompt.

pub mod auth;
pub mod store;

pub use auth::{AuthController, AuthOutcome, AuthState};
pub use store::SessionStore;
