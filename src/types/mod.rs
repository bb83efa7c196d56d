//! Type definitions for the unfollow tool
//!
//! This module contains the data model shared by the session, platform and
//! unfollow components.

pub mod challenge;
pub mod serde_helpers;
pub mod session;
pub mod user;

pub use challenge::{TwoFactorInfo, TwoFactorLogin, VerificationMethod};
pub use session::{AppConstants, DeviceInfo, SessionState};
pub use user::UserRecord;
