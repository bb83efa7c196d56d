//! unfollow-nonfollowers
//!
//! Finds the Instagram accounts you follow that do not follow you back and
//! unfollows them one at a time, pausing a random 1 to 7 seconds between
//! calls.
//!
//! # Architecture
//!
//! A run flows strictly downstream:
//! - [`session::SessionStore`] restores the cached session from disk
//! - [`session::AuthController`] logs in, prompting for a second-factor code
//!   when the platform asks for one
//! - [`unfollow::collect`] drains the follower and following feeds
//! - [`unfollow::diff`] keeps the followed accounts that do not follow back
//! - [`unfollow::UnfollowDriver`] unfollows them with randomized pacing
//!
//! [`pipeline::Pipeline`] wires these together over one
//! [`platform::PlatformClient`].
//!
//! # Usage
//!
//! ```bash
//! IG_USERNAME=me IG_PASSWORD=secret NOT_UNFOLLOW_IF_CONTAINS="bot, shop" unfollow-nonfollowers
//! ```
//!
//! # Examples
//!
//! ```rust
//! use unfollow_nonfollowers::{UserRecord, unfollow::diff};
//!
//! let following = vec![UserRecord::new(1, "alice"), UserRecord::new(2, "carol")];
//! let followers = vec![UserRecord::new(1, "alice")];
//!
//! let one_sided = diff(&following, &followers);
//! assert_eq!(one_sided, vec![UserRecord::new(2, "carol")]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod platform;
pub mod prompt;
pub mod session;
pub mod types;
pub mod unfollow;
pub mod utils;

pub use config::Settings;
pub use error::{Error, Result};
pub use pipeline::{Pipeline, RunOutcome};
pub use platform::{InstagramClient, PlatformClient};
pub use session::{AuthController, AuthOutcome, SessionStore};
pub use types::{SessionState, TwoFactorInfo, UserRecord};
