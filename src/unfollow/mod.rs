//! Finding and removing one-sided follows
//!
//! - [`collect`] drains a follower or following feed
//! - [`diff`] keeps the accounts that do not follow back
//! - [`UnfollowDriver`] unfollows them one by one at a randomized pace

pub mod collector;
pub mod diff;
pub mod driver;

pub use collector::collect;
pub use diff::diff;
pub use driver::{DelayPolicy, UnfollowDriver, UnfollowReport, is_excluded};
