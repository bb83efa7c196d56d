//! Platform client capability
//!
//! The rest of the crate talks to the social platform only through the
//! [`PlatformClient`] trait, so login, pagination and unfollow logic can be
//! exercised against scripted implementations. [`InstagramClient`] is the
//! HTTP implementation used by the binary.

pub mod feed;
pub mod instagram;

pub use feed::{AccountFeed, FeedKind, FeedPage, PagedFeed};
pub use instagram::InstagramClient;

use crate::{
    Result,
    types::{SessionState, TwoFactorLogin, UserRecord},
};

/// Operations the unfollow pipeline needs from the platform
#[async_trait::async_trait]
pub trait PlatformClient: Send + Sync {
    /// Password login. Fails with `TwoFactorRequired` or
    /// `ChallengeRequired` when the platform asks for more.
    async fn login(&self, username: &str, password: &str) -> Result<UserRecord>;

    /// Complete a login with a second-factor code
    async fn two_factor_login(&self, params: &TwoFactorLogin) -> Result<UserRecord>;

    /// Fetch one page of the accounts following `user_id`
    async fn followers_page(&self, user_id: u64, max_id: Option<&str>) -> Result<FeedPage>;

    /// Fetch one page of the accounts `user_id` follows
    async fn following_page(&self, user_id: u64, max_id: Option<&str>) -> Result<FeedPage>;

    /// Stop following the account `pk`
    async fn destroy_friendship(&self, pk: u64) -> Result<()>;

    /// Snapshot of the current session state
    async fn serialize_state(&self) -> Result<SessionState>;

    /// Replace the session state with a previously saved one
    async fn restore_state(&self, state: SessionState) -> Result<()>;

    /// Account id of the authenticated session, if known
    async fn cookie_user_id(&self) -> Option<u64>;

    /// Feed over the accounts following `user_id`
    fn followers_feed(&self, user_id: u64) -> AccountFeed<'_, Self>
    where
        Self: Sized,
    {
        AccountFeed::new(self, FeedKind::Followers, user_id)
    }

    /// Feed over the accounts `user_id` follows
    fn following_feed(&self, user_id: u64) -> AccountFeed<'_, Self>
    where
        Self: Sized,
    {
        AccountFeed::new(self, FeedKind::Following, user_id)
    }
}

/// Callback run after every completed platform request
///
/// The client awaits the hook inline, so the session file is refreshed
/// before the next request is issued.
#[async_trait::async_trait]
pub trait SessionRefreshHook: Send + Sync {
    async fn on_session_refresh(&self, state: &SessionState) -> Result<()>;
}
