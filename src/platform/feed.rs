//! Cursor-paginated account listings

use serde::Deserialize;

use super::PlatformClient;
use crate::{
    Result,
    types::{UserRecord, serde_helpers::deserialize_optional_cursor},
};

/// Which side of the follow graph a feed walks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    Followers,
    Following,
}

impl FeedKind {
    /// Path segment of the listing endpoint
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Followers => "followers",
            Self::Following => "following",
        }
    }
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.endpoint())
    }
}

/// One page of a follower or following listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedPage {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    /// Cursor for the next page; absent on the last page
    #[serde(default, deserialize_with = "deserialize_optional_cursor")]
    pub next_max_id: Option<String>,
}

/// A listing consumed page by page.
///
/// Availability is only known after a fetch: before the first call to
/// [`PagedFeed::items`] a feed reports no more pages.
#[async_trait::async_trait]
pub trait PagedFeed: Send {
    /// Fetch the next page
    async fn items(&mut self) -> Result<Vec<UserRecord>>;

    /// Whether the last fetch indicated another page
    fn is_more_available(&self) -> bool;
}

/// Feed handle over one account's followers or followees
#[derive(Debug)]
pub struct AccountFeed<'a, C: ?Sized> {
    client: &'a C,
    kind: FeedKind,
    user_id: u64,
    next_max_id: Option<String>,
    more_available: bool,
}

impl<'a, C: PlatformClient + ?Sized> AccountFeed<'a, C> {
    /// Create a feed positioned before its first page
    pub fn new(client: &'a C, kind: FeedKind, user_id: u64) -> Self {
        Self {
            client,
            kind,
            user_id,
            next_max_id: None,
            more_available: false,
        }
    }
}

#[async_trait::async_trait]
impl<C: PlatformClient + ?Sized> PagedFeed for AccountFeed<'_, C> {
    async fn items(&mut self) -> Result<Vec<UserRecord>> {
        let cursor = self.next_max_id.as_deref();
        let page = match self.kind {
            FeedKind::Followers => self.client.followers_page(self.user_id, cursor).await?,
            FeedKind::Following => self.client.following_page(self.user_id, cursor).await?,
        };

        self.more_available = page.next_max_id.is_some();
        self.next_max_id = page.next_max_id;
        tracing::debug!(
            "Fetched {} {} (more available: {})",
            page.users.len(),
            self.kind,
            self.more_available
        );
        Ok(page.users)
    }

    fn is_more_available(&self) -> bool {
        self.more_available
    }
}
