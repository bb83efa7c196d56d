//! Drains a paginated feed into memory

use std::collections::HashSet;

use crate::{Result, platform::PagedFeed, types::UserRecord};

/// Fetch every page of `feed`.
///
/// The first page is always requested: feeds only learn whether more pages
/// exist after a fetch. Accounts repeated across pages are kept once, at
/// their first position. A failed page fetch aborts the whole collection.
pub async fn collect<F>(feed: &mut F) -> Result<Vec<UserRecord>>
where
    F: PagedFeed + ?Sized,
{
    let mut seen = HashSet::new();
    let mut users = Vec::new();
    let mut pages = 0usize;

    loop {
        let page = feed.items().await?;
        pages += 1;
        users.extend(page.into_iter().filter(|user| seen.insert(user.pk)));

        if !feed.is_more_available() {
            break;
        }
    }

    tracing::debug!("Collected {} accounts over {} pages", users.len(), pages);
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::collections::VecDeque;

    /// Feed replaying canned pages; `more` flags are reported after each fetch
    struct CannedFeed {
        pages: VecDeque<Result<(Vec<UserRecord>, bool)>>,
        more: bool,
        fetches: usize,
    }

    impl CannedFeed {
        fn new(pages: Vec<Result<(Vec<UserRecord>, bool)>>) -> Self {
            Self {
                pages: pages.into(),
                more: false,
                fetches: 0,
            }
        }
    }

    #[async_trait::async_trait]
    impl PagedFeed for CannedFeed {
        async fn items(&mut self) -> Result<Vec<UserRecord>> {
            self.fetches += 1;
            let (users, more) = self
                .pages
                .pop_front()
                .unwrap_or_else(|| Err(Error::internal("fetched past the last page")))?;
            self.more = more;
            Ok(users)
        }

        fn is_more_available(&self) -> bool {
            self.more
        }
    }

    fn user(pk: u64, name: &str) -> UserRecord {
        UserRecord::new(pk, name)
    }

    #[tokio::test]
    async fn test_single_page_is_fetched_once() {
        let mut feed = CannedFeed::new(vec![Ok((vec![user(1, "alice")], false))]);
        assert!(!feed.is_more_available());

        let users = collect(&mut feed).await.unwrap();
        assert_eq!(users, vec![user(1, "alice")]);
        assert_eq!(feed.fetches, 1);
    }

    #[tokio::test]
    async fn test_empty_feed_still_fetches() {
        let mut feed = CannedFeed::new(vec![Ok((vec![], false))]);
        let users = collect(&mut feed).await.unwrap();
        assert!(users.is_empty());
        assert_eq!(feed.fetches, 1);
    }

    #[tokio::test]
    async fn test_multiple_pages_in_order() {
        let mut feed = CannedFeed::new(vec![
            Ok((vec![user(1, "alice"), user(2, "bob")], true)),
            Ok((vec![user(3, "carol")], true)),
            Ok((vec![user(4, "dave")], false)),
        ]);

        let users = collect(&mut feed).await.unwrap();
        let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, ["alice", "bob", "carol", "dave"]);
        assert_eq!(feed.fetches, 3);
    }

    #[tokio::test]
    async fn test_duplicates_across_pages_kept_once() {
        let mut feed = CannedFeed::new(vec![
            Ok((vec![user(1, "alice"), user(2, "bob")], true)),
            Ok((vec![user(2, "bob"), user(3, "carol")], false)),
        ]);

        let users = collect(&mut feed).await.unwrap();
        assert_eq!(users, vec![user(1, "alice"), user(2, "bob"), user(3, "carol")]);
    }

    #[tokio::test]
    async fn test_page_error_propagates() {
        let mut feed = CannedFeed::new(vec![
            Ok((vec![user(1, "alice")], true)),
            Err(Error::api(429, "Please wait a few minutes before you try again.")),
        ]);

        let result = collect(&mut feed).await;
        assert!(matches!(result, Err(Error::Api { status: 429, .. })));
        assert_eq!(feed.fetches, 2);
    }
}
