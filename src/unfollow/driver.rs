//! Throttled unfollow loop
//!
//! Candidates are processed strictly in order, one platform call at a time,
//! with a random pause after each call so the traffic looks like a person
//! clicking through a list. A failed call stops the run.

use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};

use crate::{
    Error, Result, config::settings::UnfollowSettings, platform::PlatformClient,
    types::UserRecord,
};

/// Bounds of the pause after each unfollow call, inclusive, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayPolicy {
    min_ms: u64,
    max_ms: u64,
}

impl Default for DelayPolicy {
    fn default() -> Self {
        Self {
            min_ms: 1000,
            max_ms: 7000,
        }
    }
}

impl DelayPolicy {
    /// Create a policy; `min_ms` must not exceed `max_ms`
    pub fn new(min_ms: u64, max_ms: u64) -> Result<Self> {
        if min_ms > max_ms {
            return Err(Error::config(format!(
                "Minimum delay {}ms exceeds maximum delay {}ms",
                min_ms, max_ms
            )));
        }
        Ok(Self { min_ms, max_ms })
    }

    /// No pause at all
    pub fn none() -> Self {
        Self {
            min_ms: 0,
            max_ms: 0,
        }
    }

    /// Draw a pause uniformly from `[min_ms, max_ms]`
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        Duration::from_millis(rng.random_range(self.min_ms..=self.max_ms))
    }
}

/// What a driver run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnfollowReport {
    /// Accounts unfollowed (or that would have been, in dry-run mode)
    pub unfollowed: Vec<UserRecord>,
    /// Accounts protected by the exclusion list
    pub skipped: Vec<UserRecord>,
}

/// Whether any exclusion word occurs in `username`.
///
/// Plain case-sensitive substring test; empty words are removed when the
/// list is parsed (see [`crate::config::drop_empty_exclusions`]).
pub fn is_excluded(username: &str, exclude: &[String]) -> bool {
    exclude.iter().any(|word| username.contains(word.as_str()))
}

/// Issues remove-relationship calls for a candidate list
#[derive(Debug)]
pub struct UnfollowDriver<'a, C: ?Sized> {
    client: &'a C,
    delay: DelayPolicy,
    dry_run: bool,
}

impl<'a, C: PlatformClient + ?Sized> UnfollowDriver<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self {
            client,
            delay: DelayPolicy::default(),
            dry_run: false,
        }
    }

    /// Build a driver from the unfollow settings
    pub fn from_settings(client: &'a C, settings: &UnfollowSettings) -> Result<Self> {
        Ok(Self::new(client)
            .with_delay(DelayPolicy::new(settings.min_delay_ms, settings.max_delay_ms)?)
            .with_dry_run(settings.dry_run))
    }

    pub fn with_delay(mut self, delay: DelayPolicy) -> Self {
        self.delay = delay;
        self
    }

    /// Log intended unfollows without calling the platform or pausing
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Unfollow every candidate not matched by `exclude`, in order
    pub async fn run(
        &self,
        candidates: &[UserRecord],
        exclude: &[String],
    ) -> Result<UnfollowReport> {
        let mut report = UnfollowReport::default();

        for user in candidates {
            if is_excluded(&user.username, exclude) {
                info!(
                    "Skipping {} because it's in the list of words to not unfollow",
                    user.username
                );
                report.skipped.push(user.clone());
                continue;
            }

            if self.dry_run {
                info!("Would unfollow {}", user.username);
                report.unfollowed.push(user.clone());
                continue;
            }

            info!("Unfollowing {}", user.username);
            self.client.destroy_friendship(user.pk).await?;
            report.unfollowed.push(user.clone());

            let pause = self.delay.sample(&mut rand::rng());
            debug!("Waiting {}ms before the next unfollow", pause.as_millis());
            tokio::time::sleep(pause).await;
        }

        Ok(report)
    }
}
