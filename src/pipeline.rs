//! End-to-end unfollow run
//!
//! Login, both listings, the reciprocity check and the unfollow loop, in
//! that order, over a single client instance.

use tracing::{debug, info, warn};

use crate::{
    Result,
    config::Settings,
    platform::PlatformClient,
    prompt::Prompt,
    session::{AuthController, AuthOutcome, SessionStore},
    unfollow::{UnfollowDriver, UnfollowReport, collect, diff},
};

/// How a pipeline run ended, when it did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// All candidates were processed
    Completed(UnfollowReport),
    /// Login hit an anti-automation challenge; nothing else was attempted
    Blocked,
}

/// One run of the tool against one account
pub struct Pipeline<'a, C, P: ?Sized> {
    client: &'a C,
    store: &'a SessionStore,
    prompt: &'a P,
    settings: &'a Settings,
}

impl<'a, C, P> Pipeline<'a, C, P>
where
    C: PlatformClient,
    P: Prompt + ?Sized,
{
    pub fn new(
        client: &'a C,
        store: &'a SessionStore,
        prompt: &'a P,
        settings: &'a Settings,
    ) -> Self {
        Self {
            client,
            store,
            prompt,
            settings,
        }
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        let auth = AuthController::new(
            self.client,
            self.store,
            self.prompt,
            &self.settings.account,
        );
        let login_id = match auth.authenticate().await? {
            AuthOutcome::Authenticated { user_id } => user_id,
            AuthOutcome::Blocked => {
                warn!("Login needs a challenge to be solved in the app; not touching follows");
                return Ok(RunOutcome::Blocked);
            }
        };

        // Listings are keyed by the session's own account id
        let user_id = match self.client.cookie_user_id().await {
            Some(session_id) => {
                if session_id != login_id {
                    debug!(
                        "Session account {} differs from login account {}",
                        session_id, login_id
                    );
                }
                session_id
            }
            None => login_id,
        };

        let followers = collect(&mut self.client.followers_feed(user_id)).await?;
        info!("Fetched {} followers", followers.len());

        let following = collect(&mut self.client.following_feed(user_id)).await?;
        info!("Fetched {} followed accounts", following.len());

        let candidates = diff(&following, &followers);
        info!("{} accounts do not follow back", candidates.len());

        let report = UnfollowDriver::from_settings(self.client, &self.settings.unfollow)?
            .run(&candidates, &self.settings.unfollow.exclude)
            .await?;

        info!(
            "Finished: {} unfollowed, {} skipped",
            report.unfollowed.len(),
            report.skipped.len()
        );
        Ok(RunOutcome::Completed(report))
    }
}
