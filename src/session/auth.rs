//! Login state machine
//!
//! ```text
//! Init ──cached──▶ Restore ──▶ Attempt
//!   └──────────────────────────▶ Attempt ──ok──────────────▶ Authenticated
//!                                   ├──two factor──▶ AwaitingSecondFactor ──ok──▶ Authenticated
//!                                   ├──challenge───▶ Blocked
//!                                   └──other───────▶ error
//! ```
//!
//! Any failure while submitting the second factor is returned as an error.

use tracing::{debug, info, warn};

use super::SessionStore;
use crate::{
    Error, Result,
    config::settings::AccountSettings,
    platform::PlatformClient,
    prompt::Prompt,
    types::{TwoFactorInfo, TwoFactorLogin},
};

/// Intermediate and terminal login states
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Init,
    Restore,
    Attempt,
    AwaitingSecondFactor(TwoFactorInfo),
    Authenticated(u64),
    Blocked,
}

/// How a login run ended, when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Logged in as `user_id`
    Authenticated { user_id: u64 },
    /// The platform demanded an anti-automation challenge
    Blocked,
}

/// Drives the platform client through login
pub struct AuthController<'a, C: ?Sized, P: ?Sized> {
    client: &'a C,
    store: &'a SessionStore,
    prompt: &'a P,
    account: &'a AccountSettings,
}

impl<'a, C, P> AuthController<'a, C, P>
where
    C: PlatformClient + ?Sized,
    P: Prompt + ?Sized,
{
    pub fn new(
        client: &'a C,
        store: &'a SessionStore,
        prompt: &'a P,
        account: &'a AccountSettings,
    ) -> Self {
        Self {
            client,
            store,
            prompt,
            account,
        }
    }

    /// Run the state machine to a terminal state
    pub async fn authenticate(&self) -> Result<AuthOutcome> {
        let mut state = AuthState::Init;

        loop {
            debug!("Auth state: {:?}", state);
            state = match state {
                AuthState::Init if self.store.exists() => AuthState::Restore,
                AuthState::Init => AuthState::Attempt,
                AuthState::Restore => {
                    let cached = self.store.load().await?;
                    self.client.restore_state(cached).await?;
                    info!("Restored cached session from {:?}", self.store.path());
                    AuthState::Attempt
                }
                AuthState::Attempt => self.attempt().await?,
                AuthState::AwaitingSecondFactor(info) => self.second_factor(&info).await?,
                AuthState::Authenticated(user_id) => {
                    let snapshot = self.client.serialize_state().await?;
                    self.store.save(&snapshot).await?;
                    info!("Logged in as {} ({})", self.account.username, user_id);
                    return Ok(AuthOutcome::Authenticated { user_id });
                }
                AuthState::Blocked => {
                    warn!("Challenge required");
                    return Ok(AuthOutcome::Blocked);
                }
            };
        }
    }

    async fn attempt(&self) -> Result<AuthState> {
        match self
            .client
            .login(&self.account.username, &self.account.password)
            .await
        {
            Ok(user) => Ok(AuthState::Authenticated(user.pk)),
            Err(Error::TwoFactorRequired(info)) => Ok(AuthState::AwaitingSecondFactor(info)),
            Err(Error::ChallengeRequired) => Ok(AuthState::Blocked),
            Err(e) => Err(e),
        }
    }

    async fn second_factor(&self, info: &TwoFactorInfo) -> Result<AuthState> {
        let method = info.verification_method();
        let code = self
            .prompt
            .ask(&format!("Enter code received via {}", method))
            .await?;

        let user = self
            .client
            .two_factor_login(&TwoFactorLogin::new(info, code))
            .await?;
        Ok(AuthState::Authenticated(user.pk))
    }
}
