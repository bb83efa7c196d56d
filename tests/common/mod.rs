//! Common test utilities and helpers
//!
//! Scripted platform and prompt implementations shared by the integration
//! tests.

#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
};

use unfollow_nonfollowers::{
    Error, PlatformClient, Result, SessionState, Settings, UserRecord,
    platform::FeedPage,
    prompt::Prompt,
    types::TwoFactorLogin,
};

pub const SELF_ID: u64 = 42;

/// Platform double with scripted login results, paged listings and a log of
/// every call
pub struct MockPlatform {
    login_result: Mutex<Option<Result<UserRecord>>>,
    two_factor_result: Mutex<Option<Result<UserRecord>>>,
    followers: Mutex<HashMap<Option<String>, FeedPage>>,
    following: Mutex<HashMap<Option<String>, FeedPage>>,
    fail_on: Option<u64>,
    session_id: Option<u64>,
    pub calls: Mutex<Vec<String>>,
    pub destroyed: Mutex<Vec<u64>>,
    pub two_factor_calls: Mutex<Vec<TwoFactorLogin>>,
    pub restored: Mutex<Option<SessionState>>,
}

impl MockPlatform {
    /// Logs in as [`SELF_ID`] with empty listings
    pub fn new() -> Self {
        Self {
            login_result: Mutex::new(Some(Ok(UserRecord::new(SELF_ID, "me")))),
            two_factor_result: Mutex::new(None),
            followers: Mutex::new(HashMap::new()),
            following: Mutex::new(HashMap::new()),
            fail_on: None,
            session_id: Some(SELF_ID),
            calls: Mutex::new(Vec::new()),
            destroyed: Mutex::new(Vec::new()),
            two_factor_calls: Mutex::new(Vec::new()),
            restored: Mutex::new(None),
        }
    }

    pub fn with_login(self, result: Result<UserRecord>) -> Self {
        *self.login_result.lock().unwrap() = Some(result);
        self
    }

    pub fn with_two_factor(self, result: Result<UserRecord>) -> Self {
        *self.two_factor_result.lock().unwrap() = Some(result);
        self
    }

    /// Serve `pages` in order for the followers listing
    pub fn with_followers(self, pages: Vec<Vec<UserRecord>>) -> Self {
        *self.followers.lock().unwrap() = chain(pages);
        self
    }

    /// Serve `pages` in order for the following listing
    pub fn with_following(self, pages: Vec<Vec<UserRecord>>) -> Self {
        *self.following.lock().unwrap() = chain(pages);
        self
    }

    /// Account id reported by the session cookies
    pub fn with_session_id(mut self, session_id: Option<u64>) -> Self {
        self.session_id = session_id;
        self
    }

    /// Make `destroy_friendship` fail for `pk`
    pub fn failing_on(mut self, pk: u64) -> Self {
        self.fail_on = Some(pk);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> Vec<u64> {
        self.destroyed.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

/// Key each page by the cursor that requests it
fn chain(pages: Vec<Vec<UserRecord>>) -> HashMap<Option<String>, FeedPage> {
    let count = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(i, users)| {
            let cursor = (i > 0).then(|| format!("page{}", i));
            let next_max_id = (i + 1 < count).then(|| format!("page{}", i + 1));
            (cursor, FeedPage { users, next_max_id })
        })
        .collect()
}

fn serve(pages: &Mutex<HashMap<Option<String>, FeedPage>>, max_id: Option<&str>) -> FeedPage {
    pages
        .lock()
        .unwrap()
        .get(&max_id.map(str::to_string))
        .cloned()
        .unwrap_or_default()
}

#[async_trait::async_trait]
impl PlatformClient for MockPlatform {
    async fn login(&self, username: &str, _password: &str) -> Result<UserRecord> {
        self.record(format!("login:{}", username));
        self.login_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(Error::internal("login called twice")))
    }

    async fn two_factor_login(&self, params: &TwoFactorLogin) -> Result<UserRecord> {
        self.record("two_factor_login");
        self.two_factor_calls.lock().unwrap().push(params.clone());
        self.two_factor_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(Error::internal("two factor login not scripted")))
    }

    async fn followers_page(&self, user_id: u64, max_id: Option<&str>) -> Result<FeedPage> {
        self.record(format!("followers:{}:{}", user_id, max_id.unwrap_or("-")));
        Ok(serve(&self.followers, max_id))
    }

    async fn following_page(&self, user_id: u64, max_id: Option<&str>) -> Result<FeedPage> {
        self.record(format!("following:{}:{}", user_id, max_id.unwrap_or("-")));
        Ok(serve(&self.following, max_id))
    }

    async fn destroy_friendship(&self, pk: u64) -> Result<()> {
        self.record(format!("destroy:{}", pk));
        if self.fail_on == Some(pk) {
            return Err(Error::api(500, "unfollow rejected"));
        }
        self.destroyed.lock().unwrap().push(pk);
        Ok(())
    }

    async fn serialize_state(&self) -> Result<SessionState> {
        let mut state = SessionState::new("me");
        state
            .cookies
            .insert("ds_user_id".to_string(), SELF_ID.to_string());
        Ok(state)
    }

    async fn restore_state(&self, state: SessionState) -> Result<()> {
        self.record("restore_state");
        *self.restored.lock().unwrap() = Some(state);
        Ok(())
    }

    async fn cookie_user_id(&self) -> Option<u64> {
        self.session_id
    }
}

/// Prompt answering every question with the same text
pub struct FixedPrompt {
    answer: String,
    pub asked: Mutex<VecDeque<String>>,
}

impl FixedPrompt {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            asked: Mutex::new(VecDeque::new()),
        }
    }
}

#[async_trait::async_trait]
impl Prompt for FixedPrompt {
    async fn ask(&self, message: &str) -> Result<String> {
        self.asked.lock().unwrap().push_back(message.to_string());
        Ok(self.answer.clone())
    }
}

/// Settings with credentials and no pacing between unfollows
pub fn test_settings(exclude: &[&str]) -> Settings {
    let mut settings = Settings::default();
    settings.account.username = "me".to_string();
    settings.account.password = "secret".to_string();
    settings.unfollow.exclude = exclude.iter().map(|s| s.to_string()).collect();
    settings.unfollow.min_delay_ms = 0;
    settings.unfollow.max_delay_ms = 0;
    settings
}

pub fn users(names: &[(u64, &str)]) -> Vec<UserRecord> {
    names
        .iter()
        .map(|(pk, name)| UserRecord::new(*pk, *name))
        .collect()
}
