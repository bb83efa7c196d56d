//! Instagram private API client
//!
//! Emulates the Android app closely enough for login, follow listings and
//! unfollow calls. Every response is folded into the session state
//! (cookies, bearer authorization, account id) and then handed to the
//! refresh hook before its body is decoded. Error responses are mapped
//! onto [`crate::Error`] kinds here and nowhere else.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::{Client, Method, Proxy, Response, StatusCode, header::HeaderMap};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{FeedKind, FeedPage, PlatformClient, SessionRefreshHook};
use crate::{
    Error, Result,
    config::settings::NetworkSettings,
    types::{SessionState, TwoFactorInfo, TwoFactorLogin, UserRecord},
};

const APP_ID: &str = "567067343352427";
const AUTHORIZATION_PREFIX: &str = "Bearer IGT:2:";

/// HTTP implementation of [`PlatformClient`]
pub struct InstagramClient {
    http: Client,
    base_url: String,
    state: RwLock<SessionState>,
    refresh_hook: Option<Arc<dyn SessionRefreshHook>>,
}

impl std::fmt::Debug for InstagramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstagramClient")
            .field("base_url", &self.base_url)
            .field("refresh_hook", &self.refresh_hook.is_some())
            .finish_non_exhaustive()
    }
}

/// Body shape shared by platform error responses
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    two_factor_required: bool,
    #[serde(default)]
    two_factor_info: Option<TwoFactorInfo>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    logged_in_user: UserRecord,
}

impl InstagramClient {
    /// Create a client for `username`, generating its device identity and
    /// applying proxy and timeout settings.
    pub fn new(username: &str, network: &NetworkSettings) -> Result<Self> {
        let mut builder = Client::builder().timeout(network.request_timeout);

        if let Some(proxy_url) = &network.proxy_url {
            let proxy = Proxy::all(proxy_url)
                .map_err(|e| Error::config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
        }

        let mut state = SessionState::new(username);
        state.proxy_url = network.proxy_url.clone();

        Ok(Self {
            http: builder.build()?,
            base_url: network.base_url.trim_end_matches('/').to_string(),
            state: RwLock::new(state),
            refresh_hook: None,
        })
    }

    /// Attach the hook run after every completed request
    pub fn with_refresh_hook(mut self, hook: Arc<dyn SessionRefreshHook>) -> Self {
        self.refresh_hook = Some(hook);
        self
    }

    /// Issue one request, fold the response into the session state, run
    /// the refresh hook, then decode the body.
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        form: Option<Value>,
    ) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut request = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }

        {
            let state = self.state.read().await;
            request = request
                .header("User-Agent", state.user_agent())
                .header("X-IG-App-ID", APP_ID)
                .header("X-IG-Device-ID", &state.device.uuid)
                .header("X-IG-Android-ID", &state.device.device_id)
                .header("X-IG-App-Locale", state.constants().language);
            if let Some(authorization) = &state.authorization {
                request = request.header("Authorization", authorization);
            }
            if let Some(cookies) = state.cookie_header() {
                request = request.header("Cookie", cookies);
            }
        }

        if let Some(payload) = form {
            request = request.form(&[("signed_body", format!("SIGNATURE.{}", payload))]);
        }

        debug!("{} {}", method, url);
        let response = request.send().await?;
        let status = response.status();
        self.absorb_headers(response.headers()).await;
        let body = read_body(response).await?;
        self.notify_refresh().await;

        decode_response(status, &body)
    }

    /// Update cookies and authorization from response headers
    async fn absorb_headers(&self, headers: &HeaderMap) {
        let mut state = self.state.write().await;

        for value in headers.get_all(reqwest::header::SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            if let Some((name, value)) = parse_set_cookie(raw) {
                if value.is_empty() || value == "\"\"" {
                    state.cookies.remove(&name);
                } else {
                    state.cookies.insert(name, value);
                }
            }
        }

        if let Some(authorization) = headers
            .get("ig-set-authorization")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty() && !v.ends_with(':'))
        {
            if let Some(user_id) = user_id_from_authorization(authorization) {
                state.cookie_user_id = Some(user_id);
            }
            state.authorization = Some(authorization.to_string());
        }

        if let Some(user_id) = headers
            .get("ig-set-ig-u-ds-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
        {
            state.cookie_user_id = Some(user_id);
        }
    }

    async fn notify_refresh(&self) {
        let Some(hook) = &self.refresh_hook else {
            return;
        };
        let snapshot = self.state.read().await.clone();
        if let Err(e) = hook.on_session_refresh(&snapshot).await {
            warn!("Failed to persist session state: {}", e);
        }
    }

    /// One page of a follow listing; the cursor travels URL-encoded
    async fn listing_page(
        &self,
        kind: FeedKind,
        user_id: u64,
        max_id: Option<&str>,
    ) -> Result<FeedPage> {
        let path = format!("friendships/{}/{}/", user_id, kind.endpoint());
        let query: Vec<(&str, &str)> = max_id
            .map(|cursor| ("max_id", cursor))
            .into_iter()
            .collect();
        let body = self.request(Method::GET, &path, &query, None).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn signed_form(&self, mut fields: Value) -> Value {
        let state = self.state.read().await;
        if let Value::Object(map) = &mut fields {
            map.insert("_uuid".to_string(), json!(state.device.uuid));
            map.insert("device_id".to_string(), json!(state.device.device_id));
            if let Some(csrf) = state.cookies.get("csrftoken") {
                map.insert("_csrftoken".to_string(), json!(csrf));
            }
        }
        fields
    }
}

#[async_trait::async_trait]
impl PlatformClient for InstagramClient {
    async fn login(&self, username: &str, password: &str) -> Result<UserRecord> {
        let (phone_id, adid, guid) = {
            let state = self.state.read().await;
            (
                state.device.phone_id.clone(),
                state.device.adid.clone(),
                state.device.uuid.clone(),
            )
        };
        let form = self
            .signed_form(json!({
                "username": username,
                "enc_password": format!(
                    "#PWD_INSTAGRAM:0:{}:{}",
                    chrono::Utc::now().timestamp(),
                    password
                ),
                "guid": guid,
                "phone_id": phone_id,
                "adid": adid,
                "google_tokens": "[]",
                "login_attempt_count": "0",
            }))
            .await;

        let body = self
            .request(Method::POST, "accounts/login/", &[], Some(form))
            .await?;
        let response: LoginResponse = serde_json::from_value(body)?;
        self.state.write().await.cookie_user_id = Some(response.logged_in_user.pk);
        Ok(response.logged_in_user)
    }

    async fn two_factor_login(&self, params: &TwoFactorLogin) -> Result<UserRecord> {
        let phone_id = self.state.read().await.device.phone_id.clone();
        let form = self
            .signed_form(json!({
                "username": params.username,
                "verification_code": params.verification_code,
                "two_factor_identifier": params.two_factor_identifier,
                "verification_method": params.verification_method.code(),
                "trust_this_device": if params.trust_this_device { "1" } else { "0" },
                "phone_id": phone_id,
            }))
            .await;

        let body = self
            .request(Method::POST, "accounts/two_factor_login/", &[], Some(form))
            .await?;
        let response: LoginResponse = serde_json::from_value(body)?;
        self.state.write().await.cookie_user_id = Some(response.logged_in_user.pk);
        Ok(response.logged_in_user)
    }

    async fn followers_page(&self, user_id: u64, max_id: Option<&str>) -> Result<FeedPage> {
        self.listing_page(FeedKind::Followers, user_id, max_id).await
    }

    async fn following_page(&self, user_id: u64, max_id: Option<&str>) -> Result<FeedPage> {
        self.listing_page(FeedKind::Following, user_id, max_id).await
    }

    async fn destroy_friendship(&self, pk: u64) -> Result<()> {
        let form = self
            .signed_form(json!({
                "user_id": pk.to_string(),
                "radio_type": "wifi-none",
            }))
            .await;
        self.request(
            Method::POST,
            &format!("friendships/destroy/{}/", pk),
            &[],
            Some(form),
        )
        .await?;
        Ok(())
    }

    async fn serialize_state(&self) -> Result<SessionState> {
        Ok(self.state.read().await.clone())
    }

    async fn restore_state(&self, restored: SessionState) -> Result<()> {
        let mut state = self.state.write().await;
        let constants = state.constants.take();
        let proxy_url = state.proxy_url.clone();
        *state = restored;
        // Restored blobs never carry constants; keep the current build's.
        if state.constants.is_none() {
            state.constants = constants;
        }
        if proxy_url.is_some() {
            state.proxy_url = proxy_url;
        }
        Ok(())
    }

    async fn cookie_user_id(&self) -> Option<u64> {
        self.state.read().await.user_id()
    }
}

async fn read_body(response: Response) -> Result<String> {
    Ok(response.text().await?)
}

/// Map a response onto either its JSON body or the matching error kind
fn decode_response(status: StatusCode, body: &str) -> Result<Value> {
    let value: Option<Value> = serde_json::from_str(body).ok();
    let failed = value
        .as_ref()
        .and_then(|v| v.get("status"))
        .and_then(Value::as_str)
        == Some("fail");

    match value {
        Some(value) if status.is_success() && !failed => Ok(value),
        Some(value) => Err(decode_error(
            status,
            serde_json::from_value(value).unwrap_or_default(),
        )),
        None if status.is_success() => Err(Error::api(
            status.as_u16(),
            "response body is not valid JSON",
        )),
        None => Err(Error::api(
            status.as_u16(),
            status.canonical_reason().unwrap_or("request failed"),
        )),
    }
}

fn decode_error(status: StatusCode, body: ErrorBody) -> Error {
    if body.two_factor_required
        && let Some(info) = body.two_factor_info
    {
        return Error::TwoFactorRequired(info);
    }

    match body.message.as_deref() {
        Some("challenge_required") => Error::ChallengeRequired,
        Some("login_required") => Error::LoginRequired,
        Some(message) => Error::api(status.as_u16(), message),
        None => Error::api(
            status.as_u16(),
            body.status
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("fail").to_string()),
        ),
    }
}

/// `name=value` pair of a `Set-Cookie` header
fn parse_set_cookie(raw: &str) -> Option<(String, String)> {
    let pair = raw.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}

/// Account id embedded in a `Bearer IGT:2:<base64 json>` authorization
fn user_id_from_authorization(authorization: &str) -> Option<u64> {
    let payload = authorization.strip_prefix(AUTHORIZATION_PREFIX)?;
    let decoded = STANDARD.decode(payload).ok()?;
    let value: Value = serde_json::from_slice(&decoded).ok()?;
    match value.get("ds_user_id")? {
        Value::String(id) => id.parse().ok(),
        Value::Number(id) => id.as_u64(),
        _ => None,
    }
}
