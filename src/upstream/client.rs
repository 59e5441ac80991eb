//! Emby HTTP client
//!
//! Thin typed wrapper over the handful of Emby endpoints the bridge uses.
//! Every call is made on behalf of one [`Account`]; data calls additionally
//! carry an [`AuthSession`].

use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::{BridgeError, Result};
use crate::models::{EmbyAuthResponse, EmbyItem, EmbyItemsResponse};
use crate::upstream::{Account, AuthSession, ClientIdentity};

/// Fields requested for series listings.
const LIST_FIELDS: &str = "Overview,ProductionYear,DateLastContentAdded";
/// Sort order for series listings, newest first.
const LIST_SORT_BY: &str = "ProductionYear,PremiereDate,SortName";

// == Emby Client ==
/// Emby API client shared by all request handlers.
#[derive(Debug, Clone)]
pub struct EmbyClient {
    http: Client,
    /// User id used when a login response does not name one
    fallback_user_id: String,
}

impl EmbyClient {
    // == Constructor ==
    /// Builds the client from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            fallback_user_id: config.user_id.clone(),
        })
    }

    // == Authenticate ==
    /// Logs in with the account's credentials.
    ///
    /// This is the expensive, side-effecting call the session cache exists
    /// to avoid repeating. Any failure at this stage, including transport
    /// and decode errors, is reported as [`BridgeError::AuthFailed`].
    pub async fn authenticate(&self, account: &Account) -> Result<AuthSession> {
        let identity = ClientIdentity::generate();
        let url = endpoint(
            account,
            "/emby/Users/authenticatebyname",
            &identity.query_pairs(),
        )?;

        debug!("Logging in to {} as {}", account.base_url, account.username);
        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .form(&[
                ("Username", account.username.as_str()),
                ("Pw", account.password.as_str()),
            ])
            .send()
            .await
            .map_err(login_failed)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Login to {} rejected with {}", account.base_url, status);
            return Err(BridgeError::AuthFailed(format!("{} {}", status, body)));
        }

        let body = response.bytes().await.map_err(login_failed)?;
        let auth: EmbyAuthResponse = serde_json::from_slice(&body).map_err(login_failed)?;
        let user_id = auth
            .user
            .map(|user| user.id)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.fallback_user_id.clone());

        Ok(AuthSession {
            identity,
            access_token: auth.access_token,
            user_id,
        })
    }

    // == Views ==
    /// Top-level libraries of the session's user.
    pub async fn views(&self, account: &Account, session: &AuthSession) -> Result<EmbyItemsResponse> {
        let path = format!("/emby/Users/{}/Views", session.user_id);
        self.get_json(account, session, &path, &[]).await
    }

    // == Series Page ==
    /// One page of series under `parent_id`, optionally filtered by `search`.
    pub async fn series_page(
        &self,
        account: &Account,
        session: &AuthSession,
        parent_id: &str,
        search: &str,
        start_index: u64,
        limit: u32,
    ) -> Result<EmbyItemsResponse> {
        let path = format!("/emby/Users/{}/Items", session.user_id);
        let mut params = vec![
            ("IncludeItemTypes", "Series".to_string()),
            ("Recursive", "true".to_string()),
            ("fields", LIST_FIELDS.to_string()),
            ("SortBy", LIST_SORT_BY.to_string()),
            ("SortOrder", "Descending".to_string()),
            ("Limit", limit.to_string()),
            ("StartIndex", start_index.to_string()),
        ];
        if !search.is_empty() {
            params.push(("SearchTerm", search.to_string()));
        }
        if !parent_id.is_empty() {
            params.push(("ParentId", parent_id.to_string()));
        }

        self.get_json(account, session, &path, &params).await
    }

    // == Item ==
    /// A single item with its overview.
    pub async fn item(&self, account: &Account, session: &AuthSession, id: &str) -> Result<EmbyItem> {
        let path = format!(
            "/emby/Users/{}/Items/{}",
            session.user_id,
            urlencoding::encode(id)
        );
        self.get_json(account, session, &path, &[("fields", "Overview".to_string())])
            .await
    }

    // == Episodes ==
    /// All episodes below a series (or season), across seasons.
    pub async fn episodes(
        &self,
        account: &Account,
        session: &AuthSession,
        parent_id: &str,
    ) -> Result<EmbyItemsResponse> {
        let path = format!("/emby/Users/{}/Items", session.user_id);
        let params = [
            ("IncludeItemTypes", "Episode".to_string()),
            ("Recursive", "true".to_string()),
            ("ParentId", parent_id.to_string()),
        ];
        self.get_json(account, session, &path, &params).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        account: &Account,
        session: &AuthSession,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        let mut pairs = params.to_vec();
        pairs.extend(session.query_pairs());
        let url = endpoint(account, path, &pairs)?;

        debug!("GET {}{}", account.base_url, path);
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        decode(response).await
    }
}

fn login_failed(e: impl std::fmt::Display) -> BridgeError {
    warn!("Login failed: {}", e);
    BridgeError::AuthFailed(e.to_string())
}

/// Builds `{base_url}{path}?{pairs}`.
fn endpoint(account: &Account, path: &str, pairs: &[(&'static str, String)]) -> Result<Url> {
    let mut url = Url::parse(&format!("{}{}", account.base_url, path))
        .map_err(|e| BridgeError::InvalidAccount(format!("bad upstream URL: {}", e)))?;
    url.query_pairs_mut().extend_pairs(pairs);
    Ok(url)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let url = response.url().path().to_string();
        return Err(BridgeError::Upstream(format!("{} returned {}", url, status)));
    }

    Ok(serde_json::from_slice(&response.bytes().await?)?)
}
