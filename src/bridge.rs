//! Catalog Bridge
//!
//! Answers catalog requests by logging in to Emby at most once per account
//! and TTL window, fetching the relevant items and converting them.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::Config;
use crate::convert::{self, Links};
use crate::error::Result;
use crate::models::{VodClass, VodItem, VodResponse};
use crate::upstream::{Account, AuthSession, EmbyClient, SessionCache};

// == Bridge ==
/// Emby-backed implementation of the catalog operations.
#[derive(Debug)]
pub struct Bridge {
    client: EmbyClient,
    sessions: Arc<SessionCache>,
    auth_ttl: Duration,
    page_size: u32,
}

impl Bridge {
    // == Constructor ==
    /// Creates a bridge around an existing client and session cache.
    pub fn new(client: EmbyClient, sessions: Arc<SessionCache>, auth_ttl: Duration, page_size: u32) -> Self {
        Self {
            client,
            sessions,
            auth_ttl,
            page_size: page_size.max(1),
        }
    }

    /// Creates a bridge with a fresh session cache from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            EmbyClient::from_config(config)?,
            Arc::new(SessionCache::new()),
            config.auth_ttl(),
            config.page_size,
        ))
    }

    /// The login cache, shared with the background reaper.
    pub fn sessions(&self) -> &Arc<SessionCache> {
        &self.sessions
    }

    // == Session ==
    /// Returns the account's login, logging in only on a cold or expired cache.
    pub async fn session(&self, account: &Account) -> Result<AuthSession> {
        self.sessions
            .compute_if_absent(
                account.key.clone(),
                move || async move {
                    debug!("No cached login for {}, authenticating", account.base_url);
                    self.client.authenticate(account).await
                },
                self.auth_ttl,
            )
            .await
    }

    // == Classes ==
    /// Library views as catalog categories.
    pub async fn classes(&self, account: &Account) -> Result<VodResponse> {
        let session = self.session(account).await?;
        let views = self.client.views(account, &session).await?;

        let class: Vec<VodClass> = views.items.iter().map(convert::to_vod_class).collect();
        Ok(VodResponse::classes(class))
    }

    // == List ==
    /// One page of series in `category`, optionally filtered by `search`.
    pub async fn list(&self, account: &Account, category: &str, page: u32, search: &str) -> Result<VodResponse> {
        let session = self.session(account).await?;
        let result = self
            .client
            .series_page(
                account,
                &session,
                category,
                search,
                convert::start_index(page, self.page_size),
                self.page_size,
            )
            .await?;

        let links = Links::new(account, &session);
        let list = result
            .items
            .iter()
            .map(|item| convert::to_list_item(&links, category, item))
            .collect();

        Ok(VodResponse::page(
            page,
            convert::page_count(result.total_record_count, self.page_size),
            self.page_size,
            result.total_record_count,
            list,
        ))
    }

    // == Details ==
    /// Details for each id, in order. Series get a playlist of all episodes.
    pub async fn details(&self, account: &Account, ids: &[&str]) -> Result<VodResponse> {
        let session = self.session(account).await?;
        let links = Links::new(account, &session);

        let mut list = Vec::with_capacity(ids.len());
        for id in ids {
            list.push(self.detail(account, &session, &links, id).await?);
        }

        Ok(VodResponse::details(list))
    }

    async fn detail(&self, account: &Account, session: &AuthSession, links: &Links, id: &str) -> Result<VodItem> {
        let item = self.client.item(account, session, id).await?;
        let mut vod = convert::to_detail_item(links, &item);

        if item.is_folder {
            let episodes = self.client.episodes(account, session, &item.id).await?;
            debug!("Series {} has {} episodes", item.id, episodes.items.len());
            vod.vod_play_url = links.playlist(&episodes.items);
        }

        Ok(vod)
    }
}
