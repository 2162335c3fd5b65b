use std::time::Duration;

use log::{info, warn};
use serde::Deserialize;

use crate::models::feed::FeedItem;
use crate::source;
use crate::store::Store;

const TOKEN_PLACEHOLDER: &str = "ADD_INSTAGRAM_TOKEN";
const USER_ID_PLACEHOLDER: &str = "INSTAGRAM_USER_ID";
const DEFAULT_LIMIT: usize = 6;

#[derive(Debug, Deserialize)]
struct GraphResponse {
    #[serde(default)]
    data: Vec<FeedItem>,
}

/// Instagram mirror: the Graph API when credentials are configured,
/// otherwise (or when the API fails) the curated static JSON document.
pub struct FeedLoader {
    token: String,
    user_id: String,
    static_source: String,
    limit: usize,
    timeout: Duration,
}

impl FeedLoader {
    pub fn from_store(store: &dyn Store) -> Self {
        let limit = match store.setting_get_i64("feed_limit") {
            n if n > 0 => n as usize,
            _ => DEFAULT_LIMIT,
        };
        FeedLoader {
            token: store.setting_get_or("instagram_token", ""),
            user_id: store.setting_get_or("instagram_user_id", ""),
            static_source: store.setting_get_or("instagram_source", "site/data/instagram.json"),
            limit,
            timeout: Duration::from_secs(store.setting_get_i64("relay_timeout_secs").max(1) as u64),
        }
    }

    /// True when real API credentials are set.
    pub fn live_configured(&self) -> bool {
        let token = self.token.trim();
        let user = self.user_id.trim();
        !token.is_empty()
            && token != TOKEN_PLACEHOLDER
            && !user.is_empty()
            && user != USER_ID_PLACEHOLDER
    }

    pub fn api_url(&self) -> String {
        format!(
            "https://graph.instagram.com/{}/media?fields=id,caption,media_url,permalink,timestamp&access_token={}",
            self.user_id.trim(),
            self.token.trim()
        )
    }

    /// At most `limit` items; empty when both sources fail.
    pub async fn load(&self) -> Vec<FeedItem> {
        if self.live_configured() {
            match self.load_live().await {
                Ok(items) => return self.first(items),
                Err(e) => warn!("Instagram API error, using static feed: {}", e),
            }
        } else {
            info!("Loading static Instagram feed (fallback mode)");
        }

        match self.load_static().await {
            Ok(items) => self.first(items),
            Err(e) => {
                warn!("Static Instagram feed unavailable: {}", e);
                vec![]
            }
        }
    }

    async fn load_live(&self) -> Result<Vec<FeedItem>, String> {
        let body = source::fetch_text(&self.api_url(), self.timeout).await?;
        let parsed: GraphResponse =
            serde_json::from_str(&body).map_err(|e| format!("invalid API response: {}", e))?;
        Ok(parsed.data)
    }

    async fn load_static(&self) -> Result<Vec<FeedItem>, String> {
        let body = source::read_source(&self.static_source, self.timeout).await?;
        parse_feed(&body)
    }

    fn first(&self, mut items: Vec<FeedItem>) -> Vec<FeedItem> {
        items.truncate(self.limit);
        items
    }
}

/// The static mirror is either a bare array or a Graph-style `{ "data": [...] }`.
pub fn parse_feed(body: &str) -> Result<Vec<FeedItem>, String> {
    if let Ok(items) = serde_json::from_str::<Vec<FeedItem>>(body) {
        return Ok(items);
    }
    serde_json::from_str::<GraphResponse>(body)
        .map(|r| r.data)
        .map_err(|e| format!("invalid feed JSON: {}", e))
}
