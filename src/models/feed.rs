use serde::{Deserialize, Serialize};

/// A curated social post summary. Live API items carry `media_url`, the
/// static mirror uses `image`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct FeedItem {
    pub id: Option<String>,
    pub media_url: Option<String>,
    pub image: Option<String>,
    pub caption: Option<String>,
    pub permalink: String,
}

impl FeedItem {
    pub fn image_url(&self) -> &str {
        self.media_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or(self.image.as_deref())
            .unwrap_or("")
    }
}
