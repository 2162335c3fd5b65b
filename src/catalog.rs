use std::time::Duration;

use log::{info, warn};

use crate::models::artwork::Artwork;
use crate::source;
use crate::store::Store;

const DEFAULT_SOURCE: &str = "site/data/artworks.json";

/// Result of the single catalog read a page view performs.
#[derive(Debug, Clone, Default)]
pub struct CatalogLoad {
    pub artworks: Vec<Artwork>,
    /// Set when the fallback catalog was used; holds the failure reason.
    pub notice: Option<String>,
}

impl CatalogLoad {
    pub fn is_fallback(&self) -> bool {
        self.notice.is_some()
    }
}

/// Reads the artworks JSON document from a file path or an http(s) URL.
/// No cache and no retry: one attempt per call.
pub struct CatalogLoader {
    source: String,
    timeout: Duration,
}

impl CatalogLoader {
    pub fn new(source: &str) -> Self {
        CatalogLoader {
            source: source.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn from_store(store: &dyn Store) -> Self {
        let timeout = store.setting_get_i64("relay_timeout_secs").max(1) as u64;
        Self::new(&store.setting_get_or("catalog_source", DEFAULT_SOURCE))
            .with_timeout(Duration::from_secs(timeout))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Never fails: any read or parse error yields an empty catalog with a
    /// notice for the caller to surface.
    pub async fn fetch(&self) -> CatalogLoad {
        match self.read().await {
            Ok(artworks) => {
                info!("Loaded {} artworks from {}", artworks.len(), self.source);
                CatalogLoad {
                    artworks,
                    notice: None,
                }
            }
            Err(e) => {
                warn!("Gallery data fallback activated: {}", e);
                CatalogLoad {
                    artworks: Vec::new(),
                    notice: Some(e),
                }
            }
        }
    }

    async fn read(&self) -> Result<Vec<Artwork>, String> {
        let body = source::read_source(&self.source, self.timeout).await?;
        parse_catalog(&body)
    }
}

/// The document must be a JSON array. A record that is not an object
/// still yields an (empty) card so the defect shows on the page.
pub fn parse_catalog(body: &str) -> Result<Vec<Artwork>, String> {
    let records: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| format!("invalid catalog JSON: {}", e))?;
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            serde_json::from_value(record).unwrap_or_else(|e| {
                warn!("Catalog record {} is malformed: {}", i, e);
                Artwork::default()
            })
        })
        .collect())
}
