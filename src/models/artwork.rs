use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One catalog record, as supplied by the artworks JSON document.
/// Every field defaults so a malformed record still loads and shows up
/// as a visibly incomplete card rather than failing the whole catalog.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Artwork {
    #[serde(deserialize_with = "display_text")]
    pub id: String,
    #[serde(deserialize_with = "display_text")]
    pub slug: String,
    #[serde(deserialize_with = "display_text")]
    pub title: String,
    #[serde(deserialize_with = "display_text")]
    pub category: String,
    #[serde(deserialize_with = "display_text")]
    pub medium: String,
    #[serde(deserialize_with = "display_text")]
    pub dimensions: String,
    #[serde(deserialize_with = "display_text")]
    pub year: String,
    #[serde(deserialize_with = "display_text")]
    pub commentary: String,
    #[serde(deserialize_with = "display_text")]
    pub image: String,
    #[serde(deserialize_with = "engagement")]
    pub instagram_engagement: Engagement,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Engagement {
    #[serde(deserialize_with = "count")]
    pub likes: u64,
    #[serde(deserialize_with = "count")]
    pub comments: u64,
    #[serde(deserialize_with = "count")]
    pub saves: u64,
}

impl Artwork {
    /// Text the gallery search matches against.
    pub fn searchable_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title, self.commentary, self.medium, self.category
        )
    }
}

/// First record with the given slug, in catalog order.
pub fn find_by_slug<'a>(catalog: &'a [Artwork], slug: &str) -> Option<&'a Artwork> {
    catalog.iter().find(|art| art.slug == slug)
}

/// Distinct categories, sorted, for the collection selector.
pub fn categories(catalog: &[Artwork]) -> Vec<String> {
    catalog
        .iter()
        .map(|art| art.category.clone())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Accepts strings, numbers or null for display-only fields.
fn display_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Anything but an object reads as zero engagement.
fn engagement<'de, D>(deserializer: D) -> Result<Engagement, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        v @ Value::Object(_) => serde_json::from_value(v).unwrap_or_default(),
        _ => Engagement::default(),
    })
}

/// Non-negative integers, numeric strings and floats count; anything else is 0.
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}
