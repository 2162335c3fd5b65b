use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A visitor comment on one artwork. `date` is stamped at submission and
/// never edited afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Comment {
    pub name: String,
    pub message: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Deserialize, FromForm, Default)]
pub struct CommentForm {
    #[serde(default)]
    #[field(default = String::new())]
    pub name: String,
    #[serde(default)]
    #[field(default = String::new())]
    pub message: String,
}

impl CommentForm {
    /// Trimmed `(name, message)`, or None when either is blank.
    pub fn normalized(&self) -> Option<(String, String)> {
        let name = self.name.trim();
        let message = self.message.trim();
        if name.is_empty() || message.is_empty() {
            return None;
        }
        Some((name.to_string(), message.to_string()))
    }

    pub fn to_comment(&self, date: DateTime<Utc>) -> Option<Comment> {
        let (name, message) = self.normalized()?;
        Some(Comment {
            name,
            message,
            date,
        })
    }
}
