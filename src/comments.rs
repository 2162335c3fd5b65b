use chrono::Utc;
use log::warn;

use crate::models::comment::{Comment, CommentForm};
use crate::storage::LocalStorage;

pub const COMMENTS_KEY_PREFIX: &str = "art-comments-";

/// Storage key of an artwork's thread. Gallery and detail pages share it.
pub fn comments_key(artwork_id: &str) -> String {
    format!("{}{}", COMMENTS_KEY_PREFIX, artwork_id)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Name or message was blank after trimming; nothing was written.
    Ignored,
    Saved(Comment),
    /// The write failed. The comment is not in the thread.
    Unsaved { comment: Comment, reason: String },
}

/// Comment threads kept in one visitor's local storage, newest first.
pub struct CommentStore<'a> {
    storage: LocalStorage<'a>,
}

impl<'a> CommentStore<'a> {
    pub fn new(storage: LocalStorage<'a>) -> Self {
        CommentStore { storage }
    }

    /// Missing or unreadable entries read as an empty thread.
    pub fn load(&self, artwork_id: &str) -> Vec<Comment> {
        let raw = match self.storage.get_item(&comments_key(artwork_id)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return vec![],
            Err(e) => {
                warn!("Unable to load comments for {}: {}", artwork_id, e);
                return vec![];
            }
        };
        match serde_json::from_str(&raw) {
            Ok(comments) => comments,
            Err(e) => {
                warn!("Unable to parse comments for {}: {}", artwork_id, e);
                vec![]
            }
        }
    }

    /// Prepends `comment` and writes the whole thread back.
    pub fn save(&self, artwork_id: &str, comment: &Comment) -> Result<(), String> {
        let mut thread = self.load(artwork_id);
        thread.insert(0, comment.clone());
        let json = serde_json::to_string(&thread).map_err(|e| e.to_string())?;
        self.storage
            .set_item(&comments_key(artwork_id), &json)
            .map_err(|e| {
                warn!("Unable to store comment for {}: {}", artwork_id, e);
                e
            })
    }

    /// Applies the blank-field policy, stamps the date and saves.
    pub fn submit(&self, artwork_id: &str, form: &CommentForm) -> SubmitOutcome {
        let comment = match form.to_comment(Utc::now()) {
            Some(c) => c,
            None => return SubmitOutcome::Ignored,
        };
        match self.save(artwork_id, &comment) {
            Ok(()) => SubmitOutcome::Saved(comment),
            Err(reason) => SubmitOutcome::Unsaved { comment, reason },
        }
    }
}
