use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;
use std::time::Duration;

use log::{info, warn};
use regex::Regex;

use crate::store::Store;

/// Hidden field that only bots fill in.
pub const HONEYPOT_FIELD: &str = "suntrap";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Contact,
    Newsletter,
}

impl FormKind {
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            FormKind::Contact => &["name", "email", "message"],
            FormKind::Newsletter => &["email"],
        }
    }

    fn endpoint_setting(&self) -> &'static str {
        match self {
            FormKind::Contact => "contact_endpoint",
            FormKind::Newsletter => "newsletter_endpoint",
        }
    }

    pub fn spam_message(&self) -> &'static str {
        match self {
            FormKind::Contact => "Spam detected. Submission blocked.",
            FormKind::Newsletter => "Submission blocked. Please leave optional fields blank.",
        }
    }

    pub fn delivered_message(&self, artist: &str) -> String {
        match self {
            FormKind::Contact => format!("Thank you! {} will reply within 2 business days.", artist),
            FormKind::Newsletter => "Thank you! Please check your inbox to confirm.".to_string(),
        }
    }

    pub fn fallback_message(&self) -> &'static str {
        match self {
            FormKind::Contact => {
                "Received! This is a local confirmation. Connect the form endpoint to deliver emails."
            }
            FormKind::Newsletter => {
                "Received! This is a local confirmation. Connect the newsletter endpoint to subscribe."
            }
        }
    }
}

pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Field name → message, shown next to each field.
    Invalid(FieldErrors),
    Spam,
    Delivered,
    /// Relay missing or failed; the visitor gets a local confirmation only.
    LocalFallback,
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value.trim())
}

/// Required fields must be non-blank; any `email` field must look like one.
pub fn validate(kind: FormKind, fields: &HashMap<String, String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for &name in kind.required_fields() {
        let value = fields.get(name).map(|v| v.trim()).unwrap_or("");
        if value.is_empty() {
            errors.insert(name.to_string(), "Please fill out this field".to_string());
        }
    }
    if let Some(email) = fields.get("email") {
        if !email.trim().is_empty() && !is_valid_email(email) {
            errors.insert(
                "email".to_string(),
                "Please enter a valid email address".to_string(),
            );
        }
    }
    errors
}

pub fn is_spam(fields: &HashMap<String, String>) -> bool {
    fields
        .get(HONEYPOT_FIELD)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false)
}

/// JSON body sent to the relay: every field except the honeypot.
pub fn payload(fields: &HashMap<String, String>) -> serde_json::Map<String, serde_json::Value> {
    fields
        .iter()
        .filter(|(k, _)| k.as_str() != HONEYPOT_FIELD)
        .map(|(k, v)| (k.clone(), serde_json::Value::String(v.trim().to_string())))
        .collect()
}

/// Posts validated submissions to the configured endpoint.
pub struct FormRelay {
    contact_endpoint: String,
    newsletter_endpoint: String,
    site_url: String,
    timeout: Duration,
}

impl FormRelay {
    pub fn from_store(store: &dyn Store) -> Self {
        FormRelay {
            contact_endpoint: store.setting_get_or(FormKind::Contact.endpoint_setting(), ""),
            newsletter_endpoint: store.setting_get_or(FormKind::Newsletter.endpoint_setting(), ""),
            site_url: store.setting_get_or("site_url", ""),
            timeout: Duration::from_secs(store.setting_get_i64("relay_timeout_secs").max(1) as u64),
        }
    }

    /// Absolute endpoint URL; relative endpoints resolve against `site_url`.
    pub fn endpoint(&self, kind: FormKind) -> Option<String> {
        let raw = match kind {
            FormKind::Contact => self.contact_endpoint.trim(),
            FormKind::Newsletter => self.newsletter_endpoint.trim(),
        };
        if raw.is_empty() {
            return None;
        }
        if let Ok(url) = url::Url::parse(raw) {
            return matches!(url.scheme(), "http" | "https").then(|| url.to_string());
        }
        url::Url::parse(self.site_url.trim())
            .and_then(|base| base.join(raw))
            .ok()
            .map(|u| u.to_string())
    }

    /// Validation, then the honeypot, then one relay attempt.
    pub async fn submit(&self, kind: FormKind, fields: &HashMap<String, String>) -> FormOutcome {
        let errors = validate(kind, fields);
        if !errors.is_empty() {
            return FormOutcome::Invalid(errors);
        }
        if is_spam(fields) {
            info!("Honeypot filled on {:?} form; submission dropped", kind);
            return FormOutcome::Spam;
        }

        let endpoint = match self.endpoint(kind) {
            Some(e) => e,
            None => {
                warn!("Form fallback ({:?}): no endpoint configured", kind);
                return FormOutcome::LocalFallback;
            }
        };

        match self.post(&endpoint, fields).await {
            Ok(()) => FormOutcome::Delivered,
            Err(e) => {
                warn!("Form fallback ({:?}): {}", kind, e);
                FormOutcome::LocalFallback
            }
        }
    }

    async fn post(&self, endpoint: &str, fields: &HashMap<String, String>) -> Result<(), String> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| format!("HTTP client error: {}", e))?;

        let resp = client
            .post(endpoint)
            .json(&payload(fields))
            .send()
            .await
            .map_err(|e| format!("request to {} failed: {}", endpoint, e))?;

        if !resp.status().is_success() {
            return Err(format!("{} returned {}", endpoint, resp.status()));
        }
        Ok(())
    }
}
