use rocket::request::FlashMessage;
use serde::Serialize;

use crate::render::html_escape;

/// How long a toast stays on screen.
pub const TOAST_DURATION_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Error => "error",
        }
    }

    /// Unknown kinds render as info.
    pub fn parse(kind: &str) -> Self {
        match kind {
            "success" => ToastKind::Success,
            "error" => ToastKind::Error,
            _ => ToastKind::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

/// Capability to show a transient notification to the visitor.
pub trait Notifier {
    fn notify(&mut self, message: &str, kind: ToastKind);
}

/// Collects toasts raised while building a page and renders them into it.
#[derive(Debug, Default, Clone)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with the notice left by a POST-redirect, if any.
    pub fn from_notice(notice: Option<&Notice>) -> Self {
        let mut queue = Self::new();
        if let Some(n) = notice {
            queue.notify(&n.message, n.kind);
        }
        queue
    }

    pub fn render(&self) -> String {
        let mut html = format!(
            r#"<div class="toast-container" data-duration="{}">"#,
            TOAST_DURATION_MS
        );
        for toast in &self.toasts {
            html.push_str(&format!(
                r#"<div class="toast toast-{} show" role="alert">{}</div>"#,
                toast.kind.as_str(),
                html_escape(&toast.message)
            ));
        }
        html.push_str("</div>");
        html
    }
}

/// A flash message, optionally addressed to one form's message slot.
/// The flash kind is written as `"{target}:{kind}"`, or a bare kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub target: Option<String>,
    pub kind: ToastKind,
    pub message: String,
}

impl Notice {
    pub fn new(target: Option<&str>, kind: ToastKind, message: &str) -> Self {
        Notice {
            target: target.map(str::to_string),
            kind,
            message: message.to_string(),
        }
    }

    pub fn parse(flash_kind: &str, message: &str) -> Self {
        match flash_kind.split_once(':') {
            Some((target, kind)) if !target.is_empty() => {
                Self::new(Some(target), ToastKind::parse(kind), message)
            }
            _ => Self::new(None, ToastKind::parse(flash_kind), message),
        }
    }

    pub fn from_flash(flash: Option<FlashMessage<'_>>) -> Option<Self> {
        flash.map(|f| Self::parse(f.kind(), f.message()))
    }

    /// Kind string to hand to `Flash::new`.
    pub fn flash_kind(&self) -> String {
        match &self.target {
            Some(t) => format!("{}:{}", t, self.kind.as_str()),
            None => self.kind.as_str().to_string(),
        }
    }

    pub fn is_for(&self, target: &str) -> bool {
        self.target.as_deref() == Some(target)
    }
}

impl Notifier for ToastQueue {
    fn notify(&mut self, message: &str, kind: ToastKind) {
        self.toasts.push(Toast {
            message: message.to_string(),
            kind,
        });
    }
}
