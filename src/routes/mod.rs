use rocket::http::uri::Reference;

use crate::comments::CommentStore;
use crate::models::artwork::Artwork;
use crate::notify::{Notice, Notifier, ToastKind, ToastQueue};
use crate::preferences::Preferences;
use crate::render::PageContext;
use crate::share::{self, RequestOrigin, FALLBACK_ORIGIN};
use crate::store::Store;
use crate::views::gallery::Threads;
use crate::visitor::Visitor;

pub mod api;
pub mod public;

/// Builds the shared page state for one request.
pub fn page_context(
    store: &dyn Store,
    visitor: &Visitor,
    origin: &RequestOrigin,
    notice: Option<Notice>,
    path: &str,
) -> PageContext {
    let settings = store.setting_all();
    let storage = visitor.storage(store);
    PageContext {
        preferences: Preferences::load(&storage),
        toasts: ToastQueue::from_notice(notice.as_ref()),
        notice,
        origin: site_origin(store, origin),
        path: path.to_string(),
        settings,
    }
}

/// Origin for share links: configured site URL, then the request, then
/// the configured fallback.
pub fn site_origin(store: &dyn Store, origin: &RequestOrigin) -> String {
    share::resolve_origin(
        &store.setting_get_or("site_url", ""),
        origin.0.as_deref(),
        &store.setting_get_or("fallback_origin", FALLBACK_ORIGIN),
    )
}

/// The visitor's threads for the cards about to be rendered.
pub fn load_threads(store: &dyn Store, visitor: &Visitor, artworks: &[&Artwork]) -> Threads {
    let comments = CommentStore::new(visitor.storage(store));
    artworks
        .iter()
        .filter(|art| !art.id.is_empty())
        .map(|art| (art.id.clone(), comments.load(&art.id)))
        .collect()
}

/// Raise the catalog-fallback toast when the load did not succeed.
pub fn notify_fallback(notifier: &mut dyn Notifier, fallback: bool) {
    if fallback {
        notifier.notify("Using offline gallery data", ToastKind::Info);
    }
}

/// Only same-site absolute paths are followed after a POST.
pub fn safe_return_path(candidate: Option<&str>, default: &str) -> String {
    let path = match candidate.map(str::trim) {
        Some(p) if p.starts_with('/') && !p.starts_with("//") && !p.contains('\\') => p,
        _ => return default.to_string(),
    };
    match Reference::parse(path) {
        Ok(r) if r.scheme().is_none() && r.authority().is_none() => path.to_string(),
        _ => default.to_string(),
    }
}
