use std::sync::Arc;

use rocket::serde::json::Json;
use rocket::State;
use serde::Serialize;

use crate::catalog::CatalogLoader;
use crate::comments::{CommentStore, SubmitOutcome};
use crate::filter::{GalleryQuery, GalleryView};
use crate::models::comment::{Comment, CommentForm};
use crate::routes::{load_threads, site_origin};
use crate::share::RequestOrigin;
use crate::store::Store;
use crate::views::gallery;
use crate::visitor::Visitor;

// ── Gallery refresh (debounced search) ─────────────────

#[derive(Debug, Serialize)]
pub struct GalleryResponse {
    pub html: String,
    pub count: usize,
    pub category: String,
    pub q: String,
    pub fallback: bool,
}

#[get("/gallery?<query..>")]
pub async fn gallery_grid(
    store: &State<Arc<dyn Store>>,
    visitor: Visitor,
    origin: RequestOrigin,
    query: GalleryQuery,
) -> Json<GalleryResponse> {
    let store = store.inner().as_ref();
    let load = CatalogLoader::from_store(store).fetch().await;
    let view = GalleryView::new(&load.artworks, &query);
    let threads = load_threads(store, &visitor, &view.filtered);
    let html = gallery::render_grid(&view, &threads, &site_origin(store, &origin));

    Json(GalleryResponse {
        html,
        count: view.filtered.len(),
        category: view.category.clone(),
        q: view.search_term.clone(),
        fallback: load.is_fallback(),
    })
}

// ── Comment threads ────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    /// `saved`, `ignored` or `unsaved`.
    pub status: &'static str,
    pub comment: Option<Comment>,
    pub error: Option<String>,
    pub comments: Vec<Comment>,
}

#[get("/comments/<artwork_id>")]
pub fn comments_list(
    store: &State<Arc<dyn Store>>,
    visitor: Visitor,
    artwork_id: String,
) -> Json<Vec<Comment>> {
    let comments = CommentStore::new(visitor.storage(store.inner().as_ref()));
    Json(comments.load(&artwork_id))
}

#[post("/comments/<artwork_id>", format = "json", data = "<form>")]
pub fn comments_submit(
    store: &State<Arc<dyn Store>>,
    visitor: Visitor,
    artwork_id: String,
    form: Json<CommentForm>,
) -> Json<CommentResponse> {
    let comments = CommentStore::new(visitor.storage(store.inner().as_ref()));
    let (status, comment, error) = match comments.submit(&artwork_id, &form) {
        SubmitOutcome::Saved(c) => ("saved", Some(c), None),
        SubmitOutcome::Ignored => ("ignored", None, None),
        SubmitOutcome::Unsaved { reason, .. } => ("unsaved", None, Some(reason)),
    };
    Json(CommentResponse {
        status,
        comment,
        error,
        comments: comments.load(&artwork_id),
    })
}

pub fn routes() -> Vec<rocket::Route> {
    routes![gallery_grid, comments_list, comments_submit]
}
