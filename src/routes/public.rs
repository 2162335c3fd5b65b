use std::collections::HashMap;
use std::sync::Arc;

use log::warn;
use rocket::form::Form;
use rocket::http::uri::Origin;
use rocket::request::FlashMessage;
use rocket::response::content::RawHtml;
use rocket::response::{Flash, Redirect};
use rocket::{Either, State};

use crate::carousel::{Carousel, FEATURED};
use crate::catalog::CatalogLoader;
use crate::comments::{CommentStore, SubmitOutcome};
use crate::feed::FeedLoader;
use crate::filter::{GalleryQuery, GalleryView};
use crate::forms::{FormKind, FormOutcome, FormRelay};
use crate::models::artwork;
use crate::models::comment::CommentForm;
use crate::notify::{Notice, ToastKind};
use crate::preferences::{Preferences, Theme};
use crate::render::{self, PageContext, PageMeta, GALLERY_JS};
use crate::routes::{load_threads, notify_fallback, page_context, safe_return_path};
use crate::share::RequestOrigin;
use crate::store::Store;
use crate::views::contact::FormState;
use crate::views::{contact, detail, gallery, home};
use crate::visitor::Visitor;

// ── Homepage ───────────────────────────────────────────

#[get("/?<hero>")]
pub async fn homepage(
    store: &State<Arc<dyn Store>>,
    visitor: Visitor,
    origin: RequestOrigin,
    uri: &Origin<'_>,
    flash: Option<FlashMessage<'_>>,
    hero: Option<i64>,
) -> RawHtml<String> {
    let store = store.inner().as_ref();
    let ctx = page_context(store, &visitor, &origin, Notice::from_flash(flash), &uri.to_string());
    RawHtml(render_home(store, &ctx, hero.unwrap_or(0), &FormState::default()).await)
}

async fn render_home(store: &dyn Store, ctx: &PageContext, hero: i64, newsletter: &FormState) -> String {
    let feed = FeedLoader::from_store(store).load().await;
    let mut carousel = Carousel::new(FEATURED);
    carousel.select(hero);

    let site_name = ctx.site_name();
    let meta = PageMeta::new(
        &format!("{} | Original art by {}", site_name, ctx.artist()),
        &format!("Paintings, studies and studio notes by {}.", ctx.artist()),
    );
    let body = home::render_body(ctx, &carousel, &feed, newsletter);
    render::render_page(ctx, &meta, "home", &body, "")
}

// ── Gallery ────────────────────────────────────────────

#[get("/gallery?<query..>")]
pub async fn gallery_page(
    store: &State<Arc<dyn Store>>,
    visitor: Visitor,
    origin: RequestOrigin,
    uri: &Origin<'_>,
    flash: Option<FlashMessage<'_>>,
    query: GalleryQuery,
) -> RawHtml<String> {
    let store = store.inner().as_ref();
    let mut ctx = page_context(store, &visitor, &origin, Notice::from_flash(flash), &uri.to_string());

    let load = CatalogLoader::from_store(store).fetch().await;
    notify_fallback(&mut ctx.toasts, load.is_fallback());

    let view = GalleryView::new(&load.artworks, &query);
    let threads = load_threads(store, &visitor, &view.filtered);
    let body = gallery::render_body(
        &view,
        &threads,
        &ctx.origin,
        load.is_fallback(),
        store.setting_get_i64("search_debounce_ms").max(0) as u64,
    );

    let meta = PageMeta::new(
        &format!("Gallery | {} Art", ctx.artist()),
        &format!("Browse original artworks by {}.", ctx.artist()),
    );
    let script = format!("<script>{}</script>", GALLERY_JS);
    RawHtml(render::render_page(&ctx, &meta, "gallery", &body, &script))
}

// ── Artwork detail ─────────────────────────────────────

#[get("/art?<piece>")]
pub async fn art_detail(
    store: &State<Arc<dyn Store>>,
    visitor: Visitor,
    origin: RequestOrigin,
    uri: &Origin<'_>,
    flash: Option<FlashMessage<'_>>,
    piece: Option<String>,
) -> RawHtml<String> {
    let store = store.inner().as_ref();
    let ctx = page_context(store, &visitor, &origin, Notice::from_flash(flash), &uri.to_string());
    RawHtml(render_detail(store, &visitor, ctx, piece.as_deref()).await)
}

#[get("/art/<_..>?<piece>", rank = 2)]
pub async fn art_detail_dir(
    store: &State<Arc<dyn Store>>,
    visitor: Visitor,
    origin: RequestOrigin,
    uri: &Origin<'_>,
    flash: Option<FlashMessage<'_>>,
    piece: Option<String>,
) -> RawHtml<String> {
    let store = store.inner().as_ref();
    let ctx = page_context(store, &visitor, &origin, Notice::from_flash(flash), &uri.to_string());
    RawHtml(render_detail(store, &visitor, ctx, piece.as_deref()).await)
}

async fn render_detail(
    store: &dyn Store,
    visitor: &Visitor,
    mut ctx: PageContext,
    piece: Option<&str>,
) -> String {
    // No slug, no catalog read
    let slug = match detail::resolve_slug(piece, None) {
        Some(s) => s,
        None => return render_art_missing(&ctx),
    };

    let load = CatalogLoader::from_store(store).fetch().await;
    notify_fallback(&mut ctx.toasts, load.is_fallback());

    match artwork::find_by_slug(&load.artworks, &slug) {
        Some(art) => {
            let thread = CommentStore::new(visitor.storage(store)).load(&art.id);
            let meta = detail::found_meta(art, &ctx);
            let body = detail::render_found(art, &thread, &ctx);
            render::render_page(&ctx, &meta, "detail", &body, "")
        }
        None => render_art_missing(&ctx),
    }
}

fn render_art_missing(ctx: &PageContext) -> String {
    render::render_page(
        ctx,
        &detail::not_found_meta(ctx),
        "detail",
        &detail::render_not_found(),
        detail::FRAGMENT_REDIRECT_JS,
    )
}

// ── Comments ───────────────────────────────────────────

#[derive(Debug, FromForm)]
pub struct CommentPost {
    #[field(default = String::new())]
    pub name: String,
    #[field(default = String::new())]
    pub message: String,
    pub return_to: Option<String>,
}

#[post("/comments/<artwork_id>", data = "<form>")]
pub fn comment_submit(
    store: &State<Arc<dyn Store>>,
    visitor: Visitor,
    artwork_id: String,
    form: Form<CommentPost>,
) -> Either<Flash<Redirect>, Redirect> {
    let post = form.into_inner();
    let back = safe_return_path(post.return_to.as_deref(), "/gallery");
    let comment = CommentForm {
        name: post.name,
        message: post.message,
    };

    let comments = CommentStore::new(visitor.storage(store.inner().as_ref()));
    match comments.submit(&artwork_id, &comment) {
        SubmitOutcome::Ignored => Either::Right(Redirect::to(back)),
        SubmitOutcome::Saved(_) => Either::Left(Flash::success(Redirect::to(back), "Comment posted!")),
        SubmitOutcome::Unsaved { .. } => Either::Left(Flash::error(
            Redirect::to(back),
            "Your comment could not be saved on this device.",
        )),
    }
}

// ── Contact & newsletter ───────────────────────────────

#[get("/contact")]
pub fn contact_page(
    store: &State<Arc<dyn Store>>,
    visitor: Visitor,
    origin: RequestOrigin,
    flash: Option<FlashMessage<'_>>,
) -> RawHtml<String> {
    let ctx = page_context(store.inner().as_ref(), &visitor, &origin, Notice::from_flash(flash), "/contact");
    RawHtml(render_contact(&ctx, &FormState::default(), &FormState::default()))
}

fn render_contact(ctx: &PageContext, contact_state: &FormState, newsletter: &FormState) -> String {
    let meta = PageMeta::new(
        &format!("Contact | {} Art", ctx.artist()),
        &format!("Commissions and enquiries for {}.", ctx.artist()),
    );
    let body = contact::render_body(ctx, contact_state, newsletter);
    render::render_page(ctx, &meta, "contact", &body, "")
}

/// Flash for a finished submission, addressed to the form's message slot.
fn form_flash(kind: FormKind, outcome: &FormOutcome, artist: &str, back: String) -> Flash<Redirect> {
    let target = match kind {
        FormKind::Contact => "contact",
        FormKind::Newsletter => "newsletter",
    };
    let (toast, message) = match outcome {
        FormOutcome::Delivered => (ToastKind::Success, kind.delivered_message(artist)),
        FormOutcome::Spam => (ToastKind::Error, kind.spam_message().to_string()),
        _ => (ToastKind::Info, kind.fallback_message().to_string()),
    };
    let notice = Notice::new(Some(target), toast, &message);
    Flash::new(Redirect::to(back), notice.flash_kind(), notice.message)
}

#[post("/contact", data = "<form>")]
pub async fn contact_submit(
    store: &State<Arc<dyn Store>>,
    visitor: Visitor,
    origin: RequestOrigin,
    form: Form<HashMap<String, String>>,
) -> Either<RawHtml<String>, Flash<Redirect>> {
    let store = store.inner().as_ref();
    let fields = form.into_inner();
    let outcome = FormRelay::from_store(store).submit(FormKind::Contact, &fields).await;

    match outcome {
        FormOutcome::Invalid(errors) => {
            let ctx = page_context(store, &visitor, &origin, None, "/contact");
            let state = FormState::invalid(fields, errors);
            Either::Left(RawHtml(render_contact(&ctx, &state, &FormState::default())))
        }
        done => {
            let artist = store.setting_get_or("artist_name", "Sunita Kamal");
            Either::Right(form_flash(FormKind::Contact, &done, &artist, "/contact".to_string()))
        }
    }
}

#[post("/newsletter", data = "<form>")]
pub async fn newsletter_submit(
    store: &State<Arc<dyn Store>>,
    visitor: Visitor,
    origin: RequestOrigin,
    form: Form<HashMap<String, String>>,
) -> Either<RawHtml<String>, Flash<Redirect>> {
    let store = store.inner().as_ref();
    let mut fields = form.into_inner();
    let back = safe_return_path(fields.remove("return_to").as_deref(), "/");
    let outcome = FormRelay::from_store(store).submit(FormKind::Newsletter, &fields).await;

    match outcome {
        FormOutcome::Invalid(errors) => {
            let state = FormState::invalid(fields, errors);
            let html = if back == "/" {
                let ctx = page_context(store, &visitor, &origin, None, "/");
                render_home(store, &ctx, 0, &state).await
            } else {
                let ctx = page_context(store, &visitor, &origin, None, "/contact");
                render_contact(&ctx, &FormState::default(), &state)
            };
            Either::Left(RawHtml(html))
        }
        done => {
            let artist = store.setting_get_or("artist_name", "Sunita Kamal");
            Either::Right(form_flash(FormKind::Newsletter, &done, &artist, back))
        }
    }
}

// ── Preferences ────────────────────────────────────────

#[derive(Debug, FromForm)]
pub struct ThemeForm {
    pub mode: Option<String>,
    pub return_to: Option<String>,
}

#[post("/theme", data = "<form>")]
pub fn theme_set(
    store: &State<Arc<dyn Store>>,
    visitor: Visitor,
    form: Form<ThemeForm>,
) -> Either<Redirect, Flash<Redirect>> {
    let back = safe_return_path(form.return_to.as_deref(), "/");
    let storage = visitor.storage(store.inner().as_ref());
    let theme = form
        .mode
        .as_deref()
        .and_then(Theme::parse)
        .unwrap_or_else(|| Preferences::load(&storage).theme_or_default().toggled());

    match Preferences::save_theme(&storage, theme) {
        Ok(()) => Either::Left(Redirect::to(back)),
        Err(e) => {
            warn!("Theme preference not saved: {}", e);
            Either::Right(Flash::error(
                Redirect::to(back),
                "Theme preference could not be saved on this device.",
            ))
        }
    }
}

#[derive(Debug, FromForm)]
pub struct ReturnForm {
    pub return_to: Option<String>,
}

#[post("/analytics/opt-out", data = "<form>")]
pub fn analytics_opt_out(
    store: &State<Arc<dyn Store>>,
    visitor: Visitor,
    form: Form<ReturnForm>,
) -> Flash<Redirect> {
    let back = safe_return_path(form.return_to.as_deref(), "/");
    match Preferences::opt_out_of_analytics(&visitor.storage(store.inner().as_ref())) {
        Ok(()) => Flash::success(Redirect::to(back), "Analytics disabled for this browser."),
        Err(e) => {
            warn!("Analytics opt-out not saved: {}", e);
            Flash::error(Redirect::to(back), "Analytics preference could not be saved.")
        }
    }
}

#[post("/analytics/opt-in", data = "<form>")]
pub fn analytics_opt_in(
    store: &State<Arc<dyn Store>>,
    visitor: Visitor,
    form: Form<ReturnForm>,
) -> Flash<Redirect> {
    let back = safe_return_path(form.return_to.as_deref(), "/");
    match Preferences::opt_in_to_analytics(&visitor.storage(store.inner().as_ref())) {
        Ok(()) => Flash::success(Redirect::to(back), "Analytics enabled for this browser."),
        Err(e) => {
            warn!("Analytics opt-in not saved: {}", e);
            Flash::error(Redirect::to(back), "Analytics preference could not be saved.")
        }
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        homepage,
        gallery_page,
        art_detail,
        art_detail_dir,
        comment_submit,
        contact_page,
        contact_submit,
        newsletter_submit,
        theme_set,
        analytics_opt_out,
        analytics_opt_in,
    ]
}
