use std::collections::HashMap;

use url::form_urlencoded;

use crate::filter::{GalleryView, ALL_CATEGORIES};
use crate::models::artwork::{self, Artwork};
use crate::models::comment::Comment;
use crate::render::{asset_url, format_count, html_escape, url_encode};
use crate::share;
use crate::views::comments;

pub const EMPTY_GALLERY: &str = "Artworks will be added soon. Please check back!";

/// Comment threads of the rendered cards, keyed by artwork id.
pub type Threads = HashMap<String, Vec<Comment>>;

/// Everything around the grid: heading, controls, the grid container and
/// the shared zoom overlay.
pub fn render_body(
    view: &GalleryView<'_>,
    threads: &Threads,
    origin: &str,
    fallback: bool,
    debounce_ms: u64,
) -> String {
    format!(
        r#"<section class="gallery">
<h1>Gallery</h1>
<p class="gallery-intro">Paintings, studies and sketches. Filter by collection or search by title, medium or story.</p>
{controls}
<div id="gallery-grid" class="gallery-grid{fallback}" data-debounce="{debounce}" aria-live="polite">
{grid}
</div>
{overlay}
</section>"#,
        controls = render_controls(view),
        fallback = if fallback { " gallery-fallback" } else { "" },
        debounce = debounce_ms.max(250),
        grid = render_grid(view, threads, origin),
        overlay = render_overlay(view),
    )
}

/// Fresh grid for the current filter state. Never patched in place: the
/// script swaps the whole thing on every change.
pub fn render_grid(view: &GalleryView<'_>, threads: &Threads, origin: &str) -> String {
    if view.filtered.is_empty() {
        return format!(r#"<p class="gallery-empty">{}</p>"#, EMPTY_GALLERY);
    }
    view.filtered
        .iter()
        .map(|art| render_card(view, art, threads, origin))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_controls(view: &GalleryView<'_>) -> String {
    let mut options = format!(
        r#"<option value="{}"{}>All collections</option>"#,
        ALL_CATEGORIES,
        selected(view.category == ALL_CATEGORIES)
    );
    let mut cats = artwork::categories(view.artworks);
    if view.category != ALL_CATEGORIES && !cats.contains(&view.category) {
        cats.push(view.category.clone());
    }
    for cat in &cats {
        options.push_str(&format!(
            r#"<option value="{v}"{s}>{v}</option>"#,
            v = html_escape(cat),
            s = selected(*cat == view.category)
        ));
    }

    format!(
        r#"<form id="gallery-controls" class="gallery-controls" method="get" action="/gallery" role="search">
<select id="category-filter" name="category" aria-label="Collection">{options}</select>
<input id="gallery-search" type="search" name="q" value="{q}" placeholder="Search artworks" aria-label="Search artworks">
<button type="submit">Filter</button>
</form>"#,
        options = options,
        q = html_escape(&view.search_term),
    )
}

fn selected(on: bool) -> &'static str {
    if on {
        " selected"
    } else {
        ""
    }
}

fn render_card(view: &GalleryView<'_>, art: &Artwork, threads: &Threads, origin: &str) -> String {
    let slug = html_escape(&art.slug);
    let title = html_escape(&art.title);
    let image = html_escape(&asset_url(&art.image));
    let open = view.is_thread_open(&art.slug);

    let comments_html = if art.id.is_empty() {
        String::new()
    } else {
        let thread = threads.get(&art.id).map(Vec::as_slice).unwrap_or(&[]);
        let toggle_href = if open {
            format!("{}#{}", gallery_url(view, None), art.slug)
        } else {
            format!("{}#{}", gallery_url(view, Some(("thread", &art.slug))), art.slug)
        };
        let return_to = format!("{}#{}", gallery_url(view, Some(("thread", &art.slug))), art.slug);
        format!(
            r#"<a class="comment-toggle" href="{href}" aria-controls="comments-{slug}" aria-expanded="{open}">{label}</a>
<div id="comments-{slug}" class="comments"{hidden}>
<div class="existing-comments">{thread}</div>
{form}
</div>"#,
            href = html_escape(&toggle_href),
            slug = slug,
            open = open,
            label = if open { "Hide Comments" } else { "Comments" },
            hidden = if open { "" } else { " hidden" },
            thread = comments::render_thread(thread),
            form = comments::render_form(&art.id, &return_to, &format!("comment-form-{}", art.slug)),
        )
    };

    format!(
        r#"<article class="art-card" id="{slug}" data-art-id="{id}">
<figure>
<img src="{image}" alt="{title}" loading="lazy">
<a class="zoom-btn" href="{zoom_href}" data-image="{image}" data-title="{title}">Zoom</a>
</figure>
<div class="art-body">
<h3 class="art-title"><a href="/art/?piece={slug_q}">{title}</a></h3>
<p class="art-meta"><span class="art-medium">{medium}</span> &middot; <span class="art-dimensions">{dimensions}</span> &middot; <span class="art-year">{year}</span></p>
<p class="art-commentary">{commentary}</p>
<ul class="engagement" aria-label="Instagram engagement">
<li>&hearts; <span class="engagement-likes">{likes}</span></li>
<li>&#128172; <span class="engagement-comments">{comment_count}</span></li>
<li>&#128278; <span class="engagement-saves">{saves}</span></li>
</ul>
<div class="art-actions">
<button type="button" class="share-btn" data-share-url="{share}" data-share-title="{title}">Share</button>
</div>
{comments}
</div>
</article>"#,
        slug = slug,
        id = html_escape(&art.id),
        image = image,
        title = title,
        zoom_href = html_escape(&format!(
            "{}#zoom-modal",
            gallery_url(view, Some(("zoom", &art.slug)))
        )),
        slug_q = html_escape(&url_encode(&art.slug)),
        medium = html_escape(&art.medium),
        dimensions = html_escape(&art.dimensions),
        year = html_escape(&art.year),
        commentary = html_escape(&art.commentary),
        likes = format_count(art.instagram_engagement.likes),
        comment_count = format_count(art.instagram_engagement.comments),
        saves = format_count(art.instagram_engagement.saves),
        share = html_escape(&share::share_url(origin, &art.slug)),
        comments = comments_html,
    )
}

/// The single shared overlay. Rendered open when `?zoom=` names a visible
/// card. Backdrop and close control are links back to the same filter
/// state without `zoom`; the image itself is not a link, so clicking it
/// keeps the overlay open.
fn render_overlay(view: &GalleryView<'_>) -> String {
    let close_href = html_escape(&gallery_url(view, None));
    let open = view.overlay.is_open();
    let (image, title) = view
        .overlay
        .target()
        .map(|t| (html_escape(&asset_url(&t.image)), html_escape(&t.title)))
        .unwrap_or_default();
    format!(
        r#"<div id="zoom-modal" class="zoom-modal{class}" role="dialog" aria-modal="true" aria-label="Artwork zoom"{hidden}>
<a class="overlay-backdrop" href="{close}" aria-label="Close zoom"></a>
<a class="overlay-close" href="{close}" aria-label="Close">&times;</a>
<figure><img class="zoom-image" src="{image}" alt="{title}"><figcaption class="zoom-caption">{title}</figcaption></figure>
</div>"#,
        class = if open { " is-open" } else { "" },
        hidden = if open { "" } else { " hidden" },
        close = close_href,
        image = image,
        title = title,
    )
}

/// Gallery URL keeping the current filter state, plus one extra pair.
pub fn gallery_url(view: &GalleryView<'_>, extra: Option<(&str, &str)>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if view.category != ALL_CATEGORIES {
        query.append_pair("category", &view.category);
    }
    if !view.search_term.is_empty() {
        query.append_pair("q", &view.search_term);
    }
    if let Some((key, value)) = extra {
        query.append_pair(key, value);
    }
    let query = query.finish();
    if query.is_empty() {
        "/gallery".to_string()
    } else {
        format!("/gallery?{}", query)
    }
}
