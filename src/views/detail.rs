use crate::models::artwork::Artwork;
use crate::models::comment::Comment;
use crate::render::{asset_url, format_count, html_escape, url_encode, PageContext, PageMeta};
use crate::share;
use crate::views::comments;

/// Slug from `?piece=` first, then the URL fragment. Blank values count as
/// absent.
pub fn resolve_slug(piece: Option<&str>, fragment: Option<&str>) -> Option<String> {
    piece
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            fragment
                .map(|f| f.trim().trim_start_matches('#'))
                .filter(|s| !s.is_empty())
        })
        .map(str::to_string)
}

pub fn found_meta(art: &Artwork, ctx: &PageContext) -> PageMeta {
    let artist = ctx.artist();
    PageMeta {
        title: format!("{} | {} Art", art.title, artist),
        description: format!(
            "{} — {} {}, {} by {} ({}).",
            art.title,
            art.medium,
            art.dimensions,
            art.year,
            artist,
            ctx.site_name()
        ),
    }
}

pub fn not_found_meta(ctx: &PageContext) -> PageMeta {
    PageMeta {
        title: format!("Artwork not found | {} Art", ctx.artist()),
        description: format!("Browse the full collection at {}.", ctx.site_name()),
    }
}

pub fn render_found(art: &Artwork, thread: &[Comment], ctx: &PageContext) -> String {
    let title = html_escape(&art.title);
    let artist = ctx.artist();
    let profile = ctx.setting(
        "instagram_profile_url",
        "https://www.instagram.com/artandsunnythings",
    );
    let comments_html = if art.id.is_empty() {
        String::new()
    } else {
        let return_to = format!("/art/?piece={}#art-comments", url_encode(&art.slug));
        format!(
            r#"<section id="art-comments" class="comments">
<h2>Comments</h2>
<div class="existing-comments">{thread}</div>
{form}
</section>"#,
            thread = comments::render_thread(thread),
            form = comments::render_form(&art.id, &return_to, "art-comment-form"),
        )
    };

    format!(
        r#"<article class="art-detail" id="{slug}">
<a class="back-link" id="back-to-gallery" href="/gallery#{slug}">&larr; Back to gallery</a>
<div class="art-detail-grid">
<figure><img id="art-image" src="{image}" alt="{title} by {artist}"></figure>
<div class="art-info">
<h1 id="art-title">{title}</h1>
<p id="art-summary" class="art-summary">{summary}</p>
<dl class="art-facts">
<dt>Medium</dt><dd id="art-medium">{medium}</dd>
<dt>Dimensions</dt><dd id="art-dimensions">{dimensions}</dd>
<dt>Year</dt><dd id="art-year">{year}</dd>
</dl>
<ul class="engagement" aria-label="Instagram engagement">
<li>&hearts; <span id="detail-likes">{likes}</span> likes</li>
<li>&#128172; <span id="detail-comments">{comment_count}</span> comments</li>
<li>&#128278; <span id="detail-saves">{saves}</span> saves</li>
</ul>
<div class="art-actions">
<button type="button" class="share-btn" data-share-url="{share}" data-share-title="{title}">Share</button>
<a id="open-instagram" href="{profile}" target="_blank" rel="noopener">View on Instagram</a>
</div>
</div>
</div>
<div class="art-commentary-block">
<h2>About this piece</h2>
<p id="art-commentary">{commentary}</p>
</div>
{comments}
</article>"#,
        slug = html_escape(&art.slug),
        image = html_escape(&asset_url(&art.image)),
        title = title,
        artist = html_escape(&artist),
        summary = html_escape(&format!("{} · {}", art.category, art.medium)),
        medium = html_escape(&art.medium),
        dimensions = html_escape(&art.dimensions),
        year = html_escape(&art.year),
        likes = format_count(art.instagram_engagement.likes),
        comment_count = format_count(art.instagram_engagement.comments),
        saves = format_count(art.instagram_engagement.saves),
        share = html_escape(&share::share_url(&ctx.origin, &art.slug)),
        profile = html_escape(&profile),
        commentary = html_escape(&art.commentary),
        comments = comments_html,
    )
}

pub fn render_not_found() -> String {
    r#"<section id="art-empty" class="art-empty">
<h1>Artwork not found</h1>
<p>We couldn't find that piece. It may have moved or been renamed.</p>
<a href="/gallery">Browse the gallery</a>
</section>"#
        .to_string()
}

/// Fragments never reach the server: turn `/art/#slug` into `?piece=slug`.
pub const FRAGMENT_REDIRECT_JS: &str = r#"<script>
(function() {
    var hash = window.location.hash.slice(1);
    if (!hash || new URLSearchParams(window.location.search).get('piece')) return;
    var slug;
    try { slug = decodeURIComponent(hash); } catch (e) { slug = hash; }
    window.location.replace('/art/?piece=' + encodeURIComponent(slug));
})();
</script>"#;
