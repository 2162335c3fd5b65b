use crate::carousel::Carousel;
use crate::models::feed::FeedItem;
use crate::render::{asset_url, html_escape, PageContext};
use crate::views::contact::{self, FormState};

pub fn render_body(
    ctx: &PageContext,
    carousel: &Carousel<'_>,
    feed: &[FeedItem],
    newsletter: &FormState,
) -> String {
    format!(
        r#"{hero}
<section class="intro">
<h1>{site}</h1>
<p>Original paintings by {artist}: warm palettes, quiet landscapes and sunny things.</p>
<a class="cta" href="/gallery">Explore the gallery</a>
</section>
{feed}
{newsletter}"#,
        hero = render_hero(carousel),
        site = html_escape(&ctx.site_name()),
        artist = html_escape(&ctx.artist()),
        feed = render_feed(ctx, feed),
        newsletter = contact::render_newsletter(ctx, newsletter, "/"),
    )
}

/// Hero carousel. Prev, next and the thumbnails are plain links to
/// `/?hero=n`, so the carousel works without script.
fn render_hero(carousel: &Carousel<'_>) -> String {
    let slide = match carousel.current() {
        Some(s) => s,
        None => return String::new(),
    };
    let (prev, next) = carousel.neighbours();

    let mut thumbs = String::new();
    for (i, s) in carousel.slides().iter().enumerate() {
        let active = i == carousel.index();
        thumbs.push_str(&format!(
            r#"<li class="carousel-thumb{class}"><a href="/?hero={i}"{current} aria-label="Show {title}"><img src="{img}" alt="" loading="lazy"></a></li>"#,
            class = if active { " active" } else { "" },
            i = i,
            current = if active { r#" aria-current="true""# } else { "" },
            title = html_escape(s.title),
            img = html_escape(&asset_url(s.image)),
        ));
    }

    format!(
        r#"<section class="hero" aria-roledescription="carousel" aria-label="Featured works">
<figure class="hero-slide" data-index="{index}">
<a href="/gallery#{id}"><img src="{img}" alt="{title}"></a>
<figcaption><h2>{title}</h2><p>{blurb}</p></figcaption>
</figure>
<div class="hero-controls">
<a class="hero-prev" href="/?hero={prev}" aria-label="Previous artwork">&larr;</a>
<ul class="carousel-track">{thumbs}</ul>
<a class="hero-next" href="/?hero={next}" aria-label="Next artwork">&rarr;</a>
</div>
</section>"#,
        index = carousel.index(),
        id = html_escape(slide.id),
        img = html_escape(&asset_url(slide.image)),
        title = html_escape(slide.title),
        blurb = html_escape(slide.blurb),
        prev = prev,
        next = next,
        thumbs = thumbs,
    )
}

fn render_feed(ctx: &PageContext, feed: &[FeedItem]) -> String {
    let profile = html_escape(&ctx.setting(
        "instagram_profile_url",
        "https://www.instagram.com/artandsunnythings",
    ));
    let items = if feed.is_empty() {
        r#"<p class="feed-empty">New posts are on their way.</p>"#.to_string()
    } else {
        let mut html = String::from(r#"<ul id="instagram-grid" class="insta-grid">"#);
        for item in feed {
            let caption = item.caption.as_deref().unwrap_or("").trim();
            let alt = if caption.is_empty() { "Instagram post" } else { caption };
            html.push_str(&format!(
                r#"<li class="insta-card"><a href="{link}" target="_blank" rel="noopener"><img src="{img}" alt="{alt}" loading="lazy"></a><p>{caption}</p></li>"#,
                link = html_escape(&item.permalink),
                img = html_escape(&asset_url(item.image_url())),
                alt = html_escape(alt),
                caption = html_escape(caption),
            ));
        }
        html.push_str("</ul>");
        html
    };
    format!(
        r#"<section class="instagram">
<h2>From the studio feed</h2>
{items}
<a class="instagram-follow" href="{profile}" target="_blank" rel="noopener">Follow on Instagram</a>
</section>"#,
        items = items,
        profile = profile,
    )
}
