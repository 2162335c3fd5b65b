use std::collections::HashMap;

use chrono::{DateTime, Utc};
use url::form_urlencoded;

use crate::notify::{Notice, ToastQueue};
use crate::preferences::Preferences;

/// Per-request state every page needs: settings, the visitor's
/// preferences, pending toasts and the origin used for share links.
pub struct PageContext {
    pub settings: HashMap<String, String>,
    pub preferences: Preferences,
    pub toasts: ToastQueue,
    pub notice: Option<Notice>,
    pub origin: String,
    /// Path (with query) of the page being rendered; forms post back here.
    pub path: String,
}

impl PageContext {
    pub fn setting(&self, key: &str, default: &str) -> String {
        self.settings
            .get(key)
            .filter(|v| !v.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    pub fn site_name(&self) -> String {
        self.setting("site_name", "Art and sunny things")
    }

    pub fn artist(&self) -> String {
        self.setting("artist_name", "Sunita Kamal")
    }

    /// The flash notice addressed to one form's message slot.
    pub fn notice_for(&self, target: &str) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| n.is_for(target))
    }
}

pub struct PageMeta {
    pub title: String,
    pub description: String,
}

impl PageMeta {
    pub fn new(title: &str, description: &str) -> Self {
        PageMeta {
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// Wraps a page body in the site shell: head, nav with the theme toggle,
/// toasts, footer and the analytics snippet.
pub fn render_page(
    ctx: &PageContext,
    meta: &PageMeta,
    page: &str,
    body_html: &str,
    page_js: &str,
) -> String {
    let site_name = ctx.site_name();
    let theme = ctx.preferences.theme_or_default();
    let return_to = html_escape(&ctx.path);

    let nav = format!(
        r#"<header class="site-header">
  <a class="brand" href="/">{site}</a>
  <button type="button" class="nav-toggle" aria-expanded="false" aria-controls="site-nav">Menu</button>
  <nav id="site-nav" class="site-nav">
    <a href="/"{home}>Home</a>
    <a href="/gallery"{gallery}>Gallery</a>
    <a href="/contact"{contact}>Contact</a>
    <form class="theme-form" method="post" action="/theme">
      <input type="hidden" name="mode" value="{next}">
      <input type="hidden" name="return_to" value="{ret}">
      <button type="submit" class="theme-toggle" aria-pressed="{pressed}" title="Toggle dark mode">{label}</button>
    </form>
  </nav>
</header>"#,
        site = html_escape(&site_name),
        home = current_marker(page == "home"),
        gallery = current_marker(page == "gallery" || page == "detail"),
        contact = current_marker(page == "contact"),
        next = theme.toggled().as_str(),
        ret = return_to,
        pressed = theme.is_dark(),
        label = if theme.is_dark() { "Light mode" } else { "Dark mode" },
    );

    let analytics_form = if ctx.preferences.analytics_opt_out {
        format!(
            r#"<form method="post" action="/analytics/opt-in" class="analytics-form"><input type="hidden" name="return_to" value="{}"><button type="submit" class="link-button">Allow analytics</button></form>"#,
            return_to
        )
    } else {
        format!(
            r#"<form method="post" action="/analytics/opt-out" class="analytics-form"><input type="hidden" name="return_to" value="{}"><button type="submit" class="link-button">Opt out of analytics</button></form>"#,
            return_to
        )
    };

    let footer = format!(
        r#"<footer class="site-footer">
  <p>&copy; <span id="year">{year}</span> {site}. All artworks by {artist}.</p>
  {analytics}
</footer>"#,
        year = Utc::now().format("%Y"),
        site = html_escape(&site_name),
        artist = html_escape(&ctx.artist()),
        analytics = analytics_form,
    );

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<meta name="description" content="{description}">
<meta property="og:title" content="{title}">
<meta property="og:description" content="{description}">
<meta property="og:site_name" content="{site}">
<style>{css}</style>
{analytics}
</head>
<body class="page-{page} theme-{theme}">
{nav}
<main id="main">
{body}
</main>
{footer}
{toasts}
<script>{site_js}</script>
{page_js}
</body>
</html>"#,
        title = html_escape(&meta.title),
        description = html_escape(&meta.description),
        site = html_escape(&site_name),
        css = BASE_CSS,
        analytics = analytics_snippet(ctx),
        page = page,
        theme = ctx.preferences.theme_class(),
        nav = nav,
        body = body_html,
        footer = footer,
        toasts = ctx.toasts.render(),
        site_js = SITE_JS,
        page_js = page_js,
    )
}

/// Plain fallback page for the error catchers.
pub fn render_error_page(status: u16, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"><title>{status}</title><style>{css}</style></head>
<body class="page-error"><main id="main"><section class="error-page"><h1>{status}</h1><p>{message}</p><a href="/">&larr; Home</a></section></main></body></html>"#,
        status = status,
        css = BASE_CSS,
        message = html_escape(message),
    )
}

fn current_marker(active: bool) -> &'static str {
    if active {
        r#" aria-current="page""#
    } else {
        ""
    }
}

/// GA4 tag, only with a measurement id and without the visitor's opt-out.
fn analytics_snippet(ctx: &PageContext) -> String {
    let id = ctx.setting("analytics_measurement_id", "");
    if id.is_empty() || ctx.preferences.analytics_opt_out {
        return String::new();
    }
    let id = html_escape(&id);
    format!(
        r#"<script async src="https://www.googletagmanager.com/gtag/js?id={id}"></script>
<script>window.dataLayer=window.dataLayer||[];function gtag(){{dataLayer.push(arguments);}}gtag('js',new Date());gtag('config','{id}',{{anonymize_ip:true}});</script>"#,
        id = id
    )
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Percent-encodes a path segment or query value. Spaces become `%20`
/// so the result is valid in either position.
pub fn url_encode(s: &str) -> String {
    // A literal '+' is already %2B, so every '+' here stands for a space
    form_urlencoded::byte_serialize(s.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Engagement counts with thousands separators: `12345` → `12,345`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Short locale-style date, e.g. `3/7/2025`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Catalog image paths are relative to the site root.
pub fn asset_url(path: &str) -> String {
    let path = path.trim();
    let lower = path.to_ascii_lowercase();
    if path.is_empty()
        || path.starts_with('/')
        || lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("data:")
    {
        return path.to_string();
    }
    format!("/{}", path.trim_start_matches("./"))
}

pub const SITE_JS: &str = r#"
(function() {
    var container = document.querySelector('.toast-container');
    var duration = container ? parseInt(container.dataset.duration || '3000', 10) : 3000;

    function dismiss(toast) {
        setTimeout(function() {
            toast.classList.remove('show');
            setTimeout(function() { toast.remove(); }, 300);
        }, duration);
    }

    window.showToast = function(message, kind) {
        if (!container) return;
        var toast = document.createElement('div');
        toast.className = 'toast toast-' + (kind || 'info');
        toast.setAttribute('role', 'alert');
        toast.textContent = message;
        container.appendChild(toast);
        requestAnimationFrame(function() { toast.classList.add('show'); });
        dismiss(toast);
    };

    if (container) {
        container.querySelectorAll('.toast').forEach(dismiss);
    }

    var navToggle = document.querySelector('.nav-toggle');
    if (navToggle) {
        navToggle.addEventListener('click', function() {
            var open = document.body.classList.toggle('nav-open');
            navToggle.setAttribute('aria-expanded', open ? 'true' : 'false');
        });
    }

    // No stored theme: the toggle starts from the browser's scheme
    if (document.body.classList.contains('theme-auto') && window.matchMedia &&
        window.matchMedia('(prefers-color-scheme: dark)').matches) {
        var mode = document.querySelector('.theme-form [name="mode"]');
        var toggle = document.querySelector('.theme-toggle');
        if (mode) mode.value = 'light';
        if (toggle) {
            toggle.setAttribute('aria-pressed', 'true');
            toggle.textContent = 'Light mode';
        }
    }

    var year = document.getElementById('year');
    if (year) year.textContent = new Date().getFullYear();

    document.addEventListener('click', function(e) {
        var btn = e.target.closest('[data-share-url]');
        if (!btn) return;
        e.preventDefault();
        var url = btn.dataset.shareUrl;
        var title = btn.dataset.shareTitle || document.title;
        if (navigator.share) {
            navigator.share({ title: title, url: url }).catch(function() {});
        } else if (navigator.clipboard) {
            navigator.clipboard.writeText(url)
                .then(function() { window.showToast('Link copied to clipboard', 'success'); })
                .catch(function() { window.prompt('Copy this link', url); });
        } else {
            window.prompt('Copy this link', url);
        }
    });
})();
"#;

pub const GALLERY_JS: &str = r#"
(function() {
    var form = document.getElementById('gallery-controls');
    var grid = document.getElementById('gallery-grid');
    if (!form || !grid) return;

    var search = form.querySelector('[name="q"]');
    var select = form.querySelector('[name="category"]');
    var wait = Math.max(250, parseInt(grid.dataset.debounce || '300', 10));
    var timer = null;
    var seq = 0;

    function refresh() {
        var params = new URLSearchParams({ category: select.value, q: search.value });
        var mine = ++seq;
        grid.classList.add('is-fading');
        fetch('/api/gallery?' + params.toString(), { headers: { 'Accept': 'application/json' } })
            .then(function(r) { return r.json(); })
            .then(function(data) {
                if (mine !== seq) return;
                setTimeout(function() {
                    grid.innerHTML = data.html;
                    grid.classList.toggle('gallery-fallback', !!data.fallback);
                    grid.classList.remove('is-fading');
                }, 150);
                history.replaceState(null, '', '/gallery?' + params.toString());
            })
            .catch(function() { grid.classList.remove('is-fading'); });
    }

    form.addEventListener('submit', function(e) { e.preventDefault(); clearTimeout(timer); refresh(); });
    select.addEventListener('change', function() { clearTimeout(timer); refresh(); });
    search.addEventListener('input', function() {
        clearTimeout(timer);
        timer = setTimeout(refresh, wait);
    });

    var overlay = document.getElementById('zoom-modal');
    var overlayImg = overlay ? overlay.querySelector('.zoom-image') : null;
    var overlayCaption = overlay ? overlay.querySelector('.zoom-caption') : null;

    function closeOverlay() {
        if (!overlay) return;
        overlay.classList.remove('is-open');
        overlay.hidden = true;
        document.body.classList.remove('zoom-open');
    }

    document.addEventListener('click', function(e) {
        var zoom = e.target.closest('.zoom-btn');
        if (zoom && overlay) {
            e.preventDefault();
            overlayImg.src = zoom.dataset.image;
            overlayImg.alt = zoom.dataset.title;
            overlayCaption.textContent = zoom.dataset.title;
            overlay.hidden = false;
            overlay.classList.add('is-open');
            document.body.classList.add('zoom-open');
            return;
        }
        if (e.target.closest('.overlay-close') || e.target.closest('.overlay-backdrop')) {
            e.preventDefault();
            closeOverlay();
            return;
        }
        var toggle = e.target.closest('.comment-toggle');
        if (toggle) {
            var panel = document.getElementById(toggle.getAttribute('aria-controls'));
            if (!panel) return;
            e.preventDefault();
            var open = panel.hidden;
            panel.hidden = !open;
            toggle.setAttribute('aria-expanded', open ? 'true' : 'false');
            toggle.textContent = open ? 'Hide Comments' : 'Comments';
        }
    });

    document.addEventListener('keydown', function(e) {
        if (e.key === 'Escape') closeOverlay();
    });
})();
"#;

const BASE_CSS: &str = r#"
:root {
    --color-bg: #fffaf3;
    --color-surface: #ffffff;
    --color-text: #2d2a26;
    --color-muted: #6f675d;
    --color-accent: #d9822b;
    --color-border: #eadfce;
    --radius: 10px;
}
body.theme-dark {
    --color-bg: #1b1a18;
    --color-surface: #262421;
    --color-text: #f3ede4;
    --color-muted: #b3a999;
    --color-accent: #f0a04b;
    --color-border: #3a3631;
}
@media (prefers-color-scheme: dark) {
    body.theme-auto {
        --color-bg: #1b1a18;
        --color-surface: #262421;
        --color-text: #f3ede4;
        --color-muted: #b3a999;
        --color-accent: #f0a04b;
        --color-border: #3a3631;
    }
}
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
    font-family: Georgia, 'Times New Roman', serif;
    color: var(--color-text);
    background: var(--color-bg);
    line-height: 1.6;
}
a { color: var(--color-accent); }
img { max-width: 100%; display: block; }
main { max-width: 1200px; margin: 0 auto; padding: 32px 20px 64px; }

/* ── Header ── */
.site-header { display: flex; align-items: center; justify-content: space-between; gap: 16px; padding: 16px 24px; border-bottom: 1px solid var(--color-border); }
.brand { font-size: 1.3em; font-weight: 700; text-decoration: none; color: var(--color-text); }
.site-nav { display: flex; align-items: center; gap: 18px; }
.site-nav a { text-decoration: none; color: var(--color-text); }
.site-nav a[aria-current="page"] { color: var(--color-accent); font-weight: 700; }
.nav-toggle { display: none; }
.theme-toggle, .link-button { background: none; border: 1px solid var(--color-border); border-radius: 999px; padding: 4px 12px; color: var(--color-text); cursor: pointer; font: inherit; }
.link-button { border: none; text-decoration: underline; padding: 0; color: var(--color-muted); }
@media (max-width: 720px) {
    .nav-toggle { display: inline-block; }
    .site-nav { display: none; }
    body.nav-open .site-nav { display: flex; flex-direction: column; position: absolute; top: 64px; right: 16px; background: var(--color-surface); padding: 16px; border: 1px solid var(--color-border); border-radius: var(--radius); }
}

/* ── Footer ── */
.site-footer { border-top: 1px solid var(--color-border); padding: 24px; text-align: center; color: var(--color-muted); font-size: 0.9em; }
.analytics-form { margin-top: 8px; }

/* ── Gallery ── */
.gallery-controls { display: flex; flex-wrap: wrap; gap: 12px; margin-bottom: 24px; }
.gallery-controls input, .gallery-controls select { padding: 8px 12px; border: 1px solid var(--color-border); border-radius: var(--radius); background: var(--color-surface); color: var(--color-text); font: inherit; }
.gallery-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 24px; transition: opacity 150ms ease; }
.gallery-grid.is-fading { opacity: 0.4; }
.gallery-grid.gallery-fallback { outline: 1px dashed var(--color-border); }
.gallery-empty { grid-column: 1 / -1; text-align: center; color: var(--color-muted); padding: 48px 0; }
.art-card { background: var(--color-surface); border: 1px solid var(--color-border); border-radius: var(--radius); overflow: hidden; }
.art-card figure { position: relative; }
.art-card img { width: 100%; aspect-ratio: 4 / 5; object-fit: cover; }
.zoom-btn { position: absolute; right: 10px; bottom: 10px; background: rgba(0,0,0,.6); color: #fff; border-radius: 999px; padding: 4px 12px; text-decoration: none; font-size: 0.85em; }
.art-body { padding: 16px; display: flex; flex-direction: column; gap: 8px; }
.art-title a { color: var(--color-text); text-decoration: none; }
.art-meta, .engagement { color: var(--color-muted); font-size: 0.9em; }
.engagement { display: flex; gap: 14px; list-style: none; }
.art-actions { display: flex; gap: 12px; align-items: center; }
.share-btn, .comment-form button, .contact-submit, .newsletter-form button { background: var(--color-accent); color: #fff; border: none; border-radius: 999px; padding: 6px 16px; cursor: pointer; font: inherit; }

/* ── Comments ── */
.comments { border-top: 1px solid var(--color-border); padding-top: 12px; display: flex; flex-direction: column; gap: 12px; }
.comment { padding: 8px 0; border-bottom: 1px dashed var(--color-border); }
.comment-meta { font-size: 0.85em; color: var(--color-muted); }
.comment-empty { color: var(--color-muted); font-style: italic; }
.comment-form, .contact-form, .newsletter-form { display: flex; flex-direction: column; gap: 8px; }
.comment-form input, .comment-form textarea, .contact-form input, .contact-form textarea, .newsletter-form input { padding: 8px 12px; border: 1px solid var(--color-border); border-radius: var(--radius); background: var(--color-surface); color: var(--color-text); font: inherit; }
.honeypot { position: absolute; left: -9999px; width: 1px; height: 1px; overflow: hidden; }
.error-message { color: #c0392b; font-size: 0.85em; }
.form-message { font-size: 0.95em; }
.form-message.success { color: #2e7d32; }
.form-message.error { color: #c0392b; }

/* ── Zoom overlay ── */
.zoom-modal { position: fixed; inset: 0; z-index: 50; display: flex; align-items: center; justify-content: center; }
.zoom-modal[hidden] { display: none; }
.overlay-backdrop { position: absolute; inset: 0; background: rgba(0,0,0,.85); }
.zoom-modal figure { position: relative; max-width: 90vw; max-height: 90vh; color: #fff; text-align: center; }
.zoom-image { max-height: 80vh; margin: 0 auto; }
.overlay-close { position: absolute; top: 16px; right: 24px; z-index: 2; color: #fff; font-size: 2em; text-decoration: none; }
body.zoom-open { overflow: hidden; }

/* ── Detail ── */
.back-link { display: inline-block; margin-bottom: 20px; }
.art-detail-grid { display: grid; grid-template-columns: minmax(0, 3fr) minmax(0, 2fr); gap: 32px; }
.art-facts { display: grid; grid-template-columns: auto 1fr; gap: 4px 16px; margin: 16px 0; }
.art-facts dt { color: var(--color-muted); }
.art-commentary-block { margin: 32px 0; font-size: 1.1em; }
.art-empty, .error-page { text-align: center; padding: 80px 0; }
@media (max-width: 720px) { .art-detail-grid { grid-template-columns: 1fr; } }

/* ── Home ── */
.hero { display: grid; gap: 16px; margin-bottom: 48px; }
.hero-slide img { width: 100%; max-height: 70vh; object-fit: cover; border-radius: var(--radius); }
.hero-controls { display: flex; justify-content: space-between; align-items: center; }
.carousel-track { display: flex; gap: 12px; list-style: none; }
.carousel-track img { width: 96px; height: 72px; object-fit: cover; border-radius: 6px; opacity: .6; }
.carousel-track .active img { opacity: 1; outline: 2px solid var(--color-accent); }
.insta-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(180px, 1fr)); gap: 16px; list-style: none; margin: 16px 0 48px; }
.insta-card img { width: 100%; aspect-ratio: 1; object-fit: cover; border-radius: var(--radius); }
.insta-card p { font-size: 0.85em; color: var(--color-muted); }

/* ── Toasts ── */
.toast-container { position: fixed; bottom: 24px; right: 24px; display: flex; flex-direction: column; gap: 8px; z-index: 100; }
.toast { padding: 12px 18px; border-radius: var(--radius); color: #fff; background: #455a64; opacity: 0; transform: translateY(8px); transition: opacity .3s, transform .3s; }
.toast.show { opacity: 1; transform: none; }
.toast-success { background: #2e7d32; }
.toast-error { background: #c0392b; }
"#;
