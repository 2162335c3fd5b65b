use crate::models::comment::Comment;
use crate::render::{format_date, html_escape, url_encode};

pub const EMPTY_THREAD: &str = "Be the first to share a thought.";

/// A thread, newest first, as stored.
pub fn render_thread(comments: &[Comment]) -> String {
    if comments.is_empty() {
        return format!(r#"<p class="comment-empty">{}</p>"#, EMPTY_THREAD);
    }
    let mut html = String::new();
    for comment in comments {
        html.push_str(&format!(
            r#"<article class="comment"><p class="comment-meta"><strong>{name}</strong> &middot; <time datetime="{iso}">{date}</time></p><p class="comment-body">{message}</p></article>"#,
            name = html_escape(&comment.name),
            iso = comment.date.to_rfc3339(),
            date = format_date(&comment.date),
            message = html_escape(&comment.message).replace('\n', "<br>"),
        ));
    }
    html
}

/// Comment form posting to `/comments/{artwork_id}`; the server sends the
/// visitor back to `return_to` afterwards.
pub fn render_form(artwork_id: &str, return_to: &str, form_id: &str) -> String {
    format!(
        r#"<form id="{form_id}" class="comment-form" method="post" action="/comments/{action}">
<input type="hidden" name="return_to" value="{ret}">
<label for="{form_id}-name">Name</label>
<input type="text" id="{form_id}-name" name="name" maxlength="80" required placeholder="Your name">
<label for="{form_id}-message">Comment</label>
<textarea id="{form_id}-message" name="message" rows="3" maxlength="1000" required placeholder="Share your thoughts"></textarea>
<button type="submit">Post comment</button>
</form>"#,
        form_id = html_escape(form_id),
        action = url_encode(artwork_id),
        ret = html_escape(return_to),
    )
}
