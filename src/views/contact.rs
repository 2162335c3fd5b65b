use std::collections::HashMap;

use crate::forms::{FieldErrors, HONEYPOT_FIELD};
use crate::notify::Notice;
use crate::render::{html_escape, PageContext};

/// What a re-rendered form shows: the submitted values and the inline errors.
#[derive(Debug, Default, Clone)]
pub struct FormState {
    pub values: HashMap<String, String>,
    pub errors: FieldErrors,
}

impl FormState {
    pub fn invalid(values: HashMap<String, String>, errors: FieldErrors) -> Self {
        FormState { values, errors }
    }

    fn value(&self, field: &str) -> String {
        self.values
            .get(field)
            .map(|v| html_escape(v))
            .unwrap_or_default()
    }

    fn error(&self, field: &str) -> String {
        match self.errors.get(field) {
            Some(msg) => format!(
                r#"<span class="error-message" id="{f}-error" role="alert">{m}</span>"#,
                f = field,
                m = html_escape(msg)
            ),
            None => String::new(),
        }
    }

    fn invalid_attr(&self, field: &str) -> String {
        if self.errors.contains_key(field) {
            format!(r#" aria-invalid="true" aria-describedby="{}-error""#, field)
        } else {
            String::new()
        }
    }
}

fn message_slot(id: &str, notice: Option<&Notice>) -> String {
    match notice {
        Some(n) => format!(
            r#"<p id="{id}" class="form-message {kind}" role="status">{msg}</p>"#,
            id = id,
            kind = n.kind.as_str(),
            msg = html_escape(&n.message)
        ),
        None => format!(r#"<p id="{}" class="form-message" role="status"></p>"#, id),
    }
}

fn honeypot() -> String {
    format!(
        r#"<div class="honeypot" aria-hidden="true"><label for="{f}-field">Leave this empty</label><input type="text" id="{f}-field" name="{f}" tabindex="-1" autocomplete="off"></div>"#,
        f = HONEYPOT_FIELD
    )
}

pub fn render_body(ctx: &PageContext, contact: &FormState, newsletter: &FormState) -> String {
    let artist = ctx.artist();
    format!(
        r#"<section class="contact">
<h1>Get in touch</h1>
<p class="contact-text">Commissions, exhibitions or just a hello: {artist} reads every message.</p>
<form id="contact-form" class="contact-form" method="post" action="/contact" novalidate>
<label for="cf-name">Name <span class="required">(required)</span></label>
<input type="text" id="cf-name" name="name" value="{name}" required placeholder="Your name"{name_invalid}>
{name_error}
<label for="cf-email">Email <span class="required">(required)</span></label>
<input type="email" id="cf-email" name="email" value="{email}" required placeholder="your@email.com"{email_invalid}>
{email_error}
<label for="cf-message">Message <span class="required">(required)</span></label>
<textarea id="cf-message" name="message" rows="6" required placeholder="Your message"{message_invalid}>{message}</textarea>
{message_error}
{honeypot}
<button type="submit" class="contact-submit">Send Message</button>
{slot}
</form>
</section>
{newsletter}"#,
        artist = html_escape(&artist),
        name = contact.value("name"),
        name_invalid = contact.invalid_attr("name"),
        name_error = contact.error("name"),
        email = contact.value("email"),
        email_invalid = contact.invalid_attr("email"),
        email_error = contact.error("email"),
        message = contact.value("message"),
        message_invalid = contact.invalid_attr("message"),
        message_error = contact.error("message"),
        honeypot = honeypot(),
        slot = message_slot("contact-message", ctx.notice_for("contact")),
        newsletter = render_newsletter(ctx, newsletter, "/contact"),
    )
}

/// Newsletter signup, shared by the home and contact pages.
pub fn render_newsletter(ctx: &PageContext, state: &FormState, return_to: &str) -> String {
    format!(
        r#"<section class="newsletter">
<h2>Studio notes</h2>
<p>New work, exhibitions and the occasional sketchbook page, straight to your inbox.</p>
<form id="newsletter-form" class="newsletter-form" method="post" action="/newsletter" novalidate>
<input type="hidden" name="return_to" value="{ret}">
<label for="nl-email">Email</label>
<input type="email" id="nl-email" name="email" value="{email}" required placeholder="your@email.com"{invalid}>
{error}
{honeypot}
<button type="submit">Subscribe</button>
{slot}
</form>
</section>"#,
        ret = html_escape(return_to),
        email = state.value("email"),
        invalid = state.invalid_attr("email"),
        error = state.error("email"),
        honeypot = honeypot(),
        slot = message_slot("newsletter-message", ctx.notice_for("newsletter")),
    )
}
