use rocket::request::{FromRequest, Outcome, Request};
use url::Url;

/// Production origin used when no usable origin is known.
pub const FALLBACK_ORIGIN: &str = "https://artandsunnythings.com";

/// Origin the visitor reached us on, from `Host` and `X-Forwarded-Proto`.
pub struct RequestOrigin(pub Option<String>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for RequestOrigin {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let host = request.headers().get_one("Host").map(str::trim);
        let proto = request
            .headers()
            .get_one("X-Forwarded-Proto")
            .map(str::trim)
            .filter(|p| *p == "https" || *p == "http")
            .unwrap_or("http");
        Outcome::Success(RequestOrigin(
            host.filter(|h| !h.is_empty())
                .map(|h| format!("{}://{}", proto, h)),
        ))
    }
}

/// An http(s) origin with a host, normalised to `scheme://host[:port]`.
pub fn usable_origin(candidate: &str) -> Option<String> {
    let candidate = candidate.trim();
    if candidate.is_empty() || candidate == "null" {
        return None;
    }
    let url = Url::parse(candidate).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    Some(url.origin().ascii_serialization())
}

/// First usable origin among the configured site URL, the request origin
/// and the configured fallback; the built-in production origin otherwise.
pub fn resolve_origin(site_url: &str, request: Option<&str>, fallback: &str) -> String {
    usable_origin(site_url)
        .or_else(|| request.and_then(usable_origin))
        .or_else(|| usable_origin(fallback))
        .unwrap_or_else(|| FALLBACK_ORIGIN.to_string())
}

/// Canonical share link of an artwork: `{origin}/art/?piece={slug}`.
pub fn share_url(origin: &str, slug: &str) -> String {
    let base = usable_origin(origin).unwrap_or_else(|| FALLBACK_ORIGIN.to_string());
    match Url::parse(&base).and_then(|u| u.join("/art/")) {
        Ok(mut url) => {
            url.query_pairs_mut().append_pair("piece", slug);
            url.to_string()
        }
        Err(_) => format!("{}/art/?piece={}", FALLBACK_ORIGIN, slug),
    }
}
