use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::request::{FromRequest, Outcome, Request};
use rocket::time::Duration;
use sha2::{Digest, Sha256};

use crate::storage::LocalStorage;
use crate::store::Store;

pub const VISITOR_COOKIE: &str = "sunny_visitor";

/// The browser making the request. Every visitor gets a private
/// partition of the key-value store, so what one browser writes only that
/// browser reads back.
pub struct Visitor {
    pub scope: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Visitor {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        // Cached so a request that mints a new id uses it consistently
        let id = request.local_cache(|| VisitorId(visitor_id(request.cookies())));
        Outcome::Success(Visitor {
            scope: scope_for(&id.0),
        })
    }
}

struct VisitorId(String);

impl Visitor {
    pub fn storage<'a>(&self, store: &'a dyn Store) -> LocalStorage<'a> {
        LocalStorage::new(store, &self.scope)
    }
}

fn visitor_id(cookies: &CookieJar<'_>) -> String {
    if let Some(c) = cookies.get_private(VISITOR_COOKIE) {
        if !c.value().is_empty() {
            return c.value().to_string();
        }
    }
    let id = uuid::Uuid::new_v4().to_string();
    let mut cookie = Cookie::new(VISITOR_COOKIE, id.clone());
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_max_age(Duration::days(365));
    cookies.add_private(cookie);
    id
}

/// Storage partition for a visitor id. The raw id never reaches the database.
pub fn scope_for(visitor_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(visitor_id.as_bytes());
    hex::encode(hasher.finalize())
}
