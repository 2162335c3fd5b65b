#[macro_use]
extern crate rocket;

use std::path::Path;
use std::sync::Arc;

use log::{info, warn};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::fs::FileServer;
use rocket::http::Header;
use rocket::response::content::RawHtml;
use rocket::{Build, Rocket};

mod boot;
mod carousel;
mod catalog;
mod comments;
mod db;
mod feed;
mod filter;
mod forms;
mod models;
mod notify;
mod overlay;
mod preferences;
mod render;
mod routes;
mod share;
mod source;
mod storage;
mod store;
mod views;
mod visitor;

#[cfg(test)]
mod tests;

use store::Store;

/// Visitor-specific JSON must never be served from a shared cache.
pub struct NoCacheApi;

#[rocket::async_trait]
impl Fairing for NoCacheApi {
    fn info(&self) -> Info {
        Info { name: "No-Cache API", kind: Kind::Response }
    }

    async fn on_response<'r>(&self, req: &'r rocket::Request<'_>, res: &mut rocket::Response<'r>) {
        if req.uri().path().starts_with("/api") {
            res.set_header(Header::new("Cache-Control", "no-store, no-cache, must-revalidate, max-age=0"));
            res.set_header(Header::new("Pragma", "no-cache"));
        }
    }
}

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml(render::render_error_page(404, "Page not found."))
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml(render::render_error_page(500, "Internal server error."))
}

/// Assemble the application around a store. Static directories are only
/// mounted when present.
fn build(store: Arc<dyn Store>) -> Rocket<Build> {
    let mut app = rocket::build()
        .manage(store)
        .attach(NoCacheApi)
        .mount("/", routes::public::routes())
        .mount("/api", routes::api::routes())
        .register("/", catchers![not_found, server_error]);

    for (mount, dir) in [("/static", "site/static"), ("/assets", "site/assets")] {
        if Path::new(dir).is_dir() {
            app = app.mount(mount, FileServer::from(dir));
        } else {
            warn!("Static directory {} missing; {} not served", dir, mount);
        }
    }
    app
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    // Directories and data files must be in place before the store opens
    boot::run();

    let store = store::open(db::DB_PATH);
    info!(
        "Serving {} ({})",
        store.setting_get_or("site_name", "Art and sunny things"),
        store.setting_get_or("catalog_source", "site/data/artworks.json")
    );

    build(store)
}
