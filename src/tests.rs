#![cfg(test)]

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;

use crate::carousel::{Carousel, FEATURED};
use crate::catalog::{parse_catalog, CatalogLoader};
use crate::comments::{comments_key, CommentStore, SubmitOutcome};
use crate::db::{run_migrations, seed_defaults, DbPool};
use crate::feed::{parse_feed, FeedLoader};
use crate::filter::{self, GalleryQuery, GalleryView, ALL_CATEGORIES};
use crate::forms::{self, FormKind, FormOutcome, FormRelay, HONEYPOT_FIELD};
use crate::models::artwork::{self, Artwork};
use crate::models::comment::{Comment, CommentForm};
use crate::notify::{Notice, Notifier, ToastKind, ToastQueue};
use crate::overlay::ZoomOverlay;
use crate::preferences::{Preferences, Theme, ANALYTICS_OPTOUT_KEY, THEME_KEY};
use crate::render::{asset_url, format_count, format_date, html_escape, url_encode};
use crate::routes::safe_return_path;
use crate::share::{resolve_origin, share_url, usable_origin, FALLBACK_ORIGIN};
use crate::storage::LocalStorage;
use crate::store::{MemoryStore, SqliteStore, Store};
use crate::views::detail::resolve_slug;
use crate::views::gallery::{render_grid, Threads, EMPTY_GALLERY};
use crate::visitor::scope_for;

/// Atomic counter for unique shared-cache DB names so parallel tests don't collide.
static TEST_DB_COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

/// Create a fresh in-memory SQLite pool with all migrations + seed defaults applied.
/// Uses a named shared-cache in-memory DB so every pooled connection sees the same data.
fn test_pool() -> DbPool {
    let id = TEST_DB_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let uri = format!("file:gallerydb_{}?mode=memory&cache=shared", id);
    let manager = SqliteConnectionManager::file(uri);
    let pool = Pool::builder()
        .max_size(2)
        .build(manager)
        .expect("Failed to create test pool");
    run_migrations(&pool).expect("Failed to run migrations");
    seed_defaults(&pool).expect("Failed to seed defaults");
    pool
}

fn sqlite_store() -> SqliteStore {
    SqliteStore::new(test_pool())
}

fn art(id: &str, slug: &str, category: &str) -> Artwork {
    Artwork {
        id: id.to_string(),
        slug: slug.to_string(),
        title: format!("Title {}", slug),
        category: category.to_string(),
        medium: "Acrylic on canvas".to_string(),
        dimensions: "12 x 16 in".to_string(),
        year: "2024".to_string(),
        commentary: format!("Notes about {}", slug),
        image: format!("assets/images/{}.webp", slug),
        ..Default::default()
    }
}

fn sample_catalog() -> Vec<Artwork> {
    let mut sunrise = art("1", "sunrise", "Landscapes");
    sunrise.title = "Sunrise Horizons".to_string();
    sunrise.commentary = "Dawn over the dunes.".to_string();
    let mut marigold = art("2", "marigold", "Florals");
    marigold.title = "Marigold Breeze".to_string();
    marigold.medium = "Watercolor".to_string();
    marigold.commentary = "Garlands in the wind.".to_string();
    let mut bloom = art("3", "bloom", "Florals");
    bloom.title = "Desert Bloom".to_string();
    bloom.commentary = "A SUNNY surprise among the sand.".to_string();
    let mut dusk = art("4", "dusk", "Landscapes");
    dusk.title = "Dusk Over Jaipur".to_string();
    dusk.medium = "Oil pastel".to_string();
    vec![sunrise, marigold, bloom, dusk]
}

fn comment_form(name: &str, message: &str) -> CommentForm {
    CommentForm {
        name: name.to_string(),
        message: message.to_string(),
    }
}

fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ═══════════════════════════════════════════════════════════
// Store: settings
// ═══════════════════════════════════════════════════════════

#[test]
fn settings_seeded_with_defaults() {
    let store = sqlite_store();
    assert_eq!(store.setting_get_or("site_name", ""), "Art and sunny things");
    assert_eq!(store.setting_get_i64("feed_limit"), 6);
    assert_eq!(store.setting_get_i64("storage_quota_bytes"), 5 * 1024 * 1024);
}

#[test]
fn settings_set_and_get() {
    let store = sqlite_store();
    store.setting_set("site_url", "https://example.com").unwrap();
    assert_eq!(store.setting_get("site_url"), Some("https://example.com".to_string()));
}

#[test]
fn settings_seed_never_overwrites() {
    let store = sqlite_store();
    store.setting_set("artist_name", "Someone Else").unwrap();
    store.seed_defaults().unwrap();
    assert_eq!(store.setting_get_or("artist_name", ""), "Someone Else");
}

#[test]
fn settings_get_or_default_for_missing_key() {
    let store = sqlite_store();
    assert_eq!(store.setting_get_or("nope", "fallback"), "fallback");
    assert_eq!(store.setting_get_i64("nope"), 0);
}

#[test]
fn settings_all_contains_seeded_keys() {
    let store = sqlite_store();
    let all = store.setting_all();
    assert!(all.contains_key("catalog_source"));
    assert!(all.contains_key("contact_endpoint"));
}

// ═══════════════════════════════════════════════════════════
// Store: visitor storage
// ═══════════════════════════════════════════════════════════

#[test]
fn storage_scopes_are_isolated() {
    let store = sqlite_store();
    store.storage_set("visitor-a", "k", "one").unwrap();
    store.storage_set("visitor-b", "k", "two").unwrap();
    assert_eq!(store.storage_get("visitor-a", "k").unwrap(), Some("one".to_string()));
    assert_eq!(store.storage_get("visitor-b", "k").unwrap(), Some("two".to_string()));
    assert_eq!(store.storage_get("visitor-c", "k").unwrap(), None);
}

#[test]
fn storage_set_overwrites_and_remove_deletes() {
    let store = sqlite_store();
    store.storage_set("s", "k", "first").unwrap();
    store.storage_set("s", "k", "second").unwrap();
    assert_eq!(store.storage_get("s", "k").unwrap(), Some("second".to_string()));
    store.storage_remove("s", "k").unwrap();
    assert_eq!(store.storage_get("s", "k").unwrap(), None);
}

#[test]
fn storage_usage_counts_key_and_value_bytes() {
    let store = sqlite_store();
    assert_eq!(store.storage_usage("s").unwrap(), 0);
    store.storage_set("s", "ab", "cde").unwrap();
    store.storage_set("s", "f", "ü").unwrap();
    assert_eq!(store.storage_usage("s").unwrap(), 2 + 3 + 1 + 2);
}

#[test]
fn memory_store_matches_sqlite_usage() {
    let store = MemoryStore::seeded();
    store.storage_set("s", "ab", "cde").unwrap();
    store.storage_set("s", "f", "ü").unwrap();
    assert_eq!(store.storage_usage("s").unwrap(), 8);
    assert_eq!(store.setting_get_or("site_name", ""), "Art and sunny things");
}

#[test]
fn memory_store_disabled_writes_fail() {
    let store = MemoryStore::seeded();
    store.storage_set("s", "k", "v").unwrap();
    store.disable_writes();
    assert!(store.storage_set("s", "k", "w").is_err());
    assert!(store.storage_remove("s", "k").is_err());
    assert_eq!(store.storage_get("s", "k").unwrap(), Some("v".to_string()));
}

// ═══════════════════════════════════════════════════════════
// LocalStorage quota
// ═══════════════════════════════════════════════════════════

#[test]
fn local_storage_quota_rejects_and_keeps_old_value() {
    let store = MemoryStore::seeded();
    let storage = LocalStorage::with_quota(&store, "scope", 10);
    storage.set_item("key", "1234").unwrap();
    let err = storage.set_item("key", "123456789").unwrap_err();
    assert!(err.contains("quota exceeded"));
    assert_eq!(storage.get_item("key").unwrap(), Some("1234".to_string()));
}

#[test]
fn local_storage_replacement_counts_only_new_size() {
    let store = MemoryStore::seeded();
    let storage = LocalStorage::with_quota(&store, "scope", 10);
    storage.set_item("key", "1234567").unwrap();
    // 3 + 7 == quota: replacing must not count the old value twice
    storage.set_item("key", "7654321").unwrap();
    assert_eq!(storage.get_item("key").unwrap(), Some("7654321".to_string()));
}

#[test]
fn local_storage_quota_from_setting() {
    let store = MemoryStore::seeded();
    store.setting_set("storage_quota_bytes", "8").unwrap();
    let storage = LocalStorage::new(&store, "scope");
    assert!(storage.set_item("abc", "defgh").is_ok());
    assert!(storage.set_item("x", "y").is_err());
}

// ═══════════════════════════════════════════════════════════
// Comment store
// ═══════════════════════════════════════════════════════════

#[test]
fn comment_key_is_prefixed_id() {
    assert_eq!(comments_key("a1"), "art-comments-a1");
}

#[test]
fn comment_submit_then_load_round_trip() {
    let store = sqlite_store();
    let comments = CommentStore::new(LocalStorage::new(&store, "visitor"));
    let before = Utc::now();
    let outcome = comments.submit("a1", &comment_form("Ana", "Lovely!"));
    let saved = match outcome {
        SubmitOutcome::Saved(c) => c,
        other => panic!("expected Saved, got {:?}", other),
    };

    let thread = comments.load("a1");
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].name, "Ana");
    assert_eq!(thread[0].message, "Lovely!");
    assert_eq!(thread[0], saved);
    assert!(thread[0].date >= before - Duration::seconds(1));
    assert!(thread[0].date <= Utc::now() + Duration::seconds(1));
}

#[test]
fn comment_save_prepends_newest_first() {
    let store = MemoryStore::seeded();
    let comments = CommentStore::new(LocalStorage::new(&store, "visitor"));
    let older = Comment {
        name: "First".into(),
        message: "one".into(),
        date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    };
    let newer = Comment {
        name: "Second".into(),
        message: "two".into(),
        date: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
    };
    comments.save("a1", &older).unwrap();
    comments.save("a1", &newer).unwrap();
    let thread = comments.load("a1");
    assert_eq!(thread, vec![newer, older]);
}

#[test]
fn comment_submit_trims_fields() {
    let store = MemoryStore::seeded();
    let comments = CommentStore::new(LocalStorage::new(&store, "visitor"));
    comments.submit("a1", &comment_form("  Ana ", "\tLovely!\n"));
    let thread = comments.load("a1");
    assert_eq!(thread[0].name, "Ana");
    assert_eq!(thread[0].message, "Lovely!");
}

#[test]
fn comment_blank_submission_never_writes() {
    let store = MemoryStore::seeded();
    let comments = CommentStore::new(LocalStorage::new(&store, "visitor"));
    assert!(matches!(
        comments.submit("a1", &comment_form("Ana", "Hi")),
        SubmitOutcome::Saved(_)
    ));

    for (name, message) in [("", "msg"), ("name", ""), ("   ", "msg"), ("name", " \n\t "), ("", "")] {
        let outcome = comments.submit("a1", &comment_form(name, message));
        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert_eq!(comments.load("a1").len(), 1);
    }
    assert!(comments.load("a2").is_empty());
    assert_eq!(store.storage_get("visitor", "art-comments-a2").unwrap(), None);
}

#[test]
fn comment_unparsable_entry_loads_empty() {
    let store = MemoryStore::seeded();
    store.storage_set("visitor", "art-comments-a1", "{not json").unwrap();
    let comments = CommentStore::new(LocalStorage::new(&store, "visitor"));
    assert!(comments.load("a1").is_empty());
}

#[test]
fn comment_threads_are_per_visitor() {
    let store = MemoryStore::seeded();
    CommentStore::new(LocalStorage::new(&store, "one"))
        .submit("a1", &comment_form("Ana", "Mine"));
    let other = CommentStore::new(LocalStorage::new(&store, "two"));
    assert!(other.load("a1").is_empty());
}

#[test]
fn comment_storage_disabled_is_unsaved_not_fatal() {
    let store = MemoryStore::seeded();
    let comments = CommentStore::new(LocalStorage::new(&store, "visitor"));
    comments.submit("a1", &comment_form("Ana", "Kept"));
    store.disable_writes();

    match comments.submit("a1", &comment_form("Ben", "Lost")) {
        SubmitOutcome::Unsaved { comment, reason } => {
            assert_eq!(comment.name, "Ben");
            assert!(reason.contains("disabled"));
        }
        other => panic!("expected Unsaved, got {:?}", other),
    }
    let thread = comments.load("a1");
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].name, "Ana");
}

#[test]
fn comment_quota_exceeded_is_unsaved() {
    let store = MemoryStore::seeded();
    let comments = CommentStore::new(LocalStorage::with_quota(&store, "visitor", 64));
    let long = "x".repeat(200);
    assert!(matches!(
        comments.submit("a1", &comment_form("Ana", &long)),
        SubmitOutcome::Unsaved { .. }
    ));
    assert!(comments.load("a1").is_empty());
}

#[test]
fn comment_form_normalized() {
    assert_eq!(
        comment_form(" a ", " b ").normalized(),
        Some(("a".to_string(), "b".to_string()))
    );
    assert_eq!(comment_form(" ", "b").normalized(), None);
}

// ═══════════════════════════════════════════════════════════
// Catalog
// ═══════════════════════════════════════════════════════════

#[test]
fn catalog_parses_numbers_and_missing_fields() {
    let json = r#"[
        {"id": 7, "slug": "sun", "title": "Sun", "year": 2023,
         "instagram_engagement": {"likes": 1200}},
        {"slug": "moon", "year": null}
    ]"#;
    let catalog = parse_catalog(json).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].id, "7");
    assert_eq!(catalog[0].year, "2023");
    assert_eq!(catalog[0].instagram_engagement.likes, 1200);
    assert_eq!(catalog[0].instagram_engagement.saves, 0);
    assert_eq!(catalog[1].id, "");
    assert_eq!(catalog[1].year, "");
}

#[test]
fn catalog_keeps_records_with_null_or_numeric_text() {
    let json = r#"[
        {"id": "a1", "slug": "sun", "title": 2024, "commentary": null, "medium": null},
        {"id": "a2", "slug": "moon", "title": "Moon", "image": 5}
    ]"#;
    let catalog = parse_catalog(json).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[0].title, "2024");
    assert_eq!(catalog[0].commentary, "");
    assert_eq!(catalog[0].medium, "");
    assert_eq!(catalog[1].title, "Moon");
    assert_eq!(catalog[1].image, "5");
}

#[test]
fn catalog_engagement_is_lenient() {
    let json = r#"[
        {"id": "a1", "slug": "sun", "instagram_engagement": null},
        {"id": "a2", "slug": "moon", "instagram_engagement": "lots"},
        {"id": "a3", "slug": "star",
         "instagram_engagement": {"likes": "12", "comments": null, "saves": -3}},
        {"id": "a4", "slug": "dust", "instagram_engagement": {"likes": 7.0, "saves": 2}}
    ]"#;
    let catalog = parse_catalog(json).unwrap();
    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog[0].instagram_engagement, Default::default());
    assert_eq!(catalog[1].instagram_engagement, Default::default());
    assert_eq!(catalog[2].instagram_engagement.likes, 12);
    assert_eq!(catalog[2].instagram_engagement.comments, 0);
    assert_eq!(catalog[2].instagram_engagement.saves, 0);
    assert_eq!(catalog[3].instagram_engagement.likes, 7);
    assert_eq!(catalog[3].instagram_engagement.saves, 2);
}

#[test]
fn catalog_non_object_record_becomes_empty_card() {
    let catalog = parse_catalog(r#"[null, 42, {"id": "a1", "slug": "sun"}]"#).unwrap();
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog[0], Artwork::default());
    assert_eq!(catalog[1], Artwork::default());
    assert_eq!(catalog[2].slug, "sun");
}

#[test]
fn catalog_rejects_non_array() {
    assert!(parse_catalog(r#"{"artworks": []}"#).is_err());
    assert!(parse_catalog("not json").is_err());
}

#[test]
fn catalog_categories_sorted_distinct() {
    let cats = artwork::categories(&sample_catalog());
    assert_eq!(cats, vec!["Florals".to_string(), "Landscapes".to_string()]);
}

#[test]
fn catalog_find_by_slug() {
    let catalog = sample_catalog();
    assert_eq!(artwork::find_by_slug(&catalog, "bloom").map(|a| a.id.as_str()), Some("3"));
    assert!(artwork::find_by_slug(&catalog, "missing").is_none());
}

#[rocket::async_test]
async fn catalog_fetch_reads_file() {
    let path = temp_file(r#"[{"id":"a1","slug":"sun","category":"Acrylic"}]"#);
    let load = CatalogLoader::new(&path).fetch().await;
    assert!(!load.is_fallback());
    assert_eq!(load.artworks.len(), 1);
    assert_eq!(load.artworks[0].slug, "sun");
}

#[rocket::async_test]
async fn catalog_fetch_failure_is_empty_fallback() {
    let load = CatalogLoader::new(&missing_path()).fetch().await;
    assert!(load.is_fallback());
    assert!(load.artworks.is_empty());
    assert!(load.notice.unwrap_or_default().contains("cannot read"));
}

#[rocket::async_test]
async fn catalog_fetch_invalid_json_is_fallback() {
    let path = temp_file("[{broken");
    let load = CatalogLoader::new(&path).fetch().await;
    assert!(load.is_fallback());
    assert!(load.artworks.is_empty());
    assert!(load.notice.unwrap_or_default().contains("invalid catalog JSON"));
}

// ═══════════════════════════════════════════════════════════
// Filter / search
// ═══════════════════════════════════════════════════════════

#[test]
fn filter_scenario_category_only() {
    let catalog = vec![art("a1", "sun", "Acrylic"), art("a2", "moon", "Ink")];
    let result = filter::apply(&catalog, "Acrylic", "");
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, "a1");
}

#[test]
fn filter_category_keeps_only_matches_in_order() {
    let catalog = sample_catalog();
    for category in ["Florals", "Landscapes", "Nope"] {
        let result = filter::apply(&catalog, category, "");
        let expected: Vec<&str> = catalog
            .iter()
            .filter(|a| a.category == category)
            .map(|a| a.id.as_str())
            .collect();
        let got: Vec<&str> = result.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(got, expected);
        assert!(result.iter().all(|a| a.category == category));
    }
}

#[test]
fn filter_all_sentinel_bypasses_category() {
    let catalog = sample_catalog();
    assert_eq!(filter::apply(&catalog, ALL_CATEGORIES, "").len(), catalog.len());
}

#[test]
fn filter_search_is_case_insensitive_substring() {
    let catalog = sample_catalog();
    for term in ["sunny", "SUNNY", "  Sunny  "] {
        let got: Vec<&str> = filter::apply(&catalog, ALL_CATEGORIES, term)
            .iter()
            .map(|a| a.slug.as_str())
            .collect();
        assert_eq!(got, vec!["bloom"]);
    }
}

#[test]
fn filter_search_matches_exactly_joined_text() {
    let catalog = sample_catalog();
    for term in ["watercolor", "landscapes", "dawn", "title", "e", "xyz"] {
        let needle = term.to_lowercase();
        let expected: Vec<&str> = catalog
            .iter()
            .filter(|a| {
                format!("{} {} {} {}", a.title, a.commentary, a.medium, a.category)
                    .to_lowercase()
                    .contains(&needle)
            })
            .map(|a| a.id.as_str())
            .collect();
        let got: Vec<&str> = filter::apply(&catalog, ALL_CATEGORIES, term)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(got, expected, "term {}", term);
    }
}

#[test]
fn filter_blank_term_matches_everything() {
    let catalog = sample_catalog();
    assert_eq!(filter::apply(&catalog, ALL_CATEGORIES, "   ").len(), catalog.len());
}

#[test]
fn filter_is_idempotent_and_conjunctive() {
    let catalog = sample_catalog();
    let first = filter::apply(&catalog, "Florals", "garlands");
    let second = filter::apply(&catalog, "Florals", "garlands");
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].slug, "marigold");
    assert!(filter::apply(&catalog, "Landscapes", "garlands").is_empty());
}

#[test]
fn gallery_query_defaults() {
    let query = GalleryQuery::default();
    assert_eq!(query.category(), ALL_CATEGORIES);
    assert_eq!(query.search_term(), "");
    let blank = GalleryQuery {
        category: Some(String::new()),
        ..Default::default()
    };
    assert_eq!(blank.category(), ALL_CATEGORIES);
}

#[test]
fn gallery_category_is_matched_exactly() {
    let mut catalog = sample_catalog();
    catalog[0].category = " Landscapes ".to_string();
    let padded = GalleryQuery {
        category: Some(" Landscapes ".into()),
        ..Default::default()
    };
    assert_eq!(padded.category(), " Landscapes ");
    let view = GalleryView::new(&catalog, &padded);
    let got: Vec<&str> = view.filtered.iter().map(|a| a.slug.as_str()).collect();
    assert_eq!(got, vec!["sunrise"]);

    let plain = GalleryView::new(
        &catalog,
        &GalleryQuery {
            category: Some("Landscapes".into()),
            ..Default::default()
        },
    );
    let got: Vec<&str> = plain.filtered.iter().map(|a| a.slug.as_str()).collect();
    assert_eq!(got, vec!["dusk"]);
}

#[test]
fn gallery_view_zoom_only_for_visible_card() {
    let catalog = sample_catalog();
    let query = GalleryQuery {
        category: Some("Florals".into()),
        zoom: Some("bloom".into()),
        thread: Some("marigold".into()),
        ..Default::default()
    };
    let view = GalleryView::new(&catalog, &query);
    assert_eq!(view.overlay.target().map(|t| t.title.as_str()), Some("Desert Bloom"));
    assert!(view.is_thread_open("marigold"));
    assert!(!view.is_thread_open("bloom"));

    let hidden = GalleryQuery {
        category: Some("Florals".into()),
        zoom: Some("sunrise".into()),
        ..Default::default()
    };
    assert!(!GalleryView::new(&catalog, &hidden).overlay.is_open());
}

// ═══════════════════════════════════════════════════════════
// Zoom overlay
// ═══════════════════════════════════════════════════════════

#[test]
fn overlay_last_open_wins() {
    let mut overlay = ZoomOverlay::default();
    overlay.open("a.webp", "A");
    overlay.open("b.webp", "B");
    assert_eq!(overlay.target().map(|t| t.image.as_str()), Some("b.webp"));
}

#[test]
fn overlay_render_closes_through_links_only() {
    let catalog = sample_catalog();
    let query = GalleryQuery {
        category: Some("Florals".into()),
        zoom: Some("bloom".into()),
        ..Default::default()
    };
    let view = GalleryView::new(&catalog, &query);
    assert!(view.overlay.is_open());
    let html = crate::views::gallery::render_body(&view, &Threads::new(), FALLBACK_ORIGIN, false, 300);
    // Backdrop and close control lead back to the filtered gallery without zoom
    assert!(html.contains(r#"<a class="overlay-backdrop" href="/gallery?category=Florals""#));
    assert!(html.contains(r#"<a class="overlay-close" href="/gallery?category=Florals""#));
    // The image is not a link
    assert!(html.contains(r#"<figure><img class="zoom-image" src="/assets/images/bloom.webp""#));

    let closed = GalleryView::new(&catalog, &GalleryQuery::default());
    assert!(!closed.overlay.is_open());
    let html = crate::views::gallery::render_body(&closed, &Threads::new(), FALLBACK_ORIGIN, false, 300);
    assert!(html.contains(r#"class="zoom-modal" role="dialog""#));
}

// ═══════════════════════════════════════════════════════════
// Gallery rendering
// ═══════════════════════════════════════════════════════════

#[test]
fn render_grid_empty_has_single_placeholder() {
    let catalog = sample_catalog();
    let query = GalleryQuery {
        q: Some("nothing matches this".into()),
        ..Default::default()
    };
    let view = GalleryView::new(&catalog, &query);
    let html = render_grid(&view, &Threads::new(), FALLBACK_ORIGIN);
    assert_eq!(html.matches(EMPTY_GALLERY).count(), 1);
    assert!(!html.contains("art-card"));
}

#[test]
fn render_grid_cards_in_order_with_affordances() {
    let mut catalog = sample_catalog();
    catalog[0].instagram_engagement.likes = 12345;
    let view = GalleryView::new(&catalog, &GalleryQuery::default());
    let html = render_grid(&view, &Threads::new(), "https://example.com");

    assert_eq!(html.matches(r#"class="art-card""#).count(), 4);
    let first = html.find(r#"id="sunrise""#).unwrap();
    let second = html.find(r#"id="marigold""#).unwrap();
    assert!(first < second);
    assert!(html.contains("12,345"));
    assert!(html.contains(r#"data-share-url="https://example.com/art/?piece=sunrise""#));
    assert!(html.contains(r#"data-image="/assets/images/sunrise.webp""#));
    assert!(html.contains(r#"action="/comments/1""#));
    assert!(html.contains("Be the first to share a thought."));
}

#[test]
fn render_grid_escapes_catalog_text() {
    let mut catalog = vec![art("1", "x", "C")];
    catalog[0].title = "<script>alert(1)</script>".into();
    let view = GalleryView::new(&catalog, &GalleryQuery::default());
    let html = render_grid(&view, &Threads::new(), FALLBACK_ORIGIN);
    assert!(!html.contains("<script>alert"));
    assert!(html.contains("&lt;script&gt;"));
}

#[test]
fn render_grid_shows_thread_newest_first() {
    let catalog = vec![art("1", "x", "C")];
    let view = GalleryView::new(&catalog, &GalleryQuery::default());
    let mut threads = Threads::new();
    threads.insert(
        "1".into(),
        vec![
            Comment {
                name: "Newer".into(),
                message: "b".into(),
                date: Utc.with_ymd_and_hms(2025, 3, 7, 0, 0, 0).unwrap(),
            },
            Comment {
                name: "Older".into(),
                message: "a".into(),
                date: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            },
        ],
    );
    let html = render_grid(&view, &threads, FALLBACK_ORIGIN);
    assert!(html.find("Newer").unwrap() < html.find("Older").unwrap());
    assert!(html.contains("3/7/2025"));
}

// ═══════════════════════════════════════════════════════════
// Share links & origins
// ═══════════════════════════════════════════════════════════

#[test]
fn share_url_uses_origin() {
    assert_eq!(
        share_url("https://example.com", "sun"),
        "https://example.com/art/?piece=sun"
    );
    assert_eq!(
        share_url("http://localhost:8000/some/page", "a b"),
        "http://localhost:8000/art/?piece=a+b"
    );
}

#[test]
fn share_url_falls_back_for_unusable_origin() {
    for origin in ["", "null", "file:///index.html", "not a url"] {
        assert_eq!(
            share_url(origin, "sun"),
            format!("{}/art/?piece=sun", FALLBACK_ORIGIN)
        );
    }
}

#[test]
fn usable_origin_normalizes() {
    assert_eq!(usable_origin("https://example.com/path?x=1"), Some("https://example.com".into()));
    assert_eq!(usable_origin("null"), None);
    assert_eq!(usable_origin("ftp://example.com"), None);
}

#[test]
fn resolve_origin_order() {
    assert_eq!(
        resolve_origin("https://site.example", Some("http://req.example"), FALLBACK_ORIGIN),
        "https://site.example"
    );
    assert_eq!(
        resolve_origin("", Some("http://req.example"), FALLBACK_ORIGIN),
        "http://req.example"
    );
    assert_eq!(resolve_origin("", None, "https://fallback.example"), "https://fallback.example");
    assert_eq!(resolve_origin("", Some("null"), ""), FALLBACK_ORIGIN);
}

// ═══════════════════════════════════════════════════════════
// Detail slug resolution
// ═══════════════════════════════════════════════════════════

#[test]
fn resolve_slug_prefers_query() {
    assert_eq!(resolve_slug(Some("sun"), Some("moon")), Some("sun".into()));
    assert_eq!(resolve_slug(None, Some("#moon")), Some("moon".into()));
    assert_eq!(resolve_slug(Some("  "), Some("moon")), Some("moon".into()));
    assert_eq!(resolve_slug(None, None), None);
    assert_eq!(resolve_slug(Some(""), Some("#")), None);
}

// ═══════════════════════════════════════════════════════════
// Carousel
// ═══════════════════════════════════════════════════════════

#[test]
fn carousel_wraps_both_directions() {
    let mut carousel = Carousel::new(FEATURED);
    assert_eq!(carousel.index(), 0);
    carousel.prev();
    assert_eq!(carousel.index(), FEATURED.len() - 1);
    carousel.next();
    assert_eq!(carousel.index(), 0);
    carousel.select(FEATURED.len() as i64 + 1);
    assert_eq!(carousel.index(), 1);
    carousel.select(-1);
    assert_eq!(carousel.index(), FEATURED.len() - 1);
}

#[test]
fn carousel_neighbours_wrap() {
    let carousel = Carousel::new(FEATURED);
    assert_eq!(carousel.neighbours(), (FEATURED.len() - 1, 1));
}

#[test]
fn carousel_empty_has_no_current() {
    let mut carousel = Carousel::new(&[]);
    carousel.next();
    assert!(carousel.current().is_none());
    assert_eq!(carousel.index(), 0);
}

// ═══════════════════════════════════════════════════════════
// Instagram feed
// ═══════════════════════════════════════════════════════════

#[test]
fn feed_parses_array_and_graph_shape() {
    let array = r#"[{"image":"a.webp","caption":"One","permalink":"https://instagram.com/p/1"}]"#;
    let graph = r#"{"data":[{"id":"9","media_url":"https://cdn/x.jpg","permalink":"https://instagram.com/p/9"}]}"#;
    let items = parse_feed(array).unwrap();
    assert_eq!(items[0].image_url(), "a.webp");
    assert_eq!(items[0].caption.as_deref(), Some("One"));
    let items = parse_feed(graph).unwrap();
    assert_eq!(items[0].image_url(), "https://cdn/x.jpg");
    assert!(parse_feed("nope").is_err());
}

#[test]
fn feed_placeholder_credentials_are_not_live() {
    let store = MemoryStore::seeded();
    assert!(!FeedLoader::from_store(&store).live_configured());
    store.setting_set("instagram_token", "real-token").unwrap();
    store.setting_set("instagram_user_id", "12345").unwrap();
    let loader = FeedLoader::from_store(&store);
    assert!(loader.live_configured());
    assert!(loader.api_url().starts_with("https://graph.instagram.com/12345/media?"));
}

#[rocket::async_test]
async fn feed_static_limited_to_six() {
    let items: Vec<String> = (0..9)
        .map(|i| format!(r#"{{"image":"{}.webp","permalink":"https://instagram.com/p/{}"}}"#, i, i))
        .collect();
    let path = temp_file(&format!("[{}]", items.join(",")));
    let store = MemoryStore::seeded();
    store.setting_set("instagram_source", &path).unwrap();
    let feed = FeedLoader::from_store(&store).load().await;
    assert_eq!(feed.len(), 6);
    assert_eq!(feed[0].image_url(), "0.webp");
}

#[rocket::async_test]
async fn feed_missing_source_is_empty() {
    let store = MemoryStore::seeded();
    store.setting_set("instagram_source", &missing_path()).unwrap();
    assert!(FeedLoader::from_store(&store).load().await.is_empty());
}

// ═══════════════════════════════════════════════════════════
// Forms
// ═══════════════════════════════════════════════════════════

#[test]
fn forms_validate_required_fields() {
    let errors = forms::validate(FormKind::Contact, &fields(&[("name", " "), ("email", "a@b.co")]));
    assert!(errors.contains_key("name"));
    assert!(errors.contains_key("message"));
    assert!(!errors.contains_key("email"));
}

#[test]
fn forms_validate_email_shape() {
    assert!(forms::is_valid_email("sunita@example.com"));
    assert!(!forms::is_valid_email("sunita@example"));
    assert!(!forms::is_valid_email("no at sign"));
    let errors = forms::validate(FormKind::Newsletter, &fields(&[("email", "bad")]));
    assert_eq!(errors.get("email").map(String::as_str), Some("Please enter a valid email address"));
}

#[test]
fn forms_honeypot_and_payload() {
    let submitted = fields(&[("email", "a@b.co"), (HONEYPOT_FIELD, "bot")]);
    assert!(forms::is_spam(&submitted));
    assert!(!forms::is_spam(&fields(&[("email", "a@b.co"), (HONEYPOT_FIELD, " ")])));
    let payload = forms::payload(&submitted);
    assert!(payload.contains_key("email"));
    assert!(!payload.contains_key(HONEYPOT_FIELD));
}

#[test]
fn forms_endpoint_resolution() {
    let store = MemoryStore::seeded();
    // Relative endpoint with no site URL cannot be reached
    assert_eq!(FormRelay::from_store(&store).endpoint(FormKind::Contact), None);

    store.setting_set("site_url", "https://site.example").unwrap();
    assert_eq!(
        FormRelay::from_store(&store).endpoint(FormKind::Contact),
        Some("https://site.example/api/contact-secure".into())
    );

    store.setting_set("newsletter_endpoint", "https://relay.example/subscribe").unwrap();
    assert_eq!(
        FormRelay::from_store(&store).endpoint(FormKind::Newsletter),
        Some("https://relay.example/subscribe".into())
    );
}

#[rocket::async_test]
async fn forms_submit_order_of_checks() {
    let store = MemoryStore::seeded();
    let relay = FormRelay::from_store(&store);

    let invalid = relay.submit(FormKind::Newsletter, &fields(&[(HONEYPOT_FIELD, "bot")])).await;
    assert!(matches!(invalid, FormOutcome::Invalid(_)));

    let spam = relay
        .submit(FormKind::Newsletter, &fields(&[("email", "a@b.co"), (HONEYPOT_FIELD, "bot")]))
        .await;
    assert_eq!(spam, FormOutcome::Spam);

    let local = relay.submit(FormKind::Newsletter, &fields(&[("email", "a@b.co")])).await;
    assert_eq!(local, FormOutcome::LocalFallback);
}

#[rocket::async_test]
async fn forms_relay_failure_falls_back() {
    let store = MemoryStore::seeded();
    store.setting_set("contact_endpoint", "http://127.0.0.1:9/contact").unwrap();
    store.setting_set("relay_timeout_secs", "2").unwrap();
    let outcome = FormRelay::from_store(&store)
        .submit(
            FormKind::Contact,
            &fields(&[("name", "Ana"), ("email", "a@b.co"), ("message", "Hello")]),
        )
        .await;
    assert_eq!(outcome, FormOutcome::LocalFallback);
}

// ═══════════════════════════════════════════════════════════
// Preferences
// ═══════════════════════════════════════════════════════════

#[test]
fn preferences_default_follows_system_and_opted_in() {
    let store = MemoryStore::seeded();
    let prefs = Preferences::load(&LocalStorage::new(&store, "v"));
    assert_eq!(prefs.theme, None);
    assert_eq!(prefs.theme_or_default(), Theme::Light);
    assert_eq!(prefs.theme_class(), "auto");
    assert!(!prefs.analytics_opt_out);
}

#[test]
fn preferences_theme_and_optout_persist() {
    let store = MemoryStore::seeded();
    let storage = LocalStorage::new(&store, "v");
    Preferences::save_theme(&storage, Theme::Dark).unwrap();
    Preferences::opt_out_of_analytics(&storage).unwrap();
    assert_eq!(store.storage_get("v", THEME_KEY).unwrap(), Some("dark".into()));
    assert_eq!(store.storage_get("v", ANALYTICS_OPTOUT_KEY).unwrap(), Some("true".into()));

    let prefs = Preferences::load(&storage);
    assert_eq!(prefs.theme, Some(Theme::Dark));
    assert_eq!(prefs.theme_class(), "dark");
    assert!(prefs.analytics_opt_out);

    Preferences::opt_in_to_analytics(&storage).unwrap();
    assert!(!Preferences::load(&storage).analytics_opt_out);
}

#[test]
fn preferences_unknown_theme_counts_as_unset() {
    let store = MemoryStore::seeded();
    store.storage_set("v", THEME_KEY, "sepia").unwrap();
    assert_eq!(Preferences::load(&LocalStorage::new(&store, "v")).theme, None);
    assert_eq!(Theme::Light.toggled(), Theme::Dark);
}

// ═══════════════════════════════════════════════════════════
// Toasts & helpers
// ═══════════════════════════════════════════════════════════

#[test]
fn notice_parses_targeted_flash_kinds() {
    let n = Notice::parse("contact:success", "Thanks");
    assert!(n.is_for("contact"));
    assert_eq!(n.kind, ToastKind::Success);
    assert_eq!(n.flash_kind(), "contact:success");

    let bare = Notice::parse("error", "Oops");
    assert_eq!(bare.target, None);
    assert_eq!(bare.kind, ToastKind::Error);
    assert_eq!(Notice::parse("whatever", "x").kind, ToastKind::Info);
}

#[test]
fn toast_queue_renders_escaped() {
    let mut queue = ToastQueue::new();
    queue.notify("<b>Saved</b>", ToastKind::Success);
    let html = queue.render();
    assert!(html.contains(r#"data-duration="3000""#));
    assert!(html.contains("toast-success"));
    assert!(html.contains("&lt;b&gt;Saved&lt;/b&gt;"));
}

#[test]
fn format_helpers() {
    assert_eq!(format_count(0), "0");
    assert_eq!(format_count(999), "999");
    assert_eq!(format_count(1000), "1,000");
    assert_eq!(format_count(1234567), "1,234,567");
    assert_eq!(format_date(&Utc.with_ymd_and_hms(2024, 11, 5, 13, 0, 0).unwrap()), "11/5/2024");
    assert_eq!(html_escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
}

#[test]
fn url_encode_is_safe_in_paths_and_queries() {
    assert_eq!(url_encode("sunrise-horizons"), "sunrise-horizons");
    assert_eq!(url_encode("a b"), "a%20b");
    assert_eq!(url_encode("a+b/c?d#e"), "a%2Bb%2Fc%3Fd%23e");
    assert_eq!(url_encode("café"), "caf%C3%A9");
}

#[test]
fn asset_url_roots_relative_paths() {
    assert_eq!(asset_url("assets/images/a.webp"), "/assets/images/a.webp");
    assert_eq!(asset_url("./assets/a.webp"), "/assets/a.webp");
    assert_eq!(asset_url("/assets/a.webp"), "/assets/a.webp");
    assert_eq!(asset_url("https://cdn.example/a.webp"), "https://cdn.example/a.webp");
    assert_eq!(asset_url(""), "");
}

#[test]
fn safe_return_path_rejects_offsite() {
    assert_eq!(safe_return_path(Some("/gallery?thread=a#a"), "/"), "/gallery?thread=a#a");
    assert_eq!(safe_return_path(Some("https://evil.example"), "/"), "/");
    assert_eq!(safe_return_path(Some("//evil.example"), "/"), "/");
    assert_eq!(safe_return_path(Some("gallery"), "/gallery"), "/gallery");
    assert_eq!(safe_return_path(None, "/contact"), "/contact");
}

#[test]
fn visitor_scope_is_stable_hash() {
    let a = scope_for("abc");
    assert_eq!(a, scope_for("abc"));
    assert_ne!(a, scope_for("abd"));
    assert_eq!(a.len(), 64);
    assert!(!a.contains("abc"));
}

// ═══════════════════════════════════════════════════════════
// Routes
// ═══════════════════════════════════════════════════════════

const CATALOG_JSON: &str = r#"[
  {"id": "1", "slug": "sunrise-horizons", "title": "Sunrise Horizons", "category": "Landscapes",
   "medium": "Acrylic on canvas", "dimensions": "24 x 36 in", "year": 2023,
   "commentary": "Dawn over the dunes.", "image": "assets/images/sunrise.webp",
   "instagram_engagement": {"likes": 1234, "comments": 56, "saves": 7}},
  {"id": "2", "slug": "marigold-breeze", "title": "Marigold Breeze", "category": "Florals",
   "medium": "Watercolor", "dimensions": "12 x 16 in", "year": "2022",
   "commentary": "Garlands in the wind.", "image": "assets/images/marigold.webp"},
  {"id": "3", "slug": "desert-bloom", "title": "Desert Bloom", "category": "Florals",
   "medium": "Acrylic on paper", "dimensions": "9 x 12 in", "year": 2024,
   "commentary": "A sunny surprise among the sand.", "image": "/assets/images/bloom.webp"}
]"#;

fn temp_file(contents: &str) -> String {
    let path = std::env::temp_dir().join(format!("sunny-gallery-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, contents).expect("write temp file");
    path.to_string_lossy().into_owned()
}

fn missing_path() -> String {
    std::env::temp_dir()
        .join(format!("sunny-gallery-missing-{}.json", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned()
}

fn seeded_store(catalog: Option<&str>) -> MemoryStore {
    let store = MemoryStore::seeded();
    let source = match catalog {
        Some(json) => temp_file(json),
        None => missing_path(),
    };
    store.setting_set("catalog_source", &source).unwrap();
    store.setting_set("instagram_source", &missing_path()).unwrap();
    store
}

fn client_for(store: Arc<dyn Store>) -> Client {
    Client::tracked(crate::build(store)).expect("valid rocket instance")
}

fn client(catalog: Option<&str>) -> Client {
    client_for(Arc::new(seeded_store(catalog)))
}

fn get_html(client: &Client, uri: &str) -> String {
    let response = client.get(uri.to_string()).dispatch();
    assert_eq!(response.status(), Status::Ok, "GET {}", uri);
    response.into_string().unwrap_or_default()
}

fn post_form(client: &Client, uri: &str, body: &str) -> (Status, Option<String>) {
    let response = client
        .post(uri.to_string())
        .header(ContentType::Form)
        .body(body.to_string())
        .dispatch();
    let location = response.headers().get_one("Location").map(str::to_string);
    (response.status(), location)
}

#[test]
fn route_gallery_lists_cards() {
    let client = client(Some(CATALOG_JSON));
    let html = get_html(&client, "/gallery");
    assert!(html.contains(r#"id="sunrise-horizons""#));
    assert!(html.contains(r#"id="desert-bloom""#));
    assert!(html.contains("1,234"));
    assert!(html.contains("https://artandsunnythings.com/art/?piece=sunrise-horizons"));
    assert!(html.contains(r#"<option value="Florals">Florals</option>"#));
    assert!(html.contains(r#"class="gallery-grid" data-debounce="300""#));
    assert!(!html.contains("Using offline gallery data"));
}

#[test]
fn route_gallery_filters_by_category_and_search() {
    let client = client(Some(CATALOG_JSON));
    let html = get_html(&client, "/gallery?category=Florals");
    assert!(html.contains(r#"id="marigold-breeze""#));
    assert!(html.contains(r#"id="desert-bloom""#));
    assert!(!html.contains(r#"id="sunrise-horizons""#));

    let html = get_html(&client, "/gallery?q=SUNNY");
    assert!(html.contains(r#"id="desert-bloom""#));
    assert!(!html.contains(r#"id="marigold-breeze""#));

    let html = get_html(&client, "/gallery?q=zzz");
    assert_eq!(html.matches(EMPTY_GALLERY).count(), 1);
}

#[test]
fn route_gallery_renders_malformed_record_as_card() {
    let client = client(Some(
        r#"[{"id": "1", "slug": "odd", "title": 2024, "commentary": null, "instagram_engagement": null},
            {"id": "2", "slug": "fine", "title": "Fine", "category": "Florals"}]"#,
    ));
    let html = get_html(&client, "/gallery");
    assert!(html.contains(r#"id="odd""#));
    assert!(html.contains(r#"id="fine""#));
    assert!(html.contains(r#"<a href="/art/?piece=odd">2024</a>"#));
    assert!(!html.contains("Using offline gallery data"));
    assert!(!html.contains(EMPTY_GALLERY));
}

#[test]
fn route_gallery_catalog_failure_shows_placeholder() {
    let client = client(None);
    let html = get_html(&client, "/gallery");
    assert_eq!(html.matches(EMPTY_GALLERY).count(), 1);
    assert!(html.contains(r#"class="gallery-grid gallery-fallback""#));
    assert!(html.contains("Using offline gallery data"));
}

#[test]
fn route_gallery_zoom_and_thread_without_script() {
    let client = client(Some(CATALOG_JSON));
    let html = get_html(&client, "/gallery?zoom=marigold-breeze&thread=desert-bloom");
    assert!(html.contains(r#"class="zoom-modal is-open""#));
    assert!(html.contains(r#"<figcaption class="zoom-caption">Marigold Breeze</figcaption>"#));
    assert!(html.contains(r#"<div id="comments-desert-bloom" class="comments">"#));
    assert!(html.contains(r#"<div id="comments-sunrise-horizons" class="comments" hidden>"#));
}

#[test]
fn route_comment_post_then_visible_on_gallery_and_detail() {
    let client = client(Some(CATALOG_JSON));
    let (status, location) = post_form(
        &client,
        "/comments/1",
        "name=%20Ana%20&message=Lovely!&return_to=%2Fgallery%3Fthread%3Dsunrise-horizons%23sunrise-horizons",
    );
    assert_eq!(status, Status::SeeOther);
    assert_eq!(location.as_deref(), Some("/gallery?thread=sunrise-horizons#sunrise-horizons"));

    let html = get_html(&client, "/gallery?thread=sunrise-horizons");
    assert!(html.contains("Comment posted!"));
    assert!(html.contains("<strong>Ana</strong>"));
    assert!(html.contains("Lovely!"));

    // Same thread key on the detail page
    let html = get_html(&client, "/art/?piece=sunrise-horizons");
    assert!(html.contains("<strong>Ana</strong>"));
    assert!(!html.contains("Comment posted!"));
}

#[test]
fn route_blank_comment_is_silent_noop() {
    let client = client(Some(CATALOG_JSON));
    let (status, location) = post_form(&client, "/comments/1", "name=%20%20&message=Hello&return_to=%2Fgallery");
    assert_eq!(status, Status::SeeOther);
    assert_eq!(location.as_deref(), Some("/gallery"));

    let html = get_html(&client, "/gallery");
    assert!(!html.contains("Comment posted!"));
    assert!(!html.contains("toast toast-error"));

    let response = client.get("/api/comments/1").dispatch();
    let thread: Vec<Comment> = response.into_json().unwrap_or_default();
    assert!(thread.is_empty());
}

#[test]
fn route_comment_storage_failure_keeps_page_usable() {
    let store = Arc::new(seeded_store(Some(CATALOG_JSON)));
    store.disable_writes();
    let client = client_for(store.clone());
    let (status, _) = post_form(&client, "/comments/1", "name=Ana&message=Hi&return_to=%2Fgallery");
    assert_eq!(status, Status::SeeOther);

    let html = get_html(&client, "/gallery");
    assert!(html.contains("Your comment could not be saved on this device."));
    assert!(html.contains(r#"id="sunrise-horizons""#));
    assert!(!html.contains("<strong>Ana</strong>"));
}

#[test]
fn route_comment_offsite_return_is_ignored() {
    let client = client(Some(CATALOG_JSON));
    let (_, location) = post_form(&client, "/comments/1", "name=Ana&message=Hi&return_to=https%3A%2F%2Fevil.example");
    assert_eq!(location.as_deref(), Some("/gallery"));
}

#[test]
fn route_comments_are_private_to_visitor() {
    let store: Arc<dyn Store> = Arc::new(seeded_store(Some(CATALOG_JSON)));
    let first = client_for(store.clone());
    post_form(&first, "/comments/1", "name=Ana&message=Mine&return_to=%2Fgallery");
    assert!(get_html(&first, "/gallery").contains("<strong>Ana</strong>"));

    let second = client_for(store);
    assert!(!get_html(&second, "/gallery").contains("<strong>Ana</strong>"));
}

#[test]
fn route_detail_found_sets_metadata() {
    let client = client(Some(CATALOG_JSON));
    for uri in ["/art/?piece=sunrise-horizons", "/art?piece=sunrise-horizons"] {
        let html = get_html(&client, uri);
        assert!(html.contains("<title>Sunrise Horizons | Sunita Kamal Art</title>"));
        assert!(html.contains(
            "Sunrise Horizons — Acrylic on canvas 24 x 36 in, 2023 by Sunita Kamal (Art and sunny things)."
        ));
        assert!(html.contains("Landscapes · Acrylic on canvas"));
        assert!(html.contains(r#"href="/gallery#sunrise-horizons""#));
        assert!(html.contains(r#"action="/comments/1""#));
    }
}

#[test]
fn route_detail_unknown_slug_is_not_found_state() {
    let client = client(Some(CATALOG_JSON));
    let html = get_html(&client, "/art/?piece=not-a-piece");
    assert!(html.contains("Artwork not found"));
    assert!(html.contains(r#"id="art-empty""#));
    // Catalog untouched
    assert!(get_html(&client, "/gallery").contains(r#"id="desert-bloom""#));
}

#[test]
fn route_detail_without_slug_skips_catalog() {
    // The catalog source is missing: any read would raise the fallback toast
    let client = client(None);
    let html = get_html(&client, "/art/");
    assert!(html.contains("Artwork not found"));
    assert!(html.contains("/art/?piece="));
    assert!(!html.contains("Using offline gallery data"));
}

#[test]
fn route_api_gallery_returns_grid() {
    let client = client(Some(CATALOG_JSON));
    let response = client.get("/api/gallery?category=Florals").dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response.headers().get_one("Cache-Control"),
        Some("no-store, no-cache, must-revalidate, max-age=0")
    );
    let body: serde_json::Value = response.into_json().expect("json body");
    assert_eq!(body["count"], 2);
    assert_eq!(body["category"], "Florals");
    assert_eq!(body["fallback"], false);
    assert!(body["html"].as_str().unwrap_or("").contains("desert-bloom"));
}

#[test]
fn route_api_comments_round_trip() {
    let client = client(Some(CATALOG_JSON));
    let response = client
        .post("/api/comments/a1")
        .header(ContentType::JSON)
        .body(r#"{"name":"Ana","message":"Lovely!"}"#)
        .dispatch();
    let body: serde_json::Value = response.into_json().expect("json body");
    assert_eq!(body["status"], "saved");
    assert_eq!(body["comments"][0]["name"], "Ana");

    let response = client
        .post("/api/comments/a1")
        .header(ContentType::JSON)
        .body(r#"{"name":"  ","message":"x"}"#)
        .dispatch();
    let body: serde_json::Value = response.into_json().expect("json body");
    assert_eq!(body["status"], "ignored");

    let thread: Vec<Comment> = client.get("/api/comments/a1").dispatch().into_json().unwrap_or_default();
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].message, "Lovely!");
}

#[test]
fn route_theme_toggle_persists() {
    let client = client(Some(CATALOG_JSON));
    let html = get_html(&client, "/contact");
    assert!(html.contains(r#"aria-pressed="false""#));
    assert!(html.contains(r#"<body class="page-contact theme-auto">"#));
    assert!(html.contains("@media (prefers-color-scheme: dark)"));

    let (status, location) = post_form(&client, "/theme", "mode=dark&return_to=%2Fcontact");
    assert_eq!(status, Status::SeeOther);
    assert_eq!(location.as_deref(), Some("/contact"));

    let html = get_html(&client, "/contact");
    assert!(html.contains(r#"<body class="page-contact theme-dark">"#));
    assert!(html.contains(r#"aria-pressed="true""#));

    post_form(&client, "/theme", "mode=light&return_to=%2Fcontact");
    let html = get_html(&client, "/contact");
    assert!(html.contains(r#"<body class="page-contact theme-light">"#));
}

#[test]
fn route_analytics_snippet_respects_optout() {
    let store = seeded_store(Some(CATALOG_JSON));
    store.setting_set("analytics_measurement_id", "G-TEST123").unwrap();
    let client = client_for(Arc::new(store));
    assert!(get_html(&client, "/contact").contains("gtag/js?id=G-TEST123"));

    post_form(&client, "/analytics/opt-out", "return_to=%2Fcontact");
    let html = get_html(&client, "/contact");
    assert!(!html.contains("googletagmanager"));
    assert!(html.contains("Allow analytics"));

    post_form(&client, "/analytics/opt-in", "return_to=%2Fcontact");
    assert!(get_html(&client, "/contact").contains("gtag/js?id=G-TEST123"));
}

#[test]
fn route_analytics_absent_without_measurement_id() {
    let client = client(Some(CATALOG_JSON));
    assert!(!get_html(&client, "/contact").contains("googletagmanager"));
}

#[test]
fn route_contact_invalid_shows_inline_errors() {
    let client = client(Some(CATALOG_JSON));
    let response = client
        .post("/contact")
        .header(ContentType::Form)
        .body("name=&email=bad&message=")
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let html = response.into_string().unwrap_or_default();
    assert!(html.contains(r#"id="name-error""#));
    assert!(html.contains("Please fill out this field"));
    assert!(html.contains("Please enter a valid email address"));
    assert!(html.contains(r#"value="bad""#));
}

#[test]
fn route_contact_honeypot_is_spam() {
    let client = client(Some(CATALOG_JSON));
    let (status, location) = post_form(
        &client,
        "/contact",
        "name=Ana&email=ana%40example.com&message=Hi&suntrap=bot",
    );
    assert_eq!(status, Status::SeeOther);
    assert_eq!(location.as_deref(), Some("/contact"));
    let html = get_html(&client, "/contact");
    assert!(html.contains("Spam detected. Submission blocked."));
}

#[test]
fn route_contact_without_relay_confirms_locally() {
    let client = client(Some(CATALOG_JSON));
    post_form(&client, "/contact", "name=Ana&email=ana%40example.com&message=Hi");
    let html = get_html(&client, "/contact");
    assert!(html.contains(r#"<p id="contact-message" class="form-message info" role="status">Received! This is a local confirmation."#));
}

#[test]
fn route_newsletter_invalid_on_home_rerenders_home() {
    let client = client(Some(CATALOG_JSON));
    let response = client
        .post("/newsletter")
        .header(ContentType::Form)
        .body("email=nope&return_to=%2F")
        .dispatch();
    assert_eq!(response.status(), Status::Ok);
    let html = response.into_string().unwrap_or_default();
    assert!(html.contains("page-home"));
    assert!(html.contains("Please enter a valid email address"));
}

#[test]
fn route_newsletter_valid_redirects_back() {
    let client = client(Some(CATALOG_JSON));
    let (status, location) = post_form(&client, "/newsletter", "email=ana%40example.com&return_to=%2F");
    assert_eq!(status, Status::SeeOther);
    assert_eq!(location.as_deref(), Some("/"));
    let html = get_html(&client, "/");
    assert!(html.contains("Connect the newsletter endpoint to subscribe."));
}

#[test]
fn route_home_carousel_and_empty_feed() {
    let client = client(Some(CATALOG_JSON));
    let html = get_html(&client, "/?hero=-1");
    assert!(html.contains(&format!(r#"data-index="{}""#, FEATURED.len() - 1)));
    assert!(html.contains(r#"href="/?hero=0" aria-label="Next artwork""#));
    assert!(html.contains("New posts are on their way."));
}

#[test]
fn route_home_feed_from_static_source() {
    let store = seeded_store(Some(CATALOG_JSON));
    let feed = temp_file(r#"[{"image":"assets/ig/1.webp","caption":"Studio day","permalink":"https://www.instagram.com/p/1"}]"#);
    store.setting_set("instagram_source", &feed).unwrap();
    let client = client_for(Arc::new(store));
    let html = get_html(&client, "/");
    assert!(html.contains(r#"src="/assets/ig/1.webp""#));
    assert!(html.contains("Studio day"));
}

#[test]
fn route_unknown_path_is_404_page() {
    let client = client(Some(CATALOG_JSON));
    let response = client.get("/does-not-exist").dispatch();
    assert_eq!(response.status(), Status::NotFound);
    assert!(response.into_string().unwrap_or_default().contains("Page not found."));
}
