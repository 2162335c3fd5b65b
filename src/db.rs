use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub type DbPool = Pool<SqliteConnectionManager>;

pub const DB_PATH: &str = "site/db/gallery.db";

/// Settings seeded on first boot. Existing values are never overwritten.
pub const DEFAULT_SETTINGS: &[(&str, &str)] = &[
    // General
    ("site_name", "Art and sunny things"),
    ("artist_name", "Sunita Kamal"),
    ("site_url", ""),
    ("fallback_origin", "https://artandsunnythings.com"),
    ("analytics_measurement_id", ""),
    // Data sources
    ("catalog_source", "site/data/artworks.json"),
    ("instagram_source", "site/data/instagram.json"),
    ("instagram_token", "ADD_INSTAGRAM_TOKEN"),
    ("instagram_user_id", "INSTAGRAM_USER_ID"),
    ("instagram_profile_url", "https://www.instagram.com/artandsunnythings"),
    ("feed_limit", "6"),
    // Gallery
    ("search_debounce_ms", "300"),
    // Visitor storage (bytes per visitor, same order as a browser's localStorage)
    ("storage_quota_bytes", "5242880"),
    // Forms
    ("contact_endpoint", "/api/contact-secure"),
    ("newsletter_endpoint", "/api/newsletter"),
    ("relay_timeout_secs", "10"),
];

pub fn init_pool_at(path: &str) -> Result<DbPool, Box<dyn std::error::Error>> {
    let manager = SqliteConnectionManager::file(path);
    let pool = Pool::builder().max_size(10).build(manager)?;

    // WAL keeps page reads from blocking on comment writes
    let conn = pool.get()?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    conn.execute_batch(
        "
        -- Settings (key-value)
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT
        );

        -- Per-visitor key-value partitions
        CREATE TABLE IF NOT EXISTS visitor_storage (
            scope TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (scope, key)
        );

        CREATE INDEX IF NOT EXISTS idx_visitor_storage_scope ON visitor_storage(scope);
        ",
    )?;

    Ok(())
}

pub fn seed_defaults(pool: &DbPool) -> Result<(), Box<dyn std::error::Error>> {
    let conn = pool.get()?;

    for (key, value) in DEFAULT_SETTINGS {
        conn.execute(
            "INSERT OR IGNORE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
    }

    Ok(())
}
