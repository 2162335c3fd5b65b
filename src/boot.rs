use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

/// Directories created on first boot if missing
const REQUIRED_DIRS: &[&str] = &[
    "site",
    "site/db",
    "site/data",
    "site/static",
    "site/assets",
    "site/assets/images",
];

/// Data documents the pages read. Missing ones only degrade the site:
/// the gallery falls back to its offline catalog, the feed to an empty grid.
const DATA_FILES: &[(&str, &str)] = &[
    ("site/data/artworks.json", "gallery will show the offline catalog"),
    ("site/data/instagram.json", "Instagram section will be empty"),
];

/// Run all boot checks. Call this before Rocket launches.
/// Creates missing directories, warns about missing data files, and
/// aborts if the database directory is unusable.
pub fn run() {
    info!("Gallery boot check starting...");

    let mut warnings = 0u32;
    let mut errors = 0u32;

    // ── 1. Directories ─────────────────────────────────
    for dir in REQUIRED_DIRS {
        let path = Path::new(dir);
        if !path.exists() {
            match fs::create_dir_all(path) {
                Ok(_) => info!("  Created directory: {}", dir),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir, e);
                    errors += 1;
                }
            }
        }
    }

    // ── 2. Data documents ──────────────────────────────
    for (file, consequence) in DATA_FILES {
        if !Path::new(file).exists() {
            warn!("  Missing data file: {} ({})", file, consequence);
            warnings += 1;
        }
    }

    // ── 3. Database directory writable ─────────────────
    let db_dir = Path::new(crate::db::DB_PATH)
        .parent()
        .unwrap_or_else(|| Path::new("."));
    if db_dir.exists() {
        let test_file = db_dir.join(".write_test");
        match fs::write(&test_file, "test") {
            Ok(_) => {
                let _ = fs::remove_file(&test_file);
            }
            Err(e) => {
                error!("  Database directory not writable: {}", e);
                errors += 1;
            }
        }
    }

    // ── 4. Rocket.toml exists ──────────────────────────
    if !Path::new("Rocket.toml").exists() {
        warn!("  Rocket.toml not found — using default config");
        warnings += 1;
    }

    // ── Summary ────────────────────────────────────────
    if errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            errors, warnings
        );
        process::exit(1);
    }

    if warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some features may not work correctly.",
            warnings
        );
    } else {
        info!("Boot check passed. All systems go.");
    }
}
