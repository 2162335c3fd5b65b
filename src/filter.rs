use crate::models::artwork::Artwork;
use crate::overlay::ZoomOverlay;

/// Category value that disables the category filter.
pub const ALL_CATEGORIES: &str = "all";

/// Query string of the gallery page and the gallery API.
#[derive(Debug, Default, Clone, FromForm)]
pub struct GalleryQuery {
    pub category: Option<String>,
    pub q: Option<String>,
    /// Slug whose image is shown in the zoom overlay.
    pub zoom: Option<String>,
    /// Slug whose comment thread starts expanded.
    pub thread: Option<String>,
}

impl GalleryQuery {
    pub fn category(&self) -> &str {
        self.category
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(ALL_CATEGORIES)
    }

    pub fn search_term(&self) -> &str {
        self.q.as_deref().unwrap_or("")
    }
}

pub fn matches_category(art: &Artwork, category: &str) -> bool {
    category == ALL_CATEGORIES || art.category == category
}

/// Case-insensitive substring match over title, commentary, medium and
/// category. A blank term matches everything.
pub fn matches_search(art: &Artwork, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    art.searchable_text().to_lowercase().contains(&needle)
}

/// Filtered view of the catalog. Pure, keeps catalog order; both filters
/// must pass.
pub fn apply<'a>(catalog: &'a [Artwork], category: &str, term: &str) -> Vec<&'a Artwork> {
    catalog
        .iter()
        .filter(|art| matches_category(art, category))
        .filter(|art| matches_search(art, term))
        .collect()
}

/// Everything a gallery render pass needs. Rebuilt from scratch on every
/// filter or search change, never patched.
#[derive(Debug)]
pub struct GalleryView<'a> {
    pub artworks: &'a [Artwork],
    pub filtered: Vec<&'a Artwork>,
    pub category: String,
    pub search_term: String,
    pub overlay: ZoomOverlay,
    pub open_thread: Option<String>,
}

impl<'a> GalleryView<'a> {
    pub fn new(artworks: &'a [Artwork], query: &GalleryQuery) -> Self {
        let category = query.category().to_string();
        let search_term = query.search_term().trim().to_string();
        let filtered = apply(artworks, &category, &search_term);

        let mut overlay = ZoomOverlay::default();
        if let Some(slug) = query.zoom.as_deref() {
            if let Some(art) = filtered.iter().find(|a| a.slug == slug) {
                overlay.open(&art.image, &art.title);
            }
        }

        GalleryView {
            artworks,
            filtered,
            category,
            search_term,
            overlay,
            open_thread: query.thread.clone().filter(|s| !s.is_empty()),
        }
    }

    pub fn is_thread_open(&self, slug: &str) -> bool {
        self.open_thread.as_deref() == Some(slug)
    }
}
