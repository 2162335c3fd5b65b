use log::warn;

use crate::storage::LocalStorage;

pub const THEME_KEY: &str = "sunita-theme";
pub const ANALYTICS_OPTOUT_KEY: &str = "sunita-analytics-optout";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(mode: &str) -> Option<Self> {
        match mode.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }
}

/// Site-wide visitor preferences, kept next to the comment threads in the
/// visitor's storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    /// None until the visitor picks one; the page then follows the
    /// browser's colour-scheme preference.
    pub theme: Option<Theme>,
    pub analytics_opt_out: bool,
}

impl Preferences {
    /// Unreadable entries fall back to defaults.
    pub fn load(storage: &LocalStorage<'_>) -> Self {
        let theme = match storage.get_item(THEME_KEY) {
            Ok(value) => value.as_deref().and_then(Theme::parse),
            Err(e) => {
                warn!("Theme preference unavailable: {}", e);
                None
            }
        };
        let analytics_opt_out = match storage.get_item(ANALYTICS_OPTOUT_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!("Analytics preference unavailable: {}", e);
                false
            }
        };
        Preferences {
            theme,
            analytics_opt_out,
        }
    }

    pub fn theme_or_default(&self) -> Theme {
        self.theme.unwrap_or_default()
    }

    /// Body class suffix: the stored theme, or `auto`.
    pub fn theme_class(&self) -> &'static str {
        self.theme.map(|t| t.as_str()).unwrap_or("auto")
    }

    pub fn save_theme(storage: &LocalStorage<'_>, theme: Theme) -> Result<(), String> {
        storage.set_item(THEME_KEY, theme.as_str())
    }

    pub fn opt_out_of_analytics(storage: &LocalStorage<'_>) -> Result<(), String> {
        storage.set_item(ANALYTICS_OPTOUT_KEY, "true")
    }

    pub fn opt_in_to_analytics(storage: &LocalStorage<'_>) -> Result<(), String> {
        storage.remove_item(ANALYTICS_OPTOUT_KEY)
    }
}
