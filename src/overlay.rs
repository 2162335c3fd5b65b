/// The single shared zoom overlay of the gallery. Opening it again
/// replaces whatever was shown: last click wins.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ZoomOverlay {
    shown: Option<ZoomTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoomTarget {
    pub image: String,
    pub title: String,
}

impl ZoomOverlay {
    pub fn open(&mut self, image: &str, title: &str) {
        self.shown = Some(ZoomTarget {
            image: image.to_string(),
            title: title.to_string(),
        });
    }

    pub fn is_open(&self) -> bool {
        self.shown.is_some()
    }

    pub fn target(&self) -> Option<&ZoomTarget> {
        self.shown.as_ref()
    }
}
