use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slide {
    pub id: &'static str,
    pub title: &'static str,
    pub image: &'static str,
    pub blurb: &'static str,
}

/// Works shown in the homepage hero.
pub const FEATURED: &[Slide] = &[
    Slide {
        id: "sunrise-horizons",
        title: "Sunrise Horizons",
        image: "assets/images/sunrise-horizons.webp",
        blurb: "Acrylic gradients inspired by Rajasthani dawns.",
    },
    Slide {
        id: "marigold-breeze",
        title: "Marigold Breeze",
        image: "assets/images/marigold-breeze.webp",
        blurb: "Marigold garlands translated into sweeping gestures.",
    },
    Slide {
        id: "terracotta-fields",
        title: "Terracotta Fields",
        image: "assets/images/terracotta-fields.webp",
        blurb: "Topographic echoes of the Aravalli foothills.",
    },
];

/// Hero carousel position. Indices wrap in both directions.
#[derive(Debug, Clone)]
pub struct Carousel<'a> {
    slides: &'a [Slide],
    current: usize,
}

impl<'a> Carousel<'a> {
    pub fn new(slides: &'a [Slide]) -> Self {
        Carousel { slides, current: 0 }
    }

    /// Jump to `index`, wrapping out-of-range values (`-1` is the last slide).
    pub fn select(&mut self, index: i64) {
        let len = self.slides.len() as i64;
        if len == 0 {
            self.current = 0;
            return;
        }
        self.current = index.rem_euclid(len) as usize;
    }

    pub fn next(&mut self) {
        self.select(self.current as i64 + 1);
    }

    pub fn prev(&mut self) {
        self.select(self.current as i64 - 1);
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<&'a Slide> {
        self.slides.get(self.current)
    }

    pub fn slides(&self) -> &'a [Slide] {
        self.slides
    }

    /// Indices the prev/next controls lead to.
    pub fn neighbours(&self) -> (usize, usize) {
        let mut prev = self.clone();
        prev.prev();
        let mut next = self.clone();
        next.next();
        (prev.current, next.current)
    }
}
