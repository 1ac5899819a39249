/// Output size keyword. Unrecognized keywords fall back to [`ImageSize::Square`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    #[default]
    Square,
    Portrait,
    Landscape,
}

impl ImageSize {
    pub fn from_keyword(keyword: Option<&str>) -> Self {
        match keyword {
            Some("portrait") => ImageSize::Portrait,
            Some("landscape") => ImageSize::Landscape,
            _ => ImageSize::Square,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            ImageSize::Square => "square",
            ImageSize::Portrait => "portrait",
            ImageSize::Landscape => "landscape",
        }
    }

    pub fn dimensions(self) -> (u32, u32) {
        match self {
            ImageSize::Square => (1024, 1024),
            ImageSize::Portrait => (768, 1024),
            ImageSize::Landscape => (1024, 640),
        }
    }
}

/// `(width, height)` for a size keyword.
pub fn resolve_dimensions(size: Option<&str>) -> (u32, u32) {
    ImageSize::from_keyword(size).dimensions()
}
