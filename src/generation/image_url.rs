use url::Url;

pub const DEFAULT_IMAGE_BASE_URL: &str = "https://picsum.photos";

#[derive(Debug, thiserror::Error)]
pub enum ImageUrlError {
    #[error("image base url is empty")]
    Empty,
    #[error("invalid image base url: {0}")]
    Parse(#[from] url::ParseError),
    #[error("image base url must use http or https, got {0}")]
    Scheme(String),
}

pub fn validate_http_url(raw: &str) -> Result<Url, ImageUrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ImageUrlError::Empty);
    }
    let parsed = Url::parse(trimmed)?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(ImageUrlError::Scheme(scheme.to_string())),
    }
}

/// Builds `<base>/seed/{seed}/{width}/{height}` placeholder URLs.
#[derive(Debug, Clone)]
pub struct ImageUrlTemplate {
    base: Url,
}

impl ImageUrlTemplate {
    pub fn new(base: &str) -> Result<Self, ImageUrlError> {
        let base = validate_http_url(base)?;
        Ok(Self { base })
    }

    /// The seed is percent-encoded as one path segment, so `/`, `?` and `#` stay inside it.
    pub fn render(&self, seed: &str, width: u32, height: u32) -> String {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        let (width, height) = (width.to_string(), height.to_string());
        // http(s) URLs always have a path, so this never fails after validation.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["seed", seed, width.as_str(), height.as_str()]);
        }
        url.to_string()
    }
}

/// Trimmed prompt joined with `-style` when a style is given, trimmed again.
pub fn build_seed(prompt: &str, style: Option<&str>) -> String {
    let combined = match style {
        Some(style) => format!("{}-{}", prompt.trim(), style),
        None => prompt.trim().to_string(),
    };
    combined.trim().to_string()
}
