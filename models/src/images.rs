use serde::{Deserialize, Serialize};

/// Street-level imagery for one analysis request.
///
/// `processed_images` are absolute URLs already routed through the image CDN;
/// `images` are passed through exactly as the backend returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBundle {
    pub images: Vec<String>,
    pub processed_images: Vec<String>,
}

impl ImageBundle {
    /// The bundle used when no imagery could be fetched.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when there is nothing to show in the gallery.
    pub fn is_empty(&self) -> bool {
        self.gallery().next().is_none()
    }

    /// Processed images with blank entries skipped.
    pub fn gallery(&self) -> impl Iterator<Item = &str> {
        self.processed_images
            .iter()
            .map(String::as_str)
            .filter(|url| !url.trim().is_empty())
    }
}
