use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryCategory {
    Result,
    User,
}

impl GalleryCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            GalleryCategory::Result => "result",
            GalleryCategory::User => "user",
        }
    }
}

/// A gallery image as the backend reports it. Identity is `uuid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub uuid: String,
    pub url: String,
    pub thumbnail: String,
    pub mtime: i64,
    pub width: u32,
    pub height: u32,
    pub category: GalleryCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Image {
    pub fn new(
        uuid: impl Into<String>,
        url: impl Into<String>,
        category: GalleryCategory,
    ) -> Self {
        let url = url.into();
        Self {
            uuid: uuid.into(),
            thumbnail: url.clone(),
            url,
            mtime: 0,
            width: 512,
            height: 512,
            category,
            metadata: None,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = thumbnail.into();
        self
    }

    pub fn with_mtime(mut self, mtime: i64) -> Self {
        self.mtime = mtime;
        self
    }
}

/// The img2img source: either a bare URL or a gallery image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitialImage {
    Url(String),
    Image(Image),
}

impl InitialImage {
    pub fn url(&self) -> &str {
        match self {
            InitialImage::Url(url) => url,
            InitialImage::Image(image) => &image.url,
        }
    }
}
