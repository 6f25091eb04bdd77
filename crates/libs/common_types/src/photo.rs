use serde::{Deserialize, Serialize};

/// One stored event image: its storage key plus the derived public URL.
/// Created when the event's photo set is enumerated; a new enumeration
/// supersedes all previously handed-out refs.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PhotoRef {
    pub key: String,
    pub url: String,
}

impl PhotoRef {
    #[must_use]
    pub fn new(key: impl Into<String>, public_base_url: &str) -> Self {
        let key = key.into();
        let url = format!("{}/{}", public_base_url.trim_end_matches('/'), key);
        Self { key, url }
    }
}

/// Whether a storage key points at an image we accept as a match
/// candidate. Anything else under the prefix (markers, stray uploads)
/// is ignored.
#[must_use]
pub fn is_image_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    lower.ends_with(".jpg") || lower.ends_with(".jpeg") || lower.ends_with(".png")
}
