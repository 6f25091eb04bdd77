use crate::photo::PhotoRef;
use serde::{Deserialize, Serialize};

/// Face location within an image, as fractions of the image
/// dimensions (all fields in 0..1).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// One detected face within one photo. The `face_id` is an opaque
/// identity assigned by the remote face service when the face was
/// indexed; detections live only for the current clustering run, the
/// remote collection is the durable store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FaceDetection {
    pub face_id: String,
    pub bounding_box: Option<BoundingBox>,
    pub photo: PhotoRef,
}

/// One photo's best face-match score against a query selfie.
/// Similarity is the service's 0..100 score.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MatchResult {
    pub photo: PhotoRef,
    pub similarity: f32,
}

/// A cluster of face detections believed to depict the same person.
/// Group ids (`group_1`, `group_2`, ...) are regenerated on every
/// clustering run and carry no cross-run meaning.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FaceGroup {
    pub group_id: String,
    pub members: Vec<FaceDetection>,
}

impl FaceGroup {
    /// The representative face shown as the group thumbnail.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&FaceDetection> {
        self.members.first()
    }

    /// Keys of the photos this group's members appear in, deduplicated,
    /// in member order. Used to filter the photo grid on selection.
    #[must_use]
    pub fn photo_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for member in &self.members {
            if !keys.contains(&member.photo.key.as_str()) {
                keys.push(&member.photo.key);
            }
        }
        keys
    }
}
