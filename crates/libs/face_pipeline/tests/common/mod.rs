//! In-memory `FaceService` used by the pipeline tests. Behavior is
//! scripted per storage key (comparisons, indexing) or face id
//! (search), so each test describes a remote service in data.
#![allow(dead_code)]

use async_trait::async_trait;
use common_services::face_client::{
    FaceMatch, FaceService, FaceServiceError, IndexOutcome, IndexedFace,
};
use common_types::{BoundingBox, PhotoRef};
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub enum CompareBehavior {
    /// One similarity per matched face found in the candidate photo.
    Similarities(Vec<f32>),
    NoMatch,
    Fail,
    /// Never resolves; exercises the per-comparison timeout.
    Hang,
}

pub enum IndexBehavior {
    Faces(Vec<&'static str>),
    NoFaces,
    Fail,
}

pub enum SearchBehavior {
    Matches(Vec<&'static str>),
    NoMatches,
    Fail,
}

#[derive(Default)]
pub struct FakeFaceService {
    /// Keyed by candidate (target) photo key.
    pub comparisons: HashMap<String, CompareBehavior>,
    /// Keyed by photo key.
    pub index: HashMap<String, IndexBehavior>,
    /// Keyed by face id.
    pub search: HashMap<String, SearchBehavior>,
    pub initial_collections: Vec<String>,
    pub fail_list_collections: bool,
    /// Makes `create_collection` report a lost create race.
    pub create_conflict: bool,
    pub created: Mutex<Vec<String>>,
    pub create_calls: AtomicUsize,
}

fn remote_failure() -> FaceServiceError {
    FaceServiceError::RemoteStatus {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: "scripted failure".to_string(),
    }
}

fn centered_box() -> BoundingBox {
    BoundingBox {
        left: 0.4,
        top: 0.4,
        width: 0.2,
        height: 0.2,
    }
}

#[async_trait]
impl FaceService for FakeFaceService {
    async fn compare_faces(
        &self,
        _source_key: &str,
        target_key: &str,
        _similarity_threshold: f32,
    ) -> Result<Vec<FaceMatch>, FaceServiceError> {
        match self.comparisons.get(target_key) {
            Some(CompareBehavior::Similarities(scores)) => Ok(scores
                .iter()
                .map(|&similarity| FaceMatch {
                    face_id: None,
                    similarity,
                })
                .collect()),
            Some(CompareBehavior::NoMatch) | None => Ok(Vec::new()),
            Some(CompareBehavior::Fail) => Err(remote_failure()),
            Some(CompareBehavior::Hang) => std::future::pending().await,
        }
    }

    async fn list_collections(&self) -> Result<Vec<String>, FaceServiceError> {
        if self.fail_list_collections {
            return Err(remote_failure());
        }
        let mut collections = self.initial_collections.clone();
        collections.extend(self.created.lock().unwrap().iter().cloned());
        Ok(collections)
    }

    async fn create_collection(&self, collection_id: &str) -> Result<(), FaceServiceError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.create_conflict {
            return Err(FaceServiceError::CollectionExists(collection_id.to_string()));
        }
        self.created.lock().unwrap().push(collection_id.to_string());
        Ok(())
    }

    async fn index_faces(
        &self,
        _collection_id: &str,
        image_key: &str,
    ) -> Result<IndexOutcome, FaceServiceError> {
        match self.index.get(image_key) {
            Some(IndexBehavior::Faces(face_ids)) => Ok(IndexOutcome::Detected(
                face_ids
                    .iter()
                    .map(|&face_id| IndexedFace {
                        face_id: face_id.to_string(),
                        bounding_box: Some(centered_box()),
                    })
                    .collect(),
            )),
            Some(IndexBehavior::NoFaces) | None => Ok(IndexOutcome::NoFaceFound),
            Some(IndexBehavior::Fail) => Err(remote_failure()),
        }
    }

    async fn search_faces(
        &self,
        _collection_id: &str,
        face_id: &str,
        _max_results: u32,
        _match_threshold: f32,
    ) -> Result<Vec<FaceMatch>, FaceServiceError> {
        match self.search.get(face_id) {
            Some(SearchBehavior::Matches(face_ids)) => Ok(face_ids
                .iter()
                .map(|&id| FaceMatch {
                    face_id: Some(id.to_string()),
                    similarity: 99.5,
                })
                .collect()),
            Some(SearchBehavior::NoMatches) | None => Ok(Vec::new()),
            Some(SearchBehavior::Fail) => Err(remote_failure()),
        }
    }
}

pub fn photos(keys: &[&str]) -> Vec<PhotoRef> {
    keys.iter()
        .map(|key| PhotoRef::new(*key, "https://event-photos.s3.amazonaws.com"))
        .collect()
}
