use crate::batch::run_batched;
use crate::error::PipelineError;
use common_services::face_client::{FaceService, FaceServiceError, IndexOutcome};
use common_services::settings::PipelineSettings;
use common_types::{FaceDetection, FaceGroup, PhotoRef};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ClusterOptions {
    /// Match threshold for the collection search. Strict on purpose:
    /// only near-identical embeddings may land in the same group.
    pub search_match_threshold: f32,
    pub search_max_results: u32,
    pub batch_size: usize,
    pub batch_delay: Duration,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            search_match_threshold: 99.0,
            search_max_results: 5,
            batch_size: 10,
            batch_delay: Duration::from_millis(500),
        }
    }
}

impl ClusterOptions {
    #[must_use]
    pub fn from_settings(pipeline: &PipelineSettings) -> Self {
        Self {
            search_match_threshold: pipeline.search_match_threshold,
            search_max_results: pipeline.search_max_results,
            batch_size: pipeline.batch_size,
            batch_delay: Duration::from_millis(pipeline.batch_delay_ms),
        }
    }
}

/// Groups an event's photos by the people appearing in them.
///
/// Three phases: index every photo's faces into the event's remote
/// collection, search the collection for each face's near-duplicates,
/// then merge the pairwise matches into equivalence classes. The
/// merge runs after all searches have settled, so group assignment is
/// deterministic no matter how the concurrent searches interleave.
pub struct FaceClusterer {
    faces: Arc<dyn FaceService>,
    options: ClusterOptions,
}

impl FaceClusterer {
    #[must_use]
    pub fn new(faces: Arc<dyn FaceService>, options: ClusterOptions) -> Self {
        Self { faces, options }
    }

    /// Partitions all faces detected in `photos` into `FaceGroup`s.
    /// Photos whose indexing fails are skipped; an event where no
    /// face is detected at all yields an empty, valid result.
    pub async fn cluster(
        &self,
        event_id: &str,
        photos: &[PhotoRef],
    ) -> Result<Vec<FaceGroup>, PipelineError> {
        self.ensure_collection(event_id).await?;

        let detections = self.index_photos(event_id, photos).await;
        if detections.is_empty() {
            info!(
                "No faces detected across {} photos for event {event_id}",
                photos.len()
            );
            return Ok(Vec::new());
        }

        let matches = self.collect_matches(event_id, &detections).await;
        let groups = assign_groups(&detections, &matches);
        info!(
            "Grouped {} faces from event {event_id} into {} groups",
            detections.len(),
            groups.len()
        );
        Ok(groups)
    }

    /// The collection is keyed by the event id and created lazily.
    /// Losing a concurrent create race counts as success.
    async fn ensure_collection(&self, event_id: &str) -> Result<(), PipelineError> {
        let existing = self
            .faces
            .list_collections()
            .await
            .map_err(PipelineError::CollectionUnavailable)?;
        if existing.iter().any(|id| id == event_id) {
            return Ok(());
        }
        match self.faces.create_collection(event_id).await {
            Ok(()) | Err(FaceServiceError::CollectionExists(_)) => Ok(()),
            Err(err) => Err(PipelineError::CollectionUnavailable(err)),
        }
    }

    async fn index_photos(&self, event_id: &str, photos: &[PhotoRef]) -> Vec<FaceDetection> {
        let per_photo = run_batched(
            photos,
            self.options.batch_size,
            self.options.batch_delay,
            |photo| async move {
                match self.faces.index_faces(event_id, &photo.key).await {
                    Ok(IndexOutcome::Detected(faces)) => faces
                        .into_iter()
                        .map(|face| FaceDetection {
                            face_id: face.face_id,
                            bounding_box: face.bounding_box,
                            photo: photo.clone(),
                        })
                        .collect(),
                    Ok(IndexOutcome::NoFaceFound) => {
                        debug!("No faces found in {}", photo.key);
                        Vec::new()
                    }
                    Err(err) => {
                        warn!("Indexing failed for {}: {err}, skipping photo", photo.key);
                        Vec::new()
                    }
                }
            },
        )
        .await;
        per_photo.into_iter().flatten().collect()
    }

    /// For every indexed face, the ids of its near-duplicates in the
    /// collection. A failed search contributes no matches, so the
    /// face still ends up in a group of its own.
    async fn collect_matches(
        &self,
        event_id: &str,
        detections: &[FaceDetection],
    ) -> Vec<Vec<String>> {
        run_batched(
            detections,
            self.options.batch_size,
            self.options.batch_delay,
            |detection| async move {
                match self
                    .faces
                    .search_faces(
                        event_id,
                        &detection.face_id,
                        self.options.search_max_results,
                        self.options.search_match_threshold,
                    )
                    .await
                {
                    Ok(matches) => matches.into_iter().filter_map(|m| m.face_id).collect(),
                    Err(err) => {
                        warn!(
                            "SearchFaces failed for face {}: {err}, treating as no match",
                            detection.face_id
                        );
                        Vec::new()
                    }
                }
            },
        )
        .await
    }
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent[root_b] = root_a;
        }
    }
}

/// Merges pairwise matches into equivalence classes and buckets the
/// detections. `matches[i]` holds the face ids matched for
/// `detections[i]`; ids not indexed in this run (stale residents of
/// the collection) are ignored. Group ids are allocated in
/// first-member order, so the output order is stable for a given
/// detection sequence.
fn assign_groups(detections: &[FaceDetection], matches: &[Vec<String>]) -> Vec<FaceGroup> {
    let index_of: HashMap<&str, usize> = detections
        .iter()
        .enumerate()
        .map(|(i, d)| (d.face_id.as_str(), i))
        .collect();

    let mut components = UnionFind::new(detections.len());
    for (i, matched_ids) in matches.iter().enumerate() {
        for face_id in matched_ids {
            if let Some(&j) = index_of.get(face_id.as_str()) {
                components.union(i, j);
            }
        }
    }

    let mut groups: Vec<FaceGroup> = Vec::new();
    let mut slot_of_root: HashMap<usize, usize> = HashMap::new();
    for (i, detection) in detections.iter().enumerate() {
        let root = components.find(i);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            groups.push(FaceGroup {
                group_id: format!("group_{}", groups.len() + 1),
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].members.push(detection.clone());
    }
    groups
}
