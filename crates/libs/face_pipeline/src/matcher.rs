use crate::batch::run_batched;
use crate::error::PipelineError;
use common_services::face_client::FaceService;
use common_services::settings::PipelineSettings;
use common_types::{MatchResult, PhotoRef};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// Floor (0..100) below which a candidate photo is dropped.
    pub similarity_threshold: f32,
    /// A comparison that outlives this is treated as a no-match; the
    /// in-flight request is abandoned, not cancelled.
    pub per_comparison_timeout: Duration,
    pub batch_size: usize,
    pub batch_delay: Duration,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: 70.0,
            per_comparison_timeout: Duration::from_secs(30),
            batch_size: 10,
            batch_delay: Duration::from_millis(500),
        }
    }
}

impl MatchOptions {
    #[must_use]
    pub fn from_settings(pipeline: &PipelineSettings) -> Self {
        Self {
            similarity_threshold: pipeline.similarity_threshold,
            per_comparison_timeout: Duration::from_secs(pipeline.per_comparison_timeout_s),
            batch_size: pipeline.batch_size,
            batch_delay: Duration::from_millis(pipeline.batch_delay_ms),
        }
    }
}

/// Ranked matches for one selfie, plus how many candidates were
/// compared to produce them.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfieMatches {
    pub matches: Vec<MatchResult>,
    pub processed_count: usize,
}

/// Matches one guest selfie against an event's photo set.
pub struct SelfieMatcher {
    faces: Arc<dyn FaceService>,
    options: MatchOptions,
}

impl SelfieMatcher {
    #[must_use]
    pub fn new(faces: Arc<dyn FaceService>, options: MatchOptions) -> Self {
        Self { faces, options }
    }

    /// Compares `selfie_key` against every candidate photo and
    /// returns the photos containing a matching face, best first.
    ///
    /// A single candidate failing or timing out never aborts the run;
    /// that candidate simply scores as a no-match. When a photo has
    /// several matching faces, its best similarity is the photo's
    /// score, so one photo contributes at most one result.
    pub async fn match_selfie(
        &self,
        selfie_key: &str,
        candidates: &[PhotoRef],
    ) -> Result<SelfieMatches, PipelineError> {
        if candidates.is_empty() {
            return Err(PipelineError::NoCandidateImages);
        }
        let processed_count = candidates.len();
        info!("Comparing selfie {selfie_key} against {processed_count} candidate photos");

        let scored = run_batched(
            candidates,
            self.options.batch_size,
            self.options.batch_delay,
            |photo| self.score_candidate(selfie_key, photo),
        )
        .await;

        let mut matches: Vec<MatchResult> = scored
            .into_iter()
            .flatten()
            .filter(|result| result.similarity >= self.options.similarity_threshold)
            .collect();
        // Vec::sort_by is stable, so ties keep discovery order.
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));

        if matches.is_empty() {
            return Err(PipelineError::NoMatchesFound);
        }
        info!(
            "Found {} matches out of {processed_count} photos processed",
            matches.len()
        );
        Ok(SelfieMatches {
            matches,
            processed_count,
        })
    }

    async fn score_candidate(&self, selfie_key: &str, photo: &PhotoRef) -> Option<MatchResult> {
        let comparison = self.faces.compare_faces(
            selfie_key,
            &photo.key,
            self.options.similarity_threshold,
        );
        let face_matches = match timeout(self.options.per_comparison_timeout, comparison).await {
            Err(_) => {
                warn!("Face comparison timed out for {}", photo.key);
                return None;
            }
            Ok(Err(err)) => {
                warn!("Face comparison failed for {}: {err}", photo.key);
                return None;
            }
            Ok(Ok(face_matches)) => face_matches,
        };

        let best = face_matches
            .iter()
            .map(|m| m.similarity)
            .max_by(f32::total_cmp)?;
        debug!("Best face match in {} has similarity {best}", photo.key);
        Some(MatchResult {
            photo: photo.clone(),
            similarity: best,
        })
    }
}
