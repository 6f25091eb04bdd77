use serde::Deserialize;

/// Overall application configuration structure.
#[derive(Debug, Deserialize)]
pub struct AppSettings {
    pub storage: StorageSettings,
    pub face_service: FaceServiceSettings,
    pub pipeline: PipelineSettings,
    pub logging: LoggingSettings,
}

/// Where event media lives: an S3-compatible bucket plus the public
/// base URL that photo keys are appended to for display.
#[derive(Debug, Deserialize)]
pub struct StorageSettings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores; `None` means AWS.
    pub endpoint: Option<String>,
    pub public_base_url: String,
}

/// The face-recognition gateway consumed by the pipelines.
#[derive(Debug, Deserialize)]
pub struct FaceServiceSettings {
    pub base_url: String,
}

/// Tuning for the matching and clustering pipelines.
#[derive(Debug, Deserialize)]
pub struct PipelineSettings {
    /// Floor (0..100) below which a compared photo is dropped.
    pub similarity_threshold: f32,
    /// A single face comparison that outlives this is treated as a no-match.
    pub per_comparison_timeout_s: u64,
    /// Remote calls in flight at once; 0 fires everything concurrently.
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    /// Near-duplicate threshold for collection search during clustering.
    /// Kept strict so visually similar but distinct people don't merge.
    pub search_match_threshold: f32,
    pub search_max_results: u32,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}
