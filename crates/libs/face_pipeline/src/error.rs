use common_services::face_client::FaceServiceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The event has no photos to match against. Caller-facing setup
    /// problem, not a service failure.
    #[error("No candidate images found for this event")]
    NoCandidateImages,

    /// Every comparison came back below the similarity floor. A
    /// common, expected outcome; the UI renders it as an explanatory
    /// message rather than an error.
    #[error("No matching faces found")]
    NoMatchesFound,

    /// The event's face collection could not be listed or created.
    /// Fatal for a clustering run: there is nothing to index into.
    #[error("Face collection unavailable: {0}")]
    CollectionUnavailable(#[source] FaceServiceError),
}
