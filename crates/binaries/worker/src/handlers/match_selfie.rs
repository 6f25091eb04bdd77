use crate::context::WorkerContext;
use crate::handlers::JobResult;
use color_eyre::Result;
use face_pipeline::{MatchOptions, PipelineError, SelfieMatcher};
use tracing::info;

/// Matches a previously uploaded selfie against every photo in the
/// event and prints the matching photo URLs, best match first.
pub async fn handle(
    context: &WorkerContext,
    event_id: &str,
    selfie_key: &str,
) -> Result<JobResult> {
    let photos = context.event_store.list_event_images(event_id).await?;
    let matcher = SelfieMatcher::new(
        context.face_service.clone(),
        MatchOptions::from_settings(&context.settings.pipeline),
    );

    match matcher.match_selfie(selfie_key, &photos).await {
        Ok(outcome) => {
            info!(
                "Found {} matches out of {} photos processed for event {event_id}",
                outcome.matches.len(),
                outcome.processed_count
            );
            for result in &outcome.matches {
                println!("{:>6.2}  {}", result.similarity, result.photo.url);
            }
            Ok(JobResult::Done)
        }
        Err(err @ (PipelineError::NoMatchesFound | PipelineError::NoCandidateImages)) => {
            println!("{err}");
            Ok(JobResult::NoMatches)
        }
        Err(err) => Err(err.into()),
    }
}
