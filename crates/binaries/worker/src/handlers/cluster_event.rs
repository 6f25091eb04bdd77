use crate::context::WorkerContext;
use crate::handlers::JobResult;
use color_eyre::Result;
use face_pipeline::{ClusterOptions, FaceClusterer};
use tracing::info;

/// Groups the event's photos by the people appearing in them and
/// prints each group with the photos its members come from.
pub async fn handle(context: &WorkerContext, event_id: &str) -> Result<JobResult> {
    let photos = context.event_store.list_event_images(event_id).await?;
    info!("Clustering {} photos for event {event_id}", photos.len());

    let clusterer = FaceClusterer::new(
        context.face_service.clone(),
        ClusterOptions::from_settings(&context.settings.pipeline),
    );
    let groups = clusterer.cluster(event_id, &photos).await?;

    if groups.is_empty() {
        println!("No faces detected in this event's photos.");
        return Ok(JobResult::NoMatches);
    }
    for group in &groups {
        println!("{} ({} faces)", group.group_id, group.members.len());
        for key in group.photo_keys() {
            println!("  {key}");
        }
    }
    Ok(JobResult::Done)
}
