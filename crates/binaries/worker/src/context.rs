use color_eyre::Result;
use common_services::event_store::EventStore;
use common_services::face_client::{FaceService, HttpFaceService};
use common_services::retry::RetryPolicy;
use common_services::settings::AppSettings;
use object_store::aws::AmazonS3Builder;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

pub struct WorkerContext {
    pub settings: &'static AppSettings,
    pub face_service: Arc<dyn FaceService>,
    pub event_store: EventStore,
}

impl WorkerContext {
    /// Creates a new instance of `WorkerContext`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the object store cannot
    /// be built from the configured bucket or the face-service base
    /// URL does not parse.
    pub fn new(settings: &'static AppSettings) -> Result<Self> {
        let storage = &settings.storage;
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(&storage.bucket)
            .with_region(&storage.region);
        if let Some(endpoint) = &storage.endpoint {
            builder = builder.with_endpoint(endpoint).with_allow_http(true);
        }
        let store = Arc::new(builder.build()?);

        let base_url = Url::parse(&settings.face_service.base_url)?;
        let face_service = HttpFaceService::new(
            Client::new(),
            base_url,
            RetryPolicy::from_settings(&settings.pipeline),
        );

        Ok(Self {
            settings,
            face_service: Arc::new(face_service),
            event_store: EventStore::new(store, storage.public_base_url.clone()),
        })
    }
}
