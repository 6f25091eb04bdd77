use crate::face_client::error::FaceServiceError;
use crate::retry::{RetryPolicy, retry_with_backoff};
use async_trait::async_trait;
use common_types::BoundingBox;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

/// One face-to-face match reported by the remote service. `face_id`
/// is only present for matches against an indexed collection face.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FaceMatch {
    pub face_id: Option<String>,
    pub similarity: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IndexedFace {
    pub face_id: String,
    pub bounding_box: Option<BoundingBox>,
}

/// Result of indexing one image into a collection. Tagged rather than
/// an optional field so "the service saw no face" is distinct from
/// "the call failed".
#[derive(Debug, Clone, PartialEq)]
pub enum IndexOutcome {
    Detected(Vec<IndexedFace>),
    NoFaceFound,
}

/// The remote face-recognition capability consumed by the pipelines.
/// Image arguments are storage keys in the shared event bucket; the
/// service reads the bytes from storage itself.
#[async_trait]
pub trait FaceService: Send + Sync {
    /// Compares all faces in the source image against the target image.
    async fn compare_faces(
        &self,
        source_key: &str,
        target_key: &str,
        similarity_threshold: f32,
    ) -> Result<Vec<FaceMatch>, FaceServiceError>;

    async fn list_collections(&self) -> Result<Vec<String>, FaceServiceError>;

    /// Creates a named face collection. A `CollectionExists` error
    /// means another caller won the create race; callers treating the
    /// collection as a prerequisite should accept it as success.
    async fn create_collection(&self, collection_id: &str) -> Result<(), FaceServiceError>;

    /// Detects all faces in the image and registers their embeddings
    /// into the collection.
    async fn index_faces(
        &self,
        collection_id: &str,
        image_key: &str,
    ) -> Result<IndexOutcome, FaceServiceError>;

    /// Searches the collection for faces near-identical to an already
    /// indexed face.
    async fn search_faces(
        &self,
        collection_id: &str,
        face_id: &str,
        max_results: u32,
        match_threshold: f32,
    ) -> Result<Vec<FaceMatch>, FaceServiceError>;
}

#[derive(Serialize)]
struct CompareRequest<'a> {
    source_key: &'a str,
    target_key: &'a str,
    similarity_threshold: f32,
}

#[derive(Deserialize)]
struct CompareResponse {
    face_matches: Vec<FaceMatch>,
}

#[derive(Deserialize)]
struct ListCollectionsResponse {
    collection_ids: Vec<String>,
}

#[derive(Serialize)]
struct CreateCollectionRequest<'a> {
    collection_id: &'a str,
}

#[derive(Serialize)]
struct IndexFacesRequest<'a> {
    image_key: &'a str,
}

#[derive(Deserialize)]
struct IndexFacesResponse {
    face_records: Vec<IndexedFace>,
}

#[derive(Serialize)]
struct SearchFacesRequest<'a> {
    face_id: &'a str,
    max_faces: u32,
    face_match_threshold: f32,
}

#[derive(Deserialize)]
struct SearchFacesResponse {
    face_matches: Vec<FaceMatch>,
}

/// JSON-over-HTTP client for the face-recognition gateway.
#[derive(Clone)]
pub struct HttpFaceService {
    http_client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl HttpFaceService {
    #[must_use]
    pub const fn new(http_client: Client, base_url: Url, retry: RetryPolicy) -> Self {
        Self {
            http_client,
            base_url,
            retry,
        }
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }

    async fn post_json<B, T>(&self, url: &Url, body: &B) -> Result<T, FaceServiceError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .http_client
            .post(url.clone())
            .json(body)
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, FaceServiceError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FaceServiceError::RemoteStatus { status, body });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl FaceService for HttpFaceService {
    async fn compare_faces(
        &self,
        source_key: &str,
        target_key: &str,
        similarity_threshold: f32,
    ) -> Result<Vec<FaceMatch>, FaceServiceError> {
        let url = self.endpoint("/faces/compare");
        let body = CompareRequest {
            source_key,
            target_key,
            similarity_threshold,
        };
        let response: CompareResponse = retry_with_backoff(&self.retry, "compare faces", || {
            self.post_json(&url, &body)
        })
        .await?;
        Ok(response.face_matches)
    }

    async fn list_collections(&self) -> Result<Vec<String>, FaceServiceError> {
        let url = self.endpoint("/collections");
        let response: ListCollectionsResponse =
            retry_with_backoff(&self.retry, "list collections", || {
                let url = &url;
                async move {
                    let response = self.http_client.get(url.clone()).send().await?;
                    Self::read_json(response).await
                }
            })
            .await?;
        Ok(response.collection_ids)
    }

    async fn create_collection(&self, collection_id: &str) -> Result<(), FaceServiceError> {
        let url = self.endpoint("/collections");
        let body = CreateCollectionRequest { collection_id };
        retry_with_backoff(&self.retry, "create collection", || {
            let url = &url;
            let body = &body;
            async move {
                let response = self
                    .http_client
                    .post(url.clone())
                    .json(body)
                    .send()
                    .await?;
                match response.status() {
                    status if status.is_success() => Ok(()),
                    StatusCode::CONFLICT => Err(FaceServiceError::CollectionExists(
                        collection_id.to_string(),
                    )),
                    status => {
                        let body = response.text().await.unwrap_or_default();
                        Err(FaceServiceError::RemoteStatus { status, body })
                    }
                }
            }
        })
        .await
    }

    async fn index_faces(
        &self,
        collection_id: &str,
        image_key: &str,
    ) -> Result<IndexOutcome, FaceServiceError> {
        let url = self.endpoint(&format!("/collections/{collection_id}/faces"));
        let body = IndexFacesRequest { image_key };
        let response: IndexFacesResponse = retry_with_backoff(&self.retry, "index faces", || {
            self.post_json(&url, &body)
        })
        .await?;
        if response.face_records.is_empty() {
            Ok(IndexOutcome::NoFaceFound)
        } else {
            Ok(IndexOutcome::Detected(response.face_records))
        }
    }

    async fn search_faces(
        &self,
        collection_id: &str,
        face_id: &str,
        max_results: u32,
        match_threshold: f32,
    ) -> Result<Vec<FaceMatch>, FaceServiceError> {
        let url = self.endpoint(&format!("/collections/{collection_id}/search"));
        let body = SearchFacesRequest {
            face_id,
            max_faces: max_results,
            face_match_threshold: match_threshold,
        };
        let response: SearchFacesResponse = retry_with_backoff(&self.retry, "search faces", || {
            self.post_json(&url, &body)
        })
        .await?;
        Ok(response.face_matches)
    }
}
