use crate::event_store::error::StoreError;
use bytes::Bytes;
use chrono::Utc;
use common_types::{PhotoRef, is_image_key, keys};
use futures_util::TryStreamExt;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectMeta, ObjectStore, PutOptions, PutPayload};
use std::sync::Arc;
use tracing::debug;

/// Event-aware wrapper around the shared media bucket. Knows the
/// `events/shared/{event_id}/...` key layout and derives the public
/// URLs handed to the UI.
#[derive(Clone)]
pub struct EventStore {
    store: Arc<dyn ObjectStore>,
    public_base_url: String,
}

impl EventStore {
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, public_base_url: impl Into<String>) -> Self {
        Self {
            store,
            public_base_url: public_base_url.into(),
        }
    }

    /// Lists the event's guest-visible photos. Non-image keys under
    /// the prefix are skipped.
    pub async fn list_event_images(&self, event_id: &str) -> Result<Vec<PhotoRef>, StoreError> {
        let prefix = Path::parse(keys::images_prefix(event_id))?;
        let objects: Vec<ObjectMeta> = self.store.list(Some(&prefix)).try_collect().await?;
        debug!(
            "Listed {} objects under {prefix} for event {event_id}",
            objects.len()
        );
        Ok(objects
            .into_iter()
            .filter(|meta| is_image_key(meta.location.as_ref()))
            .map(|meta| self.photo_ref(&meta))
            .collect())
    }

    /// Stores a guest selfie under the event's selfies prefix and
    /// returns its storage key. The file name should already be
    /// unique (see `utils::nice_id`).
    pub async fn put_selfie(
        &self,
        event_id: &str,
        file_name: &str,
        bytes: Bytes,
        content_type: &str,
        session_id: Option<&str>,
    ) -> Result<String, StoreError> {
        let key = keys::selfie_key(event_id, file_name);
        let location = Path::parse(&key)?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        attributes.insert(
            Attribute::Metadata("event-id".into()),
            event_id.to_string().into(),
        );
        attributes.insert(
            Attribute::Metadata("session-id".into()),
            session_id.unwrap_or_default().to_string().into(),
        );
        attributes.insert(
            Attribute::Metadata("upload-date".into()),
            Utc::now().to_rfc3339().into(),
        );

        let options = PutOptions {
            attributes,
            ..Default::default()
        };
        self.store
            .put_opts(&location, PutPayload::from(bytes), options)
            .await?;
        Ok(key)
    }

    /// The event's cover image, if one was uploaded. Covers sit
    /// directly under the event prefix as `cover-*`.
    pub async fn find_cover_image(&self, event_id: &str) -> Result<Option<PhotoRef>, StoreError> {
        let prefix = Path::parse(keys::shared_event_prefix(event_id))?;
        let listing = self.store.list_with_delimiter(Some(&prefix)).await?;
        let cover_prefix = keys::cover_prefix(event_id);
        Ok(listing
            .objects
            .into_iter()
            .find(|meta| meta.location.as_ref().starts_with(&cover_prefix))
            .map(|meta| self.photo_ref(&meta)))
    }

    fn photo_ref(&self, meta: &ObjectMeta) -> PhotoRef {
        PhotoRef::new(meta.location.to_string(), &self.public_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::EventStore;
    use bytes::Bytes;
    use object_store::memory::InMemory;
    use object_store::path::Path;
    use object_store::{ObjectStore, PutPayload};
    use std::sync::Arc;

    const BASE_URL: &str = "https://event-photos.s3.amazonaws.com";

    async fn seeded_store() -> color_eyre::Result<EventStore> {
        let memory = Arc::new(InMemory::new());
        for key in [
            "events/shared/ev1/images/a.jpg",
            "events/shared/ev1/images/b.png",
            "events/shared/ev1/images/notes.txt",
            "events/shared/ev1/cover-party.jpg",
            "events/shared/ev2/images/other.jpg",
        ] {
            memory
                .put(&Path::parse(key)?, PutPayload::from_static(b"img"))
                .await?;
        }
        Ok(EventStore::new(memory, BASE_URL))
    }

    #[tokio::test]
    async fn lists_only_images_for_the_event() -> color_eyre::Result<()> {
        let store = seeded_store().await?;
        let photos = store.list_event_images("ev1").await?;

        let keys: Vec<&str> = photos.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "events/shared/ev1/images/a.jpg",
                "events/shared/ev1/images/b.png"
            ]
        );
        assert_eq!(
            photos[0].url,
            format!("{BASE_URL}/events/shared/ev1/images/a.jpg")
        );
        Ok(())
    }

    #[tokio::test]
    async fn stores_selfie_under_event_prefix() -> color_eyre::Result<()> {
        let store = seeded_store().await?;
        let key = store
            .put_selfie(
                "ev1",
                "selfie-123-me.jpg",
                Bytes::from_static(b"selfie"),
                "image/jpeg",
                Some("session-9"),
            )
            .await?;
        assert_eq!(key, "events/shared/ev1/selfies/selfie-123-me.jpg");

        let photos = store.list_event_images("ev1").await?;
        assert!(photos.iter().all(|p| !p.key.contains("selfies")));
        Ok(())
    }

    #[tokio::test]
    async fn finds_cover_image() -> color_eyre::Result<()> {
        let store = seeded_store().await?;
        let cover = store.find_cover_image("ev1").await?;
        assert_eq!(
            cover.map(|c| c.key),
            Some("events/shared/ev1/cover-party.jpg".to_string())
        );
        assert!(store.find_cover_image("ev2").await?.is_none());
        Ok(())
    }
}
