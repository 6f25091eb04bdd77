//! Storage key layout for event media.
//!
//! Everything an event owns lives under `events/shared/{event_id}/`:
//! guest-visible photos in `images/`, query selfies in `selfies/`, and
//! the event cover image directly under the prefix as `cover-*`.

#[must_use]
pub fn shared_event_prefix(event_id: &str) -> String {
    format!("events/shared/{event_id}")
}

#[must_use]
pub fn images_prefix(event_id: &str) -> String {
    format!("{}/images/", shared_event_prefix(event_id))
}

#[must_use]
pub fn selfies_prefix(event_id: &str) -> String {
    format!("{}/selfies/", shared_event_prefix(event_id))
}

#[must_use]
pub fn selfie_key(event_id: &str, file_name: &str) -> String {
    format!("{}{file_name}", selfies_prefix(event_id))
}

#[must_use]
pub fn cover_prefix(event_id: &str) -> String {
    format!("{}/cover-", shared_event_prefix(event_id))
}
