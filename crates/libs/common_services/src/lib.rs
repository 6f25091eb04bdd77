#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod event_store;
pub mod face_client;
pub mod retry;
pub mod settings;
pub mod utils;
