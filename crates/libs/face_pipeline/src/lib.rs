#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! The face-matching and face-grouping pipelines.
//!
//! Both pipelines are views over the same event photo set: the
//! matcher ranks photos against one query selfie, the clusterer
//! partitions all detected faces into per-person groups. Neither
//! holds state between runs; the remote face collection is the only
//! durable artifact.

pub mod batch;
mod clusterer;
mod error;
mod matcher;

pub use clusterer::*;
pub use error::*;
pub use matcher::*;
