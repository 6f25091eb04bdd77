#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
mod face;
pub mod keys;
mod photo;

pub use face::*;
pub use photo::*;
