//! Export collaborators
//!
//! Consume a finished `Dataset`; the scraping core never calls into here.

pub mod json_export;

pub use json_export::{dataset_to_json, write_dataset_json};
