#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line runners built on the generator.
pub mod apps;
/// Trait catalog types and loading.
pub mod catalog;
/// Generation configuration types.
pub mod config;
/// Centralized constants used across sampler, generator, and stores.
pub mod constants;
/// Per-item record assembly and batch runs.
pub mod generator;
/// Metadata record/template document types.
pub mod metadata;
/// Weighted trait sampling and the seedable RNG.
pub mod sampler;
/// Record store trait and built-in stores.
pub mod store;
/// Shared type aliases.
pub mod types;

mod errors;

pub use catalog::{TraitCatalog, TraitCategory, TraitOption};
pub use config::GeneratorConfig;
pub use errors::GeneratorError;
pub use generator::{BatchReport, Generation, MetadataGenerator};
pub use metadata::{Attribute, MetadataRecord};
pub use sampler::{DeterministicRng, sample_trait};
pub use store::{FileRecordStore, InMemoryRecordStore, RecordStore};
pub use types::{CategoryName, DisplayName, ItemId, TraitName, TraitValue};
