use std::io;

use thiserror::Error;

use crate::types::ItemId;

/// Error type for catalog configuration, serialization, and record store failures.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("trait category '{0}' is not defined in the catalog")]
    MissingCategory(String),
    #[error("record store failure for item {item_id}: {reason}")]
    Store { item_id: ItemId, reason: String },
    #[error("a record for item {0} already exists")]
    RecordExists(ItemId),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl GeneratorError {
    /// True for errors that invalidate the whole run rather than a single item.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GeneratorError::Configuration(_) | GeneratorError::MissingCategory(_)
        )
    }
}
