use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::catalog::TraitCatalog;
use crate::errors::GeneratorError;
use crate::types::{DisplayName, ItemId, TraitValue};

/// One `{trait_type, value}` slot of a metadata record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Category this slot is bound to (matched case-insensitively).
    pub trait_type: String,
    /// Current value; the template carries the default.
    pub value: TraitValue,
}

impl Attribute {
    /// Create a slot for `trait_type` holding `value`.
    pub fn new(trait_type: impl Into<String>, value: impl Into<TraitValue>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: value.into(),
        }
    }

    /// True when this slot belongs to `category`.
    pub fn is_bound_to(&self, category: &str) -> bool {
        self.trait_type.eq_ignore_ascii_case(category)
    }
}

/// Metadata document used both as the static template and as a generated record.
///
/// Fields other than `name` and `attributes` are kept verbatim (in template
/// order) so descriptions, image links and the like pass straight through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Display name; replaced per item on generation.
    pub name: DisplayName,
    /// Ordered attribute slots.
    pub attributes: Vec<Attribute>,
    /// Remaining template fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetadataRecord {
    /// Create a record with no extra fields.
    pub fn new(name: impl Into<DisplayName>, attributes: Vec<Attribute>) -> Self {
        Self {
            name: name.into(),
            attributes,
            extra: Map::new(),
        }
    }

    /// Parse a record or template from JSON.
    pub fn from_json_str(raw: &str) -> Result<Self, GeneratorError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Parse a record from raw bytes as persisted by a store.
    pub fn from_json_slice(raw: &[u8]) -> Result<Self, GeneratorError> {
        Ok(serde_json::from_slice(raw)?)
    }

    /// Load a template from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GeneratorError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| {
            GeneratorError::Configuration(format!(
                "failed to read metadata template {}: {err}",
                path.display()
            ))
        })?;
        Self::from_json_str(&raw)
    }

    /// Compact JSON encoding written to record stores.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, GeneratorError> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Value of the slot bound to `category`, if the record has one.
    pub fn value_of(&self, category: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|slot| slot.is_bound_to(category))
            .map(|slot| slot.value.as_str())
    }

    /// Overwrite the slot bound to `category`.
    pub fn set_value(
        &mut self,
        category: &str,
        value: impl Into<TraitValue>,
    ) -> Result<(), GeneratorError> {
        let slot = self
            .attributes
            .iter_mut()
            .find(|slot| slot.is_bound_to(category))
            .ok_or_else(|| {
                GeneratorError::Configuration(format!(
                    "metadata template has no attribute slot for category '{category}'"
                ))
            })?;
        slot.value = value.into();
        Ok(())
    }

    /// Ensure every catalog category has a slot to write into.
    pub fn check_slots(&self, catalog: &TraitCatalog) -> Result<(), GeneratorError> {
        for category in catalog.names() {
            if !self.attributes.iter().any(|slot| slot.is_bound_to(category)) {
                return Err(GeneratorError::Configuration(format!(
                    "metadata template has no attribute slot for category '{category}'"
                )));
            }
        }
        Ok(())
    }
}

/// Build the display name for `id` (e.g. `Flutter Bird #17`).
pub fn display_name(prefix: &str, id: ItemId) -> DisplayName {
    format!("{prefix}{id}")
}
