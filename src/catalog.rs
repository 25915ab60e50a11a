use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::traits::PLACEHOLDER_NAMES;
use crate::errors::GeneratorError;
use crate::types::{CategoryName, TraitName};

/// One weighted option inside a trait category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitOption {
    /// Option name; `none`/`default` are placeholders.
    pub name: TraitName,
    /// Relative selection weight.
    pub weight: f64,
}

impl TraitOption {
    /// Create an option with the given name and weight.
    pub fn new(name: impl Into<TraitName>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }

    /// True when this option stands for "no visible attribute".
    pub fn is_placeholder(&self) -> bool {
        PLACEHOLDER_NAMES.contains(&self.name.as_str())
    }
}

/// Ordered list of weighted options for one attribute category.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitCategory {
    options: Vec<TraitOption>,
}

impl TraitCategory {
    /// Build a category from options in sampling order.
    pub fn new<I>(options: I) -> Self
    where
        I: IntoIterator<Item = TraitOption>,
    {
        Self {
            options: options.into_iter().collect(),
        }
    }

    /// All options in catalog order.
    pub fn options(&self) -> &[TraitOption] {
        &self.options
    }

    /// Options taking part in a draw, in catalog order.
    pub fn eligible(&self, exclude_placeholder: bool) -> impl Iterator<Item = &TraitOption> {
        self.options
            .iter()
            .filter(move |option| !(exclude_placeholder && option.is_placeholder()))
    }

    /// Sum of weights over the eligible subset.
    pub fn total_weight(&self, exclude_placeholder: bool) -> f64 {
        self.eligible(exclude_placeholder)
            .map(|option| option.weight)
            .sum()
    }

    /// Number of options in the category.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// True when the category has no options at all.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Read-only mapping from category name to its weighted options.
///
/// Categories keep the order in which they appear in the catalog document;
/// generation samples them in that order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitCatalog {
    categories: IndexMap<CategoryName, TraitCategory>,
}

impl TraitCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert used when assembling catalogs in code.
    pub fn with_category<I>(mut self, name: impl Into<CategoryName>, options: I) -> Self
    where
        I: IntoIterator<Item = TraitOption>,
    {
        self.categories
            .insert(name.into(), TraitCategory::new(options));
        self
    }

    /// Parse a catalog from a JSON document (`{"head": [{"name": .., "weight": ..}]}`).
    pub fn from_json_str(raw: &str) -> Result<Self, GeneratorError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Load a catalog from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GeneratorError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| {
            GeneratorError::Configuration(format!(
                "failed to read trait catalog {}: {err}",
                path.display()
            ))
        })?;
        Self::from_json_str(&raw)
    }

    /// Look up a category by name.
    pub fn category(&self, name: &str) -> Result<&TraitCategory, GeneratorError> {
        self.categories
            .get(name)
            .ok_or_else(|| GeneratorError::MissingCategory(name.to_string()))
    }

    /// True when `name` is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    /// Iterate categories in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&CategoryName, &TraitCategory)> {
        self.categories.iter()
    }

    /// Category names in document order.
    pub fn names(&self) -> impl Iterator<Item = &CategoryName> {
        self.categories.keys()
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// True when no categories are defined.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Structural checks run once before any record is generated.
    ///
    /// Every category must be non-empty with a positive total weight, and each
    /// guaranteed category must exist and carry a concrete option with weight.
    pub fn validate(&self, guaranteed: &[CategoryName]) -> Result<(), GeneratorError> {
        if self.categories.is_empty() {
            return Err(GeneratorError::Configuration(
                "trait catalog defines no categories".into(),
            ));
        }
        for (name, category) in &self.categories {
            if category.is_empty() {
                return Err(GeneratorError::Configuration(format!(
                    "trait category '{name}' has no options"
                )));
            }
            let total = category.total_weight(false);
            if total <= 0.0 || total.is_nan() {
                return Err(GeneratorError::Configuration(format!(
                    "trait category '{name}' has non-positive total weight {total}"
                )));
            }
        }
        for name in guaranteed {
            let category = self.category(name)?;
            let total = category.total_weight(true);
            if total <= 0.0 || total.is_nan() {
                return Err(GeneratorError::Configuration(format!(
                    "guaranteed category '{name}' has no weighted concrete option"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_JSON: &str = r#"{
        "bird": [{"name": "Red", "weight": 3}, {"name": "Blue", "weight": 1}],
        "head": [{"name": "Hat", "weight": 1}, {"name": "none", "weight": 4}],
        "eyes": [{"name": "default", "weight": 2}, {"name": "Shades", "weight": 1}]
    }"#;

    #[test]
    fn parses_catalog_in_document_order() {
        let catalog = TraitCatalog::from_json_str(CATALOG_JSON).unwrap();
        let names: Vec<&str> = catalog.names().map(String::as_str).collect();
        assert_eq!(names, vec!["bird", "head", "eyes"]);
        assert_eq!(
            catalog.category("bird").unwrap().options()[0],
            TraitOption::new("Red", 3.0)
        );
    }

    #[test]
    fn eligible_options_drop_placeholders_only_when_excluded() {
        let catalog = TraitCatalog::from_json_str(CATALOG_JSON).unwrap();
        let eyes = catalog.category("eyes").unwrap();
        assert_eq!(eyes.eligible(false).count(), 2);
        let concrete: Vec<&str> = eyes.eligible(true).map(|o| o.name.as_str()).collect();
        assert_eq!(concrete, vec!["Shades"]);
        assert_eq!(eyes.total_weight(false), 3.0);
        assert_eq!(eyes.total_weight(true), 1.0);
    }

    #[test]
    fn missing_category_is_reported_by_name() {
        let catalog = TraitCatalog::from_json_str(CATALOG_JSON).unwrap();
        match catalog.category("neck") {
            Err(GeneratorError::MissingCategory(name)) => assert_eq!(name, "neck"),
            other => panic!("unexpected lookup result: {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_empty_and_weightless_categories() {
        let empty = TraitCatalog::new().with_category("head", Vec::<TraitOption>::new());
        assert!(matches!(
            empty.validate(&[]),
            Err(GeneratorError::Configuration(_))
        ));

        let weightless = TraitCatalog::new().with_category("head", [TraitOption::new("Hat", 0.0)]);
        assert!(matches!(
            weightless.validate(&[]),
            Err(GeneratorError::Configuration(_))
        ));
    }

    #[test]
    fn validate_requires_concrete_option_for_guaranteed_categories() {
        let catalog = TraitCatalog::new().with_category(
            "head",
            [TraitOption::new("none", 1.0), TraitOption::new("default", 1.0)],
        );
        assert!(catalog.validate(&[]).is_ok());
        assert!(matches!(
            catalog.validate(&["head".to_string()]),
            Err(GeneratorError::Configuration(_))
        ));
        assert!(matches!(
            catalog.validate(&["mouth".to_string()]),
            Err(GeneratorError::MissingCategory(_))
        ));
    }

    #[test]
    fn placeholder_detection_is_exact() {
        assert!(TraitOption::new("none", 1.0).is_placeholder());
        assert!(TraitOption::new("default", 1.0).is_placeholder());
        assert!(!TraitOption::new("None Hat", 1.0).is_placeholder());
    }
}
