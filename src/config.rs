use crate::constants::metadata::DEFAULT_NAME_PREFIX;
use crate::constants::traits::GUARANTEED_CATEGORIES;
use crate::types::CategoryName;

/// Top-level generation configuration.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// RNG seed; `None` draws a fresh seed from the thread RNG for each run.
    pub seed: Option<u64>,
    /// Prefix of each record's display name; the item id is appended.
    pub name_prefix: String,
    /// Ordered categories taking part in the per-item guaranteed draw.
    ///
    /// Categories outside this list (the base `bird` category in the
    /// reference catalog) are always sampled with placeholders allowed.
    pub guaranteed_categories: Vec<CategoryName>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            guaranteed_categories: GUARANTEED_CATEGORIES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}
