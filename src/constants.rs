/// Constants used by the weighted trait sampler.
pub mod traits {
    /// Placeholder option meaning "no visible attribute"; sampling it yields no value.
    pub const PLACEHOLDER_NONE: &str = "none";
    /// Placeholder option meaning "keep the template default".
    pub const PLACEHOLDER_DEFAULT: &str = "default";
    /// Both placeholder names, excluded from guaranteed draws.
    pub const PLACEHOLDER_NAMES: [&str; 2] = [PLACEHOLDER_NONE, PLACEHOLDER_DEFAULT];
    /// Base category that is always sampled and never guaranteed.
    pub const BASE_CATEGORY: &str = "bird";
    /// Ordered categories eligible for the per-item guaranteed draw.
    pub const GUARANTEED_CATEGORIES: [&str; 4] = ["head", "eyes", "mouth", "neck"];
}

/// Constants used when assembling metadata records.
pub mod metadata {
    /// Display name prefix; the item id is appended.
    pub const DEFAULT_NAME_PREFIX: &str = "Flutter Bird #";
}

/// Constants used by record stores and default input locations.
pub mod store {
    /// Prefix placed before the item id in record filenames (`#17.json`).
    pub const RECORD_FILE_PREFIX: &str = "#";
    /// Extension of persisted record files.
    pub const RECORD_FILE_EXTENSION: &str = "json";
    /// Default directory for persisted records.
    pub const DEFAULT_OUTPUT_DIR: &str = "output/metadata";
    /// Default trait catalog path.
    pub const DEFAULT_TRAITS_PATH: &str = "input/traits.json";
    /// Default metadata template path.
    pub const DEFAULT_TEMPLATE_PATH: &str = "input/metadata_template.json";
}

/// Constants used by the seedable RNG.
pub mod rng {
    /// SplitMix64 increment.
    pub const SPLITMIX_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;
    /// First SplitMix64 mixing multiplier.
    pub const SPLITMIX_MUL_1: u64 = 0xBF58_476D_1CE4_E5B9;
    /// Second SplitMix64 mixing multiplier.
    pub const SPLITMIX_MUL_2: u64 = 0x94D0_49BB_1331_11EB;
}
