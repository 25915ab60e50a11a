/// Numeric identifier of one generated item.
/// Examples: `0`, `17`, `9999`
pub type ItemId = u64;
/// Name of an attribute category in the trait catalog.
/// Examples: `bird`, `head`, `eyes`
pub type CategoryName = String;
/// Raw option name as written in the trait catalog.
/// Examples: `Red`, `Top Hat`, `none`
pub type TraitName = String;
/// Lower-cased trait value written into a metadata record.
/// Examples: `red`, `top hat`
pub type TraitValue = String;
/// Display name assigned to a generated record.
/// Example: `Flutter Bird #17`
pub type DisplayName = String;
