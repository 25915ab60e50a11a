use rand::Rng;
use tracing::{debug, info, warn};

use crate::catalog::TraitCatalog;
use crate::config::GeneratorConfig;
use crate::errors::GeneratorError;
use crate::metadata::{MetadataRecord, display_name};
use crate::sampler::{DeterministicRng, sample_trait};
use crate::store::RecordStore;
use crate::types::{CategoryName, ItemId};

/// Outcome of generating one item.
#[derive(Clone, Debug, PartialEq)]
pub enum Generation {
    /// A new record was assembled and persisted.
    Created(MetadataRecord),
    /// A record already existed; nothing was sampled or written.
    Skipped,
}

impl Generation {
    /// The freshly created record, if any.
    pub fn record(&self) -> Option<&MetadataRecord> {
        match self {
            Generation::Created(record) => Some(record),
            Generation::Skipped => None,
        }
    }
}

/// Per-id results of a sequential batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Ids that received a new record.
    pub created: Vec<ItemId>,
    /// Ids that already had a record.
    pub skipped: Vec<ItemId>,
    /// Ids whose record could not be persisted, with the cause.
    pub failed: Vec<(ItemId, GeneratorError)>,
}

/// Pick the category that must yield a concrete trait for this item.
///
/// Returns `None` when no categories take part in the guarantee.
pub fn draw_guaranteed_category<'c, R: Rng + ?Sized>(
    categories: &'c [CategoryName],
    rng: &mut R,
) -> Option<&'c str> {
    if categories.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..categories.len());
    Some(categories[idx].as_str())
}

/// Build the record for `id` from a fresh copy of `template`.
///
/// Every catalog category is sampled in catalog order; only `guaranteed`
/// excludes its placeholders. Absent results leave the template value alone.
pub fn assemble_record<R: Rng + ?Sized>(
    id: ItemId,
    catalog: &TraitCatalog,
    template: &MetadataRecord,
    name_prefix: &str,
    guaranteed: Option<&str>,
    rng: &mut R,
) -> Result<MetadataRecord, GeneratorError> {
    if let Some(name) = guaranteed {
        catalog.category(name)?;
    }

    let mut record = template.clone();
    record.name = display_name(name_prefix, id);
    for (category_name, category) in catalog.iter() {
        let exclude_placeholder = guaranteed == Some(category_name.as_str());
        match sample_trait(category, exclude_placeholder, rng)? {
            Some(value) => {
                debug!(item_id = id, category = %category_name, value = %value, "sampled trait");
                record.set_value(category_name, value)?;
            }
            None => {
                debug!(item_id = id, category = %category_name, "sampled placeholder, keeping template value");
            }
        }
    }
    Ok(record)
}

/// Generate and persist the record for `id` unless one already exists.
///
/// The existence check and the write are not atomic; callers must not run
/// the same id concurrently.
pub fn generate<S, R>(
    id: ItemId,
    catalog: &TraitCatalog,
    template: &MetadataRecord,
    store: &S,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Generation, GeneratorError>
where
    S: RecordStore + ?Sized,
    R: Rng + ?Sized,
{
    if store.exists(id)? {
        info!(item_id = id, "metadata record already exists, skipping");
        return Ok(Generation::Skipped);
    }

    let guaranteed = draw_guaranteed_category(&config.guaranteed_categories, rng);
    debug!(item_id = id, guaranteed = ?guaranteed, "drew guaranteed category");
    let record = assemble_record(id, catalog, template, &config.name_prefix, guaranteed, rng)?;
    let payload = record.to_json_bytes()?;
    store.write_new(id, &payload)?;
    info!(item_id = id, name = %record.name, "created metadata record");
    Ok(Generation::Created(record))
}

/// Generator bound to one catalog, template, and store for the length of a run.
pub struct MetadataGenerator<'a, S: RecordStore + ?Sized, R: Rng> {
    catalog: &'a TraitCatalog,
    template: &'a MetadataRecord,
    store: &'a S,
    config: GeneratorConfig,
    rng: R,
}

impl<'a, S: RecordStore + ?Sized> MetadataGenerator<'a, S, DeterministicRng> {
    /// Build a generator seeded from `config.seed` (or a random seed when unset).
    pub fn new(
        catalog: &'a TraitCatalog,
        template: &'a MetadataRecord,
        store: &'a S,
        config: GeneratorConfig,
    ) -> Result<Self, GeneratorError> {
        let seed = config.seed.unwrap_or_else(rand::random::<u64>);
        info!(seed, "seeding metadata generator");
        Self::with_rng(catalog, template, store, config, DeterministicRng::new(seed))
    }
}

impl<'a, S: RecordStore + ?Sized, R: Rng> MetadataGenerator<'a, S, R> {
    /// Build a generator drawing from `rng`.
    ///
    /// Validates the catalog against the guaranteed categories and the template
    /// slots up front so configuration errors surface before anything is written.
    pub fn with_rng(
        catalog: &'a TraitCatalog,
        template: &'a MetadataRecord,
        store: &'a S,
        config: GeneratorConfig,
        rng: R,
    ) -> Result<Self, GeneratorError> {
        catalog.validate(&config.guaranteed_categories)?;
        template.check_slots(catalog)?;
        Ok(Self {
            catalog,
            template,
            store,
            config,
            rng,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the record for `id`, or skip it if one exists.
    pub fn generate(&mut self, id: ItemId) -> Result<Generation, GeneratorError> {
        generate(
            id,
            self.catalog,
            self.template,
            self.store,
            &self.config,
            &mut self.rng,
        )
    }

    /// Generate ids one after another.
    ///
    /// Store failures are recorded per id and the run continues; configuration
    /// errors abort the run.
    pub fn generate_batch<I>(&mut self, ids: I) -> Result<BatchReport, GeneratorError>
    where
        I: IntoIterator<Item = ItemId>,
    {
        let mut report = BatchReport::default();
        for id in ids {
            match self.generate(id) {
                Ok(Generation::Created(_)) => report.created.push(id),
                Ok(Generation::Skipped) => report.skipped.push(id),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!(item_id = id, error = %err, "failed to generate metadata record");
                    report.failed.push((id, err));
                }
            }
        }
        info!(
            created = report.created.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "metadata batch finished"
        );
        Ok(report)
    }
}
