use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, error::ErrorKind};

use crate::catalog::TraitCatalog;
use crate::config::GeneratorConfig;
use crate::constants::metadata::DEFAULT_NAME_PREFIX;
use crate::constants::store::{DEFAULT_TEMPLATE_PATH, DEFAULT_TRAITS_PATH};
use crate::generator::{BatchReport, MetadataGenerator};
use crate::metadata::MetadataRecord;
use crate::store::FileRecordStore;
use crate::types::ItemId;

#[derive(Debug, Parser)]
#[command(
    name = "generate_metadata",
    disable_help_subcommand = true,
    about = "Generate weighted trait metadata records",
    long_about = "Sample one trait per catalog category for each item id, guaranteeing a concrete trait in one randomly chosen category, and write `#<id>.json` records that do not exist yet.",
    after_help = "Existing records are never overwritten; re-running over the same ids only fills gaps."
)]
/// CLI for `generate_metadata`.
///
/// Common usage:
/// - Fill ids 0..100 with default inputs: `--count 100`
/// - Reproducible run: `--seed 42`
/// - Custom locations: `--traits traits.json --template template.json --output-dir out/`
struct GenerateMetadataCli {
    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_TRAITS_PATH,
        help = "Trait catalog JSON (category -> [{name, weight}])"
    )]
    traits: PathBuf,
    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_TEMPLATE_PATH,
        help = "Metadata template JSON"
    )]
    template: PathBuf,
    #[arg(
        long = "output-dir",
        value_name = "DIR",
        help = "Directory for generated records (defaults to output/metadata)"
    )]
    output_dir: Option<PathBuf>,
    #[arg(long, default_value_t = 0, help = "First item id to generate")]
    start: ItemId,
    #[arg(
        long,
        value_parser = parse_positive_count,
        help = "Number of consecutive ids to generate"
    )]
    count: ItemId,
    #[arg(long, help = "Optional deterministic seed")]
    seed: Option<u64>,
    #[arg(
        long = "name-prefix",
        default_value = DEFAULT_NAME_PREFIX,
        help = "Display name prefix; the item id is appended"
    )]
    name_prefix: String,
}

/// Parse CLI args, generate the requested id range, and print a summary.
pub fn run_generate_metadata<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let Some(cli) = parse_cli::<GenerateMetadataCli, _>(
        std::iter::once("generate_metadata".to_string()).chain(args_iter),
    )?
    else {
        return Ok(());
    };

    let catalog = TraitCatalog::load(&cli.traits)?;
    let template = MetadataRecord::load(&cli.template)?;
    let output_dir = cli.output_dir.unwrap_or_else(FileRecordStore::default_path);
    let store = FileRecordStore::open(&output_dir)?;

    let config = GeneratorConfig {
        seed: cli.seed,
        name_prefix: cli.name_prefix,
        ..GeneratorConfig::default()
    };

    let end = cli.start.checked_add(cli.count).ok_or("--start + --count overflows")?;
    println!(
        "Writing metadata records {}..{} to {}",
        cli.start,
        end,
        output_dir.display()
    );
    let mut generator = MetadataGenerator::new(&catalog, &template, &store, config)?;
    let report = generator.generate_batch(cli.start..end)?;
    print_report(&report);

    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(format!("{} record(s) could not be written", report.failed.len()).into())
    }
}

fn print_report(report: &BatchReport) {
    println!(
        "created={} skipped={} failed={}",
        report.created.len(),
        report.skipped.len(),
        report.failed.len()
    );
    for (id, err) in &report.failed {
        println!("  #{id}: {err}");
    }
}

fn parse_positive_count(raw: &str) -> Result<ItemId, String> {
    let parsed = raw
        .parse::<ItemId>()
        .map_err(|_| format!("Could not parse --count value '{raw}' as a positive integer"))?;
    if parsed == 0 {
        return Err("--count must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}
