mod loader;
mod reports;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use loader::{FileCatalogLoader, default_catalog_path};
use reports::HoardReport;
use trove_engine::constants::{SEED_DOMAIN_GENERATE, SEED_DOMAIN_REROLL};
use trove_engine::{
    GenerateCategory, GenerationConfig, PremadeCategory, Rarity, ResultSet, TreasureEngine,
    entropy_seed, loot_rng,
};
use util::parse_keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored table for the terminal
    Console,
    /// Pretty-printed JSON including the echoed config
    Json,
    /// Markdown table
    Markdown,
    /// One plain line per item
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "trove", version)]
#[command(about = "Generate tabletop treasure hoards under a gold budget")]
struct Args {
    /// Catalog JSON file (defaults to the bundled sample catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// JSON generation config; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Budget in gold pieces
    #[arg(long)]
    budget: Option<u64>,

    /// Minimum number of items
    #[arg(long)]
    min_items: Option<u32>,

    /// Maximum number of items
    #[arg(long)]
    max_items: Option<u32>,

    /// Base categories to build on (comma-separated, `all` or `none`)
    #[arg(long)]
    generate: Option<String>,

    /// Premade categories to draw from (comma-separated, `all` or `none`)
    #[arg(long)]
    premade: Option<String>,

    /// Allowed rarity tiers (comma-separated); empty allows every tier
    #[arg(long)]
    rarity: Option<String>,

    /// Maximum magic qualities per generated item (0-5)
    #[arg(long)]
    max_qualities: Option<u8>,

    /// Maximum enhancement bonus (0-9)
    #[arg(long)]
    max_bonus: Option<u8>,

    /// Seed for a reproducible hoard; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Reroll this slot after generating (repeatable, applied in order)
    #[arg(long)]
    reroll: Vec<usize>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print catalog statistics and exit
    #[arg(long)]
    catalog_stats: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    run(&args)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn run(args: &Args) -> Result<()> {
    let catalog_path = args.catalog.clone().unwrap_or_else(default_catalog_path);
    let loader = FileCatalogLoader::new(catalog_path);
    let engine = TreasureEngine::load(&loader)
        .with_context(|| format!("failed to load catalog {}", loader.path().display()))?;
    let mut output_target = OutputTarget::new(args.output.clone())?;

    if args.catalog_stats {
        reports::generate_catalog_stats(
            &mut output_target,
            loader.path(),
            &engine.catalog().summary(),
        )?;
        output_target.flush_inner()?;
        return Ok(());
    }

    let config = build_config(args)?;
    let seed = args.seed.unwrap_or_else(entropy_seed);
    info!(
        "generating | seed:{seed} budget_gp:{} rerolls:{}",
        config.max_coin_value,
        args.reroll.len()
    );

    let hoard = engine
        .generate(&config, &mut loot_rng(seed, SEED_DOMAIN_GENERATE))
        .context("hoard generation failed")?;
    let hoard = apply_rerolls(&engine, &config, hoard, &args.reroll, seed)?;

    write_report(
        &mut output_target,
        args.report,
        &HoardReport::new(seed, &args.reroll, &hoard),
    )?;
    output_target.flush_inner()?;

    if args.output.is_some() && args.report == ReportFormat::Console {
        println!("{} seed {seed}", "✅ Hoard written,".green());
    }
    Ok(())
}

fn load_config_file(path: &Path) -> Result<GenerationConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse config {}", path.display()))
}

/// Start from the config file (or defaults) and let flags override it.
fn build_config(args: &Args) -> Result<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_file(path)?,
        None => GenerationConfig::default(),
    };

    if let Some(budget) = args.budget {
        config = config.with_budget(budget);
    }
    if args.min_items.is_some() || args.max_items.is_some() {
        let range = config.item_count_range;
        config = config.with_item_range(
            args.min_items.unwrap_or(range.min),
            args.max_items.unwrap_or(range.max),
        );
    }
    if let Some(raw) = &args.generate {
        let categories = parse_keys(
            raw,
            &GenerateCategory::ALL,
            GenerateCategory::parse,
            "generate category",
        )?;
        config = config.with_generate(categories);
    }
    if let Some(raw) = &args.premade {
        let categories = parse_keys(
            raw,
            &PremadeCategory::ALL,
            PremadeCategory::parse,
            "premade category",
        )?;
        config = config.with_premade(categories);
    }
    if let Some(raw) = &args.rarity {
        config = config.with_rarities(parse_keys(raw, &Rarity::ALL, Rarity::parse, "rarity")?);
    }
    if let Some(max) = args.max_qualities {
        config = config.with_max_magic_attributes(max);
    }
    if let Some(max) = args.max_bonus {
        config = config.with_max_enhancement_bonus(max);
    }

    config.validate().context("invalid generation config")?;
    Ok(config)
}

fn apply_rerolls<'a>(
    engine: &'a TreasureEngine,
    config: &GenerationConfig,
    mut hoard: ResultSet<'a>,
    slots: &[usize],
    seed: u64,
) -> Result<ResultSet<'a>> {
    let mut rng = loot_rng(seed, SEED_DOMAIN_REROLL);
    for &slot in slots {
        hoard = engine
            .reroll(config, &hoard, slot, &mut rng)
            .with_context(|| format!("failed to reroll slot {slot}"))?;
    }
    Ok(hoard)
}

fn write_report<W: Write>(
    out: &mut W,
    format: ReportFormat,
    report: &HoardReport<'_, '_>,
) -> Result<()> {
    match format {
        ReportFormat::Console => reports::generate_console_report(out, report),
        ReportFormat::Json => reports::generate_json_report(out, report),
        ReportFormat::Markdown => reports::generate_markdown_report(out, report),
        ReportFormat::Text => reports::generate_text_report(out, report),
    }
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
