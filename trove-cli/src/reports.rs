use anyhow::Result;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use trove_engine::{
    Appraised, CatalogSummary, LootItem, Rarity, ResultSet, ResultSummary, format_gp,
};

/// Everything a report needs to describe one run.
#[derive(Debug, Serialize)]
pub struct HoardReport<'r, 'a> {
    pub seed: u64,
    pub rerolled_slots: &'r [usize],
    pub summary: ResultSummary,
    pub hoard: &'r ResultSet<'a>,
}

impl<'r, 'a> HoardReport<'r, 'a> {
    pub fn new(seed: u64, rerolled_slots: &'r [usize], hoard: &'r ResultSet<'a>) -> Self {
        Self {
            seed,
            rerolled_slots,
            summary: hoard.summary(),
            hoard,
        }
    }
}

fn tint(rarity: Rarity, text: &str) -> ColoredString {
    match rarity {
        Rarity::Common => text.normal(),
        Rarity::Uncommon => text.green(),
        Rarity::Rare => text.bright_blue(),
        Rarity::VeryRare => text.magenta(),
        Rarity::Legendary => text.bright_yellow().bold(),
    }
}

const fn source_label(item: &LootItem<'_>) -> &'static str {
    if item.is_generated() { "generated" } else { "premade" }
}

pub fn generate_console_report<W: Write>(out: &mut W, report: &HoardReport<'_, '_>) -> Result<()> {
    let hoard = report.hoard;
    let config = &hoard.config;
    writeln!(out)?;
    writeln!(out, "{}", "💰 Treasure Hoard".bright_cyan().bold())?;
    writeln!(out, "{}", "=================".cyan())?;
    writeln!(
        out,
        "Seed: {}  Budget: {}  Items wanted: {}-{}",
        report.seed.to_string().bold(),
        format_gp(config.budget_cp()),
        config.item_count_range.min,
        config.item_count_range.max
    )?;
    if !report.rerolled_slots.is_empty() {
        let slots: Vec<String> = report.rerolled_slots.iter().map(ToString::to_string).collect();
        writeln!(out, "Rerolled slots: {}", slots.join(", "))?;
    }
    writeln!(out)?;

    if hoard.is_empty() {
        writeln!(out, "{}", "No items fit the constraints.".yellow())?;
    } else {
        let names: Vec<String> = hoard
            .items
            .iter()
            .map(|item| item.display_name().into_owned())
            .collect();
        let width = names.iter().map(|name| name.chars().count()).max().unwrap_or(0);
        for (index, (item, name)) in hoard.items.iter().zip(&names).enumerate() {
            let rarity = item.rarity();
            writeln!(
                out,
                "{:>3}. {}  {:<9}  {}  {:>14}",
                index,
                format!("{name:<width$}").bold(),
                source_label(item),
                tint(rarity, &format!("{:<9}", rarity.label())),
                format_gp(item.cost_cp())
            )?;
        }
    }

    let summary = &report.summary;
    writeln!(out)?;
    writeln!(out, "{}", "📊 Summary".bright_yellow().bold())?;
    writeln!(out, "{}", "==========".yellow())?;
    writeln!(
        out,
        "Items: {} ({} generated, {} premade)",
        summary.item_count, summary.generated, summary.premade
    )?;
    writeln!(
        out,
        "Total value: {}",
        format_gp(summary.total_value_cp).green()
    )?;
    writeln!(out, "Unspent: {}", format_gp(summary.unspent_cp))?;
    for (rarity, count) in &summary.by_rarity {
        writeln!(out, "  {}: {count}", tint(*rarity, rarity.label()))?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write>(out: &mut W, report: &HoardReport<'_, '_>) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

fn markdown_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

pub fn generate_markdown_report<W: Write>(
    out: &mut W,
    report: &HoardReport<'_, '_>,
) -> Result<()> {
    let hoard = report.hoard;
    let summary = &report.summary;
    writeln!(out, "# Treasure Hoard\n")?;
    writeln!(out, "- **Seed**: {}", report.seed)?;
    writeln!(out, "- **Budget**: {}", format_gp(hoard.config.budget_cp()))?;
    writeln!(out, "- **Generated at**: {}", hoard.generated_at.to_rfc3339())?;
    if !report.rerolled_slots.is_empty() {
        let slots: Vec<String> = report.rerolled_slots.iter().map(ToString::to_string).collect();
        writeln!(out, "- **Rerolled slots**: {}", slots.join(", "))?;
    }
    writeln!(out)?;

    writeln!(out, "## Items\n")?;
    if hoard.is_empty() {
        writeln!(out, "_No items fit the constraints._\n")?;
    } else {
        writeln!(out, "| # | Item | Source | Category | Rarity | Cost |")?;
        writeln!(out, "|---|------|--------|----------|--------|------|")?;
        for (index, item) in hoard.items.iter().enumerate() {
            writeln!(
                out,
                "| {index} | {} | {} | {} | {} | {} |",
                markdown_cell(&item.display_name()),
                source_label(item),
                item.category_key(),
                item.rarity().label(),
                format_gp(item.cost_cp())
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Items**: {}", summary.item_count)?;
    writeln!(out, "- **Total value**: {}", format_gp(summary.total_value_cp))?;
    writeln!(out, "- **Unspent**: {}", format_gp(summary.unspent_cp))?;
    for (rarity, count) in &summary.by_rarity {
        writeln!(out, "- **{}**: {count}", rarity.label())?;
    }
    Ok(())
}

/// One line per item, suitable for pasting into session notes.
pub fn generate_text_report<W: Write>(out: &mut W, report: &HoardReport<'_, '_>) -> Result<()> {
    for item in &report.hoard.items {
        writeln!(
            out,
            "{} — {} ({})",
            item.display_name(),
            format_gp(item.cost_cp()),
            item.rarity().label()
        )?;
    }
    Ok(())
}

pub fn generate_catalog_stats<W: Write>(
    out: &mut W,
    path: &Path,
    summary: &CatalogSummary,
) -> Result<()> {
    writeln!(out, "{}", "📚 Catalog".bright_cyan().bold())?;
    writeln!(out, "{}", "==========".cyan())?;
    writeln!(out, "Source: {}", path.display())?;
    for stats in &summary.categories {
        writeln!(
            out,
            "  {:<16} {:>4} entries, {:>4} purchasable",
            stats.category, stats.entries, stats.purchasable
        )?;
    }
    writeln!(out, "  {:<16} {:>4}", "qualities", summary.qualities)?;
    Ok(())
}
