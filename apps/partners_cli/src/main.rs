use std::{fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    form::filter_fields,
    table::{partner_columns, TableColumn},
    HttpPartnerSource, LoadState, PageController, PartnerSource, SortState,
    StaticPartnerSource,
};
use serde::Serialize;
use shared::{
    domain::{FilterCriteria, PartnerColumn, PartnerRecord},
    protocol::decode_partner_document,
};
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

#[derive(Parser, Debug)]
#[command(about = "Fetch, filter and sort the partners directory")]
struct Cli {
    /// Partner document URL; overrides partners.toml and environment settings.
    #[arg(long, global = true)]
    data_url: Option<String>,
    /// Read the partner document from a local file instead of fetching it.
    #[arg(long, global = true, conflicts_with = "data_url")]
    from_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print partners matching the given filters.
    List(ListArgs),
    /// Print the filter field descriptors as JSON.
    Fields,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Keep partners whose name contains this text (case-sensitive).
    #[arg(long)]
    name: Option<String>,
    /// Keep partners whose group prefix contains this text (case-sensitive).
    #[arg(long)]
    prefix: Option<String>,
    /// Keep partners with this Ofsted rating; repeatable.
    #[arg(long = "rating")]
    ratings: Vec<String>,
    /// Column to sort by: name, groupPrefix, logo or ofstedRating.
    #[arg(long)]
    sort: Option<PartnerColumn>,
    /// Reverse the sorted order.
    #[arg(long, requires = "sort")]
    descending: bool,
    #[arg(long)]
    json: bool,
}

impl ListArgs {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new();
        if let Some(name) = &self.name {
            criteria = criteria.with_text(PartnerColumn::Name, name.as_str());
        }
        if let Some(prefix) = &self.prefix {
            criteria = criteria.with_text(PartnerColumn::GroupPrefix, prefix.as_str());
        }
        if !self.ratings.is_empty() {
            criteria = criteria.with_selection(
                PartnerColumn::OfstedRating,
                self.ratings.iter().map(|rating| rating.trim().to_lowercase()),
            );
        }
        criteria
    }
}

#[derive(Serialize)]
struct ListOutput<'a> {
    sort: &'a SortState,
    partners: &'a [PartnerRecord],
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Fields => {
            println!("{}", serde_json::to_string_pretty(&filter_fields())?);
        }
        Command::List(args) => {
            let source = build_source(cli.data_url, cli.from_file)?;
            let page = load_page(source.as_ref(), &args).await?;
            if args.json {
                let output = ListOutput {
                    sort: page.sort_state(),
                    partners: page.rows(),
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                print!(
                    "{}",
                    render_table(&partner_columns(), page.rows(), page.sort_state())
                );
            }
        }
    }

    Ok(())
}

fn build_source(
    data_url: Option<String>,
    from_file: Option<PathBuf>,
) -> Result<Box<dyn PartnerSource>> {
    if let Some(path) = from_file {
        let raw = fs::read(&path)
            .with_context(|| format!("failed to read partner document '{}'", path.display()))?;
        let partners = decode_partner_document(&raw)
            .with_context(|| format!("failed to decode partner document '{}'", path.display()))?;
        return Ok(Box::new(StaticPartnerSource::new(partners)));
    }

    let mut settings = client_core::load_settings();
    if let Some(data_url) = data_url {
        settings.data_url = data_url;
    }
    let source = HttpPartnerSource::from_settings(&settings)?;
    tracing::info!(url = %source.url(), "using remote partner document");
    Ok(Box::new(source))
}

/// Runs one fetch through the page controller, then applies the requested header
/// activations: once to sort ascending, twice to reverse.
async fn load_page(source: &dyn PartnerSource, args: &ListArgs) -> Result<PageController> {
    let mut page = PageController::new();
    let criteria = args.criteria();
    let token = if criteria.is_empty() {
        page.begin_initial_load()
    } else {
        page.begin_filter(criteria)
    };
    page.complete_fetch(token, source.fetch_partners().await);

    if let LoadState::Failed(err) = page.load_state() {
        return Err(anyhow!(err.clone()).context("failed to load partners"));
    }

    if let Some(column) = args.sort {
        page.activate_header(column);
        if args.descending {
            page.activate_header(column);
        }
    }
    Ok(page)
}

fn render_table(columns: &[TableColumn], rows: &[PartnerRecord], sort: &SortState) -> String {
    let headers: Vec<String> = columns.iter().map(|column| column.header_text(sort)).collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| column.render(row).as_plain_text().to_string())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..columns.len())
        .map(|idx| {
            cells
                .iter()
                .map(|row| row[idx].width())
                .chain(std::iter::once(headers[idx].width()))
                .max()
                .unwrap_or_default()
        })
        .collect();

    let format_row = |values: &[String]| {
        let padded: Vec<String> = values
            .iter()
            .zip(&widths)
            .map(|(value, width)| {
                let pad = width.saturating_sub(value.width());
                format!("{value}{}", " ".repeat(pad))
            })
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = format_row(&headers);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    out.push_str(&format_row(&rule));
    for row in &cells {
        out.push_str(&format_row(row));
    }
    out
}
