//! Ontocsv CLI
//!
//! Converts a BioPortal ontology CSV export into property graph import files:
//! - node and relationship data tables
//! - node and relationship metadata tables (property, type, description, example)
//!
//! Output directories come from flags or the `NODE_DATA`, `RELATIONSHIP_DATA`,
//! `NODE_METADATA` and `RELATIONSHIP_METADATA` environment variables. Only
//! directories left at their defaults are created.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use colored::Colorize;
use ontocsv_ingest::config::DEFAULT_RESERVED_ROWS;
use ontocsv_ingest::example::DEFAULT_EXAMPLE_RANK;
use ontocsv_ingest::{ConversionReport, ConvertOptions, DirOverrides, MappingConfig, OutputDirs};
use std::fs;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "ontocsv")]
#[command(
    author,
    version,
    about = "Ontocsv: ontology CSV export -> property graph node/relationship files"
)]
struct Cli {
    /// Ontology mapping file (`key,value` CSV)
    #[arg(short, long)]
    mapping: PathBuf,

    /// Node data directory [default: ../data/nodes/]
    #[arg(long, env = "NODE_DATA")]
    node_data: Option<PathBuf>,

    /// Relationship data directory [default: ../data/relationships/]
    #[arg(long, env = "RELATIONSHIP_DATA")]
    relationship_data: Option<PathBuf>,

    /// Node metadata directory [default: ../metadata/nodes/]
    #[arg(long, env = "NODE_METADATA")]
    node_metadata: Option<PathBuf>,

    /// Relationship metadata directory [default: ../metadata/relationships/]
    #[arg(long, env = "RELATIONSHIP_METADATA")]
    relationship_metadata: Option<PathBuf>,

    /// Score rank of the node used as metadata example (clamped to the last node)
    #[arg(long, default_value_t = DEFAULT_EXAMPLE_RANK)]
    example_rank: usize,

    /// Number of reserved leading rows in the mapping file
    #[arg(long, default_value_t = DEFAULT_RESERVED_ROWS)]
    reserved_rows: usize,

    /// Write a JSON run summary here
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Convert and report, but write no output files
    #[arg(long)]
    dry_run: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    fn output_dirs(&self) -> OutputDirs {
        OutputDirs::resolve(DirOverrides {
            node_data: self.node_data.clone(),
            relationship_data: self.relationship_data.clone(),
            node_metadata: self.node_metadata.clone(),
            relationship_metadata: self.relationship_metadata.clone(),
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if !cli.quiet {
        println!(
            "{} mapping file {}",
            "Processing".green().bold(),
            cli.mapping.display()
        );
    }

    let config = MappingConfig::from_path(&cli.mapping, cli.reserved_rows)?;
    let options = ConvertOptions {
        output_dirs: cli.output_dirs(),
        example_rank: cli.example_rank,
        dry_run: cli.dry_run,
    };
    let report = ontocsv_ingest::run(&config, &options)?;

    if !cli.quiet {
        print_report(&report);
    }

    if let Some(path) = &cli.summary {
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(path, json)
            .with_context(|| format!("write error: cannot write summary {}", path.display()))?;
        if !cli.quiet {
            println!("  {} {}", "→".cyan(), path.display());
        }
    }

    Ok(())
}

fn print_report(report: &ConversionReport) {
    println!(
        "  {} {} nodes, {} relationships ({})",
        "→".yellow(),
        report.nodes,
        report.relationships,
        report.curie
    );
    if report.root_injected {
        println!("  {} added synthetic root {}:root", "→".yellow(), report.curie);
    }
    if let Some(id) = &report.representative_id {
        println!("  {} metadata example {}", "→".yellow(), id);
    }
    match &report.outputs {
        Some(outputs) => {
            for path in [
                &outputs.node_data,
                &outputs.relationship_data,
                &outputs.node_metadata,
                &outputs.relationship_metadata,
            ] {
                println!("  {} {}", "→".cyan(), path.display());
            }
        }
        None => println!("  {} dry run, nothing written", "→".cyan()),
    }
}
