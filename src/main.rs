//! Firmware catalog CLI
//!
//! Entry point for the `fw-catalog` command-line tool.

use clap::{Parser, Subcommand};
use fw_catalog::catalog::write_outputs;
use fw_catalog::logging::init_tracing;
use fw_catalog::{parse_filename, CatalogConfig, Cataloger, CliOverrides};
use std::path::PathBuf;
use std::process;
use tracing::{error, Level};

#[derive(Parser)]
#[command(name = "fw-catalog")]
#[command(about = "Firmware release catalog generator", version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan checksum manifests and write the catalog
    Generate {
        /// Release root to scan
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Path to config file (default: <root>/fw-catalog.toml)
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Checksum manifest file name
        #[arg(long)]
        manifest_name: Option<String>,

        /// Skip git last-commit lookups
        #[arg(long)]
        no_git: bool,

        /// Output path, repeatable (replaces the configured outputs)
        #[arg(long, short = 'o')]
        output: Vec<PathBuf>,

        /// Exclude glob relative to the root, repeatable
        #[arg(long)]
        exclude: Vec<String>,

        /// Print the catalog to stdout instead of writing outputs
        #[arg(long)]
        stdout: bool,
    },

    /// Show the metadata extracted from firmware filenames
    Parse {
        /// Output in human-readable format instead of JSON
        #[arg(long)]
        human: bool,

        /// Filenames to parse
        #[arg(required = true)]
        filenames: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.log_json, level);

    match cli.command {
        Commands::Generate {
            root,
            config,
            manifest_name,
            no_git,
            output,
            exclude,
            stdout,
        } => {
            let overrides = CliOverrides {
                manifest_name,
                no_git,
                outputs: output,
                exclude,
            };
            run_generate(root, config, overrides, stdout);
        }
        Commands::Parse { human, filenames } => {
            run_parse(human, &filenames);
        }
    }
}

fn run_generate(root: PathBuf, config_path: Option<PathBuf>, overrides: CliOverrides, stdout: bool) {
    let config = match CatalogConfig::resolve(&root, config_path.as_deref(), &overrides) {
        Ok(c) => c,
        Err(e) => {
            error!("Error loading config: {}", e);
            process::exit(1);
        }
    };

    let outputs = config.outputs.clone();
    let mut cataloger = Cataloger::new(root.clone(), config);
    let document = match cataloger.build() {
        Ok(d) => d,
        Err(e) => {
            error!("Error building catalog: {}", e);
            process::exit(1);
        }
    };

    if stdout {
        match document.to_json() {
            Ok(json) => print!("{}", json),
            Err(e) => {
                error!("Error serializing catalog: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = write_outputs(&document, &root, &outputs) {
        error!("Error writing catalog: {}", e);
        process::exit(1);
    }
}

fn run_parse(human: bool, filenames: &[String]) {
    for filename in filenames {
        let parsed = parse_filename(filename);
        if human {
            println!("{}", parsed.to_human());
            continue;
        }
        match serde_json::to_string_pretty(&parsed) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Error serializing result: {}", e);
                process::exit(1);
            }
        }
    }
}
