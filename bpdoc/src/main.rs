//! bpdoc — generate visual-script API documentation from facts manifests.
//!
//! `bpdoc -o docs -f xml,json manifests/*.json` loads every manifest, builds one
//! document per documented class, struct, enum, node and variable, and writes
//! each of them through every requested format.

mod config;
mod manifest;
mod report;

use anyhow::{Context, Result};
use bpdoc_core::{CopyImageProvider, Generator, ImageProvider, NoImages};
use clap::Parser;
use config::{Config, Overrides};
use manifest::Manifest;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "bpdoc",
    version,
    about = "Generate visual-script API documentation from facts manifests"
)]
struct Cli {
    /// Facts manifests: files, directories (scanned for *.json) or glob patterns.
    #[arg(required = true)]
    manifests: Vec<String>,

    /// Output directory
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Documentation title
    #[arg(short = 't', long)]
    title: Option<String>,

    /// Output format: xml, json, html. Repeat or comma-separate for several.
    #[arg(short = 'f', long = "format")]
    formats: Vec<String>,

    /// Config file (default: ./bpdoc.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Nodes come from script assets: skip event nodes
    #[arg(long)]
    blueprint_context: bool,

    /// Do not copy node images
    #[arg(long)]
    no_images: bool,

    /// Print warnings as TeamCity service messages
    #[arg(long)]
    teamcity: bool,

    /// Exit with failure when any warning was recorded
    #[arg(long)]
    fail_on_warnings: bool,

    /// Debug logging
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors and the warning count
    #[arg(short = 'q', long)]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            title: self.title.clone(),
            output: self.output.clone(),
            formats: self.formats.clone(),
            blueprint_context: self.blueprint_context,
            no_images: self.no_images,
            teamcity: self.teamcity,
            fail_on_warnings: self.fail_on_warnings,
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "off"
    } else {
        "error"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply(cli.overrides());
    config.validate()?;

    let paths = expand_globs(&cli.manifests)?;
    if paths.is_empty() {
        anyhow::bail!("no manifests found");
    }
    let mut manifests = Vec::with_capacity(paths.len());
    for path in paths {
        let manifest = Manifest::read(&path)?;
        manifests.push((path, manifest));
    }
    let loaded = manifest::load(manifests);

    let mut generator = Generator::new(config.generator_options())?;
    let copy_images = CopyImageProvider::new(PathBuf::new());
    let images: &dyn ImageProvider = if config.images { &copy_images } else { &NoImages };

    generator
        .document_all(&loaded.registry, images)
        .context("failed to generate documentation")?;
    let saved = generator.finalize();

    let warnings = generator.take_diagnostics();
    let warning_count = warnings.len() + loaded.warnings.len();
    if cli.quiet {
        if warning_count > 0 {
            eprintln!("{} warning(s)", warning_count);
        }
    } else {
        report::write_warnings(&mut io::stderr().lock(), &warnings, &loaded.warnings, config.teamcity)
            .context("failed to write warnings")?;
    }

    let saved = saved.with_context(|| format!("failed to save documentation to {}", config.output.display()))?;
    if !cli.quiet {
        println!(
            "wrote {} documents ({} files) to {}",
            saved.documents,
            saved.files.len(),
            config.output.display()
        );
    }

    if config.fail_on_warnings && warning_count > 0 {
        eprintln!("error: {} warning(s) recorded", warning_count);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Manifest extensions picked up from directories.
const MANIFEST_EXTENSIONS: &[&str] = &["json"];

/// Expand glob patterns into a list of real file paths.
/// Directories are scanned (non-recursively) for manifests.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path).with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                let is_manifest = p
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext));
                if p.is_file() && is_manifest {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}
