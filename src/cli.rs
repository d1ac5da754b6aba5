//! Command-line interface for codemodel.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::{Config, CONFIG_FILE_NAME};
use crate::manifest::{self, SourceManifest};
use crate::model::SourceGraph;
use crate::report::{self, CheckReport, SourceReport};
use crate::syntax::{format_declaration, format_source};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Inspect code model manifests and find unimplemented interface members.
///
/// A manifest describes the declarations of one compiled unit in YAML or JSON.
/// codemodel builds the model graph, reports load errors and lists every interface
/// member a class or structure fails to implement.
#[derive(Parser)]
#[command(name = "codemodel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check manifests for unimplemented interface members
    Check(CheckArgs),
    /// Print the declarations of a manifest
    Show(ShowArgs),
}

/// Arguments for the check command.
#[derive(Parser)]
pub struct CheckArgs {
    /// Manifest files or directories to check
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Path to config YAML file (default: auto-discover codemodel.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the show command.
#[derive(Parser)]
pub struct ShowArgs {
    /// Manifest file to render
    pub path: PathBuf,

    /// Render only the model at this lookup path
    #[arg(short, long)]
    pub model: Option<String>,

    /// Path to config YAML file (default: auto-discover codemodel.yaml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Omit accessibility keywords
    #[arg(long)]
    pub no_security: bool,

    /// Omit attributes
    #[arg(long)]
    pub no_attributes: bool,

    /// Omit modifiers such as static or abstract
    #[arg(long)]
    pub no_keywords: bool,
}

/// Collect manifest files from files and directories.
///
/// Files named explicitly are always kept. Directory walks skip hidden directories, the
/// config file and anything matching `excluded_paths`.
pub fn collect_manifests(paths: &[PathBuf], config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in paths {
        let metadata = std::fs::metadata(root)
            .map_err(|e| anyhow::anyhow!("cannot access path {:?}: {}", root, e))?;
        if !metadata.is_dir() {
            files.push(root.clone());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                // Skip hidden directories
                !(e.depth() > 0 && e.file_type().is_dir() && name.starts_with('.'))
            })
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if !SourceManifest::is_manifest_path(path)
                || path.file_name().is_some_and(|n| n == CONFIG_FILE_NAME)
                || config.is_path_excluded(path)
            {
                continue;
            }
            found.push(path.to_path_buf());
        }
        found.sort();
        files.extend(found);
    }

    Ok(files)
}

/// Load and build every manifest, in parallel, keeping input order.
fn load_graphs(files: &[PathBuf]) -> anyhow::Result<Vec<(PathBuf, SourceGraph)>> {
    files
        .par_iter()
        .map(|path| {
            let graph = manifest::load_graph(path)
                .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
            Ok((path.clone(), graph))
        })
        .collect()
}

/// Build the report for a check run without printing it.
pub fn check_report(args: &CheckArgs) -> anyhow::Result<CheckReport> {
    let cwd = std::env::current_dir()?;
    let config = Config::discover(args.config.as_deref(), &cwd)?;
    let files = collect_manifests(&args.paths, &config)?;
    tracing::debug!(count = files.len(), "collected manifests");

    let sources = load_graphs(&files)?
        .iter()
        .map(|(path, graph)| SourceReport::from_graph(path, graph))
        .collect();
    Ok(CheckReport::new(sources, &config.check))
}

/// Run the check command.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "pretty" && args.format != "json" {
        eprintln!("Error: invalid format {:?}, must be 'pretty' or 'json'", args.format);
        return Ok(EXIT_ERROR);
    }

    let report = check_report(args)?;
    if report.sources_checked == 0 {
        eprintln!("Warning: no manifests to check");
        return Ok(EXIT_SUCCESS);
    }

    match args.format.as_str() {
        "json" => report::write_json(&report)?,
        _ => report::write_pretty(&report),
    }

    if report.passed {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILED)
    }
}

/// Render what the show command prints, and whether the graph has load errors.
pub fn show_output(args: &ShowArgs) -> anyhow::Result<(String, bool)> {
    let cwd = std::env::current_dir()?;
    let config = Config::discover(args.config.as_deref(), &cwd)?;
    let mut options = config.format;
    options.include_security &= !args.no_security;
    options.include_attributes &= !args.no_attributes;
    options.include_keywords &= !args.no_keywords;

    let graph = manifest::load_graph(&args.path)?;
    for error in graph.load_errors() {
        tracing::warn!(path = %error.path, kind = %error.kind, "{}", error.message);
    }

    let text = match &args.model {
        Some(path) => match graph.get(path) {
            Some(model) => format_declaration(model, &options),
            None => anyhow::bail!("no model at lookup path '{}' in {}", path, display(&args.path)),
        },
        None => format_source(&graph, &options),
    };
    Ok((text, graph.has_errors()))
}

/// Run the show command.
pub fn run_show(args: &ShowArgs) -> anyhow::Result<i32> {
    let (text, has_errors) = show_output(args)?;
    println!("{}", text);
    if has_errors {
        eprintln!("Warning: {} has load errors (run with -v for details)", display(&args.path));
    }
    Ok(EXIT_SUCCESS)
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
