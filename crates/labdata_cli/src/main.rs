//! Command-line front end for the lab data engine.
//!
//! # Responsibility
//! - Load `lab.yaml`, assemble the cross-referenced snapshot and export it.
//! - Offer `--validate` and `--unresolved` diagnostics without writing output.
//!
//! # Invariants
//! - Exit status is non-zero on any configuration failure.
//! - `--validate` exits non-zero when unknown project tags were found.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use labdata_core::{
    assemble_from_config, default_log_level, init_logging, unresolved_authors, AssembledData,
    LabConfig, ValidationReport,
};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

/// Resolve authors and project tags, then export the lab dataset
#[derive(Parser, Debug)]
#[clap(name = "labdata")]
struct Args {
    /// Path to lab.yaml
    #[clap(long, value_name = "FILE")]
    config: PathBuf,

    /// Snapshot serialization format
    #[clap(long, value_enum, default_value = "yaml")]
    format: OutputFormat,

    /// Write the assembled snapshot to this file
    #[clap(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print counts, unresolved authors and unknown projects
    #[clap(long)]
    validate: bool,

    /// List author names that matched no roster person
    #[clap(long)]
    unresolved: bool,

    /// trace, debug, info, warn or error
    #[clap(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Write rolling log files here instead of stderr
    #[clap(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    if args.output.is_none() && !args.validate && !args.unresolved {
        bail!("nothing to do: pass --output, --validate or --unresolved");
    }

    let level: &str = args.log_level.as_deref().unwrap_or_else(|| default_log_level());
    let log_dir = args.log_dir.as_deref().map(absolute_path).transpose()?;
    init_logging(level, log_dir.as_deref())
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let config = LabConfig::from_yaml_file(&args.config)
        .with_context(|| format!("failed to load config `{}`", args.config.display()))?;
    let result = assemble_from_config(&config).context("assembly aborted")?;

    if args.unresolved {
        let names = unresolved_authors(&result.data);
        if names.is_empty() {
            println!("All authors resolved.");
        } else {
            println!("Unresolved authors ({}):", names.len());
            for name in names {
                println!("  {name}");
            }
        }
    }

    if let Some(path) = &args.output {
        write_snapshot(&result.data, path, args.format)?;
        println!(
            "Wrote {} publications, {} people, {} projects, {} collaborators to {}",
            result.data.publications().len(),
            result.data.people().len(),
            result.data.projects().len(),
            result.data.collaborators().len(),
            path.display()
        );
    }

    if args.validate {
        let report = ValidationReport::new(&result);
        println!("{report}");
        if !report.passed() {
            return Ok(ExitCode::FAILURE);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn absolute_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to read working directory")?;
    Ok(cwd.join(path))
}

fn write_snapshot(data: &AssembledData, path: &Path, format: OutputFormat) -> Result<()> {
    let text = match format {
        OutputFormat::Yaml => serde_yaml::to_string(data).context("failed to encode YAML")?,
        OutputFormat::Json => {
            serde_json::to_string_pretty(data).context("failed to encode JSON")?
        }
    };
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("failed to write `{}`", path.display()))?;
    info!(
        "event=write_snapshot module=cli status=ok path={} format={:?}",
        path.display(),
        format
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Args, OutputFormat};
    use clap::Parser;

    #[test]
    fn parses_export_flags() {
        let args = Args::try_parse_from([
            "labdata", "--config", "lab.yaml", "--format", "json", "--output", "out/data.json",
        ])
        .expect("valid flags");
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.output.is_some());
        assert!(!args.validate);
    }

    #[test]
    fn config_flag_is_required() {
        assert!(Args::try_parse_from(["labdata", "--validate"]).is_err());
    }
}
