//! cstm - match the structural trees of two source snapshots
//!
//! Reads two JSON snapshots produced by a parser, pairs their nodes and
//! reports matched, removed and added nodes.

mod logging;
mod report;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use cst_match::{
    Compatibility, CstRoot, IdfWeighting, Matcher, MatcherConfig, NodeId,
    DEFAULT_MINIMUM_SIMILARITY,
};
use tracing::{error, info};

/// Structural matching of source-tree snapshots
#[derive(Parser)]
#[command(name = "cstm")]
#[command(version)]
#[command(about = "Match the structural trees of two source snapshots", long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a before-snapshot against an after-snapshot
    #[command(visible_alias = "m")]
    Match(MatchArgs),

    /// Load and validate a snapshot
    #[command(visible_alias = "c")]
    Check {
        /// Snapshot file
        snapshot: PathBuf,
    },
}

#[derive(Args)]
struct MatchArgs {
    /// Snapshot before the change
    before: PathBuf,
    /// Snapshot after the change
    after: PathBuf,

    /// Minimum similarity a candidate must exceed
    #[arg(short, long, default_value_t = DEFAULT_MINIMUM_SIMILARITY)]
    threshold: f64,

    /// IDF weighting formula
    #[arg(long, value_enum, default_value_t = IdfArg::Smooth)]
    idf: IdfArg,

    /// Which node types may be paired
    #[arg(long, value_enum, default_value_t = CompatArg::SameType)]
    compat: CompatArg,

    /// Force a pairing, as BEFORE:AFTER node ids (repeatable)
    #[arg(short, long = "pin", value_parser = parse_pin)]
    pins: Vec<(NodeId, NodeId)>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl MatchArgs {
    fn config(&self) -> cst_match::Result<MatcherConfig> {
        Ok(MatcherConfig::new(self.threshold)?
            .with_idf(self.idf.into())
            .with_compatibility(self.compat.into()))
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum IdfArg {
    Smooth,
    Logarithmic,
}

impl From<IdfArg> for IdfWeighting {
    fn from(arg: IdfArg) -> Self {
        match arg {
            IdfArg::Smooth => IdfWeighting::Smooth,
            IdfArg::Logarithmic => IdfWeighting::Logarithmic,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CompatArg {
    SameType,
    SameKind,
    Any,
}

impl From<CompatArg> for Compatibility {
    fn from(arg: CompatArg) -> Self {
        match arg {
            CompatArg::SameType => Compatibility::SameType,
            CompatArg::SameKind => Compatibility::SameKind,
            CompatArg::Any => Compatibility::Any,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Match(args) => run_match(&args),
        Commands::Check { snapshot } => run_check(&snapshot),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Loads both snapshots, matches them and writes the report.
fn run_match(args: &MatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.config()?;

    info!("Loading before: {}", args.before.display());
    let before = CstRoot::from_json_file(&args.before)?;

    info!("Loading after: {}", args.after.display());
    let after = CstRoot::from_json_file(&args.after)?;

    info!(
        "Matching {} against {} nodes (threshold {})",
        before.node_count(),
        after.node_count(),
        config.minimum_similarity
    );
    let matcher = Matcher::new(config)?;
    let set = matcher.match_trees_pinned(&before, &after, &args.pins)?;

    let mut output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };

    match args.format {
        Format::Text => report::write_text(&mut output, &set, &before, &after)?,
        Format::Json => report::write_json(&mut output, &set)?,
    }
    output.flush()?;

    info!(
        "Matching complete: {} matched, {} removed, {} added.",
        set.len(),
        set.removed.len(),
        set.added.len()
    );
    Ok(())
}

/// Validates a snapshot and prints a one-line summary.
fn run_check(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let root = CstRoot::from_json_file(path)?;
    println!(
        "{}: {} nodes, {} files, {} relationships",
        path.display(),
        root.node_count(),
        root.tokenized_sources().len(),
        root.relationships().len()
    );
    Ok(())
}

/// Parses `BEFORE:AFTER` into a pair of node ids.
fn parse_pin(value: &str) -> Result<(NodeId, NodeId), String> {
    let (before, after) = value
        .split_once(':')
        .ok_or_else(|| format!("expected BEFORE:AFTER, got '{}'", value))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<u32>()
            .map(NodeId)
            .map_err(|e| format!("invalid node id '{}': {}", s, e))
    };
    Ok((parse(before)?, parse(after)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pin() {
        assert_eq!(parse_pin("3:14"), Ok((NodeId(3), NodeId(14))));
        assert!(parse_pin("3").is_err());
        assert!(parse_pin("a:1").is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["cstm", "match", "a.json", "b.json"]);
        match cli.command {
            Commands::Match(args) => {
                assert_eq!(args.threshold, DEFAULT_MINIMUM_SIMILARITY);
                assert!(args.pins.is_empty());
                assert!(matches!(args.format, Format::Text));
                assert_eq!(args.config().unwrap(), MatcherConfig::default());
            }
            Commands::Check { .. } => panic!("expected match"),
        }
    }

    #[test]
    fn test_cli_pins_and_flags() {
        let cli = Cli::parse_from([
            "cstm", "-v", "m", "a.json", "b.json", "--pin", "1:2", "--pin", "3:4", "--idf",
            "logarithmic", "--compat", "same-kind", "-f", "json",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Match(args) => {
                assert_eq!(args.pins, vec![(NodeId(1), NodeId(2)), (NodeId(3), NodeId(4))]);
                let config = args.config().unwrap();
                assert_eq!(config.idf, IdfWeighting::Logarithmic);
                assert_eq!(config.compatibility, Compatibility::SameKind);
            }
            Commands::Check { .. } => panic!("expected match"),
        }
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        let cli = Cli::parse_from(["cstm", "match", "a.json", "b.json", "-t", "1.5"]);
        match cli.command {
            Commands::Match(args) => assert!(args.config().is_err()),
            Commands::Check { .. } => panic!("expected match"),
        }
    }

    #[test]
    fn test_cli_verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
