//! Partforge command line entry point
//!
//! - `pf list` - show the catalog
//! - `pf generate [NAMES..]` - build generators and write their STL files
//! - `pf dump-config [PATH]` - write the default configuration

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Parametric 3D-printable part generator
#[derive(Debug, Parser)]
#[command(name = "pf")]
#[command(about = "Generate printable parts as STL", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List generators and what they make
    List,

    /// Build generators and export their parts
    Generate(GenerateArgs),

    /// Write the default configuration as RON (stdout if no path)
    DumpConfig {
        #[arg(name = "PATH")]
        path: Option<PathBuf>,
    },
}

#[derive(Debug, clap::Args)]
struct GenerateArgs {
    /// Generators to run (default: those enabled in the configuration)
    #[arg(name = "NAMES")]
    names: Vec<String>,

    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(long)]
    out: Option<PathBuf>,

    /// Straight edges per full circle
    #[arg(long)]
    segments: Option<u32>,

    /// Write ASCII instead of binary STL
    #[arg(long)]
    ascii: bool,
}

fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pf_cli=info,pf_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => commands::list(),
        Commands::Generate(args) => commands::generate(args),
        Commands::DumpConfig { path } => commands::dump_config(path.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "pf",
            "generate",
            "pcb_sled",
            "broom_clip",
            "--out",
            "stl",
            "--segments",
            "32",
            "--ascii",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.names, vec!["pcb_sled", "broom_clip"]);
        assert_eq!(args.out, Some(PathBuf::from("stl")));
        assert_eq!(args.segments, Some(32));
        assert!(args.ascii);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_generate_without_names() {
        let cli = Cli::try_parse_from(["pf", "generate"]).unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert!(args.names.is_empty());
        assert!(!args.ascii);
    }

    #[test]
    fn test_dump_config_path_is_optional() {
        let cli = Cli::try_parse_from(["pf", "dump-config"]).unwrap();
        assert!(matches!(cli.command, Commands::DumpConfig { path: None }));
    }

    #[test]
    fn test_rejects_bad_segments() {
        assert!(Cli::try_parse_from(["pf", "generate", "--segments", "many"]).is_err());
    }
}
