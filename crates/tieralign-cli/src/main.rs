//! tieralign command-line interface
//!
//! Checks, aligns and exports bilingual ELAN annotation documents.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tieralign_core::core::settings::AlignSettings;

/// Bilingual ELAN tier alignment
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (JSON); defaults apply when it does not exist
    #[arg(short, long, global = true, default_value = "tieralign.json")]
    config: PathBuf,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report empty fields and interval count mismatches
    Check {
        /// `.eaf` files or directories containing them
        #[arg(required = true)]
        locations: Vec<PathBuf>,

        /// Exit with failure when any finding is reported
        #[arg(long)]
        strict: bool,
    },

    /// Print aligned records as JSON, one object per document
    Align {
        /// `.eaf` files or directories containing them
        #[arg(required = true)]
        locations: Vec<PathBuf>,

        /// Include the alignment audit
        #[arg(long)]
        audit: bool,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Write corpus (VRT) files per language
    Vrt {
        /// `.eaf` files or directories containing them
        #[arg(required = true)]
        locations: Vec<PathBuf>,

        /// Output directory (overrides the settings)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Cut subtitled video fragments
    Video {
        /// An `.eaf` file or a directory of them
        documents: PathBuf,

        /// The matching video file, or a directory of videos
        videos: PathBuf,
    },

    /// Reorder and retype tiers from a two-column CSV table
    Reshape {
        /// The `.eaf` file to rewrite (a backup is kept)
        document: PathBuf,

        /// Headerless CSV: source tier id, target tier id
        metadata: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::prelude::*;

    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);

    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = AlignSettings::load(&cli.config)?;

    let success = match cli.command {
        Commands::Check { locations, strict } => commands::check(&settings, &locations, strict)?,
        Commands::Align {
            locations,
            audit,
            pretty,
        } => commands::align(&settings, &locations, audit, pretty)?,
        Commands::Vrt { locations, out } => commands::vrt(&settings, &locations, out)?,
        Commands::Video { documents, videos } => {
            commands::video(&settings, &documents, &videos).await?
        }
        Commands::Reshape { document, metadata } => {
            commands::reshape(&settings, &document, &metadata)?
        }
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check() {
        let cli = Cli::try_parse_from(["tieralign", "-vv", "check", "a.eaf", "dir", "--strict"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, PathBuf::from("tieralign.json"));
        match cli.command {
            Commands::Check { locations, strict } => {
                assert_eq!(locations.len(), 2);
                assert!(strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_locations_required() {
        assert!(Cli::try_parse_from(["tieralign", "vrt"]).is_err());
    }

    #[test]
    fn test_global_config() {
        let cli = Cli::try_parse_from([
            "tieralign",
            "reshape",
            "a.eaf",
            "tiers.csv",
            "--config",
            "custom.json",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("custom.json"));
    }
}
