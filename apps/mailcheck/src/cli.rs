//! Command line interface definition

use clap::{Parser, Subcommand};
use mailcheck_types::{ColorChoice, ExportFilter};
use std::path::PathBuf;

/// mailcheck - Bulk email verification
#[derive(Parser)]
#[command(name = "mailcheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Verify email addresses in bulk, keep a run history and export results")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to the mailcheck log directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verification service base URL
    #[arg(long, global = true, value_name = "URL")]
    pub oracle_url: Option<String>,

    /// Maximum simultaneous verification calls
    #[arg(long, global = true, value_name = "N")]
    pub batch_size: Option<usize>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Verify a single address
    #[command(alias = "v")]
    Verify {
        /// Address to verify
        email: String,
    },

    /// Verify a list of addresses and record the run in history
    #[command(alias = "b")]
    Bulk {
        /// Addresses, separated by spaces, commas or semicolons (reads stdin when empty)
        addresses: Vec<String>,

        /// Read addresses from a .csv or .txt file (first column)
        #[arg(long, short, value_name = "PATH", conflicts_with = "addresses")]
        file: Option<PathBuf>,

        /// Name recorded for the run (defaults to the file name or Bulk_<date>.csv)
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// Also write the results to a CSV file
        #[arg(long, value_name = "PATH")]
        export: Option<PathBuf>,

        /// Category to include in the export (all, good, risky, bad, error)
        #[arg(long, default_value = "all", requires = "export")]
        filter: ExportFilter,
    },

    /// List stored runs, newest first
    #[command(alias = "h")]
    History,

    /// Write a stored run to a CSV file
    #[command(alias = "e")]
    Export {
        /// Run id as shown by `mailcheck history`
        id: String,

        /// Category to include (all, good, risky, bad, error)
        #[arg(long, default_value = "all")]
        filter: ExportFilter,

        /// Output file (defaults to <name>_results_<date>.csv)
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use mailcheck_types::VerdictStatus;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn export_filter_parses_case_insensitively() {
        let cli = Cli::try_parse_from(["mailcheck", "export", "some-id", "--filter", "GOOD"]).unwrap();
        match cli.command {
            Commands::Export { filter, .. } => {
                assert_eq!(filter, ExportFilter::Only(VerdictStatus::Good));
            }
            _ => panic!("expected export command"),
        }
    }

    #[test]
    fn bulk_rejects_file_and_addresses_together() {
        let result =
            Cli::try_parse_from(["mailcheck", "bulk", "a@x.com", "--file", "list.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_overrides_follow_subcommand() {
        let cli =
            Cli::try_parse_from(["mailcheck", "history", "--batch-size", "5", "--json"]).unwrap();
        assert_eq!(cli.global.batch_size, Some(5));
        assert!(cli.global.json);
    }
}
