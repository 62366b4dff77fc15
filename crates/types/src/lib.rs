#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for mailcheck
//!
//! This crate provides the data model shared by every other crate:
//! verdicts and their closed set of categories, the per-run summary,
//! the persisted batch run record, and export filters.

pub mod filter;
pub mod run;
pub mod summary;
pub mod verdict;

// Re-export commonly used types
pub use filter::ExportFilter;
pub use run::{default_source_name, BatchRun, BatchRunRecord, RunId};
pub use summary::{aggregate, Summary};
pub use uuid::Uuid;
pub use verdict::{ParseVerdictStatusError, Verdict, VerdictStatus, UNREACHABLE_REASON};

use serde::{Deserialize, Serialize};

/// A raw candidate email string, passed to the oracle unmodified.
pub type Address = String;

/// Default number of simultaneous oracle calls per group
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Output format for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Plain,
    #[default]
    Tty,
    Json,
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    #[default]
    Auto,
    Never,
}

impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}
