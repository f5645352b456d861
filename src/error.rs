//! Error types shared across the netsort engine.

use std::io;

use crate::config::{GroupBy, OrderDirection};

/// Errors produced by configuration resolution, ingestion, aggregation,
/// ordering, and reporting.
#[derive(Debug, thiserror::Error)]
pub enum NetsortError {
    /// A configuration field was given a value outside its known set.
    #[error("invalid configuration: unknown {field} value '{value}'")]
    InvalidConfiguration { field: &'static str, value: String },

    /// A subcommand was used with a missing or unknown argument.
    #[error("improper '{subcommand}' usage: {reason}, see 'help'")]
    Usage { subcommand: String, reason: String },

    /// An input file could not be opened or read.
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A line of input did not match any supported schema.
    #[error("{file}:{line}: {reason}")]
    Parse {
        file: String,
        line: usize,
        reason: String,
    },

    /// The active group mode cannot be applied to the ingested records.
    #[error("unsupported group mode: {detail}")]
    UnsupportedGroupMode { detail: String },

    /// The requested ordering is not valid for the active group mode.
    #[error("order '{order}' requires 'group conversation', not 'group {group_by}'")]
    UnsupportedOrderMode {
        order: OrderDirection,
        group_by: GroupBy,
    },
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, NetsortError>;
