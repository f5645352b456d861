//! # Netsort - network traffic grouping, sorting, and reporting
//!
//! This library ingests tabular network-packet metadata (CSV exports of
//! capture summaries) and produces a grouped, aggregated, ordered summary
//! report, such as "top talkers by bytes".
//!
//! ## Overview
//!
//! Input lines are parsed into canonical packet records, folded into
//! per-group aggregates under a configurable grouping key, ordered by a
//! deterministic multi-criteria policy, and rendered one row per group.
//! A six-field configuration value with layered defaults parameterizes
//! every stage and is passed explicitly through the pipeline; nothing is
//! read from shared state.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - `config`: mode configuration with per-field defaults and single-field
//!   updates
//! - `packet`: canonical packet records and the two CSV column layouts
//! - `ingest`: the accumulating packet set and strict file ingestion
//! - `group`: group-key derivation (address, pair, socket 4-tuple, protocol)
//! - `aggregate`: per-group count/bytes/first-seen accumulation
//! - `order`: the ordering policy (ascending, reversed, and sequence orders)
//! - `report`: row rendering and JSON export
//! - `cli`: the token-based command-line grammar
//! - `error`: the error taxonomy shared by all stages
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use netsort::{Configuration, PacketSet};
//!
//! let config = Configuration::default();
//!
//! let mut packets = PacketSet::new();
//! packets.append_file(Path::new("capture.csv"), config.input_format)?;
//!
//! for line in netsort::render(&packets.summarize(&config)?, &config) {
//!     println!("{line}");
//! }
//! # Ok::<(), netsort::NetsortError>(())
//! ```

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod group;
pub mod ingest;
pub mod order;
pub mod packet;
pub mod report;

pub use aggregate::{aggregate, AggregateRecord};
pub use config::{
    Configuration, GroupBy, InputFormat, ModeSpec, OrderDirection, OutputData, OutputFormat,
    SortMetric,
};
pub use error::{NetsortError, Result};
pub use group::{derive_key, GroupKey};
pub use ingest::PacketSet;
pub use order::{compare_by_metric, sort_aggregates, validate_order};
pub use packet::{CsvSchema, PacketRecord};
pub use report::{render, render_json, write_report};
