//! Canonical packet records and the CSV layouts they are parsed from.
//!
//! Two column layouts are understood, matching the common capture-tool
//! exports of packet summary metadata:
//!
//! - basic, 6 columns: `id, relTime, srcAddr, destAddr, protocol, bytes`
//! - extended, 9 columns: `id, relTime, srcAddr, destAddr, srcPort,
//!   destPort, protocol, bytes, info`
//!
//! Fields may be wrapped in double quotes, which are stripped. The layout is
//! detected per line by column count; any other count is a parse failure.

use serde::{Deserialize, Serialize};

/// Column layouts understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CsvSchema {
    /// 6-column layout without ports or info.
    Basic,
    /// 9-column layout with ports and a free-text info column.
    Extended,
}

impl CsvSchema {
    /// Number of columns in this layout.
    pub const fn column_count(self) -> usize {
        match self {
            CsvSchema::Basic => 6,
            CsvSchema::Extended => 9,
        }
    }

    /// Detect the layout from a column count, if any matches.
    pub fn detect(column_count: usize) -> Option<CsvSchema> {
        match column_count {
            6 => Some(CsvSchema::Basic),
            9 => Some(CsvSchema::Extended),
            _ => None,
        }
    }
}

/// Why a line failed to parse. Wrapped with file name and line number by
/// ingestion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseIssue {
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("expected 6 or 9 columns, found {found}")]
    UnknownLayout { found: usize },

    #[error("column '{column}' is not numeric: '{value}'")]
    BadNumber { column: &'static str, value: String },
}

/// One ingested unit of packet metadata. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketRecord {
    /// Frame identifier from the capture export.
    pub id: String,
    /// Arrival time in seconds, relative to the start of the capture.
    pub rel_time: f64,
    /// Source address, highest layer address available.
    pub src_addr: String,
    /// Destination address, highest layer address available.
    pub dest_addr: String,
    /// Transport-layer source port; absent in the basic layout.
    pub src_port: Option<String>,
    /// Transport-layer destination port; absent in the basic layout.
    pub dest_port: Option<String>,
    /// Highest identified protocol in the stack.
    pub protocol: String,
    /// Packet length in bytes.
    pub bytes: u64,
    /// Summary information; absent in the basic layout.
    pub info: Option<String>,
}

impl PacketRecord {
    /// Parse one delimited line against a declared layout.
    pub fn parse_line(line: &str, schema: CsvSchema) -> Result<PacketRecord, ParseIssue> {
        let fields: Vec<&str> = line.split(',').map(|field| field.trim_matches('"')).collect();
        if fields.len() != schema.column_count() {
            return Err(ParseIssue::ColumnCount {
                expected: schema.column_count(),
                found: fields.len(),
            });
        }

        let rel_time: f64 = fields[1].parse().map_err(|_| ParseIssue::BadNumber {
            column: "relTime",
            value: fields[1].to_string(),
        })?;

        // Protocol and byte columns sit at different indexes per layout.
        let (src_port, dest_port, protocol_col, bytes_col, info) = match schema {
            CsvSchema::Basic => (None, None, 4, 5, None),
            CsvSchema::Extended => (
                Some(fields[4].to_string()),
                Some(fields[5].to_string()),
                6,
                7,
                Some(fields[8].to_string()),
            ),
        };

        let bytes: u64 = fields[bytes_col].parse().map_err(|_| ParseIssue::BadNumber {
            column: "bytes",
            value: fields[bytes_col].to_string(),
        })?;

        Ok(PacketRecord {
            id: fields[0].to_string(),
            rel_time,
            src_addr: fields[2].to_string(),
            dest_addr: fields[3].to_string(),
            src_port,
            dest_port,
            protocol: fields[protocol_col].to_string(),
            bytes,
            info,
        })
    }

    /// Parse one line, detecting the layout by column count.
    pub fn parse_auto(line: &str) -> Result<PacketRecord, ParseIssue> {
        let count = line.split(',').count();
        let schema = CsvSchema::detect(count).ok_or(ParseIssue::UnknownLayout { found: count })?;
        PacketRecord::parse_line(line, schema)
    }

    /// The layout this record round-trips through.
    pub fn schema(&self) -> CsvSchema {
        if self.src_port.is_some() {
            CsvSchema::Extended
        } else {
            CsvSchema::Basic
        }
    }

    /// Render the record back to its delimited line form.
    pub fn to_csv_line(&self) -> String {
        match self.schema() {
            CsvSchema::Basic => format!(
                "{},{},{},{},{},{}",
                self.id, self.rel_time, self.src_addr, self.dest_addr, self.protocol, self.bytes
            ),
            CsvSchema::Extended => format!(
                "{},{},{},{},{},{},{},{},{}",
                self.id,
                self.rel_time,
                self.src_addr,
                self.dest_addr,
                self.src_port.as_deref().unwrap_or(""),
                self.dest_port.as_deref().unwrap_or(""),
                self.protocol,
                self.bytes,
                self.info.as_deref().unwrap_or(""),
            ),
        }
    }
}
