//! Mode configuration for the report engine.
//!
//! A report run is parameterized by six independent fields. Callers build a
//! partial [`ModeSpec`] where `None` means "use the default", then call
//! [`ModeSpec::resolve`] to obtain the fully-resolved [`Configuration`] that
//! is threaded through parsing, aggregation, ordering, and reporting.
//! Setters overwrite exactly one field and leave the rest untouched, so
//! repeated CLI subcommands and programmatic updates compose the same way.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NetsortError;

/// How packets are grouped into aggregate records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupBy {
    /// Group by source address.
    #[default]
    Source,
    /// Group by destination address.
    Destination,
    /// Group by source -> destination pairing; `a -> b` is separate from `b -> a`.
    Connect,
    /// Group by source/destination socket 4-tuple, also directional.
    Conversation,
    /// Group by protocol label.
    Protocol,
}

/// The numeric field groups are sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMetric {
    /// Number of packets in the group.
    #[default]
    Packets,
    /// Total bytes across the group.
    Bytes,
}

/// Direction of the final ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
    /// Numerical low to high.
    #[default]
    Ascending,
    /// Numerical high to low: the ascending sequence, reversed as a whole.
    Descending,
    /// Conversation start sequence; only valid with [`GroupBy::Conversation`].
    Sequence,
}

/// Shape of the input files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputFormat {
    /// CSV whose first line is a header row to skip.
    #[default]
    CsvWithHeader,
    /// CSV with no header row.
    CsvNoHeader,
}

/// Which accumulated field is emitted per output row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputData {
    /// Emit whichever metric produced the ordering.
    #[default]
    TrackSortMetric,
    /// Always emit the packet count.
    Packets,
    /// Always emit the byte total.
    Bytes,
}

/// Rendering of the output rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Tab-separated rows for terminal consumption.
    #[default]
    TsvHuman,
    /// Tab-separated rows, no decoration.
    TsvSimple,
    /// Comma-separated rows.
    Csv,
}

impl FromStr for GroupBy {
    type Err = NetsortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "src" => Ok(GroupBy::Source),
            "dest" => Ok(GroupBy::Destination),
            "connect" => Ok(GroupBy::Connect),
            "conversation" => Ok(GroupBy::Conversation),
            "proto" => Ok(GroupBy::Protocol),
            other => Err(NetsortError::InvalidConfiguration {
                field: "group",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GroupBy::Source => "src",
            GroupBy::Destination => "dest",
            GroupBy::Connect => "connect",
            GroupBy::Conversation => "conversation",
            GroupBy::Protocol => "proto",
        };
        write!(f, "{name}")
    }
}

impl FromStr for SortMetric {
    type Err = NetsortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "packets" => Ok(SortMetric::Packets),
            "bytes" => Ok(SortMetric::Bytes),
            other => Err(NetsortError::InvalidConfiguration {
                field: "sort",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortMetric::Packets => "packets",
            SortMetric::Bytes => "bytes",
        };
        write!(f, "{name}")
    }
}

impl FromStr for OrderDirection {
    type Err = NetsortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(OrderDirection::Ascending),
            "high" => Ok(OrderDirection::Descending),
            "sequence" => Ok(OrderDirection::Sequence),
            other => Err(NetsortError::InvalidConfiguration {
                field: "order",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderDirection::Ascending => "low",
            OrderDirection::Descending => "high",
            OrderDirection::Sequence => "sequence",
        };
        write!(f, "{name}")
    }
}

impl FromStr for InputFormat {
    type Err = NetsortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv-header" => Ok(InputFormat::CsvWithHeader),
            "csv-no-header" => Ok(InputFormat::CsvNoHeader),
            other => Err(NetsortError::InvalidConfiguration {
                field: "input format",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for OutputData {
    type Err = NetsortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "track-sort" => Ok(OutputData::TrackSortMetric),
            "packets" => Ok(OutputData::Packets),
            "bytes" => Ok(OutputData::Bytes),
            other => Err(NetsortError::InvalidConfiguration {
                field: "output data",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = NetsortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tsv-human" => Ok(OutputFormat::TsvHuman),
            "tsv-simple" => Ok(OutputFormat::TsvSimple),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(NetsortError::InvalidConfiguration {
                field: "output format",
                value: other.to_string(),
            }),
        }
    }
}

/// Partially-specified mode: `None` fields resolve to their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSpec {
    pub group_by: Option<GroupBy>,
    pub sort_metric: Option<SortMetric>,
    pub order: Option<OrderDirection>,
    pub input_format: Option<InputFormat>,
    pub output_data: Option<OutputData>,
    pub output_format: Option<OutputFormat>,
}

impl ModeSpec {
    /// A spec with every field left at its "use default" sentinel.
    pub const UNSET: ModeSpec = ModeSpec {
        group_by: None,
        sort_metric: None,
        order: None,
        input_format: None,
        output_data: None,
        output_format: None,
    };

    pub fn with_group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = Some(group_by);
        self
    }

    pub fn with_sort_metric(mut self, sort_metric: SortMetric) -> Self {
        self.sort_metric = Some(sort_metric);
        self
    }

    pub fn with_order(mut self, order: OrderDirection) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_input_format(mut self, input_format: InputFormat) -> Self {
        self.input_format = Some(input_format);
        self
    }

    pub fn with_output_data(mut self, output_data: OutputData) -> Self {
        self.output_data = Some(output_data);
        self
    }

    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = Some(output_format);
        self
    }

    /// Overlay another spec on top of this one. Fields set in `overlay` take
    /// precedence; unset fields keep the current value.
    pub fn merge(self, overlay: ModeSpec) -> ModeSpec {
        ModeSpec {
            group_by: overlay.group_by.or(self.group_by),
            sort_metric: overlay.sort_metric.or(self.sort_metric),
            order: overlay.order.or(self.order),
            input_format: overlay.input_format.or(self.input_format),
            output_data: overlay.output_data.or(self.output_data),
            output_format: overlay.output_format.or(self.output_format),
        }
    }

    /// Resolve every unset field to its documented default. Pure and total:
    /// a `ModeSpec` always resolves.
    pub fn resolve(self) -> Configuration {
        Configuration {
            group_by: self.group_by.unwrap_or_default(),
            sort_metric: self.sort_metric.unwrap_or_default(),
            order: self.order.unwrap_or_default(),
            input_format: self.input_format.unwrap_or_default(),
            output_data: self.output_data.unwrap_or_default(),
            output_format: self.output_format.unwrap_or_default(),
        }
    }
}

/// Fully-resolved configuration for one report pass. Immutable; passed by
/// reference through every stage rather than read from shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub group_by: GroupBy,
    pub sort_metric: SortMetric,
    pub order: OrderDirection,
    pub input_format: InputFormat,
    pub output_data: OutputData,
    pub output_format: OutputFormat,
}

impl Default for Configuration {
    fn default() -> Self {
        ModeSpec::UNSET.resolve()
    }
}
