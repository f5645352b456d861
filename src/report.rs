//! Row rendering for ordered aggregate records.
//!
//! One output line per record, `<groupKey><separator><metricValue>`, in the
//! order received; rendering never re-sorts. Both TSV variants separate with
//! a tab, CSV with a comma. A JSON export of the full aggregate rows is
//! available for machine consumption.

use std::io::{self, Write};

use crate::aggregate::AggregateRecord;
use crate::config::{Configuration, OutputData, OutputFormat, SortMetric};
use crate::order::metric_value;

/// Resolve which metric each row emits. `TrackSortMetric` follows whichever
/// metric produced the ordering.
pub fn resolve_output_metric(config: &Configuration) -> SortMetric {
    match config.output_data {
        OutputData::TrackSortMetric => config.sort_metric,
        OutputData::Packets => SortMetric::Packets,
        OutputData::Bytes => SortMetric::Bytes,
    }
}

fn separator(format: OutputFormat) -> char {
    match format {
        OutputFormat::TsvHuman | OutputFormat::TsvSimple => '\t',
        OutputFormat::Csv => ',',
    }
}

/// Render one output line per aggregate record, in the order received.
pub fn render(records: &[AggregateRecord], config: &Configuration) -> Vec<String> {
    let metric = resolve_output_metric(config);
    let sep = separator(config.output_format);

    records
        .iter()
        .map(|record| format!("{}{}{}", record.key, sep, metric_value(record, metric)))
        .collect()
}

/// Stream the rendered report to a writer.
pub fn write_report<W: Write>(
    out: &mut W,
    records: &[AggregateRecord],
    config: &Configuration,
) -> io::Result<()> {
    for line in render(records, config) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Serialize the full aggregate rows (key, packets, bytes, first-seen time)
/// as pretty-printed JSON, in the order received.
pub fn render_json(records: &[AggregateRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}
