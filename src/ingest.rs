//! Packet ingestion and the accumulating record set.
//!
//! A [`PacketSet`] collects records from any number of sources before a
//! single aggregation and ordering pass runs over the whole set. Ingestion
//! is strict: the first malformed line aborts with the file name and line
//! number attached, so no partial report is ever emitted.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::aggregate::{aggregate, AggregateRecord};
use crate::config::{Configuration, GroupBy, InputFormat, ModeSpec, OrderDirection, SortMetric};
use crate::error::{NetsortError, Result};
use crate::order::sort_aggregates;
use crate::packet::PacketRecord;

/// Accumulating container of parsed packet records.
#[derive(Debug, Clone, Default)]
pub struct PacketSet {
    records: Vec<PacketRecord>,
}

impl PacketSet {
    pub fn new() -> Self {
        PacketSet::default()
    }

    /// Append all records from a file. Returns how many were appended.
    pub fn append_file(&mut self, path: &Path, format: InputFormat) -> Result<usize> {
        let file = File::open(path).map_err(|source| NetsortError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let reader = BufReader::new(file);
        self.append_reader(reader, &path.display().to_string(), format)
    }

    /// Append all records from a line source. `origin` labels the source in
    /// parse diagnostics (a file name, usually).
    pub fn append_reader<R: BufRead>(
        &mut self,
        reader: R,
        origin: &str,
        format: InputFormat,
    ) -> Result<usize> {
        let mut skip_first = matches!(format, InputFormat::CsvWithHeader);
        let mut appended = 0;

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| NetsortError::Io {
                path: origin.to_string(),
                source,
            })?;
            if skip_first {
                skip_first = false;
                continue;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record =
                PacketRecord::parse_auto(line).map_err(|issue| NetsortError::Parse {
                    file: origin.to_string(),
                    line: index + 1,
                    reason: issue.to_string(),
                })?;
            self.records.push(record);
            appended += 1;
        }

        log::debug!("appended {appended} records from {origin}");
        Ok(appended)
    }

    /// Drop all accumulated records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PacketRecord] {
        &self.records
    }

    /// Run one aggregation and ordering pass over the accumulated records.
    pub fn summarize(&self, config: &Configuration) -> Result<Vec<AggregateRecord>> {
        let groups = aggregate(&self.records, config.group_by)?;
        sort_aggregates(groups, config)
    }

    fn fixed_mode(
        &self,
        group_by: GroupBy,
        sort_metric: SortMetric,
        order: OrderDirection,
    ) -> Result<Vec<AggregateRecord>> {
        let config = ModeSpec::UNSET
            .with_group_by(group_by)
            .with_sort_metric(sort_metric)
            .with_order(order)
            .resolve();
        self.summarize(&config)
    }

    // Convenience accessors for the common report modes.

    pub fn source_by_packets(&self, order: OrderDirection) -> Result<Vec<AggregateRecord>> {
        self.fixed_mode(GroupBy::Source, SortMetric::Packets, order)
    }

    pub fn source_by_bytes(&self, order: OrderDirection) -> Result<Vec<AggregateRecord>> {
        self.fixed_mode(GroupBy::Source, SortMetric::Bytes, order)
    }

    pub fn destination_by_packets(&self, order: OrderDirection) -> Result<Vec<AggregateRecord>> {
        self.fixed_mode(GroupBy::Destination, SortMetric::Packets, order)
    }

    pub fn destination_by_bytes(&self, order: OrderDirection) -> Result<Vec<AggregateRecord>> {
        self.fixed_mode(GroupBy::Destination, SortMetric::Bytes, order)
    }

    pub fn connect_by_packets(&self, order: OrderDirection) -> Result<Vec<AggregateRecord>> {
        self.fixed_mode(GroupBy::Connect, SortMetric::Packets, order)
    }

    pub fn connect_by_bytes(&self, order: OrderDirection) -> Result<Vec<AggregateRecord>> {
        self.fixed_mode(GroupBy::Connect, SortMetric::Bytes, order)
    }

    pub fn protocol_by_packets(&self, order: OrderDirection) -> Result<Vec<AggregateRecord>> {
        self.fixed_mode(GroupBy::Protocol, SortMetric::Packets, order)
    }

    pub fn protocol_by_bytes(&self, order: OrderDirection) -> Result<Vec<AggregateRecord>> {
        self.fixed_mode(GroupBy::Protocol, SortMetric::Bytes, order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADERED: &str = "\
No.,Time,Source,Destination,Protocol,Length
1,0.1,A,B,TCP,10
2,0.2,A,B,TCP,20
3,0.3,B,A,TCP,5
";

    #[test]
    fn test_header_row_is_skipped_not_parsed() {
        let mut set = PacketSet::new();
        let appended = set
            .append_reader(Cursor::new(HEADERED), "capture.csv", InputFormat::CsvWithHeader)
            .unwrap();

        assert_eq!(appended, 3);
        assert_eq!(set.len(), 3);
        assert_eq!(set.records()[0].src_addr, "A");
    }

    #[test]
    fn test_no_header_parses_every_line() {
        let body = "1,0.1,A,B,TCP,10\n2,0.2,B,A,TCP,20\n";
        let mut set = PacketSet::new();
        let appended = set
            .append_reader(Cursor::new(body), "capture.csv", InputFormat::CsvNoHeader)
            .unwrap();

        assert_eq!(appended, 2);
    }

    #[test]
    fn test_sources_accumulate_across_appends() {
        let mut set = PacketSet::new();
        set.append_reader(Cursor::new(HEADERED), "first.csv", InputFormat::CsvWithHeader)
            .unwrap();
        set.append_reader(
            Cursor::new("4,0.4,C,A,UDP,40\n"),
            "second.csv",
            InputFormat::CsvNoHeader,
        )
        .unwrap();

        assert_eq!(set.len(), 4);

        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_malformed_line_reports_origin_and_line_number() {
        let body = "1,0.1,A,B,TCP,10\n2,0.2,A,B\n3,0.3,B,A,TCP,5\n";
        let mut set = PacketSet::new();
        let err = set
            .append_reader(Cursor::new(body), "bad.csv", InputFormat::CsvNoHeader)
            .unwrap_err();

        match err {
            NetsortError::Parse { file, line, .. } => {
                assert_eq!(file, "bad.csv");
                assert_eq!(line, 2);
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut set = PacketSet::new();
        let err = set
            .append_file(Path::new("/no/such/capture.csv"), InputFormat::CsvWithHeader)
            .unwrap_err();
        assert!(matches!(err, NetsortError::Io { .. }));
    }

    #[test]
    fn test_convenience_accessors_match_summarize() {
        let mut set = PacketSet::new();
        set.append_reader(Cursor::new(HEADERED), "capture.csv", InputFormat::CsvWithHeader)
            .unwrap();

        let config = ModeSpec::UNSET
            .with_group_by(GroupBy::Connect)
            .with_sort_metric(SortMetric::Bytes)
            .with_order(OrderDirection::Descending)
            .resolve();

        assert_eq!(
            set.connect_by_bytes(OrderDirection::Descending).unwrap(),
            set.summarize(&config).unwrap()
        );
    }
}
