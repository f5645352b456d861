//! End-to-end regressions for the grouping, ordering, and reporting pipeline.

use std::io::Write;

use tempfile::NamedTempFile;

use netsort::{
    render, Configuration, GroupBy, InputFormat, ModeSpec, NetsortError, OrderDirection,
    PacketSet, SortMetric,
};

/// Three packets on one address pair: A -> B carries 2 packets / 30 bytes,
/// B -> A carries 1 packet / 5 bytes.
const BASIC_CAPTURE: &str = "\
No.,Time,Source,Destination,Protocol,Length
1,0.10,A,B,TCP,10
2,0.20,A,B,TCP,20
3,0.30,B,A,TCP,5
";

/// Two conversations in the 9-column layout; the one starting later carries
/// more traffic.
const EXTENDED_CAPTURE: &str = "\
No.,Time,Source,Destination,SrcPort,DestPort,Protocol,Length,Info
1,2.0,A,B,5000,80,TCP,100,syn
2,2.5,A,B,5000,80,TCP,100,payload
3,0.5,C,D,6000,443,TLSv1.2,40,hello
4,3.0,C,D,6000,443,TLSv1.2,40,data
";

fn load(content: &str) -> PacketSet {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{content}").unwrap();

    let mut packets = PacketSet::new();
    packets
        .append_file(file.path(), InputFormat::CsvWithHeader)
        .unwrap();
    packets
}

fn rows(packets: &PacketSet, config: &Configuration) -> Vec<String> {
    render(&packets.summarize(config).unwrap(), config)
}

#[test]
fn test_source_by_packets_low() {
    let packets = load(BASIC_CAPTURE);
    let config = ModeSpec::UNSET.resolve();

    // B has 1 packet, A has 2; ascending by count.
    assert_eq!(rows(&packets, &config), ["B\t1", "A\t2"]);
}

#[test]
fn test_connect_by_bytes_low() {
    let packets = load(BASIC_CAPTURE);
    let config = ModeSpec::UNSET
        .with_group_by(GroupBy::Connect)
        .with_sort_metric(SortMetric::Bytes)
        .resolve();

    assert_eq!(rows(&packets, &config), ["B -> A\t5", "A -> B\t30"]);
}

#[test]
fn test_order_high_is_exact_reversal_of_order_low() {
    let packets = load(BASIC_CAPTURE);
    let low = ModeSpec::UNSET
        .with_group_by(GroupBy::Connect)
        .with_sort_metric(SortMetric::Bytes)
        .resolve();
    let high = ModeSpec::UNSET
        .with_group_by(GroupBy::Connect)
        .with_sort_metric(SortMetric::Bytes)
        .with_order(OrderDirection::Descending)
        .resolve();

    let mut expected = rows(&packets, &low);
    expected.reverse();

    assert_eq!(rows(&packets, &high), expected);
    assert_eq!(rows(&packets, &high), ["A -> B\t30", "B -> A\t5"]);
}

#[test]
fn test_group_counts_cover_every_parsed_record() {
    let packets = load(BASIC_CAPTURE);

    for group_by in [GroupBy::Source, GroupBy::Destination, GroupBy::Connect, GroupBy::Protocol] {
        let config = ModeSpec::UNSET.with_group_by(group_by).resolve();
        let summary = packets.summarize(&config).unwrap();
        let total: u64 = summary.iter().map(|record| record.packets).sum();
        assert_eq!(total, packets.len() as u64);
    }
}

#[test]
fn test_opposite_directions_never_share_a_group() {
    let packets = load(BASIC_CAPTURE);
    let config = ModeSpec::UNSET.with_group_by(GroupBy::Connect).resolve();

    let summary = packets.summarize(&config).unwrap();
    let keys: Vec<&str> = summary.iter().map(|record| record.key.as_str()).collect();

    assert!(keys.contains(&"A -> B"));
    assert!(keys.contains(&"B -> A"));
    assert_eq!(keys.len(), 2);
}

#[test]
fn test_sequence_order_follows_first_packet_time() {
    let packets = load(EXTENDED_CAPTURE);
    let config = ModeSpec::UNSET
        .with_group_by(GroupBy::Conversation)
        .with_order(OrderDirection::Sequence)
        .resolve();

    // C:6000 -> D:443 opened at 0.5, A:5000 -> B:80 at 2.0; the sort metric
    // (packets, where A leads) plays no part.
    assert_eq!(
        rows(&packets, &config),
        ["C:6000 -> D:443\t2", "A:5000 -> B:80\t2"]
    );
}

#[test]
fn test_sequence_without_conversation_is_rejected_before_aggregation() {
    let packets = load(BASIC_CAPTURE);
    let config = ModeSpec::UNSET.with_order(OrderDirection::Sequence).resolve();

    let err = packets.summarize(&config).unwrap_err();
    assert!(matches!(err, NetsortError::UnsupportedOrderMode { .. }));
}

#[test]
fn test_conversation_grouping_needs_the_extended_layout() {
    let packets = load(BASIC_CAPTURE);
    let config = ModeSpec::UNSET.with_group_by(GroupBy::Conversation).resolve();

    let err = packets.summarize(&config).unwrap_err();
    assert!(matches!(err, NetsortError::UnsupportedGroupMode { .. }));
}

#[test]
fn test_malformed_line_aborts_with_location() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "No.,Time,Source,Destination,Protocol,Length\n\
         1,0.10,A,B,TCP,10\n\
         2,0.20,A,B\n\
         3,0.30,B,A,TCP,5\n"
    )
    .unwrap();

    let mut packets = PacketSet::new();
    let err = packets
        .append_file(file.path(), InputFormat::CsvWithHeader)
        .unwrap_err();

    match err {
        NetsortError::Parse { file: origin, line, reason } => {
            assert_eq!(origin, file.path().display().to_string());
            assert_eq!(line, 3);
            assert!(reason.contains("columns"), "got: {reason}");
        }
        other => panic!("expected Parse error, got {other:?}"),
    }
}

#[test]
fn test_cli_tokens_drive_the_pipeline() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{BASIC_CAPTURE}").unwrap();

    let tokens: Vec<String> = [
        "group",
        "connect",
        "sort",
        "bytes",
        "order",
        "high",
        file.path().to_str().unwrap(),
    ]
    .iter()
    .map(|token| token.to_string())
    .collect();

    let request = netsort::cli::parse_tokens(&tokens).unwrap();
    let config = request.mode.resolve();

    let mut packets = PacketSet::new();
    for path in &request.inputs {
        packets.append_file(path, config.input_format).unwrap();
    }

    assert_eq!(rows(&packets, &config), ["A -> B\t30", "B -> A\t5"]);
}

#[test]
fn test_records_accumulate_across_files_before_one_pass() {
    let mut first = NamedTempFile::new().unwrap();
    write!(first, "{BASIC_CAPTURE}").unwrap();
    let mut second = NamedTempFile::new().unwrap();
    write!(second, "No.,Time,Source,Destination,Protocol,Length\n4,0.40,A,B,UDP,7\n").unwrap();

    let mut packets = PacketSet::new();
    packets.append_file(first.path(), InputFormat::CsvWithHeader).unwrap();
    packets.append_file(second.path(), InputFormat::CsvWithHeader).unwrap();

    let config = ModeSpec::UNSET.resolve();
    assert_eq!(rows(&packets, &config), ["B\t1", "A\t3"]);
}
