//! Ordering policy over aggregate records.
//!
//! The base order is always ascending by (metric value, group key). The
//! descending direction is the ascending sequence reversed as a whole, not
//! an inverted comparator; the two differ in how equal-metric neighbors end
//! up positioned, and the reversal behavior is the documented one. Sequence
//! ordering is a separate order entirely, by each conversation's first
//! observed packet.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::aggregate::AggregateRecord;
use crate::config::{Configuration, GroupBy, OrderDirection, SortMetric};
use crate::error::{NetsortError, Result};
use crate::group::GroupKey;

/// The metric value an aggregate record sorts by.
pub fn metric_value(record: &AggregateRecord, metric: SortMetric) -> u64 {
    match metric {
        SortMetric::Packets => record.packets,
        SortMetric::Bytes => record.bytes,
    }
}

/// Composite comparator: metric value first, then the group key's natural
/// string ordering as tie-break. The metric is an explicit argument; ordering
/// never consults ambient state.
pub fn compare_by_metric(a: &AggregateRecord, b: &AggregateRecord, metric: SortMetric) -> Ordering {
    metric_value(a, metric)
        .cmp(&metric_value(b, metric))
        .then_with(|| a.key.cmp(&b.key))
}

/// Check that the configured ordering is valid for the configured grouping.
/// Sequence ordering only makes sense per conversation.
pub fn validate_order(config: &Configuration) -> Result<()> {
    if config.order == OrderDirection::Sequence && config.group_by != GroupBy::Conversation {
        return Err(NetsortError::UnsupportedOrderMode {
            order: config.order,
            group_by: config.group_by,
        });
    }
    Ok(())
}

/// Order the aggregation result into the final output sequence.
pub fn sort_aggregates(
    groups: HashMap<GroupKey, AggregateRecord>,
    config: &Configuration,
) -> Result<Vec<AggregateRecord>> {
    validate_order(config)?;

    let mut records: Vec<AggregateRecord> = groups.into_values().collect();
    match config.order {
        OrderDirection::Ascending => {
            records.sort_by(|a, b| compare_by_metric(a, b, config.sort_metric));
        }
        OrderDirection::Descending => {
            // Sort ascending, then reverse the sequence as a whole.
            records.sort_by(|a, b| compare_by_metric(a, b, config.sort_metric));
            records.reverse();
        }
        OrderDirection::Sequence => {
            // Conversation start order; the sort metric plays no part. Key
            // tie-break keeps the order total and reproducible across runs.
            records.sort_by(|a, b| {
                a.first_time
                    .total_cmp(&b.first_time)
                    .then_with(|| a.key.cmp(&b.key))
            });
        }
    }
    Ok(records)
}
