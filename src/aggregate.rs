//! Per-group accumulation of packet records.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::GroupBy;
use crate::error::Result;
use crate::group::{derive_key, GroupKey};
use crate::packet::PacketRecord;

/// Accumulated count, byte total, and first-seen time for one group key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRecord {
    pub key: GroupKey,
    /// Number of packets in the group, at least 1.
    pub packets: u64,
    /// Total bytes across the group.
    pub bytes: u64,
    /// Relative time of the earliest packet observed for this key.
    pub first_time: f64,
}

impl AggregateRecord {
    /// Open a group from its first packet.
    fn open(key: GroupKey, packet: &PacketRecord) -> Self {
        AggregateRecord {
            key,
            packets: 1,
            bytes: packet.bytes,
            first_time: packet.rel_time,
        }
    }

    /// Fold one more packet into the group.
    fn absorb(&mut self, packet: &PacketRecord) {
        self.packets += 1;
        self.bytes += packet.bytes;
        if packet.rel_time < self.first_time {
            self.first_time = packet.rel_time;
        }
    }
}

/// Fold records into a mapping from group key to aggregate record.
///
/// Records are processed in input order. The mapping's own iteration order
/// carries no meaning; ordering the result is the ordering policy's job.
pub fn aggregate(
    records: &[PacketRecord],
    group_by: GroupBy,
) -> Result<HashMap<GroupKey, AggregateRecord>> {
    let mut groups: HashMap<GroupKey, AggregateRecord> = HashMap::new();
    for packet in records {
        let key = derive_key(packet, group_by)?;
        match groups.entry(key) {
            Entry::Occupied(mut slot) => slot.get_mut().absorb(packet),
            Entry::Vacant(slot) => {
                let record = AggregateRecord::open(slot.key().clone(), packet);
                slot.insert(record);
            }
        }
    }
    Ok(groups)
}
