//! Group key derivation.
//!
//! Maps a packet record and the active group mode to the identity under
//! which the packet aggregates. Derivation is pure; every record maps to
//! exactly one key under a fixed mode.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GroupBy;
use crate::error::{NetsortError, Result};
use crate::packet::PacketRecord;

/// The identity under which packets aggregate: an address, a directional
/// address pair, a socket 4-tuple, or a protocol label. Ordered by the
/// natural ordering of its canonical string rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derive the group key for one packet under the given mode.
///
/// Pair and 4-tuple keys are directional: swapping source and destination
/// yields a different key. Conversation keys need the port columns of the
/// extended layout; basic-layout records cannot form one.
pub fn derive_key(packet: &PacketRecord, group_by: GroupBy) -> Result<GroupKey> {
    let key = match group_by {
        GroupBy::Source => packet.src_addr.clone(),
        GroupBy::Destination => packet.dest_addr.clone(),
        GroupBy::Connect => format!("{} -> {}", packet.src_addr, packet.dest_addr),
        GroupBy::Conversation => {
            let (src_port, dest_port) = match (&packet.src_port, &packet.dest_port) {
                (Some(src_port), Some(dest_port)) => (src_port, dest_port),
                _ => {
                    return Err(NetsortError::UnsupportedGroupMode {
                        detail: format!(
                            "'conversation' requires port columns (9-column input), \
                             but packet {} has none",
                            packet.id
                        ),
                    })
                }
            };
            format!(
                "{}:{} -> {}:{}",
                packet.src_addr, src_port, packet.dest_addr, dest_port
            )
        }
        GroupBy::Protocol => packet.protocol.clone(),
    };
    Ok(GroupKey(key))
}
