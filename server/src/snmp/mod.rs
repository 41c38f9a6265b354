//! SNMP client discovery.
//!
//! Walks Bridge-MIB, IF-MIB, IP-MIB and LANCOM WLAN subtrees through the
//! external net-snmp tools, then correlates the results by MAC address into a
//! per-device client table.

pub mod oids;
pub mod parse;
pub mod resolver;
pub mod tables;
pub mod walk;

use serde::Deserialize;

pub use parse::MacAddress;
pub use resolver::{
    resolve_mac_table, test_connectivity, ClientTableEntry, ClientTableResult, ConnectivityResult,
    TableSource,
};
pub use walk::{CommandWalker, EmptyReason, WalkOutput, Walker};

/// SNMP protocol version accepted by the walk tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum SnmpVersion {
    #[serde(rename = "1")]
    V1,
    #[default]
    #[serde(rename = "2c")]
    V2c,
}

impl SnmpVersion {
    /// Value passed to the tool's `-v` flag.
    pub fn as_arg(self) -> &'static str {
        match self {
            SnmpVersion::V1 => "1",
            SnmpVersion::V2c => "2c",
        }
    }
}

/// A device to query, already validated at the request boundary.
#[derive(Debug, Clone)]
pub struct Target {
    pub host: String,
    pub community: String,
    pub version: SnmpVersion,
}
