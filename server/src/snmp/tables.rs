//! Table builders: turn raw walk text into MAC/port/interface mappings.
//!
//! Each OID root has one line rule (`*_record`) that maps a binding to an
//! optional typed record; the builders fold those records into maps. Lines
//! that fail their rule are dropped silently.

use std::collections::HashMap;
use std::net::Ipv4Addr;

use indexmap::IndexMap;

use super::oids;
use super::parse::{bindings, mac_from_dec_oid, mac_from_hex_str, Binding, MacAddress};

/// Radio band reported by the WLAN station table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WlanBand {
    Ghz2_4,
    Ghz5,
}

impl WlanBand {
    /// Map the LCOS band code. Only 1 and 2 are known; anything else is unknown.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(WlanBand::Ghz2_4),
            2 => Some(WlanBand::Ghz5),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WlanBand::Ghz2_4 => "2.4G",
            WlanBand::Ghz5 => "5G",
        }
    }
}

/// One associated WLAN station, after SSID and ARP decoration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WlanClient {
    pub channel: Option<u32>,
    pub band: Option<WlanBand>,
    pub ssid: Option<String>,
    pub ip: Option<Ipv4Addr>,
}

// ---------------------------------------------------------------------------
// Line rules
// ---------------------------------------------------------------------------

/// `dot1dTpFdbPort.<mac> = INTEGER: <port>`
pub fn dot1d_fdb_record(b: &Binding) -> Option<(MacAddress, u32)> {
    let mac = mac_from_dec_oid(b.suffix(oids::DOT1D_TP_FDB_PORT)?)?;
    Some((mac, b.integer()?))
}

/// `dot1qTpFdbPort.<vlan>.<mac> = INTEGER: <port>`; the VLAN id is discarded.
pub fn dot1q_fdb_record(b: &Binding) -> Option<(MacAddress, u32)> {
    let (vlan, mac) = b.suffix(oids::DOT1Q_TP_FDB_PORT)?.split_once('.')?;
    vlan.parse::<u32>().ok()?;
    Some((mac_from_dec_oid(mac)?, b.integer()?))
}

/// `dot1dBasePortIfIndex.<port> = INTEGER: <ifIndex>`
pub fn port_index_record(b: &Binding) -> Option<(u32, u32)> {
    let port = b.suffix(oids::DOT1D_BASE_PORT_IF_INDEX)?.parse().ok()?;
    Some((port, b.integer()?))
}

/// `ifName.<ifIndex> = STRING: <name>`
pub fn if_name_record(b: &Binding) -> Option<(u32, String)> {
    let if_index = b.suffix(oids::IF_NAME)?.parse().ok()?;
    Some((if_index, b.string().to_string()))
}

/// `ipNetToMediaPhysAddress.<ifIndex>.<a>.<b>.<c>.<d> = Hex-STRING: <mac>`
pub fn arp_record(b: &Binding) -> Option<(MacAddress, Ipv4Addr)> {
    let suffix = b.suffix(oids::IP_NET_TO_MEDIA_PHYS_ADDRESS)?;
    let parts: Vec<&str> = suffix.split('.').collect();
    let [if_index, a, bb, c, d] = parts.as_slice() else {
        return None;
    };
    if_index.parse::<u32>().ok()?;
    let ip = Ipv4Addr::new(a.parse().ok()?, bb.parse().ok()?, c.parse().ok()?, d.parse().ok()?);
    Some((mac_from_hex_str(b.string())?, ip))
}

/// Station table cell: `<entry>.<column>.<mac> = INTEGER: <value>`.
pub fn wlan_station_record(b: &Binding) -> Option<(MacAddress, u32, u32)> {
    let (column, mac) = b.suffix(oids::LCOS_WLAN_STATION_ENTRY)?.split_once('.')?;
    Some((mac_from_dec_oid(mac)?, column.parse().ok()?, b.integer()?))
}

/// `<station ssid>.<mac> = STRING: <ssid>`
pub fn wlan_ssid_record(b: &Binding) -> Option<(MacAddress, String)> {
    let mac = mac_from_dec_oid(b.suffix(oids::LCOS_WLAN_STATION_SSID)?)?;
    Some((mac, b.string().to_string()))
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// MAC -> bridge port from the classic Bridge-MIB walk, falling back to the
/// Q-Bridge walk when the classic table is empty.
///
/// Q-Bridge may list one MAC under several VLANs. The first line wins; walk
/// output is OID-ordered, so that is the lowest VLAN.
pub fn bridge_forwarding(classic: &str, qbridge: &str) -> IndexMap<MacAddress, u32> {
    let mut table: IndexMap<MacAddress, u32> = bindings(classic)
        .filter_map(|b| dot1d_fdb_record(&b))
        .collect();

    if table.is_empty() {
        for (mac, port) in bindings(qbridge).filter_map(|b| dot1q_fdb_record(&b)) {
            table.entry(mac).or_insert(port);
        }
    }

    table
}

/// Bridge port -> ifIndex.
pub fn port_index(text: &str) -> HashMap<u32, u32> {
    bindings(text).filter_map(|b| port_index_record(&b)).collect()
}

/// ifIndex -> interface name.
pub fn interface_names(text: &str) -> HashMap<u32, String> {
    bindings(text).filter_map(|b| if_name_record(&b)).collect()
}

/// MAC -> IPv4 address from the ARP cache. Later entries overwrite earlier ones.
pub fn arp_table(text: &str) -> HashMap<MacAddress, Ipv4Addr> {
    bindings(text).filter_map(|b| arp_record(&b)).collect()
}

/// MAC -> SSID the station is associated with.
pub fn ssid_table(text: &str) -> HashMap<MacAddress, String> {
    bindings(text).filter_map(|b| wlan_ssid_record(&b)).collect()
}

/// Build WLAN station records from the station table, then attach the SSID
/// and ARP address for each station.
pub fn wlan_clients(stations: &str, ssids: &str, arp: &str) -> IndexMap<MacAddress, WlanClient> {
    let mut clients: IndexMap<MacAddress, WlanClient> = IndexMap::new();

    for (mac, column, value) in bindings(stations).filter_map(|b| wlan_station_record(&b)) {
        match column {
            oids::LCOS_WLAN_STATION_CHANNEL_COLUMN => {
                clients.entry(mac).or_default().channel = Some(value);
            }
            oids::LCOS_WLAN_STATION_BAND_COLUMN => {
                clients.entry(mac).or_default().band = WlanBand::from_code(value);
            }
            _ => {}
        }
    }

    let ssids = ssid_table(ssids);
    let arp = arp_table(arp);
    for (mac, client) in clients.iter_mut() {
        client.ssid = ssids.get(mac).cloned();
        client.ip = arp.get(mac).copied();
    }

    clients
}
