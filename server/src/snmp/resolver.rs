//! MAC table resolver: joins the walked tables into one client table.
//!
//! Strategy order:
//! 1. Bridge-MIB: forwarding table (classic, else Q-Bridge) joined with
//!    bridge port -> ifIndex -> ifName and the ARP cache.
//! 2. LANCOM WLAN stations, only when step 1 produced no entries.

use std::cmp::Ordering;
use std::net::Ipv4Addr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use super::parse::MacAddress;
use super::tables::{self, WlanClient};
use super::walk::{WalkOutput, Walker};
use super::{oids, Target};

static SYS_DESCR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"STRING:\s*"([^"]+)""#).expect("sysDescr pattern is valid"));

/// Placeholder reported when a connectivity test got no output at all.
pub const NO_RESPONSE: &str = "no response";

/// Which strategy produced a client table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TableSource {
    #[serde(rename = "bridge")]
    Bridge,
    #[serde(rename = "wlan-clients")]
    WlanClients,
}

/// One host seen behind a port or SSID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientTableEntry {
    pub mac: MacAddress,
    /// Bridge port number; 0 for WLAN stations.
    pub bridge_port: u32,
    pub port_name: String,
    pub ip: Option<Ipv4Addr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientTableResult {
    pub entries: Vec<ClientTableEntry>,
    pub count: usize,
    pub count_with_ip: usize,
    pub has_mac_table: bool,
    pub source: TableSource,
}

impl ClientTableResult {
    /// Sort entries by port name and fill in the summary counters.
    fn new(mut entries: Vec<ClientTableEntry>, source: TableSource) -> Self {
        entries.sort_by(|a, b| natural_cmp(&a.port_name, &b.port_name));
        let count_with_ip = entries.iter().filter(|e| e.ip.is_some()).count();
        Self {
            count: entries.len(),
            count_with_ip,
            has_mac_table: !entries.is_empty(),
            entries,
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityResult {
    pub ok: bool,
    pub sys_descr: String,
}

/// Resolve the client table for one device.
pub async fn resolve_mac_table<W: Walker>(walker: &W, target: &Target) -> ClientTableResult {
    let entries = bridge_entries(walker, target).await;
    if !entries.is_empty() {
        info!(host = %target.host, count = entries.len(), "Resolved client table from Bridge-MIB");
        return ClientTableResult::new(entries, TableSource::Bridge);
    }

    debug!(host = %target.host, "Bridge-MIB empty, falling back to WLAN station table");
    let entries = wlan_entries(walker, target).await;
    info!(host = %target.host, count = entries.len(), "Resolved client table from WLAN stations");
    ClientTableResult::new(entries, TableSource::WlanClients)
}

/// Walk sysDescr and report whether the device answered with a description.
pub async fn test_connectivity<W: Walker>(walker: &W, target: &Target) -> ConnectivityResult {
    let output = walker.walk(target, oids::SYS_DESCR).await;
    let result = connectivity_from_output(&output);
    info!(host = %target.host, ok = result.ok, "SNMP connectivity test");
    result
}

fn connectivity_from_output(output: &WalkOutput) -> ConnectivityResult {
    let text = output.text();
    if let Some(caps) = SYS_DESCR_RE.captures(text) {
        return ConnectivityResult {
            ok: true,
            sys_descr: caps[1].to_string(),
        };
    }

    let sys_descr = if text.is_empty() {
        NO_RESPONSE.to_string()
    } else {
        text.chars().take(200).collect()
    };
    ConnectivityResult {
        ok: false,
        sys_descr,
    }
}

async fn bridge_entries<W: Walker>(walker: &W, target: &Target) -> Vec<ClientTableEntry> {
    let (classic, qbridge, ports, names, arp) = tokio::join!(
        walker.walk(target, oids::DOT1D_TP_FDB_PORT),
        walker.walk(target, oids::DOT1Q_TP_FDB_PORT),
        walker.walk(target, oids::DOT1D_BASE_PORT_IF_INDEX),
        walker.walk(target, oids::IF_NAME),
        walker.walk(target, oids::IP_NET_TO_MEDIA_PHYS_ADDRESS),
    );

    let forwarding = tables::bridge_forwarding(classic.text(), qbridge.text());
    let ports = tables::port_index(ports.text());
    let names = tables::interface_names(names.text());
    let arp = tables::arp_table(arp.text());

    forwarding
        .into_iter()
        .map(|(mac, bridge_port)| {
            let port_name = ports
                .get(&bridge_port)
                .and_then(|if_index| names.get(if_index))
                .filter(|name| !name.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("Port {bridge_port}"));
            ClientTableEntry {
                mac,
                bridge_port,
                port_name,
                ip: arp.get(&mac).copied(),
            }
        })
        .collect()
}

async fn wlan_entries<W: Walker>(walker: &W, target: &Target) -> Vec<ClientTableEntry> {
    let (stations, ssids, arp) = tokio::join!(
        walker.walk(target, oids::LCOS_WLAN_STATION_ENTRY),
        walker.walk(target, oids::LCOS_WLAN_STATION_SSID),
        walker.walk(target, oids::IP_NET_TO_MEDIA_PHYS_ADDRESS),
    );

    tables::wlan_clients(stations.text(), ssids.text(), arp.text())
        .into_iter()
        .map(|(mac, client)| ClientTableEntry {
            mac,
            bridge_port: 0,
            port_name: wlan_port_name(&client),
            ip: client.ip,
        })
        .collect()
}

/// `WLAN: <ssid> (<band>) CH<channel>`, omitting whatever is unknown.
fn wlan_port_name(client: &WlanClient) -> String {
    let mut name = match &client.ssid {
        Some(ssid) => format!("WLAN: {ssid}"),
        None => "WLAN".to_string(),
    };
    if let Some(band) = client.band {
        name.push_str(&format!(" ({})", band.label()));
    }
    if let Some(channel) = client.channel {
        name.push_str(&format!(" CH{channel}"));
    }
    name
}

/// Compare strings the way a person reads port names: digit runs by numeric
/// value, everything else case-insensitively. `Port 2` sorts before `Port 10`.
///
/// Names equal apart from case put lowercase first (`port 1` < `Port 1`).
/// Punctuation compares by code point, so `(` sorts before `:`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return case_tiebreak(a, b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let x_run = take_digits(&mut left);
                let y_run = take_digits(&mut right);
                let ord = cmp_digit_runs(&x_run, &y_run);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.to_lowercase().cmp(y.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

/// First differing character decides, lowercase before uppercase.
fn case_tiebreak(a: &str, b: &str) -> Ordering {
    for (x, y) in a.chars().zip(b.chars()) {
        if x == y {
            continue;
        }
        return match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => x.cmp(&y),
        };
    }
    a.len().cmp(&b.len())
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
