//! OID roots walked by the resolver, in numeric form (the tools run with `-On`).

/// SNMPv2-MIB::sysDescr
pub const SYS_DESCR: &str = "1.3.6.1.2.1.1.1";

/// BRIDGE-MIB::dot1dTpFdbPort, indexed by MAC.
pub const DOT1D_TP_FDB_PORT: &str = "1.3.6.1.2.1.17.4.3.1.2";

/// Q-BRIDGE-MIB::dot1qTpFdbPort, indexed by VLAN id then MAC.
pub const DOT1Q_TP_FDB_PORT: &str = "1.3.6.1.2.1.17.7.1.2.2.1.2";

/// BRIDGE-MIB::dot1dBasePortIfIndex, bridge port -> ifIndex.
pub const DOT1D_BASE_PORT_IF_INDEX: &str = "1.3.6.1.2.1.17.1.4.1.2";

/// IF-MIB::ifName
pub const IF_NAME: &str = "1.3.6.1.2.1.31.1.1.1.1";

/// IP-MIB::ipNetToMediaPhysAddress, indexed by ifIndex then IPv4 address.
pub const IP_NET_TO_MEDIA_PHYS_ADDRESS: &str = "1.3.6.1.2.1.4.22.1.2";

/// LCOS status WLAN station table entry, indexed by column then client MAC.
/// Column 2 carries the channel, column 3 the band.
pub const LCOS_WLAN_STATION_ENTRY: &str = "1.3.6.1.4.1.2356.11.1.3.32.1";

/// LCOS WLAN station table column holding the radio channel.
pub const LCOS_WLAN_STATION_CHANNEL_COLUMN: u32 = 2;

/// LCOS WLAN station table column holding the radio band.
pub const LCOS_WLAN_STATION_BAND_COLUMN: u32 = 3;

/// LCOS per-station network name (SSID), indexed by client MAC.
pub const LCOS_WLAN_STATION_SSID: &str = "1.3.6.1.4.1.2356.11.1.3.32.1.10";
