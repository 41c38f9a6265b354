//! Line-level parsing of net-snmp walk output.
//!
//! With `-On` every binding is printed on one line as
//!
//! ```text
//! .1.3.6.1.2.1.17.4.3.1.2.170.187.204.221.238.1 = INTEGER: 1
//! .1.3.6.1.2.1.31.1.1.1.1.3 = STRING: "GigabitEthernet0/3"
//! .1.3.6.1.2.1.4.22.1.2.1.10.0.0.5 = Hex-STRING: AA BB CC DD EE 01
//! ```
//!
//! Lines that do not look like a binding (wrapped string continuations,
//! tool diagnostics) are skipped by callers, never reported as errors.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

static BINDING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\.?(\d+(?:\.\d+)*)\s+=\s+(?:([A-Za-z][A-Za-z0-9 \-]*):\s*)?(.*?)\s*$")
        .expect("binding pattern is valid")
});

/// A 6-octet hardware address, displayed as `aa:bb:cc:dd:ee:ff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Decode a MAC carried as six decimal OID components, e.g. `170.187.204.221.238.1`.
///
/// Returns `None` unless there are exactly six components, each in `0..=255`.
pub fn mac_from_dec_oid(suffix: &str) -> Option<MacAddress> {
    let mut octets = [0u8; 6];
    let mut parts = suffix.split('.');
    for octet in octets.iter_mut() {
        *octet = parts.next()?.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(MacAddress(octets))
}

/// Decode a MAC carried as 12 hex digits, with optional colon or whitespace
/// separators and any case (`AA BB CC DD EE 01`, `aa:bb:cc:dd:ee:01`).
pub fn mac_from_hex_str(s: &str) -> Option<MacAddress> {
    let hex: String = s
        .chars()
        .filter(|c| *c != ':' && !c.is_whitespace())
        .collect();
    if hex.len() != 12 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let mut octets = [0u8; 6];
    for (i, octet) in octets.iter_mut().enumerate() {
        *octet = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(MacAddress(octets))
}

/// One `<OID> = <TYPE>: <VALUE>` line of walk output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding<'a> {
    /// Numeric OID without the leading dot.
    pub oid: &'a str,
    /// Type tag such as `INTEGER` or `Hex-STRING`, when the tool printed one.
    pub value_type: Option<&'a str>,
    /// Raw value text, trimmed.
    pub value: &'a str,
}

/// Parse one line of walk output, or `None` if it is not a binding.
pub fn parse_binding(line: &str) -> Option<Binding<'_>> {
    let caps = BINDING_RE.captures(line)?;
    Some(Binding {
        oid: caps.get(1)?.as_str(),
        value_type: caps.get(2).map(|m| m.as_str().trim()),
        value: caps.get(3).map_or("", |m| m.as_str()),
    })
}

/// Iterate over every binding in a walk's text, skipping anything else.
pub fn bindings(text: &str) -> impl Iterator<Item = Binding<'_>> {
    text.lines().filter_map(parse_binding)
}

impl<'a> Binding<'a> {
    /// The OID components after `root`, or `None` if the binding lies outside it.
    pub fn suffix(&self, root: &str) -> Option<&'a str> {
        let rest = self.oid.strip_prefix(root)?;
        rest.strip_prefix('.').filter(|s| !s.is_empty())
    }

    /// Integer value. Accepts plain numbers and enumerations rendered as `name(3)`.
    pub fn integer(&self) -> Option<u32> {
        if let Ok(n) = self.value.parse() {
            return Some(n);
        }
        let inner = self.value.strip_suffix(')')?;
        let open = inner.rfind('(')?;
        inner[open + 1..].parse().ok()
    }

    /// String value with surrounding double quotes removed, if present.
    pub fn string(&self) -> &'a str {
        self.value
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(self.value)
    }
}
