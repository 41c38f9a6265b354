use anyhow::Result;
use serde::Deserialize;

/// Application configuration loaded from a TOML file or defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// SNMP walk tool settings.
    #[serde(default)]
    pub snmp: SnmpConfig,
}

/// How the external net-snmp walk tools are invoked.
#[derive(Debug, Clone, Deserialize)]
pub struct SnmpConfig {
    /// Tool used for SNMP v1 (single GETNEXT walk).
    #[serde(default = "default_walk_command")]
    pub walk_command: String,

    /// Tool used for SNMP v2c (GETBULK walk).
    #[serde(default = "default_bulkwalk_command")]
    pub bulkwalk_command: String,

    /// Per-request protocol timeout in seconds, passed to the tool as `-t`.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Protocol retry count, passed to the tool as `-r`.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Wall-clock budget in seconds after which a walk process is killed.
    #[serde(default = "default_hard_timeout")]
    pub hard_timeout_secs: u64,
}

fn default_walk_command() -> String {
    "snmpwalk".to_string()
}

fn default_bulkwalk_command() -> String {
    "snmpbulkwalk".to_string()
}

fn default_timeout() -> u64 {
    5
}

fn default_retries() -> u32 {
    1
}

fn default_hard_timeout() -> u64 {
    12
}

impl Default for SnmpConfig {
    fn default() -> Self {
        Self {
            walk_command: default_walk_command(),
            bulkwalk_command: default_bulkwalk_command(),
            timeout_secs: default_timeout(),
            retries: default_retries(),
            hard_timeout_secs: default_hard_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::de::from_str(contents)?;
        Ok(config)
    }
}
