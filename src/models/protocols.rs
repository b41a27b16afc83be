use serde::{Deserialize, Serialize};

/// SnmpVersion as spoken on the wire ("1", "2c", "3")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnmpVersion {
    #[serde(rename = "1")]
    V1,
    #[serde(rename = "2c")]
    V2c,
    #[serde(rename = "3")]
    V3,
}

impl Default for SnmpVersion {
    fn default() -> Self {
        SnmpVersion::V2c
    }
}

/// SnmpConfig holds the SNMP agent settings rendered for vendors that support them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnmpConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub community: String,
    #[serde(default)]
    pub version: SnmpVersion,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub contact: String,
}

/// SshVersion of the management daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SshVersion {
    #[serde(rename = "1")]
    V1,
    #[serde(rename = "2")]
    V2,
}

impl Default for SshVersion {
    fn default() -> Self {
        SshVersion::V2
    }
}

impl SshVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            SshVersion::V1 => "1",
            SshVersion::V2 => "2",
        }
    }
}

/// SshUser is one local account pushed to the device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SshUser {
    pub login: String,
    pub password: String,
    /// Privilege level 0..=15
    pub privilege: u8,
}

/// SshConfig holds the SSH management settings
///
/// `timeout` and `auth_retries` are kept as strings: they come straight
/// from operator input and are emitted verbatim into CLI text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SshConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub version: SshVersion,
    #[serde(default)]
    pub timeout: String,
    #[serde(default)]
    pub auth_retries: String,
    /// Captured and persisted but not rendered by any vendor branch yet
    #[serde(default)]
    pub key_auth: bool,
    #[serde(default)]
    pub users: Vec<SshUser>,
}

/// StpMode selects the spanning-tree flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StpMode {
    #[serde(rename = "rapid-pvst")]
    RapidPvst,
    #[serde(rename = "pvst")]
    Pvst,
    #[serde(rename = "mst")]
    Mst,
}

impl Default for StpMode {
    fn default() -> Self {
        StpMode::RapidPvst
    }
}

impl StpMode {
    /// Cisco keyword (verbatim spelling)
    pub fn cisco_keyword(&self) -> &'static str {
        match self {
            StpMode::RapidPvst => "rapid-pvst",
            StpMode::Pvst => "pvst",
            StpMode::Mst => "mst",
        }
    }

    /// Alcatel AOS keyword
    pub fn alcatel_keyword(&self) -> &'static str {
        match self {
            StpMode::RapidPvst => "rstp",
            StpMode::Pvst => "flat",
            StpMode::Mst => "mstp",
        }
    }
}

/// StpConfig holds the spanning-tree settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StpConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub mode: StpMode,
    /// Bridge priority, one of the 16 multiples of 4096 in [0, 61440].
    /// Out-of-range values are accepted and surface in generated text.
    #[serde(default = "default_stp_priority")]
    pub priority: u16,
    #[serde(default)]
    pub portfast: bool,
    #[serde(default)]
    pub bpduguard: bool,
    #[serde(default)]
    pub loopguard: bool,
}

fn default_stp_priority() -> u16 {
    32768
}

impl Default for StpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: StpMode::default(),
            priority: default_stp_priority(),
            portfast: false,
            bpduguard: false,
            loopguard: false,
        }
    }
}
