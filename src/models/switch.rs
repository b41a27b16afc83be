use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::protocols::{SnmpConfig, SshConfig, StpConfig};
use super::template::{PortLayout, SwitchTemplate};

/// PortMode is the forwarding role assigned to a physical port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortMode {
    Access,
    Trunk,
    Shutdown,
}

/// PortConfig is the per-port configuration entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortConfig {
    pub mode: PortMode,
    /// Access VLAN; only meaningful when `mode` is `Access`
    #[serde(default)]
    pub vlan: Option<u16>,
    /// PoE request; only rendered when the model supports PoE
    #[serde(default)]
    pub poe: bool,
}

/// VlanInterfaceConfig is a routed (SVI) interface on a VLAN
///
/// `ip` and `mask` are free-form strings; address validation is the
/// caller's responsibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VlanInterfaceConfig {
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub mask: String,
    #[serde(default)]
    pub shutdown: bool,
    #[serde(default)]
    pub description: String,
    /// Captured and persisted but not rendered by any vendor branch yet
    #[serde(default)]
    pub dhcp_enabled: bool,
}

/// Switch is the in-memory model of one device being configured.
///
/// The VLAN, port and VLAN-interface maps preserve insertion order; that
/// order is semantic, it decides render order in the generated CLI text.
#[derive(Debug, Clone)]
pub struct Switch {
    pub brand: String,
    pub model: String,
    pub hostname: String,
    template: SwitchTemplate,
    supports_poe: bool,
    pub vlans: IndexMap<u16, String>,
    pub ports: IndexMap<u32, PortConfig>,
    pub vlan_interfaces: IndexMap<u16, VlanInterfaceConfig>,
    pub snmp: SnmpConfig,
    pub ssh: SshConfig,
    pub stp: StpConfig,
}

impl Switch {
    /// Create a switch from a template. A missing template falls back to
    /// the default 24-port layout with PoE unsupported.
    pub fn new(brand: &str, model: &str, template: Option<SwitchTemplate>) -> Self {
        let template = match template {
            Some(t) => t,
            None => {
                tracing::warn!(
                    "No template for {}/{}, using default port layout",
                    brand,
                    model
                );
                SwitchTemplate::default()
            }
        };
        let supports_poe = template.supports.poe;
        let hostname = format!("{}-{}", brand, model);
        tracing::info!(
            "Switch {} {} initialized (poe={}, ports={})",
            brand,
            model,
            supports_poe,
            template.layout().total_ports
        );
        Self {
            brand: brand.to_string(),
            model: model.to_string(),
            hostname,
            template,
            supports_poe,
            vlans: IndexMap::new(),
            ports: IndexMap::new(),
            vlan_interfaces: IndexMap::new(),
            snmp: SnmpConfig::default(),
            ssh: SshConfig::default(),
            stp: StpConfig::default(),
        }
    }

    /// Whether the model supports PoE; derived once from the template
    pub fn supports_poe(&self) -> bool {
        self.supports_poe
    }

    pub fn template(&self) -> &SwitchTemplate {
        &self.template
    }

    pub fn port_layout(&self) -> PortLayout {
        self.template.layout()
    }

    /// Add or replace a VLAN. Ids outside [1, 4094] are accepted here and
    /// surface only in generated text.
    pub fn add_vlan(&mut self, id: u16, name: &str) {
        self.vlans.insert(id, name.to_string());
        tracing::info!("VLAN added: id={} name={}", id, name);
    }

    /// Remove a VLAN; ports referencing it keep their dangling reference
    /// (the generator treats it as "no VLAN name").
    pub fn remove_vlan(&mut self, id: u16) {
        if self.vlans.shift_remove(&id).is_some() {
            tracing::info!("VLAN removed: id={}", id);
        }
    }

    /// Replace the whole VLAN map, preserving the order of `vlans`
    pub fn replace_vlans(&mut self, vlans: IndexMap<u16, String>) {
        tracing::info!("VLAN map replaced ({} entries)", vlans.len());
        self.vlans = vlans;
    }

    /// Set the configuration of one port, replacing any previous entry
    pub fn set_port_config(&mut self, port: u32, config: PortConfig) {
        tracing::info!(
            "Port {} configured: mode={:?} vlan={:?} poe={}",
            port,
            config.mode,
            config.vlan,
            config.poe
        );
        self.ports.insert(port, config);
    }

    /// Apply one configuration to an inclusive port range, bounds-checked
    /// against the template's total port count.
    pub fn set_port_range(&mut self, start: u32, end: u32, config: PortConfig) -> anyhow::Result<()> {
        let total = self.template.layout().total_ports;
        if start == 0 || start > end || end > total {
            anyhow::bail!("Invalid port range {}-{} (switch has {} ports)", start, end, total);
        }
        for port in start..=end {
            self.ports.insert(port, config.clone());
        }
        tracing::info!("Ports {}-{} configured: mode={:?}", start, end, config.mode);
        Ok(())
    }

    /// Clear the entire port map
    pub fn reset_all_ports(&mut self) {
        self.ports.clear();
        tracing::info!("All ports reset");
    }

    /// Set the routed interface of a VLAN, replacing any previous entry
    pub fn set_vlan_interface(&mut self, vlan_id: u16, config: VlanInterfaceConfig) {
        tracing::info!("VLAN interface {} configured: ip={}", vlan_id, config.ip);
        self.vlan_interfaces.insert(vlan_id, config);
    }

    pub fn set_hostname(&mut self, hostname: &str) {
        tracing::info!("Hostname changed: {} -> {}", self.hostname, hostname);
        self.hostname = hostname.to_string();
    }

    pub fn set_snmp(&mut self, snmp: SnmpConfig) {
        self.snmp = snmp;
    }

    pub fn set_ssh(&mut self, ssh: SshConfig) {
        self.ssh = ssh;
    }

    pub fn set_spanning_tree(&mut self, stp: StpConfig) {
        self.stp = stp;
    }
}
