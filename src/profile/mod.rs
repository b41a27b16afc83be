//! Flat profile persistence.
//!
//! A profile captures the operator-editable parts of a [`Switch`] (VLANs,
//! ports, VLAN interfaces, SNMP/SSH/STP) as a JSON document. Map keys are
//! stringified integers on disk and re-keyed on load; `//` line comments
//! are tolerated anywhere in the file.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{PortConfig, SnmpConfig, SshConfig, StpConfig, Switch, VlanInterfaceConfig};

/// SwitchProfile is the on-disk document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwitchProfile {
    #[serde(default)]
    pub vlans: IndexMap<String, String>,
    #[serde(default)]
    pub ports: IndexMap<String, PortConfig>,
    #[serde(default)]
    pub vlan_interfaces: IndexMap<String, VlanInterfaceConfig>,
    #[serde(default)]
    pub snmp: SnmpConfig,
    #[serde(default)]
    pub ssh: SshConfig,
    #[serde(default)]
    pub stp: StpConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SwitchProfile {
    /// Capture the persistable state of a switch
    pub fn from_switch(switch: &Switch) -> Self {
        Self {
            vlans: switch
                .vlans
                .iter()
                .map(|(id, name)| (id.to_string(), name.clone()))
                .collect(),
            ports: switch
                .ports
                .iter()
                .map(|(port, cfg)| (port.to_string(), cfg.clone()))
                .collect(),
            vlan_interfaces: switch
                .vlan_interfaces
                .iter()
                .map(|(id, cfg)| (id.to_string(), cfg.clone()))
                .collect(),
            snmp: switch.snmp.clone(),
            ssh: switch.ssh.clone(),
            stp: switch.stp.clone(),
            saved_at: Some(Utc::now()),
        }
    }

    /// Apply the profile onto a switch, replacing the affected maps and
    /// protocol settings wholesale. Entries whose key does not parse back
    /// to an integer are skipped with a warning.
    pub fn apply_to(&self, switch: &mut Switch) {
        let mut vlans = IndexMap::new();
        for (key, name) in &self.vlans {
            match key.parse::<u16>() {
                Ok(id) => {
                    vlans.insert(id, name.clone());
                }
                Err(_) => tracing::warn!("Skipping VLAN entry with bad key '{}'", key),
            }
        }
        switch.replace_vlans(vlans);

        switch.reset_all_ports();
        for (key, cfg) in &self.ports {
            match key.parse::<u32>() {
                Ok(port) => switch.set_port_config(port, cfg.clone()),
                Err(_) => tracing::warn!("Skipping port entry with bad key '{}'", key),
            }
        }

        switch.vlan_interfaces.clear();
        for (key, cfg) in &self.vlan_interfaces {
            match key.parse::<u16>() {
                Ok(id) => switch.set_vlan_interface(id, cfg.clone()),
                Err(_) => tracing::warn!("Skipping VLAN interface entry with bad key '{}'", key),
            }
        }

        switch.set_snmp(self.snmp.clone());
        switch.set_ssh(self.ssh.clone());
        switch.set_spanning_tree(self.stp.clone());
    }
}

/// Save a switch's profile as pretty-printed JSON
pub fn save_profile(switch: &Switch, path: &Path) -> anyhow::Result<()> {
    let profile = SwitchProfile::from_switch(switch);
    let json = serde_json::to_string_pretty(&profile)?;
    fs::write(path, json)?;
    tracing::info!("Profile saved to {}", path.display());
    Ok(())
}

/// Load a profile, tolerating `//` line comments
pub fn load_profile(path: &Path) -> anyhow::Result<SwitchProfile> {
    let raw = fs::read_to_string(path)?;
    let profile = serde_json::from_str(&strip_line_comments(&raw))?;
    tracing::info!("Profile loaded from {}", path.display());
    Ok(profile)
}

/// Remove `//` comments outside of string literals
fn strip_line_comments(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for line in raw.lines() {
        let mut in_string = false;
        let mut escaped = false;
        let mut cut = line.len();
        let bytes = line.as_bytes();
        for i in 0..bytes.len() {
            let c = bytes[i];
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                b'\\' if in_string => escaped = true,
                b'"' => in_string = !in_string,
                b'/' if !in_string && i + 1 < bytes.len() && bytes[i + 1] == b'/' => {
                    cut = i;
                    break;
                }
                _ => {}
            }
        }
        out.push_str(line[..cut].trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PortMode, SshUser, StpMode};

    fn populated_switch() -> Switch {
        let mut sw = Switch::new("cisco", "c2960", None);
        sw.add_vlan(10, "Data");
        sw.add_vlan(20, "Voice");
        sw.set_port_config(
            1,
            PortConfig {
                mode: PortMode::Access,
                vlan: Some(10),
                poe: true,
            },
        );
        sw.set_vlan_interface(
            10,
            VlanInterfaceConfig {
                ip: "10.0.0.1".to_string(),
                mask: "255.255.255.0".to_string(),
                shutdown: false,
                description: "mgmt".to_string(),
                dhcp_enabled: true,
            },
        );
        sw.ssh.enabled = true;
        sw.ssh.users.push(SshUser {
            login: "admin".to_string(),
            password: "pw".to_string(),
            privilege: 15,
        });
        sw.stp.enabled = true;
        sw.stp.mode = StpMode::Mst;
        sw
    }

    #[test]
    fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        let original = populated_switch();
        save_profile(&original, &path).unwrap();

        let profile = load_profile(&path).unwrap();
        let mut restored = Switch::new("cisco", "c2960", None);
        profile.apply_to(&mut restored);

        assert_eq!(restored.vlans, original.vlans);
        assert_eq!(restored.ports.len(), 1);
        assert_eq!(restored.ports[&1].vlan, Some(10));
        assert!(restored.vlan_interfaces[&10].dhcp_enabled);
        assert!(restored.ssh.enabled);
        assert_eq!(restored.ssh.users.len(), 1);
        assert_eq!(restored.stp.mode, StpMode::Mst);
        assert!(profile.saved_at.is_some());
    }

    #[test]
    fn test_load_tolerates_trailing_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        fs::write(
            &path,
            r#"// exported profile
{
  "vlans": { "10": "Data" }, // data vlan
  "ports": { "1": { "mode": "access", "vlan": 10, "poe": false } }
}"#,
        )
        .unwrap();
        let profile = load_profile(&path).unwrap();
        assert_eq!(profile.vlans["10"], "Data");
        assert_eq!(profile.ports["1"].mode, PortMode::Access);
    }

    #[test]
    fn test_comment_marker_inside_string_survives() {
        let stripped = strip_line_comments(r#"{ "vlans": { "10": "http://intranet" } } // tail"#);
        let doc: serde_json::Value = serde_json::from_str(&stripped).unwrap();
        assert_eq!(doc["vlans"]["10"], "http://intranet");
    }

    #[test]
    fn test_bad_keys_are_skipped() {
        let mut profile = SwitchProfile::default();
        profile.vlans.insert("10".to_string(), "Data".to_string());
        profile.vlans.insert("oops".to_string(), "Bad".to_string());
        let mut sw = Switch::new("hp", "2530", None);
        profile.apply_to(&mut sw);
        assert_eq!(sw.vlans.len(), 1);
        assert_eq!(sw.vlans[&10], "Data");
    }

    #[test]
    fn test_apply_replaces_existing_state() {
        let mut sw = populated_switch();
        let empty = SwitchProfile::default();
        empty.apply_to(&mut sw);
        assert!(sw.vlans.is_empty());
        assert!(sw.ports.is_empty());
        assert!(sw.vlan_interfaces.is_empty());
        assert!(!sw.ssh.enabled);
    }
}
