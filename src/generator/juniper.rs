use super::{append_default_commands, CommandRenderer};
use crate::models::{PortMode, Switch};

/// Juniper Junos (set-style) renderer
pub struct JuniperRenderer;

impl CommandRenderer for JuniperRenderer {
    fn brand(&self) -> &'static str {
        "juniper"
    }

    fn render(&self, switch: &Switch) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push("configure".to_string());
        lines.push(format!("set system host-name {}", switch.hostname));

        for (vlan_id, vlan_name) in &switch.vlans {
            lines.push(format!("set vlans {} vlan-id {}", vlan_name, vlan_id));
        }

        for (port, settings) in &switch.ports {
            let ifname = format!("ge-0/0/{}", port);
            match settings.mode {
                PortMode::Shutdown => {
                    lines.push(format!("set interfaces {} disable", ifname));
                }
                PortMode::Access => {
                    if let Some(vlan) = settings.vlan {
                        // Dangling reference renders as an empty member
                        let vlan_name = switch.vlans.get(&vlan).map(String::as_str).unwrap_or("");
                        lines.push(format!(
                            "set interfaces {} unit 0 family ethernet-switching port-mode access",
                            ifname
                        ));
                        lines.push(format!(
                            "set interfaces {} unit 0 family ethernet-switching vlan members {}",
                            ifname, vlan_name
                        ));
                    }
                }
                PortMode::Trunk => {
                    lines.push(format!(
                        "set interfaces {} unit 0 family ethernet-switching port-mode trunk",
                        ifname
                    ));
                    for vlan_name in switch.vlans.values() {
                        lines.push(format!(
                            "set interfaces {} unit 0 family ethernet-switching vlan members {}",
                            ifname, vlan_name
                        ));
                    }
                }
            }
            if switch.supports_poe() {
                if settings.poe {
                    lines.push(format!("set poe interface {} enable", ifname));
                } else {
                    lines.push(format!("set poe interface {} disable", ifname));
                }
            }
        }

        for (vlan_id, settings) in &switch.vlan_interfaces {
            if !settings.ip.is_empty() && !settings.mask.is_empty() {
                let vlan_name = switch
                    .vlans
                    .get(vlan_id)
                    .cloned()
                    .unwrap_or_else(|| format!("vlan{}", vlan_id));
                lines.push(format!(
                    "set interfaces irb unit {} family inet address {}/{}",
                    vlan_id, settings.ip, settings.mask
                ));
                lines.push(format!("set vlans {} l3-interface irb.{}", vlan_name, vlan_id));
            }
        }

        append_default_commands(&mut lines, switch);
        lines
    }
}
