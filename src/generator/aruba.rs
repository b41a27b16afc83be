use super::{append_default_commands, CommandRenderer};
use crate::models::{PortMode, Switch};

/// Aruba (AOS-CX style) renderer
pub struct ArubaRenderer;

impl CommandRenderer for ArubaRenderer {
    fn brand(&self) -> &'static str {
        "aruba"
    }

    fn render(&self, switch: &Switch) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push("configure".to_string());
        lines.push(format!("hostname {}", switch.hostname));

        for (vlan_id, vlan_name) in &switch.vlans {
            lines.push(format!("vlan {}", vlan_id));
            lines.push(format!(" name {}", vlan_name));
            lines.push("exit".to_string());
        }

        for (port, settings) in &switch.ports {
            lines.push(format!("interface {}", port));
            match settings.mode {
                PortMode::Shutdown => lines.push(" disable".to_string()),
                PortMode::Access => {
                    if let Some(vlan) = settings.vlan {
                        lines.push(format!(" vlan access {}", vlan));
                    }
                }
                PortMode::Trunk => {
                    lines.push(" trunk".to_string());
                    for vlan_id in switch.vlans.keys() {
                        lines.push(format!(" trunk allowed vlan {}", vlan_id));
                    }
                }
            }
            if switch.supports_poe() {
                if settings.poe {
                    lines.push(" poe-max-power 30".to_string());
                } else {
                    lines.push(" no poe".to_string());
                }
            }
            lines.push("exit".to_string());
        }

        for (vlan_id, settings) in &switch.vlan_interfaces {
            lines.push(format!("vlan {}", vlan_id));
            if !settings.ip.is_empty() && !settings.mask.is_empty() {
                lines.push(format!(" ip address {} {}", settings.ip, settings.mask));
            }
            lines.push("exit".to_string());
        }

        append_default_commands(&mut lines, switch);
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PortConfig, SupportMatrix, Switch, SwitchTemplate};

    fn aruba_switch(poe: bool) -> Switch {
        let template = SwitchTemplate {
            port_layout: None,
            supports: SupportMatrix { poe },
            default_commands: Vec::new(),
        };
        Switch::new("aruba", "6100", Some(template))
    }

    #[test]
    fn test_trunk_allows_each_vlan_explicitly() {
        let mut sw = aruba_switch(false);
        sw.add_vlan(10, "Data");
        sw.add_vlan(20, "Voice");
        sw.set_port_config(
            2,
            PortConfig {
                mode: PortMode::Trunk,
                vlan: None,
                poe: false,
            },
        );
        let lines = ArubaRenderer.render(&sw);
        assert!(lines.contains(&" trunk".to_string()));
        assert!(lines.contains(&" trunk allowed vlan 10".to_string()));
        assert!(lines.contains(&" trunk allowed vlan 20".to_string()));
    }

    #[test]
    fn test_poe_polarity() {
        let mut sw = aruba_switch(true);
        sw.set_port_config(
            1,
            PortConfig {
                mode: PortMode::Access,
                vlan: None,
                poe: true,
            },
        );
        sw.set_port_config(
            2,
            PortConfig {
                mode: PortMode::Access,
                vlan: None,
                poe: false,
            },
        );
        let lines = ArubaRenderer.render(&sw);
        assert!(lines.contains(&" poe-max-power 30".to_string()));
        assert!(lines.contains(&" no poe".to_string()));
    }
}
