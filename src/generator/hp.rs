use super::{append_default_commands, CommandRenderer};
use crate::models::{PortMode, Switch};

/// HP ProCurve renderer
pub struct HpRenderer;

impl CommandRenderer for HpRenderer {
    fn brand(&self) -> &'static str {
        "hp"
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
                        lines.push(format!(" untagged vlan {}", vlan));
                    }
                }
                PortMode::Trunk => {
                    let members: Vec<String> =
                        switch.vlans.keys().map(|id| id.to_string()).collect();
                    lines.push(format!(" tagged vlan {}", members.join(",")));
                }
            }
            if switch.supports_poe() {
                if settings.poe {
                    lines.push(" poe enable".to_string());
                } else {
                    lines.push(" poe disable".to_string());
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

    fn hp_switch(poe: bool) -> Switch {
        let template = SwitchTemplate {
            port_layout: None,
            supports: SupportMatrix { poe },
            default_commands: Vec::new(),
        };
        Switch::new("hp", "2530", Some(template))
    }

    #[test]
    fn test_trunk_tags_every_defined_vlan() {
        let mut sw = hp_switch(false);
        sw.add_vlan(10, "Data");
        sw.add_vlan(20, "Voice");
        sw.add_vlan(30, "Mgmt");
        sw.set_port_config(
            7,
            PortConfig {
                mode: PortMode::Trunk,
                vlan: None,
                poe: false,
            },
        );
        let lines = HpRenderer.render(&sw);
        assert!(lines.contains(&" tagged vlan 10,20,30".to_string()));
    }

    #[test]
    fn test_access_port_untagged() {
        let mut sw = hp_switch(false);
        sw.add_vlan(10, "Data");
        sw.set_port_config(
            3,
            PortConfig {
                mode: PortMode::Access,
                vlan: Some(10),
                poe: false,
            },
        );
        let lines = HpRenderer.render(&sw);
        assert!(lines.contains(&"interface 3".to_string()));
        assert!(lines.contains(&" untagged vlan 10".to_string()));
    }

    #[test]
    fn test_poe_polarity() {
        let mut sw = hp_switch(true);
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
        let lines = HpRenderer.render(&sw);
        assert!(lines.contains(&" poe enable".to_string()));
        assert!(lines.contains(&" poe disable".to_string()));
    }
}
