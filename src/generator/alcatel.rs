use super::{append_default_commands, CommandRenderer};
use crate::models::{PortMode, Switch};

/// Alcatel-Lucent AOS renderer
pub struct AlcatelRenderer;

impl CommandRenderer for AlcatelRenderer {
    fn brand(&self) -> &'static str {
        "alcatel"
    }

    fn render(&self, switch: &Switch) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push("configure terminal".to_string());
        lines.push(format!("hostname {}", switch.hostname));

        for (vlan_id, vlan_name) in &switch.vlans {
            lines.push(format!(
                "vlan {} name {} admin-state enable",
                vlan_id, vlan_name
            ));
        }

        for (port, settings) in &switch.ports {
            lines.push(format!("interfaces port 1/1/{}", port));
            if settings.mode == PortMode::Shutdown {
                lines.push(" admin-state disable".to_string());
            } else {
                lines.push(" admin-state enable".to_string());
            }
            match settings.mode {
                PortMode::Access => {
                    if let Some(vlan) = settings.vlan {
                        lines.push(format!(" vlan port default {} enable", vlan));
                    }
                }
                PortMode::Trunk => {
                    for vlan_id in switch.vlans.keys() {
                        lines.push(format!(" vlan port {} enable", vlan_id));
                    }
                }
                PortMode::Shutdown => {}
            }
            if switch.supports_poe() {
                if settings.poe {
                    lines.push(" power poe admin-state enable".to_string());
                } else {
                    lines.push(" power poe admin-state disable".to_string());
                }
            }
            lines.push("exit".to_string());
        }

        for (vlan_id, settings) in &switch.vlan_interfaces {
            lines.push(format!("interfaces vlan {}", vlan_id));
            if !settings.ip.is_empty() && !settings.mask.is_empty() {
                lines.push(format!(" ip address {} {}", settings.ip, settings.mask));
            }
            if settings.shutdown {
                lines.push(" admin-state disable".to_string());
            } else {
                lines.push(" admin-state enable".to_string());
            }
            if !settings.description.is_empty() {
                lines.push(format!(" description {}", settings.description));
            }
            lines.push("exit".to_string());
        }

        render_stp(switch, &mut lines);
        render_snmp(switch, &mut lines);

        append_default_commands(&mut lines, switch);
        lines
    }
}

fn render_stp(switch: &Switch, lines: &mut Vec<String>) {
    let stp = &switch.stp;
    if !stp.enabled {
        lines.push("spantree disable".to_string());
        return;
    }
    lines.push(format!("spantree mode {}", stp.mode.alcatel_keyword()));
    lines.push(format!("spantree priority {}", stp.priority));
    if stp.portfast {
        lines.push("spantree portfast enable".to_string());
    }
    if stp.bpduguard {
        lines.push("spantree bpdu-guard enable".to_string());
    }
    if stp.loopguard {
        lines.push("spantree loop-guard enable".to_string());
    }
}

fn render_snmp(switch: &Switch, lines: &mut Vec<String>) {
    let snmp = &switch.snmp;
    if !snmp.enabled {
        return;
    }
    lines.push(format!("snmp community map {} enable", snmp.community));
    if !snmp.location.is_empty() {
        lines.push(format!("system location {}", snmp.location));
    }
    if !snmp.contact.is_empty() {
        lines.push(format!("system contact {}", snmp.contact));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        PortConfig, SnmpConfig, StpConfig, StpMode, SupportMatrix, Switch, SwitchTemplate,
        VlanInterfaceConfig,
    };

    fn alcatel_switch() -> Switch {
        let template = SwitchTemplate {
            port_layout: None,
            supports: SupportMatrix { poe: false },
            default_commands: Vec::new(),
        };
        Switch::new("alcatel", "os6450", Some(template))
    }

    #[test]
    fn test_port_addressing_scheme() {
        let mut sw = alcatel_switch();
        sw.set_port_config(
            12,
            PortConfig {
                mode: PortMode::Access,
                vlan: Some(10),
                poe: false,
            },
        );
        let lines = AlcatelRenderer.render(&sw);
        assert!(lines.contains(&"interfaces port 1/1/12".to_string()));
        assert!(lines.contains(&" vlan port default 10 enable".to_string()));
    }

    #[test]
    fn test_stp_mode_lookup_table() {
        let mut sw = alcatel_switch();
        for (mode, keyword) in [
            (StpMode::RapidPvst, "spantree mode rstp"),
            (StpMode::Pvst, "spantree mode flat"),
            (StpMode::Mst, "spantree mode mstp"),
        ] {
            sw.set_spanning_tree(StpConfig {
                enabled: true,
                mode,
                priority: 8192,
                portfast: false,
                bpduguard: false,
                loopguard: false,
            });
            let lines = AlcatelRenderer.render(&sw);
            assert!(lines.contains(&keyword.to_string()));
            assert!(lines.contains(&"spantree priority 8192".to_string()));
        }
    }

    #[test]
    fn test_stp_disabled() {
        let sw = alcatel_switch();
        let lines = AlcatelRenderer.render(&sw);
        assert!(lines.contains(&"spantree disable".to_string()));
        assert!(!lines.iter().any(|l| l.starts_with("spantree mode")));
    }

    #[test]
    fn test_vlan_interface_description_rendered() {
        let mut sw = alcatel_switch();
        sw.set_vlan_interface(
            10,
            VlanInterfaceConfig {
                ip: "10.0.0.1".to_string(),
                mask: "255.255.255.0".to_string(),
                shutdown: false,
                description: "core uplink".to_string(),
                dhcp_enabled: false,
            },
        );
        let lines = AlcatelRenderer.render(&sw);
        let start = lines.iter().position(|l| l == "interfaces vlan 10").unwrap();
        assert_eq!(lines[start + 1], " ip address 10.0.0.1 255.255.255.0");
        assert_eq!(lines[start + 2], " admin-state enable");
        assert_eq!(lines[start + 3], " description core uplink");
    }

    #[test]
    fn test_snmp_block() {
        let mut sw = alcatel_switch();
        sw.set_snmp(SnmpConfig {
            enabled: true,
            community: "monitoring".to_string(),
            location: "dc-1".to_string(),
            ..Default::default()
        });
        let lines = AlcatelRenderer.render(&sw);
        assert!(lines.contains(&"snmp community map monitoring enable".to_string()));
        assert!(lines.contains(&"system location dc-1".to_string()));
    }
}
