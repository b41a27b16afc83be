use super::{append_default_commands, CommandRenderer};
use crate::models::{PortMode, SnmpVersion, Switch};

/// Cisco IOS renderer
pub struct CiscoRenderer;

impl CommandRenderer for CiscoRenderer {
    fn brand(&self) -> &'static str {
        "cisco"
    }

    fn render(&self, switch: &Switch) -> Vec<String> {
        let mut lines = Vec::new();
        lines.push("enable".to_string());
        lines.push("configure terminal".to_string());
        lines.push(format!("hostname {}", switch.hostname));

        for (vlan_id, vlan_name) in &switch.vlans {
            lines.push(format!("vlan {}", vlan_id));
            lines.push(format!(" name {}", vlan_name));
            lines.push("!".to_string());
        }

        for (port, settings) in &switch.ports {
            lines.push(format!("interface GigabitEthernet0/{}", port));
            match settings.mode {
                PortMode::Shutdown => lines.push(" shutdown".to_string()),
                PortMode::Access => {
                    lines.push(" switchport mode access".to_string());
                    if let Some(vlan) = settings.vlan {
                        lines.push(format!(" switchport access vlan {}", vlan));
                    }
                }
                // Implicit allow-all; IOS needs no per-VLAN enumeration
                PortMode::Trunk => lines.push(" switchport mode trunk".to_string()),
            }
            if switch.supports_poe() {
                if settings.poe {
                    lines.push(" power inline auto".to_string());
                } else {
                    lines.push(" power inline never".to_string());
                }
            }
            lines.push("!".to_string());
        }

        for (vlan_id, settings) in &switch.vlan_interfaces {
            lines.push(format!("interface Vlan{}", vlan_id));
            if !settings.ip.is_empty() && !settings.mask.is_empty() {
                lines.push(format!(" ip address {} {}", settings.ip, settings.mask));
            }
            if settings.shutdown {
                lines.push(" shutdown".to_string());
            } else {
                lines.push(" no shutdown".to_string());
            }
            lines.push("!".to_string());
        }

        render_stp(switch, &mut lines);
        render_dhcp_snooping(switch, &mut lines);
        render_snmp(switch, &mut lines);
        render_ssh(switch, &mut lines);

        append_default_commands(&mut lines, switch);
        lines
    }
}

fn render_stp(switch: &Switch, lines: &mut Vec<String>) {
    let stp = &switch.stp;
    if !stp.enabled {
        lines.push("no spanning-tree".to_string());
        return;
    }
    lines.push(format!("spanning-tree mode {}", stp.mode.cisco_keyword()));
    lines.push(format!("spanning-tree vlan 1-4094 priority {}", stp.priority));
    if stp.portfast {
        lines.push("spanning-tree portfast default".to_string());
    }
    if stp.bpduguard {
        lines.push("spanning-tree portfast bpduguard default".to_string());
    }
    if stp.loopguard {
        lines.push("spanning-tree loopguard default".to_string());
    }
}

fn render_dhcp_snooping(switch: &Switch, lines: &mut Vec<String>) {
    if switch.vlans.is_empty() {
        return;
    }
    lines.push("ip dhcp snooping".to_string());
    for vlan_id in switch.vlans.keys() {
        lines.push(format!("ip dhcp snooping vlan {}", vlan_id));
    }
}

fn render_snmp(switch: &Switch, lines: &mut Vec<String>) {
    let snmp = &switch.snmp;
    if !snmp.enabled {
        return;
    }
    lines.push(format!("snmp-server community {} RO", snmp.community));
    if !snmp.location.is_empty() {
        lines.push(format!("snmp-server location {}", snmp.location));
    }
    if !snmp.contact.is_empty() {
        lines.push(format!("snmp-server contact {}", snmp.contact));
    }
    match snmp.version {
        SnmpVersion::V1 => lines.push("snmp-server enable traps snmp authentication".to_string()),
        SnmpVersion::V2c | SnmpVersion::V3 => {
            lines.push("snmp-server enable traps snmp".to_string())
        }
    }
}

fn render_ssh(switch: &Switch, lines: &mut Vec<String>) {
    let ssh = &switch.ssh;
    if !ssh.enabled {
        return;
    }
    lines.push(format!("ip ssh version {}", ssh.version.as_str()));
    if !ssh.timeout.is_empty() {
        lines.push(format!("ip ssh time-out {}", ssh.timeout));
    }
    if !ssh.auth_retries.is_empty() {
        lines.push(format!("ip ssh authentication-retries {}", ssh.auth_retries));
    }
    lines.push("line vty 0 15".to_string());
    lines.push(" transport input ssh".to_string());
    lines.push("exit".to_string());
    for user in &ssh.users {
        lines.push(format!(
            "username {} privilege {} secret {}",
            user.login, user.privilege, user.password
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        SnmpConfig, SshConfig, SshUser, SshVersion, StpConfig, StpMode, SupportMatrix, Switch,
        SwitchTemplate, VlanInterfaceConfig,
    };

    fn cisco_switch() -> Switch {
        let template = SwitchTemplate {
            port_layout: None,
            supports: SupportMatrix { poe: false },
            default_commands: Vec::new(),
        };
        Switch::new("cisco", "c2960", Some(template))
    }

    #[test]
    fn test_stp_enabled_block() {
        let mut sw = cisco_switch();
        sw.set_spanning_tree(StpConfig {
            enabled: true,
            mode: StpMode::RapidPvst,
            priority: 4096,
            portfast: true,
            bpduguard: true,
            loopguard: false,
        });
        let lines = CiscoRenderer.render(&sw);
        assert!(lines.contains(&"spanning-tree mode rapid-pvst".to_string()));
        assert!(lines.contains(&"spanning-tree vlan 1-4094 priority 4096".to_string()));
        assert!(lines.contains(&"spanning-tree portfast default".to_string()));
        assert!(lines.contains(&"spanning-tree portfast bpduguard default".to_string()));
        assert!(!lines.contains(&"spanning-tree loopguard default".to_string()));
    }

    #[test]
    fn test_snmp_block_and_trap_line_by_version() {
        let mut sw = cisco_switch();
        sw.set_snmp(SnmpConfig {
            enabled: true,
            community: "public".to_string(),
            version: crate::models::SnmpVersion::V1,
            location: "rack-4".to_string(),
            contact: "noc@example.net".to_string(),
        });
        let lines = CiscoRenderer.render(&sw);
        assert!(lines.contains(&"snmp-server community public RO".to_string()));
        assert!(lines.contains(&"snmp-server location rack-4".to_string()));
        assert!(lines.contains(&"snmp-server contact noc@example.net".to_string()));
        assert!(lines.contains(&"snmp-server enable traps snmp authentication".to_string()));

        sw.snmp.version = crate::models::SnmpVersion::V2c;
        let lines = CiscoRenderer.render(&sw);
        assert!(lines.contains(&"snmp-server enable traps snmp".to_string()));
    }

    #[test]
    fn test_snmp_disabled_emits_nothing() {
        let sw = cisco_switch();
        let text = CiscoRenderer.render(&sw).join("\n");
        assert!(!text.contains("snmp-server"));
    }

    #[test]
    fn test_ssh_block_with_users_in_order() {
        let mut sw = cisco_switch();
        sw.set_ssh(SshConfig {
            enabled: true,
            version: SshVersion::V2,
            timeout: "60".to_string(),
            auth_retries: "3".to_string(),
            key_auth: false,
            users: vec![
                SshUser {
                    login: "admin".to_string(),
                    password: "s3cret".to_string(),
                    privilege: 15,
                },
                SshUser {
                    login: "oper".to_string(),
                    password: "pass".to_string(),
                    privilege: 5,
                },
            ],
        });
        let lines = CiscoRenderer.render(&sw);
        assert!(lines.contains(&"ip ssh version 2".to_string()));
        assert!(lines.contains(&"ip ssh time-out 60".to_string()));
        assert!(lines.contains(&"ip ssh authentication-retries 3".to_string()));
        assert!(lines.contains(&" transport input ssh".to_string()));
        let admin = lines
            .iter()
            .position(|l| l == "username admin privilege 15 secret s3cret")
            .unwrap();
        let oper = lines
            .iter()
            .position(|l| l == "username oper privilege 5 secret pass")
            .unwrap();
        assert!(admin < oper);
    }

    #[test]
    fn test_dhcp_snooping_per_defined_vlan() {
        let mut sw = cisco_switch();
        sw.add_vlan(10, "Data");
        sw.add_vlan(20, "Voice");
        let lines = CiscoRenderer.render(&sw);
        assert!(lines.contains(&"ip dhcp snooping".to_string()));
        assert!(lines.contains(&"ip dhcp snooping vlan 10".to_string()));
        assert!(lines.contains(&"ip dhcp snooping vlan 20".to_string()));
    }

    #[test]
    fn test_vlan_interface_admin_state() {
        let mut sw = cisco_switch();
        sw.set_vlan_interface(
            10,
            VlanInterfaceConfig {
                ip: "10.0.0.1".to_string(),
                mask: "255.255.255.0".to_string(),
                shutdown: true,
                ..Default::default()
            },
        );
        sw.set_vlan_interface(20, VlanInterfaceConfig::default());
        let lines = CiscoRenderer.render(&sw);
        let iface10 = lines.iter().position(|l| l == "interface Vlan10").unwrap();
        assert_eq!(lines[iface10 + 1], " ip address 10.0.0.1 255.255.255.0");
        assert_eq!(lines[iface10 + 2], " shutdown");
        // No ip/mask, so no address line; interface is brought up
        let iface20 = lines.iter().position(|l| l == "interface Vlan20").unwrap();
        assert_eq!(lines[iface20 + 1], " no shutdown");
    }
}
