// src/net/render/eni.rs

//! ifupdown (`/etc/network/interfaces`) renderer

use super::Renderer;
use crate::error::Result;
use crate::filesystem::{target_path, write_file_atomic, CONFIG_MODE};
use crate::net::{Control, Interface, InterfaceKind, NetworkState, Route, Subnet, SubnetKind};
use std::path::Path;
use tracing::info;

pub const ENI_PATH: &str = "etc/network/interfaces";
pub const NET_RULES_PATH: &str = "etc/udev/rules.d/70-persistent-net.rules";
pub const CLOUD_INIT_DISABLE_PATH: &str =
    "etc/cloud/cloud.cfg.d/netseed-disable-cloudinit-networking.cfg";

const CLOUD_INIT_DISABLE: &str = "network: {config: disabled}\n";
const SOURCE_FRAGMENTS: &str = "source /etc/network/interfaces.d/*.cfg";
const INDENT: &str = "    ";

/// Renderer producing ifupdown configuration, udev naming rules and the
/// cloud-init opt-out
#[derive(Debug, Default, Clone, Copy)]
pub struct EniRenderer;

impl EniRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for EniRenderer {
    fn render(&self, target: &Path, state: &NetworkState, postup_alias: bool) -> Result<()> {
        let eni = target_path(target, ENI_PATH)?;
        info!("Writing {} (postup alias: {})", eni.display(), postup_alias);
        write_file_atomic(
            &eni,
            render_interfaces(state, postup_alias).as_bytes(),
            CONFIG_MODE,
        )?;

        let rules = target_path(target, NET_RULES_PATH)?;
        write_file_atomic(&rules, render_persistent_net(state).as_bytes(), CONFIG_MODE)?;

        // Stop cloud-init from regenerating networking on first boot
        let disable = target_path(target, CLOUD_INIT_DISABLE_PATH)?;
        write_file_atomic(&disable, CLOUD_INIT_DISABLE.as_bytes(), CONFIG_MODE)?;

        Ok(())
    }
}

/// Render the contents of `/etc/network/interfaces`
pub fn render_interfaces(state: &NetworkState, postup_alias: bool) -> String {
    let mut stanzas: Vec<Vec<String>> = Vec::new();

    let mut loopback = vec!["auto lo".to_string(), "iface lo inet loopback".to_string()];
    if !state.dns.nameservers.is_empty() {
        loopback.push(format!("{INDENT}dns-nameservers {}", state.dns.nameservers.join(" ")));
    }
    if !state.dns.search.is_empty() {
        loopback.push(format!("{INDENT}dns-search {}", state.dns.search.join(" ")));
    }
    for route in &state.routes {
        loopback.extend(route_lines(route));
    }
    stanzas.push(loopback);

    let mut interfaces: Vec<&Interface> = state.interfaces.iter().collect();
    interfaces.sort_by(|a, b| (a.kind, &a.name).cmp(&(b.kind, &b.name)));
    for iface in interfaces {
        stanzas.extend(interface_stanzas(iface, postup_alias));
    }

    let mut content = stanzas
        .into_iter()
        .map(|lines| lines.join("\n") + "\n")
        .collect::<Vec<_>>()
        .join("\n");
    content.push('\n');
    content.push_str(SOURCE_FRAGMENTS);
    content.push('\n');
    content
}

fn interface_stanzas(iface: &Interface, postup_alias: bool) -> Vec<Vec<String>> {
    if iface.subnets.is_empty() {
        let mut lines = Vec::new();
        // Bond slaves must be up for the bond to assemble
        if iface.kind != InterfaceKind::Physical || iface.params.contains_key("bond-master") {
            lines.push(format!("auto {}", iface.name));
        }
        lines.push(format!("iface {} inet manual", iface.name));
        lines.extend(interface_attrs(iface));
        return vec![lines];
    }

    let alias_count = iface.subnets.len() - 1;

    iface
        .subnets
        .iter()
        .enumerate()
        .map(|(index, subnet)| {
            let fullname = if index == 0 {
                iface.name.clone()
            } else {
                format!("{}:{}", iface.name, index)
            };

            let mut lines = Vec::new();
            // With postup aliases the base stanza brings aliases up itself
            if !(postup_alias && index > 0) {
                lines.push(match subnet.control {
                    Control::Auto => format!("auto {fullname}"),
                    Control::Hotplug => format!("allow-hotplug {fullname}"),
                    Control::Manual => format!("# control-manual {fullname}"),
                });
            }

            let family = if subnet.is_ipv6() { "inet6" } else { "inet" };
            let method = match subnet.kind {
                SubnetKind::Dhcp4 | SubnetKind::Dhcp6 => "dhcp",
                SubnetKind::Static | SubnetKind::Static6 => "static",
                SubnetKind::Manual => "manual",
            };
            lines.push(format!("iface {fullname} {family} {method}"));
            lines.extend(subnet_lines(subnet));

            if let Some(mtu) = iface.mtu {
                lines.push(format!("{INDENT}mtu {mtu}"));
            }

            if index == 0 {
                lines.extend(interface_attrs(iface));
                if postup_alias {
                    for alias in 1..=alias_count {
                        lines.push(format!("{INDENT}post-up ifup {}:{}", iface.name, alias));
                        lines.push(format!("{INDENT}pre-down ifdown {}:{}", iface.name, alias));
                    }
                }
            }

            lines
        })
        .collect()
}

fn subnet_lines(subnet: &Subnet) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(address) = &subnet.address {
        lines.push(format!("{INDENT}address {address}"));
    }
    if let Some(netmask) = &subnet.netmask {
        lines.push(format!("{INDENT}netmask {netmask}"));
    }
    if let Some(gateway) = &subnet.gateway {
        lines.push(format!("{INDENT}gateway {gateway}"));
    }
    if !subnet.dns_nameservers.is_empty() {
        lines.push(format!("{INDENT}dns-nameservers {}", subnet.dns_nameservers.join(" ")));
    }
    if !subnet.dns_search.is_empty() {
        lines.push(format!("{INDENT}dns-search {}", subnet.dns_search.join(" ")));
    }
    lines
}

/// Interface-wide options, emitted once on the first stanza
fn interface_attrs(iface: &Interface) -> Vec<String> {
    let mut lines = Vec::new();

    // Physical devices are named by udev rules instead
    if iface.kind != InterfaceKind::Physical
        && let Some(mac) = &iface.mac_address
    {
        lines.push(format!("{INDENT}hwaddress ether {mac}"));
    }

    for (key, value) in &iface.params {
        if let Some(value) = param_value(value) {
            lines.push(format!("{INDENT}{key} {value}"));
        }
    }

    lines
}

fn param_value(value: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("on".to_string()),
        Value::Bool(false) => Some("off".to_string()),
        Value::Sequence(items) => {
            let items: Vec<String> = items.iter().filter_map(param_value).collect();
            (!items.is_empty()).then(|| items.join(" "))
        }
        Value::Null | Value::Mapping(_) | Value::Tagged(_) => None,
    }
}

fn route_lines(route: &Route) -> Vec<String> {
    let ipv6 = route.network.contains(':');
    let is_default = matches!(
        route.network.as_str(),
        "default" | "0.0.0.0" | "0.0.0.0/0" | "::" | "::/0"
    ) && route.netmask.as_deref().is_none_or(|m| m == "0.0.0.0" || m == "0");

    let mut spec = match (is_default, ipv6) {
        (true, true) => "-A inet6 default".to_string(),
        (true, false) => "default".to_string(),
        (false, true) => format!("-A inet6 {}", route.network),
        (false, false) => match &route.netmask {
            Some(netmask) => format!("-net {} netmask {}", route.network, netmask),
            None => format!("-net {}", route.network),
        },
    };
    spec.push_str(&format!(" gw {}", route.gateway));
    if let Some(metric) = route.metric {
        spec.push_str(&format!(" metric {}", metric));
    }

    vec![
        format!("{INDENT}post-up route add {spec}"),
        format!("{INDENT}pre-down route del {spec}"),
    ]
}

/// Render udev rules pinning physical interface names to MAC addresses
pub fn render_persistent_net(state: &NetworkState) -> String {
    let mut physical: Vec<&Interface> = state
        .interfaces
        .iter()
        .filter(|i| i.kind == InterfaceKind::Physical && i.mac_address.is_some())
        .collect();
    physical.sort_by(|a, b| a.name.cmp(&b.name));

    physical
        .into_iter()
        .filter_map(|iface| {
            iface.mac_address.as_ref().map(|mac| {
                format!(
                    "SUBSYSTEM==\"net\", ACTION==\"add\", DRIVERS==\"?*\", ATTR{{address}}==\"{}\", NAME=\"{}\"\n",
                    mac.to_lowercase(),
                    iface.name
                )
            })
        })
        .collect()
}
