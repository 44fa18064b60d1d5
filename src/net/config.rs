// src/net/config.rs

//! Parser for declarative (version 1) network config files
//!
//! ```yaml
//! network:
//!   version: 1
//!   config:
//!     - type: physical
//!       name: eth0
//!       mac_address: "52:54:00:12:34:00"
//!       subnets:
//!         - type: static
//!           address: 192.168.1.10/24
//!           gateway: 192.168.1.1
//!     - type: bond
//!       name: bond0
//!       bond_interfaces: [eth1, eth2]
//!       params:
//!         bond-mode: active-backup
//!     - type: nameserver
//!       address: [192.168.1.1]
//!       search: [example.com]
//!     - type: route
//!       destination: 10.0.0.0/8
//!       gateway: 192.168.1.254
//! ```

use super::{Interface, InterfaceKind, NetworkState, Route, Subnet, NETWORK_STATE_VERSION};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Key under which the config may be nested
const NETWORK_KEY: &str = "network";

/// Top level of a version 1 network config
#[derive(Debug, Deserialize)]
struct NetworkConfigV1 {
    version: u32,
    #[serde(default)]
    config: Vec<ConfigEntry>,
}

/// One entry of the `config:` list
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ConfigEntry {
    Physical(DeviceEntry),
    Bond(BondEntry),
    Bridge(BridgeEntry),
    Vlan(VlanEntry),
    Nameserver(NameserverEntry),
    Route(Route),
}

/// Fields shared by every interface entry
#[derive(Debug, Deserialize)]
struct DeviceEntry {
    name: String,
    #[serde(default)]
    mac_address: Option<String>,
    #[serde(default)]
    mtu: Option<u32>,
    #[serde(default)]
    params: BTreeMap<String, serde_yaml::Value>,
    #[serde(default)]
    subnets: Vec<Subnet>,
}

#[derive(Debug, Deserialize)]
struct BondEntry {
    #[serde(flatten)]
    device: DeviceEntry,
    bond_interfaces: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BridgeEntry {
    #[serde(flatten)]
    device: DeviceEntry,
    bridge_interfaces: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VlanEntry {
    #[serde(flatten)]
    device: DeviceEntry,
    vlan_link: String,
    vlan_id: u16,
}

#[derive(Debug, Deserialize)]
struct NameserverEntry {
    #[serde(default)]
    address: OneOrMany,
    #[serde(default)]
    search: OneOrMany,
}

/// A scalar or a list of scalars
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    #[default]
    None,
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::None => Vec::new(),
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

impl DeviceEntry {
    fn into_interface(self, kind: InterfaceKind) -> Interface {
        Interface {
            name: self.name,
            kind,
            mac_address: self.mac_address,
            mtu: self.mtu,
            params: self.params,
            subnets: self.subnets,
        }
    }
}

/// Translate a parsed config into network state
struct StateBuilder {
    state: NetworkState,
}

impl StateBuilder {
    fn new() -> Self {
        Self {
            state: NetworkState::default(),
        }
    }

    fn member_mut(&mut self, owner: &str, name: &str) -> Result<&mut Interface> {
        self.state
            .interfaces
            .iter_mut()
            .find(|i| i.name == name)
            .ok_or_else(|| {
                Error::ParseError(format!(
                    "{} references undefined interface {}",
                    owner, name
                ))
            })
    }

    fn apply(&mut self, entry: ConfigEntry) -> Result<()> {
        match entry {
            ConfigEntry::Physical(device) => {
                self.state
                    .interfaces
                    .push(device.into_interface(InterfaceKind::Physical));
            }
            ConfigEntry::Bond(bond) => {
                let name = bond.device.name.clone();
                for slave in &bond.bond_interfaces {
                    self.member_mut(&name, slave)?
                        .params
                        .insert("bond-master".to_string(), name.clone().into());
                }
                let mut iface = bond.device.into_interface(InterfaceKind::Bond);
                iface.params.insert(
                    "bond-slaves".to_string(),
                    bond.bond_interfaces.join(" ").into(),
                );
                self.state.interfaces.push(iface);
            }
            ConfigEntry::Bridge(bridge) => {
                let name = bridge.device.name.clone();
                for port in &bridge.bridge_interfaces {
                    self.member_mut(&name, port)?;
                }
                let mut iface = bridge.device.into_interface(InterfaceKind::Bridge);
                iface.params.insert(
                    "bridge_ports".to_string(),
                    bridge.bridge_interfaces.join(" ").into(),
                );
                self.state.interfaces.push(iface);
            }
            ConfigEntry::Vlan(vlan) => {
                let name = vlan.device.name.clone();
                self.member_mut(&name, &vlan.vlan_link)?;
                let mut iface = vlan.device.into_interface(InterfaceKind::Vlan);
                iface
                    .params
                    .insert("vlan-raw-device".to_string(), vlan.vlan_link.into());
                iface
                    .params
                    .insert("vlan_id".to_string(), u64::from(vlan.vlan_id).into());
                self.state.interfaces.push(iface);
            }
            ConfigEntry::Nameserver(ns) => {
                self.state.dns.nameservers.extend(ns.address.into_vec());
                self.state.dns.search.extend(ns.search.into_vec());
            }
            ConfigEntry::Route(route) => {
                self.state.routes.push(route);
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<NetworkState> {
        self.state.validate()?;
        Ok(self.state)
    }
}

/// Parse a declarative network config document
///
/// Accepts the config either at the top level or nested under `network:`.
pub fn parse_config(content: &str) -> Result<NetworkState> {
    let document: serde_yaml::Value = serde_yaml::from_str(content)?;

    let document = match document {
        serde_yaml::Value::Mapping(mut map) => match map.remove(NETWORK_KEY) {
            Some(inner) => inner,
            None => serde_yaml::Value::Mapping(map),
        },
        _ => {
            return Err(Error::ParseError(
                "network config document must be a mapping".to_string(),
            ));
        }
    };

    let version = document
        .get("version")
        .and_then(serde_yaml::Value::as_u64)
        .ok_or_else(|| Error::ParseError("network config has no version".to_string()))?;
    if version != u64::from(NETWORK_STATE_VERSION) {
        return Err(Error::UnsupportedConfig(format!(
            "network config version {} (only version {} is supported)",
            version, NETWORK_STATE_VERSION
        )));
    }

    let config: NetworkConfigV1 = serde_yaml::from_value(document)
        .map_err(|e| Error::ParseError(format!("Invalid network config: {}", e)))?;
    debug!(
        "Network config version {} with {} entries",
        config.version,
        config.config.len()
    );

    let mut builder = StateBuilder::new();
    for entry in config.config {
        builder.apply(entry)?;
    }
    builder.finish()
}

/// Load and parse a declarative network config file
pub fn parse_net_config(path: &Path) -> Result<NetworkState> {
    debug!("Parsing network config from {}", path.display());
    let content = fs::read_to_string(path).map_err(|e| {
        Error::IoError(format!("Failed to read network config {}: {}", path.display(), e))
    })?;
    parse_config(&content)
}
