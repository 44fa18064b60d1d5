// src/net/mod.rs

//! Network state: the canonical model handed to renderers
//!
//! A `NetworkState` is built once per apply, either by loading a state file
//! written by an earlier run or by translating a declarative network
//! config, and is never modified afterwards.
//!
//! # Example network state file
//!
//! ```yaml
//! version: 1
//! interfaces:
//!   - name: eth0
//!     type: physical
//!     mac_address: "52:54:00:12:34:00"
//!     mtu: 9000
//!     subnets:
//!       - type: static
//!         address: 192.168.1.10/24
//!         gateway: 192.168.1.1
//!       - type: dhcp6
//! dns:
//!   nameservers: [192.168.1.1]
//!   search: [example.com]
//! ```

pub mod config;
pub mod render;
pub mod resolve;
pub mod state;

pub use config::parse_net_config;
pub use render::{EniRenderer, Renderer};
pub use resolve::resolve;
pub use state::{from_state_file, save_state_file};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Current network state schema version
pub const NETWORK_STATE_VERSION: u32 = 1;

/// Canonical description of the target's networking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkState {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub interfaces: Vec<Interface>,

    /// Routes not tied to a particular subnet
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,

    /// Global resolver settings
    #[serde(default)]
    pub dns: Dns,
}

fn default_version() -> u32 {
    NETWORK_STATE_VERSION
}

impl Default for NetworkState {
    fn default() -> Self {
        Self {
            version: NETWORK_STATE_VERSION,
            interfaces: Vec::new(),
            routes: Vec::new(),
            dns: Dns::default(),
        }
    }
}

/// Interface kinds, in the order renderers must emit them
///
/// Bonds and bridges reference physical devices, and vlans may sit on top
/// of either, so later kinds come after the devices they use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    Physical,
    Bond,
    Bridge,
    Vlan,
}

/// A network interface and its addressing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: InterfaceKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,

    /// Kind-specific options passed through to the renderer
    /// (`bond-mode`, `bridge_ports`, `vlan-raw-device`, ...)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, serde_yaml::Value>,

    #[serde(default)]
    pub subnets: Vec<Subnet>,
}

impl Interface {
    pub fn new(name: impl Into<String>, kind: InterfaceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            mac_address: None,
            mtu: None,
            params: BTreeMap::new(),
            subnets: Vec::new(),
        }
    }
}

/// How a subnet obtains its address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubnetKind {
    #[serde(alias = "dhcp")]
    Dhcp4,
    Dhcp6,
    Static,
    Static6,
    Manual,
}

impl SubnetKind {
    pub fn is_dhcp(self) -> bool {
        matches!(self, SubnetKind::Dhcp4 | SubnetKind::Dhcp6)
    }

    pub fn is_static(self) -> bool {
        matches!(self, SubnetKind::Static | SubnetKind::Static6)
    }
}

/// When the init system brings a subnet up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    #[default]
    Auto,
    Hotplug,
    Manual,
}

/// One address configuration on an interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subnet {
    #[serde(rename = "type")]
    pub kind: SubnetKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<String>,

    #[serde(default)]
    pub control: Control,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_nameservers: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dns_search: Vec<String>,
}

impl Subnet {
    pub fn new(kind: SubnetKind) -> Self {
        Self {
            kind,
            address: None,
            netmask: None,
            gateway: None,
            control: Control::Auto,
            dns_nameservers: Vec::new(),
            dns_search: Vec::new(),
        }
    }

    /// Whether this subnet configures IPv6
    pub fn is_ipv6(&self) -> bool {
        match self.kind {
            SubnetKind::Dhcp6 | SubnetKind::Static6 => true,
            SubnetKind::Static => self.address.as_deref().is_some_and(|a| a.contains(':')),
            SubnetKind::Dhcp4 | SubnetKind::Manual => false,
        }
    }
}

/// A static route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Destination network, either CIDR or paired with `netmask`
    #[serde(alias = "destination")]
    pub network: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,

    pub gateway: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<u32>,
}

/// Resolver configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dns {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nameservers: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search: Vec<String>,
}

impl NetworkState {
    /// Check the invariants every source must satisfy
    pub fn validate(&self) -> Result<()> {
        if self.version != NETWORK_STATE_VERSION {
            return Err(Error::UnsupportedConfig(format!(
                "network state version {} (expected {})",
                self.version, NETWORK_STATE_VERSION
            )));
        }

        let mut seen = HashSet::new();
        for iface in &self.interfaces {
            if iface.name.trim().is_empty() {
                return Err(Error::ParseError("interface with empty name".to_string()));
            }
            if iface.name == "lo" {
                return Err(Error::ParseError(
                    "loopback is managed implicitly and cannot be configured".to_string(),
                ));
            }
            if !seen.insert(iface.name.as_str()) {
                return Err(Error::ParseError(format!(
                    "duplicate interface name: {}",
                    iface.name
                )));
            }
            for subnet in &iface.subnets {
                if subnet.kind.is_static() && subnet.address.is_none() {
                    return Err(Error::ParseError(format!(
                        "static subnet on {} has no address",
                        iface.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Look up an interface by name
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }
}
