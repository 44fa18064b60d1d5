// src/hooks/mod.rs

//! ifupdown hook scripts installed into the target
//!
//! ifupdown sets the device MTU when an `inet` stanza is brought up, which
//! also clamps the IPv6 MTU, and it has no way to set an IPv6 MTU larger
//! than the device MTU. The pair of hooks below snapshots both MTUs before
//! an interface comes up and repairs them afterwards.
//!
//! Installation is mandatory: a failure aborts the whole apply.

use crate::error::Result;
use crate::filesystem::{target_path, write_file_atomic, EXEC_MODE};
use crate::report::Reporter;
use std::path::{Path, PathBuf};

/// A fixed script written into the target root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookSpec<'a> {
    /// Path relative to the target root
    pub install_path: &'a str,
    pub content: &'a str,
    pub mode: u32,
}

/// Records the device and IPv6 MTU before an interface is configured
pub const IPV6_MTU_PRE_HOOK_SCRIPT: &str = r#"#!/bin/sh -x
# injected by netseed installer

[ "$IFACE" != "lo" ] || exit 0

# Trigger only if MTU configured
[ -n "$IF_MTU" ] || exit 0

CUR_DEV_MTU=$(/bin/cat /sys/class/net/$IFACE/mtu ||:)
CUR_IPV6_MTU=$(sysctl -n net.ipv6.conf.$IFACE.mtu ||:)
[ -n "$CUR_DEV_MTU" ] && echo $CUR_DEV_MTU > /run/network/${IFACE}_dev.mtu
[ -n "$CUR_IPV6_MTU" ] && echo $CUR_IPV6_MTU > /run/network/${IFACE}_ipv6.mtu
exit 0
"#;

/// Raises the device MTU for inet6 stanzas and undoes the inet clobber
pub const IPV6_MTU_POST_HOOK_SCRIPT: &str = r#"#!/bin/sh -x
# injected by netseed installer

[ "$IFACE" != "lo" ] || exit 0

# Trigger only if MTU configured
[ -n "$IF_MTU" ] || exit 0

PRE_DEV_MTU=$(cat /run/network/${IFACE}_dev.mtu)
CUR_DEV_MTU=$(/bin/cat /sys/class/net/$IFACE/mtu)
PRE_IPV6_MTU=$(cat /run/network/${IFACE}_ipv6.mtu)
CUR_IPV6_MTU=$(sysctl -n net.ipv6.conf.$IFACE.mtu)

if [ "$ADDRFAM" = "inet6" ]; then
  # We need to check the underlying interface MTU and
  # raise it if the IPV6 mtu is larger
  if [ $CUR_DEV_MTU -lt $IF_MTU ]; then
      /bin/ip link set $IFACE mtu $IF_MTU
  fi
  /sbin/sysctl -q -e -w net.ipv6.conf.$IFACE.mtu=$IF_MTU

elif [ "$ADDRFAM" = "inet" ]; then
  # handle the clobber case where inet mtu changes v6 mtu.
  # ifupdown will already have set dev mtu, so lower mtu
  # if needed.  If v6 mtu was larger, it gets clamped down
  # to the dev MTU value.
  if [ $PRE_IPV6_MTU -lt $CUR_IPV6_MTU ]; then
    /sbin/sysctl -q -e -w net.ipv6.conf.$IFACE.mtu=$PRE_IPV6_MTU
  fi
fi
exit 0
"#;

pub const IPV6_MTU_PRE_HOOK: HookSpec<'static> = HookSpec {
    install_path: "etc/network/if-pre-up.d/mtuipv6",
    content: IPV6_MTU_PRE_HOOK_SCRIPT,
    mode: EXEC_MODE,
};

pub const IPV6_MTU_POST_HOOK: HookSpec<'static> = HookSpec {
    install_path: "etc/network/if-up.d/mtuipv6",
    content: IPV6_MTU_POST_HOOK_SCRIPT,
    mode: EXEC_MODE,
};

/// Both IPv6 MTU hooks, in installation order
pub const IPV6_MTU_HOOKS: [HookSpec<'static>; 2] = [IPV6_MTU_PRE_HOOK, IPV6_MTU_POST_HOOK];

/// Write every hook into `target`, overwriting what is there
///
/// Stops at the first failure. Returns the absolute paths written.
pub fn install_hooks(
    target: &Path,
    specs: &[HookSpec<'_>],
    reporter: &dyn Reporter,
) -> Result<Vec<PathBuf>> {
    let mut installed = Vec::with_capacity(specs.len());

    for spec in specs {
        let path = target_path(target, spec.install_path)?;
        write_file_atomic(&path, spec.content.as_bytes(), spec.mode)?;
        reporter.hook_installed(&path);
        installed.push(path);
    }

    Ok(installed)
}
