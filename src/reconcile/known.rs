// src/reconcile/known.rs

//! Legacy artifacts shipped by Ubuntu images

use super::{LegacyArtifactSpec, MatchPolicy};

/// Ubuntu cloud images used to ship a hard-coded `eth0.cfg` that is
/// sourced from `/etc/network/interfaces` and brings eth0 up with DHCP
/// regardless of the rendered configuration.
pub const ETH0_LEGACY_CONFIG: LegacyArtifactSpec<'static> = LegacyArtifactSpec {
    path: "etc/network/interfaces.d/eth0.cfg",
    expected_lines: &["auto eth0", "iface eth0 inet dhcp"],
    on_match: MatchPolicy::Delete,
    consequence: "Dynamic networking config may not apply.",
};

/// Left in place of the removed IPv6 privacy extensions file
pub const IPV6_PRIVACY_ANNOTATION: &str = "\
# IPv6 Privacy Extensions (RFC 4941)
# Disabled by netseed
# net.ipv6.conf.all.use_tempaddr = 2
# net.ipv6.conf.default.use_tempaddr = 2
";

/// Ubuntu server images enable IPv6 privacy extensions by default, which
/// races with cloud images that disable them. The cloud setting wins.
pub const IPV6_PRIVACY_CONFIG: LegacyArtifactSpec<'static> = LegacyArtifactSpec {
    path: "etc/sysctl.d/10-ipv6-privacy.conf",
    expected_lines: &[
        "net.ipv6.conf.all.use_tempaddr = 2",
        "net.ipv6.conf.default.use_tempaddr = 2",
    ],
    on_match: MatchPolicy::DeleteAndAnnotate(IPV6_PRIVACY_ANNOTATION),
    consequence: "Disabling IPv6 privacy extensions config may not apply.",
};

/// Artifacts reconciled after every render, in order
pub const LEGACY_ARTIFACTS: [LegacyArtifactSpec<'static>; 2] =
    [ETH0_LEGACY_CONFIG, IPV6_PRIVACY_CONFIG];
