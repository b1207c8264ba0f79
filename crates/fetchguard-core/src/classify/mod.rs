//! Hostname and IP classification against the static rule table.
//!
//! [`classify`] accepts whatever appears in a URL's host position: a DNS name,
//! a dotted-quad IPv4 address, or an IPv6 address with or without brackets.
//! [`classify_ip`] is used on resolver answers. Both are pure and total: every
//! input maps to exactly one [`HostClass`], and unmatched input is
//! [`HostClass::Public`].

mod pattern;
mod rules;

pub use pattern::{Pattern, PatternError};
pub use rules::{rules, ClassificationRule, RULE_TABLE};

use serde::Serialize;
use std::fmt;
use std::net::IpAddr;

/// Label assigned to a host or address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostClass {
    Loopback,
    /// RFC 1918 IPv4 and IPv6 unique-local (`fc00::/7`).
    Private,
    LinkLocal,
    MulticastOrBroadcast,
    ReservedTestNet,
    CloudMetadata,
    /// Hostname under an internal-only suffix (`.local`, `.internal`).
    InternalName,
    Public,
}

impl HostClass {
    pub fn is_blocked(self) -> bool {
        self != HostClass::Public
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HostClass::Loopback => "loopback",
            HostClass::Private => "private",
            HostClass::LinkLocal => "link-local",
            HostClass::MulticastOrBroadcast => "multicast-or-broadcast",
            HostClass::ReservedTestNet => "reserved-test-net",
            HostClass::CloudMetadata => "cloud-metadata",
            HostClass::InternalName => "internal-name",
            HostClass::Public => "public",
        }
    }
}

impl fmt::Display for HostClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a hostname or IP literal (case-insensitive).
pub fn classify(host: &str) -> HostClass {
    matching_rule(host).map_or(HostClass::Public, |rule| rule.class)
}

/// Classify a resolved address.
pub fn classify_ip(ip: IpAddr) -> HostClass {
    matching_ip_rule(ip).map_or(HostClass::Public, |rule| rule.class)
}

/// The first rule matching `host`, if any.
pub fn matching_rule(host: &str) -> Option<&'static ClassificationRule> {
    if let Some(ip) = parse_ip_literal(host) {
        return matching_ip_rule(ip);
    }
    let name = normalize_name(host);
    rules().iter().find(|rule| rule.pattern.matches_name(&name))
}

/// The first rule matching `ip`, if any.
///
/// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) are matched as their IPv4 form.
pub fn matching_ip_rule(ip: IpAddr) -> Option<&'static ClassificationRule> {
    let ip = canonical_ip(ip);
    rules().iter().find(|rule| rule.pattern.matches_ip(ip))
}

/// Parse `host` as an IP literal, accepting `[v6]` brackets and a v6 zone id.
pub fn parse_ip_literal(host: &str) -> Option<IpAddr> {
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    if let Ok(ip) = bare.parse::<IpAddr>() {
        return Some(ip);
    }
    if bare.contains(':') {
        // fe80::1%eth0
        let (addr, _zone) = bare.split_once('%')?;
        return addr.parse::<IpAddr>().ok();
    }
    None
}

fn canonical_ip(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map_or(IpAddr::V6(v6), IpAddr::V4),
        IpAddr::V4(_) => ip,
    }
}

fn normalize_name(host: &str) -> String {
    let host = host.strip_suffix('.').unwrap_or(host);
    host.to_ascii_lowercase()
}
