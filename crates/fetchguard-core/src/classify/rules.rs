//! The compiled-in classification table.
//!
//! This table is the whole blocking policy. Entries are evaluated in order and
//! the first match wins; narrower entries that sit inside a broader blocked
//! range (cloud metadata inside link-local, `fd00::/8` inside `fc00::/7`) come
//! first. Anything that matches no entry is public.

use super::pattern::Pattern;
use super::HostClass;
use once_cell::sync::Lazy;

/// Textual rule table: (pattern, label).
pub const RULE_TABLE: &[(&str, HostClass)] = &[
    // Cloud metadata endpoints
    ("169.254.169.254", HostClass::CloudMetadata),
    ("169.254.170.2", HostClass::CloudMetadata),
    ("fd00:ec2::254", HostClass::CloudMetadata),
    ("metadata.google.internal", HostClass::CloudMetadata),
    // Loopback
    ("127.0.0.0/8", HostClass::Loopback),
    ("::1", HostClass::Loopback),
    ("localhost", HostClass::Loopback),
    // RFC 1918 and IPv6 unique-local
    ("10.0.0.0/8", HostClass::Private),
    ("172.16.0.0/12", HostClass::Private),
    ("192.168.0.0/16", HostClass::Private),
    ("fd00::/8", HostClass::Private),
    ("fc00::/7", HostClass::Private),
    // Link-local
    ("169.254.0.0/16", HostClass::LinkLocal),
    ("fe80::/10", HostClass::LinkLocal),
    // Multicast and limited broadcast
    ("224.0.0.0/4", HostClass::MulticastOrBroadcast),
    ("255.255.255.255", HostClass::MulticastOrBroadcast),
    // "This network" and documentation ranges
    ("0.0.0.0/8", HostClass::ReservedTestNet),
    ("192.0.2.0/24", HostClass::ReservedTestNet),
    ("198.51.100.0/24", HostClass::ReservedTestNet),
    ("203.0.113.0/24", HostClass::ReservedTestNet),
    // Internal-only name suffixes
    (".local", HostClass::InternalName),
    (".internal", HostClass::InternalName),
];

/// A parsed entry of [`RULE_TABLE`].
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pub pattern: Pattern,
    pub class: HostClass,
    /// Pattern text as written in the table.
    pub source: &'static str,
}

static RULES: Lazy<Vec<ClassificationRule>> = Lazy::new(|| {
    RULE_TABLE
        .iter()
        .map(|&(source, class)| ClassificationRule {
            // Constant table; a bad entry is a programming error.
            pattern: Pattern::parse(source).unwrap_or_else(|e| panic!("{e}")),
            class,
            source,
        })
        .collect()
});

/// The parsed rule table, built on first use and never modified.
pub fn rules() -> &'static [ClassificationRule] {
    &RULES
}
