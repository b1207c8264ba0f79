//! Scheme gate: the first check applied to a parsed URL.
//!
//! Only `http` and `https` may be fetched. Schemes that can read local
//! resources or speak to non-HTTP services are listed separately so the deny
//! side stays auditable, but anything outside the allow-list is refused.

/// Schemes the fetcher is permitted to use.
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Known-dangerous schemes. Informational: rejection does not depend on this list.
pub const DENIED_SCHEMES: &[&str] = &[
    "file", "ftp", "gopher", "data", "dict", "php", "expect", "jar",
];

/// Returns true only for `http` and `https` (case-insensitive).
pub fn is_allowed_scheme(scheme: &str) -> bool {
    ALLOWED_SCHEMES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(scheme))
}

/// Returns true if the scheme is one of the documented dangerous schemes.
pub fn is_known_dangerous(scheme: &str) -> bool {
    DENIED_SCHEMES
        .iter()
        .any(|denied| denied.eq_ignore_ascii_case(scheme))
}
