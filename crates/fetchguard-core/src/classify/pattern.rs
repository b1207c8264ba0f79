//! Rule patterns: CIDR ranges, exact hostnames, and hostname suffixes.

use ipnet::IpNet;
use std::fmt;
use std::net::IpAddr;

/// Error for a rule pattern that cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("invalid rule pattern {pattern:?}: {message}")]
pub struct PatternError {
    pub pattern: String,
    pub message: String,
}

/// One matchable pattern in the rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// IPv4 or IPv6 range; a bare address is a single-host range.
    Net(IpNet),
    /// Exact hostname, lowercase.
    Name(String),
    /// Hostname suffix including the leading dot (e.g. `.local`), lowercase.
    Suffix(String),
}

impl Pattern {
    /// Parse the textual form used in the rule table.
    ///
    /// `a.b.c.d/n` or `x::y/n` is a range, a bare address is a host range,
    /// `.name` is a suffix, anything else is an exact hostname.
    pub fn parse(text: &str) -> Result<Self, PatternError> {
        let text = text.trim();
        let err = |message: &str| PatternError {
            pattern: text.to_string(),
            message: message.to_string(),
        };

        if text.is_empty() {
            return Err(err("empty pattern"));
        }
        if text.contains('/') {
            let net: IpNet = text.parse().map_err(|_| err("not a CIDR range"))?;
            if net.trunc() != net {
                return Err(err("range has host bits set"));
            }
            return Ok(Pattern::Net(net));
        }
        if let Ok(ip) = text.parse::<IpAddr>() {
            return Ok(Pattern::Net(IpNet::from(ip)));
        }
        if text.contains(':') {
            return Err(err("not an IP address"));
        }
        if let Some(rest) = text.strip_prefix('.') {
            if rest.is_empty() || rest.starts_with('.') {
                return Err(err("empty suffix label"));
            }
            return Ok(Pattern::Suffix(text.to_ascii_lowercase()));
        }
        Ok(Pattern::Name(text.to_ascii_lowercase()))
    }

    pub fn matches_ip(&self, ip: IpAddr) -> bool {
        match self {
            Pattern::Net(net) => net.contains(&ip),
            Pattern::Name(_) | Pattern::Suffix(_) => false,
        }
    }

    /// `name` must already be lowercase with any trailing dot removed.
    pub fn matches_name(&self, name: &str) -> bool {
        match self {
            Pattern::Name(exact) => name == exact,
            Pattern::Suffix(suffix) => name.ends_with(suffix.as_str()),
            Pattern::Net(_) => false,
        }
    }

    /// True if every input matched by `other` is also matched by `self`.
    pub fn covers(&self, other: &Pattern) -> bool {
        match (self, other) {
            (Pattern::Net(a), Pattern::Net(b)) => a.contains(b),
            (Pattern::Name(a), Pattern::Name(b)) => a == b,
            (Pattern::Suffix(a), Pattern::Name(b)) => b.ends_with(a.as_str()),
            (Pattern::Suffix(a), Pattern::Suffix(b)) => b.ends_with(a.as_str()),
            _ => false,
        }
    }

    /// True if some input is matched by both patterns.
    pub fn overlaps(&self, other: &Pattern) -> bool {
        self.covers(other) || other.covers(self)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Net(net) => write!(f, "{}", net),
            Pattern::Name(name) => write!(f, "{}", name),
            Pattern::Suffix(suffix) => write!(f, "*{}", suffix),
        }
    }
}
