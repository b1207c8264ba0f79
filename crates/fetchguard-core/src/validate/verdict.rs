//! Verdict and rejection reasons returned to the fetcher.

use serde::Serialize;
use std::fmt;
use std::net::IpAddr;

/// Why a URL was judged unsafe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RejectionReason {
    /// The input could not be parsed as a URL with a host.
    InvalidUrl,
    /// Scheme is not `http` or `https`.
    UnsupportedProtocol,
    /// The literal host matches a blocked pattern.
    BlockedHost,
    /// DNS returned at least one blocked address.
    BlockedAddress,
    /// DNS failed, timed out, or was cancelled.
    ResolutionFailure,
}

impl RejectionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            RejectionReason::InvalidUrl => "InvalidUrl",
            RejectionReason::UnsupportedProtocol => "UnsupportedProtocol",
            RejectionReason::BlockedHost => "BlockedHost",
            RejectionReason::BlockedAddress => "BlockedAddress",
            RejectionReason::ResolutionFailure => "ResolutionFailure",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one validation call. Never cached: DNS answers change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub safe: bool,
    pub reason: Option<RejectionReason>,
    /// Addresses the decision was made on; `None` when DNS was not consulted.
    #[serde(rename = "resolvedAddresses")]
    pub resolved_addresses: Option<Vec<IpAddr>>,
}

impl Verdict {
    pub fn allowed(resolved_addresses: Option<Vec<IpAddr>>) -> Self {
        Self {
            safe: true,
            reason: None,
            resolved_addresses,
        }
    }

    pub fn rejected(reason: RejectionReason) -> Self {
        Self {
            safe: false,
            reason: Some(reason),
            resolved_addresses: None,
        }
    }

    pub fn rejected_with_addresses(reason: RejectionReason, addresses: Vec<IpAddr>) -> Self {
        Self {
            safe: false,
            reason: Some(reason),
            resolved_addresses: Some(addresses),
        }
    }

    pub fn is_safe(&self) -> bool {
        self.safe
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            None => write!(f, "SAFE")?,
            Some(reason) => write!(f, "BLOCKED {}", reason)?,
        }
        if let Some(addresses) = &self.resolved_addresses {
            let list: Vec<String> = addresses.iter().map(|ip| ip.to_string()).collect();
            write!(f, " [{}]", list.join(", "))?;
        }
        Ok(())
    }
}
