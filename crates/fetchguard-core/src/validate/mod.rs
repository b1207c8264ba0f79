//! URL validation: parse, scheme gate, literal host check, then DNS.
//!
//! [`validate_sync`] never performs I/O and is safe to call anywhere, e.g. in
//! form validation. [`Validator::validate`] runs the same checks and then
//! resolves the host, rejecting if any answer is blocked. Callers that fetch
//! must use `validate` before connecting and again on every redirect target.
//!
//! Both paths fail closed: every ambiguous outcome is an unsafe verdict.

mod verdict;

pub use verdict::{RejectionReason, Verdict};

use crate::classify;
use crate::config::GuardConfig;
use crate::logging::AUDIT_TARGET;
use crate::protocol;
use crate::resolve::{DnsResolver, ResolutionGuard, SystemResolver};
use std::future::{self, Future};
use std::time::Duration;
use url::{Host, Url};

/// Validates outbound fetch targets. Holds no mutable state; share freely.
#[derive(Debug, Clone)]
pub struct Validator<R = SystemResolver> {
    guard: ResolutionGuard<R>,
}

impl Validator<SystemResolver> {
    /// Validator using the system resolver and the default timeout.
    pub fn new() -> Self {
        Self::with_resolver(SystemResolver)
    }

    pub fn from_config(cfg: &GuardConfig) -> Self {
        Self::new().with_timeout(cfg.resolve_timeout())
    }
}

impl Default for Validator<SystemResolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: DnsResolver> Validator<R> {
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            guard: ResolutionGuard::new(resolver),
        }
    }

    /// Bound on each DNS lookup; exceeding it is a `ResolutionFailure`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.guard = self.guard.with_timeout(timeout);
        self
    }

    pub fn resolver(&self) -> &R {
        self.guard.resolver()
    }

    /// Cheap pre-filter with no I/O. See [`validate_sync`].
    pub fn validate_sync(&self, url: &str) -> Verdict {
        validate_sync(url)
    }

    /// Full check including DNS resolution of the host.
    pub async fn validate(&self, url: &str) -> Verdict {
        self.validate_until(url, future::pending()).await
    }

    /// Like [`validate`](Self::validate), abandoning the lookup with a
    /// `ResolutionFailure` verdict as soon as `cancel` completes.
    pub async fn validate_until<C>(&self, url: &str, cancel: C) -> Verdict
    where
        C: Future<Output = ()>,
    {
        let host = match precheck(url) {
            Ok(host) => host,
            Err(verdict) => return verdict,
        };

        let verdict = match self.guard.resolve_and_classify_until(&host, cancel).await {
            Ok(outcome) if outcome.safe => Verdict::allowed(Some(outcome.addresses)),
            Ok(outcome) => {
                if let Some((ip, class)) = outcome.blocked {
                    tracing::debug!(
                        target: AUDIT_TARGET,
                        host = %host,
                        address = ?ip,
                        class = %class,
                        "resolved address matched blocked range"
                    );
                }
                Verdict::rejected_with_addresses(
                    RejectionReason::BlockedAddress,
                    outcome.addresses,
                )
            }
            Err(e) => {
                tracing::debug!(target: AUDIT_TARGET, host = %host, error = %e, "resolution failed");
                Verdict::rejected(RejectionReason::ResolutionFailure)
            }
        };
        audit(&host, &verdict);
        verdict
    }
}

/// Parse the URL, check its scheme and literal host. No DNS, no I/O.
pub fn validate_sync(url: &str) -> Verdict {
    match precheck(url) {
        Ok(host) => {
            let verdict = Verdict::allowed(None);
            audit(&host, &verdict);
            verdict
        }
        Err(verdict) => verdict,
    }
}

/// Returns the host to resolve, or the rejection verdict (already audited).
fn precheck(url: &str) -> Result<String, Verdict> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(target: AUDIT_TARGET, error = %e, "URL did not parse");
            return Err(reject("<unparsed>", RejectionReason::InvalidUrl));
        }
    };

    if !protocol::is_allowed_scheme(parsed.scheme()) {
        let host = parsed.host_str().unwrap_or("<none>");
        return Err(reject(host, RejectionReason::UnsupportedProtocol));
    }

    let host = match parsed.host() {
        Some(Host::Domain(domain)) => domain.to_string(),
        Some(Host::Ipv4(ip)) => ip.to_string(),
        Some(Host::Ipv6(ip)) => ip.to_string(),
        None => return Err(reject("<none>", RejectionReason::InvalidUrl)),
    };
    if host.is_empty() {
        return Err(reject("<empty>", RejectionReason::InvalidUrl));
    }

    if let Some(rule) = classify::matching_rule(&host) {
        tracing::debug!(
            target: AUDIT_TARGET,
            host = %host,
            rule = rule.source,
            class = %rule.class,
            "host matched blocked pattern"
        );
        return Err(reject(&host, RejectionReason::BlockedHost));
    }

    Ok(host)
}

fn reject(subject: &str, reason: RejectionReason) -> Verdict {
    let verdict = Verdict::rejected(reason);
    audit(subject, &verdict);
    verdict
}

/// One event per verdict. Only the host is recorded, never the full URL.
fn audit(subject: &str, verdict: &Verdict) {
    match verdict.reason {
        Some(reason) => tracing::warn!(
            target: AUDIT_TARGET,
            host = %subject,
            reason = %reason,
            "outbound fetch rejected"
        ),
        None => tracing::debug!(target: AUDIT_TARGET, host = %subject, "outbound fetch allowed"),
    }
}
