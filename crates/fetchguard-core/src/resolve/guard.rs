//! Resolve a hostname and re-check every answer against the rule table.

use super::{DnsResolver, ResolveError};
use crate::classify::{self, HostClass};
use std::future::{self, Future};
use std::net::IpAddr;
use std::time::Duration;

/// Default upper bound on a single lookup.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(3);

/// Result of a completed resolution check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOutcome {
    /// True only if every address is public.
    pub safe: bool,
    /// All addresses in the answer; empty when the literal check short-circuited.
    pub addresses: Vec<IpAddr>,
    /// First blocked address and its label, or the literal host's label.
    pub blocked: Option<(Option<IpAddr>, HostClass)>,
}

/// Runs the resolver under a timeout and classifies the whole answer.
#[derive(Debug, Clone)]
pub struct ResolutionGuard<R> {
    resolver: R,
    timeout: Duration,
}

impl<R: DnsResolver> ResolutionGuard<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            timeout: DEFAULT_RESOLVE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Resolve `host` and classify every returned address.
    pub async fn resolve_and_classify(&self, host: &str) -> Result<GuardOutcome, ResolveError> {
        self.resolve_and_classify_until(host, future::pending()).await
    }

    /// Like [`resolve_and_classify`](Self::resolve_and_classify), but gives up
    /// with [`ResolveError::Cancelled`] as soon as `cancel` completes.
    pub async fn resolve_and_classify_until<C>(
        &self,
        host: &str,
        cancel: C,
    ) -> Result<GuardOutcome, ResolveError>
    where
        C: Future<Output = ()>,
    {
        let literal = classify::classify(host);
        if literal.is_blocked() {
            return Ok(GuardOutcome {
                safe: false,
                addresses: Vec::new(),
                blocked: Some((classify::parse_ip_literal(host), literal)),
            });
        }

        // A public IP literal is its own answer.
        if let Some(ip) = classify::parse_ip_literal(host) {
            return Ok(check_all(vec![ip]));
        }

        let lookup = tokio::time::timeout(self.timeout, self.resolver.lookup(host));
        let addresses = tokio::select! {
            biased;
            _ = cancel => {
                return Err(ResolveError::Cancelled { host: host.to_string() });
            }
            res = lookup => match res {
                Ok(answer) => answer?,
                Err(_elapsed) => {
                    return Err(ResolveError::Timeout {
                        host: host.to_string(),
                        timeout: self.timeout,
                    });
                }
            },
        };

        if addresses.is_empty() {
            return Err(ResolveError::NoAddresses {
                host: host.to_string(),
            });
        }
        Ok(check_all(addresses))
    }
}

fn check_all(addresses: Vec<IpAddr>) -> GuardOutcome {
    let blocked = addresses
        .iter()
        .map(|&ip| (ip, classify::classify_ip(ip)))
        .find(|(_, class)| class.is_blocked())
        .map(|(ip, class)| (Some(ip), class));
    GuardOutcome {
        safe: blocked.is_none(),
        addresses,
        blocked,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::StaticResolver;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn all_public_answers_are_safe() {
        let resolver = StaticResolver::new()
            .with_answer("cdn.example", &[ip("93.184.216.34"), ip("2606:2800:220:1::")]);
        let guard = ResolutionGuard::new(resolver);
        let outcome = guard.resolve_and_classify("cdn.example").await.unwrap();
        assert!(outcome.safe);
        assert_eq!(outcome.addresses.len(), 2);
        assert!(outcome.blocked.is_none());
    }

    #[tokio::test]
    async fn one_private_answer_poisons_the_set() {
        let resolver = StaticResolver::new()
            .with_answer("mixed.example", &[ip("93.184.216.34"), ip("10.0.0.5")]);
        let guard = ResolutionGuard::new(resolver);
        let outcome = guard.resolve_and_classify("mixed.example").await.unwrap();
        assert!(!outcome.safe);
        assert_eq!(outcome.blocked, Some((Some(ip("10.0.0.5")), HostClass::Private)));
        assert_eq!(outcome.addresses.len(), 2);
    }

    #[tokio::test]
    async fn mapped_loopback_answer_is_blocked() {
        let resolver = StaticResolver::new().with_answer("sneaky.example", &[ip("::ffff:127.0.0.1")]);
        let guard = ResolutionGuard::new(resolver);
        let outcome = guard.resolve_and_classify("sneaky.example").await.unwrap();
        assert!(!outcome.safe);
    }

    #[tokio::test]
    async fn blocked_literal_skips_dns() {
        let resolver = StaticResolver::new();
        let guard = ResolutionGuard::new(resolver.clone());
        let outcome = guard.resolve_and_classify("svc.internal").await.unwrap();
        assert!(!outcome.safe);
        assert_eq!(outcome.blocked, Some((None, HostClass::InternalName)));
        assert_eq!(resolver.calls(), 0);
    }

    #[tokio::test]
    async fn public_ip_literal_skips_dns() {
        let resolver = StaticResolver::new();
        let guard = ResolutionGuard::new(resolver.clone());
        let outcome = guard.resolve_and_classify("93.184.216.34").await.unwrap();
        assert!(outcome.safe);
        assert_eq!(outcome.addresses, vec![ip("93.184.216.34")]);
        assert_eq!(resolver.calls(), 0);
    }

    #[tokio::test]
    async fn nxdomain_is_an_error() {
        let guard = ResolutionGuard::new(StaticResolver::new());
        let err = guard.resolve_and_classify("missing.example").await.unwrap_err();
        assert!(matches!(err, ResolveError::Lookup { .. }));
    }

    #[tokio::test]
    async fn empty_answer_is_an_error() {
        let resolver = StaticResolver::new().with_answer("empty.example", &[]);
        let guard = ResolutionGuard::new(resolver);
        let err = guard.resolve_and_classify("empty.example").await.unwrap_err();
        assert!(matches!(err, ResolveError::NoAddresses { .. }));
    }

    #[tokio::test]
    async fn slow_resolver_times_out() {
        let resolver = StaticResolver::new()
            .with_answer("slow.example", &[ip("93.184.216.34")])
            .with_delay(Duration::from_secs(5));
        let guard = ResolutionGuard::new(resolver).with_timeout(Duration::from_millis(20));
        let err = guard.resolve_and_classify("slow.example").await.unwrap_err();
        assert!(matches!(err, ResolveError::Timeout { .. }));
    }

    #[tokio::test]
    async fn cancellation_wins_over_pending_lookup() {
        let resolver = StaticResolver::new()
            .with_answer("slow.example", &[ip("93.184.216.34")])
            .with_delay(Duration::from_secs(5));
        let guard = ResolutionGuard::new(resolver);
        let cancel = tokio::time::sleep(Duration::from_millis(10));
        let err = guard
            .resolve_and_classify_until("slow.example", cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Cancelled { .. }));
    }
}
