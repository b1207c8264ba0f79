use super::{DnsResolver, LookupResult, ResolveError};
use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Resolver backed by the OS (`getaddrinfo` via `tokio::net::lookup_host`).
///
/// The lookup itself runs on tokio's blocking pool. When the caller's timeout
/// or cancellation fires first, the pending future is dropped and its answer,
/// if one ever arrives, is discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl DnsResolver for SystemResolver {
    fn lookup(&self, host: &str) -> impl Future<Output = LookupResult> + Send {
        let host = host.to_string();
        async move {
            let addrs = tokio::net::lookup_host((host.as_str(), 0))
                .await
                .map_err(|source| ResolveError::Lookup {
                    host: host.clone(),
                    source,
                })?;
            let mut ips: Vec<IpAddr> = Vec::new();
            for addr in addrs {
                if !ips.contains(&addr.ip()) {
                    ips.push(addr.ip());
                }
            }
            Ok(ips)
        }
    }
}

/// Resolver with fixed answers, keyed by lowercase hostname.
///
/// Unknown names fail like NXDOMAIN. Clones share the call counter, so a test
/// can hand a clone to the validator and still observe how often DNS was hit.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    answers: HashMap<String, Vec<IpAddr>>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `host` with `ips` (an empty list models an empty DNS answer).
    pub fn with_answer(mut self, host: &str, ips: &[IpAddr]) -> Self {
        self.answers.insert(host.to_ascii_lowercase(), ips.to_vec());
        self
    }

    /// Delay every answer, e.g. to exercise timeouts and cancellation.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of lookups performed so far (across clones).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DnsResolver for StaticResolver {
    fn lookup(&self, host: &str) -> impl Future<Output = LookupResult> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answer = self.answers.get(&host.to_ascii_lowercase()).cloned();
        let delay = self.delay;
        let host = host.to_string();
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            answer.ok_or_else(|| ResolveError::Lookup {
                host,
                source: io::Error::new(io::ErrorKind::NotFound, "no such host"),
            })
        }
    }
}
