//! DNS resolution and the post-resolution address check.
//!
//! The validator depends only on the [`DnsResolver`] trait. [`SystemResolver`]
//! uses the operating system resolver through tokio; [`StaticResolver`] serves
//! fixed answers and is what tests inject.

mod guard;
mod system;

pub use guard::{GuardOutcome, ResolutionGuard, DEFAULT_RESOLVE_TIMEOUT};
pub use system::{StaticResolver, SystemResolver};

use std::future::Future;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why a lookup produced no usable answer. Every variant is treated as unsafe.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("DNS lookup for {host} timed out after {timeout:?}")]
    Timeout { host: String, timeout: Duration },

    #[error("DNS lookup for {host} was cancelled")]
    Cancelled { host: String },

    #[error("no addresses found for {host}")]
    NoAddresses { host: String },

    #[error("DNS lookup for {host} failed: {source}")]
    Lookup {
        host: String,
        #[source]
        source: std::io::Error,
    },
}

/// Name resolution capability. Must return every address in the answer.
pub trait DnsResolver: Send + Sync {
    fn lookup(&self, host: &str) -> impl Future<Output = LookupResult> + Send;
}

pub type LookupResult = Result<Vec<IpAddr>, ResolveError>;

impl<R: DnsResolver> DnsResolver for Arc<R> {
    fn lookup(&self, host: &str) -> impl Future<Output = LookupResult> + Send {
        (**self).lookup(host)
    }
}
