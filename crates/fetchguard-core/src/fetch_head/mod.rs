//! Metadata probing for link previews, with SSRF checks on every hop.
//!
//! [`SafeFetcher::probe`] is the caller side of the validator contract: it
//! runs [`Validator::validate`] before the first request and again before
//! following each redirect, and hands the approved addresses to the transport
//! so the connection cannot land anywhere DNS did not just vouch for.
//! Redirects are never followed by the HTTP client itself.

mod transport;
mod parse;

pub use transport::CurlTransport;

use crate::config::GuardConfig;
use crate::resolve::{DnsResolver, SystemResolver};
use crate::validate::{RejectionReason, Validator};
use std::net::IpAddr;
use std::sync::Arc;
use thiserror::Error;
use url::Url;

/// Message suitable for end users; the specific reason belongs in logs only.
pub const GENERIC_REJECTION_MESSAGE: &str = "this link cannot be fetched";

/// One request the transport must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HopRequest {
    pub url: String,
    /// Host as it appears in the URL (IPv6 in brackets).
    pub host: String,
    pub port: u16,
    /// Addresses approved by the validator; connect to these only.
    pub pinned: Vec<IpAddr>,
}

/// What the transport saw for one hop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HopResponse {
    pub status: u32,
    pub location: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
}

/// Performs a single HEAD request without following redirects.
pub trait HopTransport: Send + Sync + 'static {
    fn head(&self, req: &HopRequest) -> Result<HopResponse, FetchError>;
}

/// Metadata for the final, non-redirect response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub final_url: String,
    pub status: u32,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    /// Every URL requested, in order; the last one is `final_url`.
    pub hops: Vec<String>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// The validator refused this hop; nothing was sent to it.
    #[error("refusing to fetch {url}: {reason}")]
    Rejected { url: String, reason: RejectionReason },

    #[error("too many redirects (max {max})")]
    TooManyRedirects { max: u32 },

    #[error("invalid redirect from {from}: {message}")]
    BadRedirect { from: String, message: String },

    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u32 },

    #[error("transport: {0}")]
    Transport(String),

    #[error(transparent)]
    Curl(#[from] curl::Error),
}

impl FetchError {
    /// Text to show an end user. Rejections stay generic so the response
    /// does not describe the internal network to whoever submitted the URL.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Rejected { .. } => GENERIC_REJECTION_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn rejection_reason(&self) -> Option<RejectionReason> {
        match self {
            FetchError::Rejected { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

fn is_redirect(status: u32) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// Resolve a `Location` value against the URL that returned it.
pub fn next_hop(current: &str, location: &str) -> Result<String, FetchError> {
    let base = Url::parse(current).map_err(|e| FetchError::BadRedirect {
        from: current.to_string(),
        message: e.to_string(),
    })?;
    let next = base.join(location).map_err(|e| FetchError::BadRedirect {
        from: current.to_string(),
        message: format!("unusable Location {:?}: {}", location, e),
    })?;
    Ok(next.to_string())
}

/// Fetcher that validates every hop before touching the network.
pub struct SafeFetcher<R = SystemResolver, T = CurlTransport> {
    validator: Validator<R>,
    transport: Arc<T>,
    max_redirects: u32,
}

impl SafeFetcher<SystemResolver, CurlTransport> {
    pub fn from_config(cfg: &GuardConfig) -> Self {
        Self::new(Validator::from_config(cfg), CurlTransport::from_config(cfg))
            .with_max_redirects(cfg.max_redirects)
    }
}

impl<R: DnsResolver, T: HopTransport> SafeFetcher<R, T> {
    pub fn new(validator: Validator<R>, transport: T) -> Self {
        Self {
            validator,
            transport: Arc::new(transport),
            max_redirects: GuardConfig::default().max_redirects,
        }
    }

    pub fn with_max_redirects(mut self, max: u32) -> Self {
        self.max_redirects = max;
        self
    }

    pub fn validator(&self) -> &Validator<R> {
        &self.validator
    }

    /// Probe `url`, following redirects manually and revalidating each target.
    pub async fn probe(&self, url: &str) -> Result<ProbeResult, FetchError> {
        let mut current = url.to_string();
        let mut hops: Vec<String> = Vec::new();
        let mut redirects = 0u32;

        loop {
            let verdict = self.validator.validate(&current).await;
            if !verdict.safe {
                let reason = verdict.reason.unwrap_or(RejectionReason::InvalidUrl);
                tracing::info!(hop = hops.len(), %reason, "probe stopped at rejected hop");
                return Err(FetchError::Rejected {
                    url: current,
                    reason,
                });
            }

            // From here on, every consumer sees the URL as the validator parsed it.
            let req = hop_request(&current, verdict.resolved_addresses.unwrap_or_default())?;
            current = req.url.clone();
            let transport = Arc::clone(&self.transport);
            let resp = tokio::task::spawn_blocking(move || transport.head(&req))
                .await
                .map_err(|e| FetchError::Transport(format!("probe task join: {e}")))??;
            hops.push(current.clone());
            tracing::debug!(hop = hops.len(), status = resp.status, "probe hop complete");

            if is_redirect(resp.status) {
                let location = resp.location.ok_or_else(|| FetchError::BadRedirect {
                    from: current.clone(),
                    message: format!("HTTP {} without Location", resp.status),
                })?;
                if redirects >= self.max_redirects {
                    return Err(FetchError::TooManyRedirects {
                        max: self.max_redirects,
                    });
                }
                redirects += 1;
                current = next_hop(&current, &location)?;
                continue;
            }

            if !(200..300).contains(&resp.status) {
                return Err(FetchError::Http {
                    url: current,
                    status: resp.status,
                });
            }

            return Ok(ProbeResult {
                final_url: current,
                status: resp.status,
                content_type: resp.content_type,
                content_length: resp.content_length,
                hops,
            });
        }
    }
}

fn hop_request(url: &str, pinned: Vec<IpAddr>) -> Result<HopRequest, FetchError> {
    let bad = |message: &str| FetchError::BadRedirect {
        from: url.to_string(),
        message: message.to_string(),
    };
    let parsed = Url::parse(url).map_err(|e| bad(&e.to_string()))?;
    let host = parsed.host_str().ok_or_else(|| bad("URL has no host"))?.to_string();
    let port = parsed
        .port_or_known_default()
        .ok_or_else(|| bad("URL has no port"))?;
    Ok(HopRequest {
        url: parsed.as_str().to_string(),
        host,
        port,
        pinned,
    })
}
