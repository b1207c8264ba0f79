//! libcurl transport: one HEAD request, no redirect following, DNS pinned.

use super::{parse, FetchError, HopRequest, HopResponse, HopTransport};
use crate::config::GuardConfig;
use std::net::IpAddr;
use std::str;
use std::time::Duration;

/// Blocking libcurl transport. Run it from `spawn_blocking` in async code
/// ([`SafeFetcher`](super::SafeFetcher) does this).
#[derive(Debug, Clone)]
pub struct CurlTransport {
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: String,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::from_config(&GuardConfig::default())
    }
}

impl CurlTransport {
    pub fn from_config(cfg: &GuardConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.request_timeout(),
            user_agent: cfg.user_agent.clone(),
        }
    }
}

impl HopTransport for CurlTransport {
    fn head(&self, req: &HopRequest) -> Result<HopResponse, FetchError> {
        let mut headers: Vec<String> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(&req.url)?;
        easy.nobody(true)?; // HEAD request
        easy.follow_location(false)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.useragent(&self.user_agent)?;

        // Connect only to the addresses the validator approved.
        if let Some(entry) = resolve_entry(&req.host, req.port, &req.pinned) {
            let mut list = curl::easy::List::new();
            list.append(&entry)?;
            easy.resolve(list)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    headers.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(parse::parse_headers(status, &headers))
    }
}

/// `CURLOPT_RESOLVE` entry (`host:port:addr[,addr]`) pinning `host` to `pinned`.
///
/// Returns `None` for IP-literal hosts (nothing to pin) and for an empty list.
pub(crate) fn resolve_entry(host: &str, port: u16, pinned: &[IpAddr]) -> Option<String> {
    if pinned.is_empty() || crate::classify::parse_ip_literal(host).is_some() {
        return None;
    }
    let addrs: Vec<String> = pinned
        .iter()
        .map(|ip| match ip {
            IpAddr::V4(v4) => v4.to_string(),
            IpAddr::V6(v6) => format!("[{}]", v6),
        })
        .collect();
    Some(format!("{}:{}:{}", host, port, addrs.join(",")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_entry_formats_v4_and_v6() {
        let pinned: Vec<IpAddr> = vec![
            "93.184.216.34".parse().unwrap(),
            "2606:2800:220:1::".parse().unwrap(),
        ];
        assert_eq!(
            resolve_entry("example.com", 443, &pinned).as_deref(),
            Some("example.com:443:93.184.216.34,[2606:2800:220:1::]")
        );
    }

    #[test]
    fn resolve_entry_skips_literals_and_empty() {
        let pinned: Vec<IpAddr> = vec!["93.184.216.34".parse().unwrap()];
        assert!(resolve_entry("93.184.216.34", 80, &pinned).is_none());
        assert!(resolve_entry("[2606:2800:220:1::]", 80, &pinned).is_none());
        assert!(resolve_entry("example.com", 80, &[]).is_none());
    }
}
