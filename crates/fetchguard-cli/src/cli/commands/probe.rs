//! `fetchguard probe <url>` – HEAD probe with per-hop validation.

use anyhow::Result;
use fetchguard_core::config::GuardConfig;
use fetchguard_core::fetch_head::{FetchError, SafeFetcher};

use crate::cli::{EXIT_BLOCKED, EXIT_SAFE};

pub async fn run_probe(cfg: &GuardConfig, url: &str) -> Result<i32> {
    let fetcher = SafeFetcher::from_config(cfg);
    match fetcher.probe(url).await {
        Ok(result) => {
            for (i, hop) in result.hops.iter().enumerate() {
                println!("  hop {}: {}", i + 1, hop);
            }
            println!("Status:         {}", result.status);
            println!(
                "Content-Type:   {}",
                result.content_type.as_deref().unwrap_or("-")
            );
            match result.content_length {
                Some(n) => println!("Content-Length: {}", n),
                None => println!("Content-Length: -"),
            }
            Ok(EXIT_SAFE)
        }
        Err(err @ FetchError::Rejected { .. }) => {
            println!("BLOCKED {}", err);
            Ok(EXIT_BLOCKED)
        }
        Err(err) => Err(err.into()),
    }
}
