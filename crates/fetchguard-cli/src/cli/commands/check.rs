//! `fetchguard check <url>...` – validate URLs and report verdicts.

use anyhow::Result;
use fetchguard_core::config::GuardConfig;
use fetchguard_core::{validate_sync, Validator, Verdict};

use crate::cli::{EXIT_BLOCKED, EXIT_SAFE};

#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions {
    pub offline: bool,
    pub json: bool,
}

pub fn format_verdict(url: &str, verdict: &Verdict, json: bool) -> Result<String> {
    if json {
        let mut value = serde_json::to_value(verdict)?;
        value["url"] = serde_json::Value::String(url.to_string());
        return Ok(serde_json::to_string(&value)?);
    }
    Ok(format!("{}  {}", verdict, url))
}

pub async fn run_check(cfg: &GuardConfig, urls: &[String], opts: CheckOptions) -> Result<i32> {
    let validator = Validator::from_config(cfg);
    let mut all_safe = true;
    for url in urls {
        let verdict = if opts.offline {
            validate_sync(url)
        } else {
            validator.validate(url).await
        };
        all_safe &= verdict.safe;
        println!("{}", format_verdict(url, &verdict, opts.json)?);
    }
    Ok(if all_safe { EXIT_SAFE } else { EXIT_BLOCKED })
}
