//! `fetchguard rules` – print the classification table for audit.

use fetchguard_core::classify;
use fetchguard_core::protocol;
use std::fmt::Write;

pub fn format_rules() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Allowed schemes: {}", protocol::ALLOWED_SCHEMES.join(", "));
    let _ = writeln!(
        out,
        "Denied schemes (known dangerous; anything not allowed is refused): {}",
        protocol::DENIED_SCHEMES.join(", ")
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "  {:<28}  {}", "Pattern", "Label");
    let _ = writeln!(out, "  {:<28}  {}", "-".repeat(28), "-".repeat(22));
    for rule in classify::rules() {
        let _ = writeln!(out, "  {:<28}  {}", rule.pattern.to_string(), rule.class);
    }
    let _ = writeln!(out, "  {:<28}  {}", "(anything else)", classify::HostClass::Public);
    out
}

pub fn run_rules() {
    print!("{}", format_rules());
}
