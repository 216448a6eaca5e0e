//! `maskbind probe` — HEAD-check the vendor script CDNs.

use crate::loader::{self, VendorScript};
use anyhow::Result;
use std::time::Duration;

pub async fn run(json: bool) -> Result<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let vendors = VendorScript::defaults();
    let results = loader::probe(&client, &vendors).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for r in &results {
            if r.ok {
                println!(
                    "ok   {} ({} {})",
                    r.url,
                    r.status,
                    r.content_type.as_deref().unwrap_or("unknown type")
                );
            } else {
                let reason = r
                    .error
                    .clone()
                    .unwrap_or_else(|| format!("HTTP {}", r.status));
                println!("FAIL {} ({reason})", r.url);
            }
        }
    }

    if results.iter().any(|r| !r.ok) {
        anyhow::bail!("one or more vendor scripts unreachable");
    }
    Ok(())
}
