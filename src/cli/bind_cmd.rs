//! `maskbind bind` — run the initializer against a live page.

use crate::audit::AuditLogger;
use crate::binder::BindReport;
use crate::cli::doctor;
use crate::config::BindConfig;
use crate::init::MaskInitializer;
use crate::mask::template::RUSSIAN_PHONE_TEMPLATE;
use crate::page::browser::{BrowserHandle, BrowserPage, LaunchOptions, MaskMode};
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use url::Url;

#[derive(Args)]
pub struct BindArgs {
    /// Page URL to bind.
    pub url: String,

    /// Marker attribute selecting inputs.
    #[arg(long, default_value = "phone")]
    pub attr: String,

    /// Mask template (`0` = digit slot).
    #[arg(long, default_value = RUSSIAN_PHONE_TEMPLATE)]
    pub mask: String,

    /// Readiness poll cadence in milliseconds.
    #[arg(long, default_value_t = 50)]
    pub interval_ms: u64,

    /// Readiness timeout in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Use the built-in inline mask instead of the vendor plugin.
    #[arg(long)]
    pub inline: bool,

    /// Skip vendor injection (the page is expected to load them itself).
    #[arg(long)]
    pub no_inject: bool,

    /// Run the browser with a visible window.
    #[arg(long)]
    pub headful: bool,

    /// Disable the Chromium sandbox (needed in some containers).
    #[arg(long)]
    pub no_sandbox: bool,

    /// Explicit browser executable; autodetected when omitted.
    #[arg(long)]
    pub browser: Option<PathBuf>,
}

pub async fn run(args: &BindArgs, json: bool) -> Result<()> {
    Url::parse(&args.url).context("invalid page URL")?;

    let mode = if args.inline {
        MaskMode::Inline
    } else {
        MaskMode::Vendor
    };

    let mut config = BindConfig::from_env();
    config.marker_attr = args.attr.clone();
    config.template = args.mask.clone();
    config.poll_interval_ms = args.interval_ms;
    config.ready_timeout_ms = args.timeout_ms;
    config.load_vendors = mode == MaskMode::Vendor && !args.no_inject;

    let initializer = MaskInitializer::new(config.clone())?;

    let opts = LaunchOptions {
        headless: !args.headful,
        sandbox: !args.no_sandbox,
        executable: args.browser.clone().or_else(doctor::find_browser),
    };
    let handle = BrowserHandle::launch(&opts).await?;

    let started = Instant::now();
    let result = async {
        let page = handle.open(&args.url).await?;
        let mut surface = BrowserPage::new(page, mode, config.ready_globals());
        initializer.run(&mut surface).await
    }
    .await;
    let duration_ms = started.elapsed().as_millis() as u64;

    if let Err(e) = handle.close().await {
        info!(error = %e, "browser close failed");
    }

    let status = if result.is_ok() { "ok" } else { "error" };
    if let Ok(mut logger) = AuditLogger::default_logger() {
        let empty = BindReport::default();
        let report = result.as_ref().ok().unwrap_or(&empty);
        let _ = logger.log_run(&args.url, report, duration_ms, status);
    }

    let report = result?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "bound {} field(s) ({} already bound), hooked {} form(s), ready after {} probe(s) in {duration_ms}ms",
            report.fields_bound, report.fields_skipped, report.forms_hooked, report.attempts
        );
    }
    Ok(())
}
