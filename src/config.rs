//! Runtime configuration with environment overrides.

use crate::loader::VendorScript;
use crate::mask::template::RUSSIAN_PHONE_TEMPLATE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration of one bind run. Defaults target the stock jQuery mask
/// setup: `phone="true"` marker, the Russian phone template, a 50 ms poll.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BindConfig {
    /// Attribute selecting inputs to mask (`phone="true"`).
    pub marker_attr: String,
    /// Mask template source (`0` = digit slot).
    pub template: String,
    /// Readiness poll cadence.
    pub poll_interval_ms: u64,
    /// Bound on the whole readiness wait.
    pub ready_timeout_ms: u64,
    /// Whether the dependency phase injects missing vendor scripts.
    pub load_vendors: bool,
    pub vendors: Vec<VendorScript>,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            marker_attr: "phone".to_string(),
            template: RUSSIAN_PHONE_TEMPLATE.to_string(),
            poll_interval_ms: 50,
            ready_timeout_ms: 10_000,
            load_vendors: true,
            vendors: VendorScript::defaults(),
        }
    }
}

impl BindConfig {
    /// Defaults overridden by `MASKBIND_*` environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = std::env::var("MASKBIND_ATTR") {
            cfg.marker_attr = v;
        }
        if let Ok(v) = std::env::var("MASKBIND_TEMPLATE") {
            cfg.template = v;
        }
        if let Ok(v) = std::env::var("MASKBIND_POLL_INTERVAL_MS") {
            if let Ok(ms) = v.parse() {
                cfg.poll_interval_ms = ms;
            }
        }
        if let Ok(v) = std::env::var("MASKBIND_READY_TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                cfg.ready_timeout_ms = ms;
            }
        }
        cfg
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    /// Globals that must resolve before vendor masking is callable.
    pub fn ready_globals(&self) -> Vec<String> {
        self.vendors.iter().map(|v| v.global.clone()).collect()
    }
}
