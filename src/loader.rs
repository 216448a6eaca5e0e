//! Vendor script loading — presence checks, head injection, CDN probes.
//!
//! Each vendor script pairs a CDN URL with the global that proves it has
//! loaded. Loading is check-then-inject: a page that already carries a
//! dependency is left untouched.

use crate::error::BindError;
use crate::page::PageSurface;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

/// CDN URL of the DOM manipulation library.
pub const DOM_LIBRARY_URL: &str = "https://code.jquery.com/jquery-3.6.0.min.js";
/// CDN URL of the input masking plugin.
pub const MASK_PLUGIN_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/jquery.mask/1.14.16/jquery.mask.min.js";

/// An external script plus the global that proves it has loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorScript {
    pub url: String,
    /// Dotted path under `window` (e.g. `jQuery.fn.mask`).
    pub global: String,
}

impl VendorScript {
    pub fn dom_library() -> Self {
        Self {
            url: DOM_LIBRARY_URL.to_string(),
            global: "jQuery".to_string(),
        }
    }

    pub fn mask_plugin() -> Self {
        Self {
            url: MASK_PLUGIN_URL.to_string(),
            global: "jQuery.fn.mask".to_string(),
        }
    }

    /// The stock jQuery + mask-plugin pair, in load order.
    pub fn defaults() -> Vec<Self> {
        vec![Self::dom_library(), Self::mask_plugin()]
    }
}

/// Ensure every vendor script is present on the page, injecting a script
/// element for each whose global marker is absent. Returns how many were
/// injected.
///
/// Injection is fire-and-forget; the fetch completes (or fails) while the
/// readiness gate polls downstream.
pub async fn ensure<S: PageSurface + ?Sized>(
    page: &mut S,
    vendors: &[VendorScript],
) -> Result<u32, BindError> {
    let mut injected = 0;
    for vendor in vendors {
        // Reject malformed configuration before touching the page.
        Url::parse(&vendor.url)?;

        if page.has_global(&vendor.global).await? {
            debug!(global = %vendor.global, "vendor already present");
            continue;
        }
        page.inject_script(&vendor.url).await?;
        info!(url = %vendor.url, "vendor script injected");
        injected += 1;
    }
    Ok(injected)
}

/// Result of HEAD-probing one vendor URL.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeResult {
    pub url: String,
    /// HTTP status code (0 if the request failed outright).
    pub status: u16,
    pub content_type: Option<String>,
    pub ok: bool,
    pub error: Option<String>,
}

/// HEAD-check each vendor URL without downloading bodies, so unreachable
/// CDNs can be reported ahead of a bind run instead of surfacing as a
/// readiness timeout.
pub async fn probe(client: &reqwest::Client, vendors: &[VendorScript]) -> Vec<ProbeResult> {
    let mut out = Vec::with_capacity(vendors.len());
    for vendor in vendors {
        match client.head(&vendor.url).send().await {
            Ok(resp) => {
                let status = resp.status().as_u16();
                let content_type = resp
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|h| h.to_str().ok())
                    .map(String::from);
                out.push(ProbeResult {
                    url: vendor.url.clone(),
                    status,
                    content_type,
                    ok: resp.status().is_success(),
                    error: None,
                });
            }
            Err(e) => out.push(ProbeResult {
                url: vendor.url.clone(),
                status: 0,
                content_type: None,
                ok: false,
                error: Some(e.to_string()),
            }),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::memory::MemoryPage;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_ensure_injects_missing_vendors() {
        let mut page = MemoryPage::from_html("<html></html>");
        let injected = ensure(&mut page, &VendorScript::defaults()).await.unwrap();
        assert_eq!(injected, 2);
        assert_eq!(
            page.injected_scripts(),
            &[DOM_LIBRARY_URL.to_string(), MASK_PLUGIN_URL.to_string()]
        );
    }

    #[tokio::test]
    async fn test_ensure_skips_present_vendors() {
        let mut page = MemoryPage::from_html("<html></html>");
        page.define_global("jQuery");
        let injected = ensure(&mut page, &VendorScript::defaults()).await.unwrap();
        assert_eq!(injected, 1);
        assert_eq!(page.injected_scripts(), &[MASK_PLUGIN_URL.to_string()]);
    }

    #[tokio::test]
    async fn test_ensure_rejects_malformed_url() {
        let mut page = MemoryPage::from_html("<html></html>");
        let vendors = vec![VendorScript {
            url: "not a url".to_string(),
            global: "x".to_string(),
        }];
        assert!(ensure(&mut page, &vendors).await.is_err());
    }

    #[tokio::test]
    async fn test_probe_reports_status_and_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/jquery.min.js"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("content-type", "application/javascript"),
            )
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/missing.js"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let vendors = vec![
            VendorScript {
                url: format!("{}/jquery.min.js", server.uri()),
                global: "jQuery".to_string(),
            },
            VendorScript {
                url: format!("{}/missing.js", server.uri()),
                global: "jQuery.fn.mask".to_string(),
            },
        ];

        let client = reqwest::Client::new();
        let results = probe(&client, &vendors).await;
        assert_eq!(results.len(), 2);
        assert!(results[0].ok);
        assert_eq!(
            results[0].content_type.as_deref(),
            Some("application/javascript")
        );
        assert!(!results[1].ok);
        assert_eq!(results[1].status, 404);
    }
}
