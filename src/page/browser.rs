//! Live-page surface over CDP.
//!
//! `BrowserHandle` owns the browser process and its event loop;
//! `BrowserPage` wraps one page and implements [`PageSurface`] by evaluating
//! the snippets in [`scripts`](super::scripts).

use super::scripts;
use super::{FieldHandle, FormHandle, MarkedInput, PageSurface};
use crate::error::BindError;
use crate::mask::MaskTemplate;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

/// How masks are attached in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskMode {
    /// Call the vendor plugin (`jQuery.fn.mask`), loading it if needed.
    Vendor,
    /// Inject a self-contained mask, no vendor scripts.
    Inline,
}

/// Options for launching the browser process.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    pub sandbox: bool,
    /// Explicit browser executable; autodetected when `None`.
    pub executable: Option<PathBuf>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: true,
            executable: None,
        }
    }
}

/// A running browser process plus its CDP event loop.
pub struct BrowserHandle {
    browser: Browser,
    event_loop: tokio::task::JoinHandle<()>,
}

impl BrowserHandle {
    /// Launch the browser.
    pub async fn launch(opts: &LaunchOptions) -> Result<Self, BindError> {
        let mut builder = BrowserConfig::builder();
        if !opts.headless {
            builder = builder.with_head();
        }
        if !opts.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(exe) = &opts.executable {
            builder = builder.chrome_executable(exe);
        }
        let config = builder.build().map_err(BindError::Launch)?;

        let (browser, mut handler) = Browser::launch(config).await?;
        let event_loop = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            event_loop,
        })
    }

    /// Open a page and wait for its initial navigation.
    pub async fn open(&self, url: &str) -> Result<Page, BindError> {
        let page = self.browser.new_page(url).await?;
        page.wait_for_navigation().await?;
        debug!(url, "page opened");
        Ok(page)
    }

    /// Close the browser and drain the event loop.
    pub async fn close(mut self) -> Result<(), BindError> {
        self.browser.close().await?;
        let _ = self.event_loop.await;
        Ok(())
    }
}

/// One live page, addressed through evaluated scripts.
pub struct BrowserPage {
    page: Page,
    mode: MaskMode,
    /// Globals that must resolve before vendor masking is callable.
    ready_globals: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawMarked {
    field: u32,
    form: Option<u32>,
    name: Option<String>,
}

impl BrowserPage {
    pub fn new(page: Page, mode: MaskMode, ready_globals: Vec<String>) -> Self {
        Self {
            page,
            mode,
            ready_globals,
        }
    }

    /// Current page URL, if the target still reports one.
    pub async fn url(&self) -> Result<Option<String>, BindError> {
        Ok(self.page.url().await?)
    }

    async fn eval<T: DeserializeOwned>(
        &self,
        op: &'static str,
        js: String,
    ) -> Result<T, BindError> {
        let result = self.page.evaluate(js).await?;
        let raw = result.value().cloned().unwrap_or(serde_json::Value::Null);
        serde_json::from_value(raw.clone()).map_err(|_| BindError::ScriptResult {
            op,
            value: raw.to_string(),
        })
    }
}

#[async_trait]
impl PageSurface for BrowserPage {
    async fn marked_inputs(&mut self, attr: &str) -> Result<Vec<MarkedInput>, BindError> {
        let raw: Vec<RawMarked> = self
            .eval("marked_inputs", scripts::tag_marked_inputs(attr))
            .await?;
        Ok(raw
            .into_iter()
            .map(|r| MarkedInput {
                field: FieldHandle(r.field),
                form: r.form.map(FormHandle),
                name: r.name,
            })
            .collect())
    }

    async fn field_value(&mut self, field: FieldHandle) -> Result<String, BindError> {
        let value: Option<String> = self
            .eval("field_value", scripts::field_value(field.0))
            .await?;
        value.ok_or_else(|| BindError::Page(format!("field {} not found", field.0)))
    }

    async fn set_field_value(
        &mut self,
        field: FieldHandle,
        value: &str,
    ) -> Result<(), BindError> {
        let ok: bool = self
            .eval("set_field_value", scripts::set_field_value(field.0, value))
            .await?;
        if !ok {
            return Err(BindError::Page(format!("field {} not found", field.0)));
        }
        Ok(())
    }

    async fn is_bound(&mut self, field: FieldHandle) -> Result<bool, BindError> {
        self.eval("is_bound", scripts::is_bound(field.0)).await
    }

    async fn attach_mask(
        &mut self,
        field: FieldHandle,
        template: &MaskTemplate,
    ) -> Result<(), BindError> {
        let js = match self.mode {
            MaskMode::Vendor => scripts::attach_mask_vendor(field.0, template.raw()),
            MaskMode::Inline => scripts::attach_mask_inline(field.0, template.raw()),
        };
        let ok: bool = self.eval("attach_mask", js).await?;
        if !ok {
            return Err(BindError::Page(format!(
                "mask attach failed for field {} (element gone or vendor not ready)",
                field.0
            )));
        }
        Ok(())
    }

    async fn install_submit_normalizer(
        &mut self,
        form: FormHandle,
        attr: &str,
    ) -> Result<bool, BindError> {
        let outcome: String = self
            .eval(
                "install_submit_normalizer",
                scripts::install_submit_normalizer(form.0, attr),
            )
            .await?;
        match outcome.as_str() {
            "installed" => Ok(true),
            "present" => Ok(false),
            _ => Err(BindError::Page(format!("form {} not found", form.0))),
        }
    }

    async fn has_global(&mut self, marker: &str) -> Result<bool, BindError> {
        self.eval("has_global", scripts::has_global(marker)).await
    }

    async fn inject_script(&mut self, src: &str) -> Result<(), BindError> {
        let _: bool = self.eval("inject_script", scripts::inject_script(src)).await?;
        debug!(src, "script element injected");
        Ok(())
    }

    async fn mask_ready(&mut self) -> Result<bool, BindError> {
        match self.mode {
            // The inline mask carries its own runtime; nothing to wait for.
            MaskMode::Inline => Ok(true),
            MaskMode::Vendor => {
                for marker in self.ready_globals.clone() {
                    if !self.has_global(&marker).await? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }
}
