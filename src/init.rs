//! Phase sequencing — ensure dependencies, await readiness, bind.
//!
//! Runs once per page view: inject missing vendor scripts, poll until
//! masking is callable, then bind fields and hook forms. The page comes in
//! as a surface; nothing is discovered through globals.

use crate::binder::{self, BindReport};
use crate::config::BindConfig;
use crate::error::BindError;
use crate::loader;
use crate::mask::MaskTemplate;
use crate::page::PageSurface;
use crate::readiness::ReadinessGate;
use tracing::debug;

/// Runs the three-phase pipeline against any page surface.
#[derive(Debug, Clone)]
pub struct MaskInitializer {
    config: BindConfig,
    template: MaskTemplate,
}

impl MaskInitializer {
    /// Compile the configured template; fails on a template with no digit
    /// slots.
    pub fn new(config: BindConfig) -> Result<Self, BindError> {
        let template = MaskTemplate::parse(&config.template)?;
        Ok(Self { config, template })
    }

    pub fn template(&self) -> &MaskTemplate {
        &self.template
    }

    /// Run load → wait → bind. Safe to call twice on the same page: bound
    /// fields and hooked forms are skipped on re-entry.
    pub async fn run<S: PageSurface + ?Sized>(
        &self,
        page: &mut S,
    ) -> Result<BindReport, BindError> {
        if self.config.load_vendors {
            let injected = loader::ensure(page, &self.config.vendors).await?;
            debug!(injected, "dependency phase complete");
        }

        let gate = ReadinessGate::new(self.config.interval(), self.config.timeout());
        let attempts = gate.wait_ready(page).await?;

        let mut report = binder::bind(page, &self.config.marker_attr, &self.template).await?;
        report.attempts = attempts;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::memory::MemoryPage;

    #[tokio::test(start_paused = true)]
    async fn test_pipeline_injects_waits_and_binds() {
        let html = r#"<form><input name="phone" phone="true"></form>"#;
        let mut page = MemoryPage::from_html(html).with_ready_after(2);
        let init = MaskInitializer::new(BindConfig::default()).unwrap();

        let report = init.run(&mut page).await.unwrap();
        assert_eq!(page.injected_scripts().len(), 2);
        assert_eq!(report.attempts, 3);
        assert_eq!(report.fields_bound, 1);
        assert_eq!(report.forms_hooked, 1);
    }

    #[tokio::test]
    async fn test_invalid_template_is_rejected_up_front() {
        let config = BindConfig {
            template: "---".to_string(),
            ..BindConfig::default()
        };
        assert!(MaskInitializer::new(config).is_err());
    }
}
