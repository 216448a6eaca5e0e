//! Mask binder — attach masks to marked inputs, hook each form once.

use crate::error::BindError;
use crate::mask::MaskTemplate;
use crate::page::PageSurface;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// What a bind pass attached.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BindReport {
    /// Fields that received a mask this pass.
    pub fields_bound: u32,
    /// Fields left alone because an earlier pass already bound them.
    pub fields_skipped: u32,
    /// Forms that received a submit normalizer this pass.
    pub forms_hooked: u32,
    /// Readiness probes it took before binding could start.
    pub attempts: u32,
}

/// Bind every input carrying `attr="true"`: attach the display mask, then
/// install exactly one submit normalizer per enclosing form.
///
/// Hooking is deduplicated at the form level, so a form holding several
/// marked inputs still gets a single normalizer. Zero marked inputs is a
/// no-op.
pub async fn bind<S: PageSurface + ?Sized>(
    page: &mut S,
    attr: &str,
    template: &MaskTemplate,
) -> Result<BindReport, BindError> {
    let inputs = page.marked_inputs(attr).await?;
    let mut report = BindReport::default();
    if inputs.is_empty() {
        debug!(attr, "no marked inputs on page");
        return Ok(report);
    }

    let mut forms = BTreeSet::new();
    for input in &inputs {
        if page.is_bound(input.field).await? {
            debug!(field = input.field.0, "already bound, skipping");
            report.fields_skipped += 1;
        } else {
            page.attach_mask(input.field, template).await?;
            report.fields_bound += 1;
        }
        if let Some(form) = input.form {
            forms.insert(form);
        }
    }

    for form in forms {
        if page.install_submit_normalizer(form, attr).await? {
            report.forms_hooked += 1;
        }
    }

    info!(
        fields_bound = report.fields_bound,
        fields_skipped = report.fields_skipped,
        forms_hooked = report.forms_hooked,
        "bind pass complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::memory::MemoryPage;

    #[tokio::test]
    async fn test_empty_page_is_a_noop() {
        let mut page = MemoryPage::from_html("<html><body><form></form></body></html>");
        let report = bind(&mut page, "phone", &MaskTemplate::russian_phone())
            .await
            .unwrap();
        assert_eq!(report.fields_bound, 0);
        assert_eq!(report.forms_hooked, 0);
    }

    #[tokio::test]
    async fn test_two_fields_in_one_form_hook_once() {
        let html = r#"
            <form>
                <input name="home" phone="true">
                <input name="work" phone="true">
            </form>
        "#;
        let mut page = MemoryPage::from_html(html);
        let report = bind(&mut page, "phone", &MaskTemplate::russian_phone())
            .await
            .unwrap();
        assert_eq!(report.fields_bound, 2);
        assert_eq!(report.forms_hooked, 1);
    }

    #[tokio::test]
    async fn test_rebind_skips_bound_fields_and_hooked_forms() {
        let html = r#"<form><input name="phone" phone="true"></form>"#;
        let mut page = MemoryPage::from_html(html);
        let tpl = MaskTemplate::russian_phone();

        let first = bind(&mut page, "phone", &tpl).await.unwrap();
        assert_eq!(first.fields_bound, 1);
        assert_eq!(first.forms_hooked, 1);

        let second = bind(&mut page, "phone", &tpl).await.unwrap();
        assert_eq!(second.fields_bound, 0);
        assert_eq!(second.fields_skipped, 1);
        assert_eq!(second.forms_hooked, 0);
    }

    #[tokio::test]
    async fn test_field_outside_form_gets_mask_only() {
        let html = r#"<body><input name="loose" phone="true"></body>"#;
        let mut page = MemoryPage::from_html(html);
        let report = bind(&mut page, "phone", &MaskTemplate::russian_phone())
            .await
            .unwrap();
        assert_eq!(report.fields_bound, 1);
        assert_eq!(report.forms_hooked, 0);
    }
}
