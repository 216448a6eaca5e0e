//! In-process page model.
//!
//! `MemoryPage` parses an HTML document into a flat field/form structure and
//! implements [`PageSurface`] natively: masks run through the crate's own
//! template engine, submit normalizers are recorded per form and executed by
//! [`MemoryPage::submit`]. A configurable readiness delay lets callers
//! exercise the readiness gate without a browser.

use super::{FieldHandle, FormHandle, MarkedInput, PageSurface};
use crate::error::BindError;
use crate::mask::{strip_non_digits, MaskTemplate};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static INPUT_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("input").unwrap());
static FORM_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("form").unwrap());

/// One input element of the parsed document.
#[derive(Debug, Clone)]
struct MemoryField {
    attrs: HashMap<String, String>,
    value: String,
    bound: bool,
    mask: Option<MaskTemplate>,
    form: Option<u32>,
}

/// One form element of the parsed document.
#[derive(Debug, Clone, Default)]
struct MemoryForm {
    /// Marker attribute the installed normalizer strips, if any.
    normalizer_attr: Option<String>,
    submit_count: u32,
}

/// An in-process document model implementing [`PageSurface`].
#[derive(Debug, Default)]
pub struct MemoryPage {
    fields: Vec<MemoryField>,
    forms: Vec<MemoryForm>,
    globals: HashSet<String>,
    injected: Vec<String>,
    ready_after: u32,
    probes: u32,
}

impl MemoryPage {
    /// Parse a document into fields and forms, in document order.
    pub fn from_html(html: &str) -> Self {
        let doc = Html::parse_document(html);

        let mut form_index: HashMap<_, u32> = HashMap::new();
        let mut forms = Vec::new();
        for form in doc.select(&FORM_SEL) {
            form_index.insert(form.id(), forms.len() as u32);
            forms.push(MemoryForm::default());
        }

        let mut fields = Vec::new();
        for input in doc.select(&INPUT_SEL) {
            let attrs: HashMap<String, String> = input
                .value()
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            let value = attrs.get("value").cloned().unwrap_or_default();

            let mut form = None;
            for ancestor in input.ancestors() {
                if let Some(el) = ElementRef::wrap(ancestor) {
                    if el.value().name() == "form" {
                        form = form_index.get(&ancestor.id()).copied();
                        break;
                    }
                }
            }

            fields.push(MemoryField {
                attrs,
                value,
                bound: false,
                mask: None,
                form,
            });
        }

        Self {
            fields,
            forms,
            ..Self::default()
        }
    }

    /// Report not-ready for the first `probes` readiness checks.
    pub fn with_ready_after(mut self, probes: u32) -> Self {
        self.ready_after = probes;
        self
    }

    /// Simulate a vendor script having finished loading.
    pub fn define_global(&mut self, marker: &str) {
        self.globals.insert(marker.to_string());
    }

    /// Script URLs injected into this page, in order.
    pub fn injected_scripts(&self) -> &[String] {
        &self.injected
    }

    /// Simulate typing into a field. Masked fields reformat on every
    /// keystroke, so the result is the template applied to all digits typed
    /// so far; unmasked fields take the text verbatim.
    pub fn type_text(&mut self, field: FieldHandle, text: &str) -> Result<(), BindError> {
        let f = self.field_mut(field)?;
        match &f.mask {
            Some(tpl) => {
                let combined = format!("{}{}", f.value, text);
                f.value = tpl.apply(&combined);
            }
            None => f.value.push_str(text),
        }
        Ok(())
    }

    /// Trigger a form submission: installed normalizers run first, then the
    /// submit counter advances.
    pub fn submit(&mut self, form: FormHandle) -> Result<(), BindError> {
        let idx = form.0 as usize;
        let attr = self
            .forms
            .get(idx)
            .ok_or_else(|| BindError::Page(format!("unknown form handle {}", form.0)))?
            .normalizer_attr
            .clone();

        if let Some(attr) = attr {
            for f in &mut self.fields {
                if f.form == Some(form.0) && f.attrs.get(attr.as_str()).map(String::as_str) == Some("true") {
                    f.value = strip_non_digits(&f.value);
                }
            }
        }

        self.forms[idx].submit_count += 1;
        Ok(())
    }

    /// How many times a form has been submitted.
    pub fn submit_count(&self, form: FormHandle) -> u32 {
        self.forms
            .get(form.0 as usize)
            .map(|f| f.submit_count)
            .unwrap_or(0)
    }

    /// Synchronous read of a field value, for assertions.
    pub fn value_of(&self, field: FieldHandle) -> Option<&str> {
        self.fields.get(field.0 as usize).map(|f| f.value.as_str())
    }

    /// Readiness probes answered so far.
    pub fn probe_count(&self) -> u32 {
        self.probes
    }

    fn field_mut(&mut self, field: FieldHandle) -> Result<&mut MemoryField, BindError> {
        self.fields
            .get_mut(field.0 as usize)
            .ok_or_else(|| BindError::Page(format!("unknown field handle {}", field.0)))
    }
}

#[async_trait]
impl PageSurface for MemoryPage {
    async fn marked_inputs(&mut self, attr: &str) -> Result<Vec<MarkedInput>, BindError> {
        Ok(self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.attrs.get(attr).map(String::as_str) == Some("true"))
            .map(|(i, f)| MarkedInput {
                field: FieldHandle(i as u32),
                form: f.form.map(FormHandle),
                name: f.attrs.get("name").cloned(),
            })
            .collect())
    }

    async fn field_value(&mut self, field: FieldHandle) -> Result<String, BindError> {
        Ok(self.field_mut(field)?.value.clone())
    }

    async fn set_field_value(
        &mut self,
        field: FieldHandle,
        value: &str,
    ) -> Result<(), BindError> {
        self.field_mut(field)?.value = value.to_string();
        Ok(())
    }

    async fn is_bound(&mut self, field: FieldHandle) -> Result<bool, BindError> {
        Ok(self.field_mut(field)?.bound)
    }

    async fn attach_mask(
        &mut self,
        field: FieldHandle,
        template: &MaskTemplate,
    ) -> Result<(), BindError> {
        let f = self.field_mut(field)?;
        f.value = template.apply(&f.value);
        f.mask = Some(template.clone());
        f.bound = true;
        Ok(())
    }

    async fn install_submit_normalizer(
        &mut self,
        form: FormHandle,
        attr: &str,
    ) -> Result<bool, BindError> {
        let f = self
            .forms
            .get_mut(form.0 as usize)
            .ok_or_else(|| BindError::Page(format!("unknown form handle {}", form.0)))?;
        if f.normalizer_attr.is_some() {
            return Ok(false);
        }
        f.normalizer_attr = Some(attr.to_string());
        Ok(true)
    }

    async fn has_global(&mut self, marker: &str) -> Result<bool, BindError> {
        Ok(self.globals.contains(marker))
    }

    async fn inject_script(&mut self, src: &str) -> Result<(), BindError> {
        self.injected.push(src.to_string());
        Ok(())
    }

    async fn mask_ready(&mut self) -> Result<bool, BindError> {
        self.probes += 1;
        Ok(self.probes > self.ready_after)
    }
}
