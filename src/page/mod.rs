//! Page surfaces — the injectable interface the binder operates on.
//!
//! The binder never consults process-global state; everything it needs from
//! a page view goes through [`PageSurface`]. Two implementations ship with
//! the crate: [`browser::BrowserPage`] drives a live page over CDP, and
//! [`memory::MemoryPage`] is an in-process document model for native
//! embedding and tests.

pub mod browser;
pub mod memory;
pub mod scripts;

use crate::error::BindError;
use crate::mask::MaskTemplate;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identifies one marked input on a page.
///
/// Handles are stable for the life of a page view: the browser surface tags
/// elements with an index attribute at enumeration time, the memory surface
/// uses vector indices directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldHandle(pub u32);

/// Identifies a form element on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FormHandle(pub u32);

/// A marked input together with its nearest enclosing form, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkedInput {
    pub field: FieldHandle,
    pub form: Option<FormHandle>,
    /// The input's `name` attribute, for reporting.
    pub name: Option<String>,
}

/// Abstract surface of one page view.
///
/// Operations take `&mut self` because surfaces mutate the page they wrap
/// and may cache handle state between calls.
#[async_trait]
pub trait PageSurface: Send {
    /// Enumerate inputs carrying `attr="true"`, in document order.
    async fn marked_inputs(&mut self, attr: &str) -> Result<Vec<MarkedInput>, BindError>;

    /// Current value of a field.
    async fn field_value(&mut self, field: FieldHandle) -> Result<String, BindError>;

    /// Overwrite a field's value.
    async fn set_field_value(&mut self, field: FieldHandle, value: &str)
        -> Result<(), BindError>;

    /// Whether a previous bind pass already attached a mask to this field.
    async fn is_bound(&mut self, field: FieldHandle) -> Result<bool, BindError>;

    /// Attach the live display mask to a field and mark it bound.
    ///
    /// Reformats the field's current content through the template, matching
    /// what a masking plugin does on attach.
    async fn attach_mask(
        &mut self,
        field: FieldHandle,
        template: &MaskTemplate,
    ) -> Result<(), BindError>;

    /// Install the submit-time digits-only normalizer on a form.
    ///
    /// Idempotent: returns `true` when newly installed, `false` when the
    /// form already carries one.
    async fn install_submit_normalizer(
        &mut self,
        form: FormHandle,
        attr: &str,
    ) -> Result<bool, BindError>;

    /// Whether a page global (dotted path such as `jQuery.fn.mask`) resolves.
    async fn has_global(&mut self, marker: &str) -> Result<bool, BindError>;

    /// Append a `<script src>` element to the document head.
    async fn inject_script(&mut self, src: &str) -> Result<(), BindError>;

    /// Whether the masking capability is callable on this page.
    async fn mask_ready(&mut self) -> Result<bool, BindError>;
}
