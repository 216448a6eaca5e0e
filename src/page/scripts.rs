//! JavaScript snippets evaluated by the browser surface.
//!
//! Every snippet is an IIFE returning a JSON-serializable value, built from
//! a raw template with `__TOKEN__` substitution. Attribute names and values
//! always pass through [`js_string`] before landing in a template.

/// Attribute tagging marked inputs with a stable handle index.
pub const FIELD_TAG: &str = "data-maskbind-field";
/// Attribute tagging forms with a stable handle index.
pub const FORM_TAG: &str = "data-maskbind-form";
/// Attribute marking an input as already masked.
pub const BOUND_TAG: &str = "data-maskbind-bound";
/// Attribute marking a form that already carries the submit normalizer.
pub const HOOKED_TAG: &str = "data-maskbind-hooked";

/// Escape a string for inclusion inside a single-quoted JS literal.
pub fn js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\x3c"),
            _ => out.push(c),
        }
    }
    out
}

/// Enumerate marked inputs, tagging fields and their enclosing forms with
/// stable indices. Returns `[{field, form, name}]`.
pub fn tag_marked_inputs(attr: &str) -> String {
    r#"(() => {
        let nextField = 0, nextForm = 0;
        document.querySelectorAll('[__FIELD_TAG__]').forEach((el) => {
            const n = parseInt(el.getAttribute('__FIELD_TAG__'), 10);
            if (!isNaN(n) && n >= nextField) nextField = n + 1;
        });
        document.querySelectorAll('form[__FORM_TAG__]').forEach((el) => {
            const n = parseInt(el.getAttribute('__FORM_TAG__'), 10);
            if (!isNaN(n) && n >= nextForm) nextForm = n + 1;
        });
        const out = [];
        document.querySelectorAll('input[__ATTR__="true"]').forEach((el) => {
            if (!el.hasAttribute('__FIELD_TAG__')) {
                el.setAttribute('__FIELD_TAG__', String(nextField++));
            }
            const field = parseInt(el.getAttribute('__FIELD_TAG__'), 10);
            const formEl = el.closest('form');
            let form = null;
            if (formEl) {
                if (!formEl.hasAttribute('__FORM_TAG__')) {
                    formEl.setAttribute('__FORM_TAG__', String(nextForm++));
                }
                form = parseInt(formEl.getAttribute('__FORM_TAG__'), 10);
            }
            out.push({ field: field, form: form, name: el.getAttribute('name') });
        });
        return out;
    })()"#
        .replace("__FIELD_TAG__", FIELD_TAG)
        .replace("__FORM_TAG__", FORM_TAG)
        .replace("__ATTR__", &js_string(attr))
}

/// Read a field's value. Returns `null` when the handle no longer resolves.
pub fn field_value(field: u32) -> String {
    r#"(() => {
        const el = document.querySelector('[__FIELD_TAG__="__IDX__"]');
        return el ? el.value : null;
    })()"#
        .replace("__FIELD_TAG__", FIELD_TAG)
        .replace("__IDX__", &field.to_string())
}

/// Overwrite a field's value.
pub fn set_field_value(field: u32, value: &str) -> String {
    r#"(() => {
        const el = document.querySelector('[__FIELD_TAG__="__IDX__"]');
        if (!el) return false;
        el.value = '__VALUE__';
        el.dispatchEvent(new Event('input', { bubbles: true }));
        return true;
    })()"#
        .replace("__FIELD_TAG__", FIELD_TAG)
        .replace("__IDX__", &field.to_string())
        .replace("__VALUE__", &js_string(value))
}

/// Whether a field was bound by a previous pass.
pub fn is_bound(field: u32) -> String {
    r#"(() => {
        const el = document.querySelector('[__FIELD_TAG__="__IDX__"]');
        return !!el && el.getAttribute('__BOUND_TAG__') === 'true';
    })()"#
        .replace("__FIELD_TAG__", FIELD_TAG)
        .replace("__BOUND_TAG__", BOUND_TAG)
        .replace("__IDX__", &field.to_string())
}

/// Attach the mask through the vendor plugin (`jQuery.fn.mask`).
pub fn attach_mask_vendor(field: u32, template: &str) -> String {
    r#"(() => {
        const el = document.querySelector('[__FIELD_TAG__="__IDX__"]');
        if (!el) return false;
        if (typeof jQuery === 'undefined' || typeof jQuery.fn.mask === 'undefined') return false;
        jQuery(el).mask('__TPL__');
        el.setAttribute('__BOUND_TAG__', 'true');
        return true;
    })()"#
        .replace("__FIELD_TAG__", FIELD_TAG)
        .replace("__BOUND_TAG__", BOUND_TAG)
        .replace("__IDX__", &field.to_string())
        .replace("__TPL__", &js_string(template))
}

/// Attach a self-contained mask, no vendor dependency.
///
/// The in-page `apply` mirrors `MaskTemplate::apply`: fill `0` slots left to
/// right, emit literals up to the last typed digit, drop the excess.
pub fn attach_mask_inline(field: u32, template: &str) -> String {
    r#"(() => {
        const el = document.querySelector('[__FIELD_TAG__="__IDX__"]');
        if (!el) return false;
        const tpl = '__TPL__';
        const apply = (raw) => {
            let out = '', pending = '', i = 0;
            for (const ch of tpl) {
                if (ch === '0') {
                    while (i < raw.length && !/\d/.test(raw[i])) i++;
                    if (i >= raw.length) break;
                    out += pending + raw[i++];
                    pending = '';
                } else {
                    if (raw[i] === ch) i++;
                    pending += ch;
                }
            }
            return out;
        };
        el.addEventListener('input', () => { el.value = apply(el.value); });
        el.value = apply(el.value);
        el.setAttribute('__BOUND_TAG__', 'true');
        return true;
    })()"#
        .replace("__FIELD_TAG__", FIELD_TAG)
        .replace("__BOUND_TAG__", BOUND_TAG)
        .replace("__IDX__", &field.to_string())
        .replace("__TPL__", &js_string(template))
}

/// Install the capturing submit listener that strips every marked input in
/// the form to digits only. Guarded by a form attribute so re-binding never
/// stacks a second listener. Returns `"installed"`, `"present"`, or
/// `"missing"`.
pub fn install_submit_normalizer(form: u32, attr: &str) -> String {
    r#"(() => {
        const form = document.querySelector('form[__FORM_TAG__="__IDX__"]');
        if (!form) return 'missing';
        if (form.getAttribute('__HOOKED_TAG__') === 'true') return 'present';
        form.addEventListener('submit', () => {
            form.querySelectorAll('input[__ATTR__="true"]').forEach((el) => {
                el.value = el.value.replace(/\D/g, '');
            });
        }, true);
        form.setAttribute('__HOOKED_TAG__', 'true');
        return 'installed';
    })()"#
        .replace("__FORM_TAG__", FORM_TAG)
        .replace("__HOOKED_TAG__", HOOKED_TAG)
        .replace("__IDX__", &form.to_string())
        .replace("__ATTR__", &js_string(attr))
}

/// Resolve a dotted global path (`jQuery.fn.mask`) against `window`.
pub fn has_global(marker: &str) -> String {
    r#"(() => {
        let obj = window;
        for (const part of '__PATH__'.split('.')) {
            if (obj === null || typeof obj === 'undefined') return false;
            obj = obj[part];
        }
        return typeof obj !== 'undefined';
    })()"#
        .replace("__PATH__", &js_string(marker))
}

/// Append a `<script src>` element to the document head.
pub fn inject_script(src: &str) -> String {
    r#"(() => {
        const s = document.createElement('script');
        s.src = '__SRC__';
        document.head.appendChild(s);
        return true;
    })()"#
        .replace("__SRC__", &js_string(src))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes_quotes_and_backslashes() {
        assert_eq!(js_string(r"a'b\c"), r"a\'b\\c");
    }

    #[test]
    fn test_js_string_escapes_script_close() {
        assert!(!js_string("</script>").contains('<'));
    }

    #[test]
    fn test_tag_marked_inputs_targets_attribute() {
        let js = tag_marked_inputs("phone");
        assert!(js.contains(r#"input[phone="true"]"#));
        assert!(js.contains(FIELD_TAG));
        assert!(!js.contains("__ATTR__"));
    }

    #[test]
    fn test_attach_mask_vendor_embeds_template() {
        let js = attach_mask_vendor(3, "+7 (000) 000-00-00");
        assert!(js.contains("jQuery(el).mask('+7 (000) 000-00-00')"));
        assert!(js.contains(r#"[data-maskbind-field="3"]"#));
    }

    #[test]
    fn test_install_submit_normalizer_is_guarded() {
        let js = install_submit_normalizer(0, "phone");
        assert!(js.contains(HOOKED_TAG));
        assert!(js.contains(r#"replace(/\D/g, '')"#));
    }

    #[test]
    fn test_has_global_walks_dotted_path() {
        let js = has_global("jQuery.fn.mask");
        assert!(js.contains("'jQuery.fn.mask'.split('.')"));
    }
}
