//! End-to-end pipeline tests over the in-process page model.

use maskbind::page::memory::MemoryPage;
use maskbind::page::PageSurface;
use maskbind::{BindConfig, MaskInitializer};

const CONTACT_PAGE: &str = r#"
    <html><body>
    <form id="contact">
        <input name="phone" phone="true" value="">
        <input name="email" value="">
    </form>
    </body></html>
"#;

const TWO_PHONE_PAGE: &str = r#"
    <html><body>
    <form id="contact">
        <input name="home" phone="true" value="">
        <input name="work" phone="true" value="">
    </form>
    </body></html>
"#;

fn initializer() -> MaskInitializer {
    MaskInitializer::new(BindConfig::default()).unwrap()
}

#[tokio::test]
async fn typing_renders_the_masked_value() {
    let mut page = MemoryPage::from_html(CONTACT_PAGE);
    initializer().run(&mut page).await.unwrap();

    let field = page.marked_inputs("phone").await.unwrap()[0].field;
    page.type_text(field, "9991234567").unwrap();
    assert_eq!(page.value_of(field), Some("+7 (999) 123-45-67"));
}

#[tokio::test]
async fn submit_rewrites_the_field_to_digits_only() {
    let mut page = MemoryPage::from_html(CONTACT_PAGE);
    initializer().run(&mut page).await.unwrap();

    let marked = page.marked_inputs("phone").await.unwrap();
    let field = marked[0].field;
    let form = marked[0].form.unwrap();

    page.type_text(field, "9991234567").unwrap();
    page.submit(form).unwrap();
    assert_eq!(page.value_of(field), Some("79991234567"));
}

#[tokio::test]
async fn page_without_marked_fields_is_a_noop() {
    let mut page = MemoryPage::from_html("<html><body><form></form></body></html>");
    let report = initializer().run(&mut page).await.unwrap();
    assert_eq!(report.fields_bound, 0);
    assert_eq!(report.forms_hooked, 0);
}

#[tokio::test(start_paused = true)]
async fn delayed_masking_capability_binds_after_retries() {
    let mut page = MemoryPage::from_html(CONTACT_PAGE).with_ready_after(5);
    let report = initializer().run(&mut page).await.unwrap();
    assert!(report.attempts > 1);
    assert_eq!(report.fields_bound, 1);
}

#[tokio::test]
async fn two_marked_fields_in_one_form_both_strip_on_submit() {
    let mut page = MemoryPage::from_html(TWO_PHONE_PAGE);
    let report = initializer().run(&mut page).await.unwrap();
    assert_eq!(report.fields_bound, 2);
    assert_eq!(report.forms_hooked, 1);

    let marked = page.marked_inputs("phone").await.unwrap();
    let form = marked[0].form.unwrap();
    page.type_text(marked[0].field, "9991234567").unwrap();
    page.type_text(marked[1].field, "4951112233").unwrap();

    page.submit(form).unwrap();
    assert_eq!(page.value_of(marked[0].field), Some("79991234567"));
    assert_eq!(page.value_of(marked[1].field), Some("74951112233"));
}

#[tokio::test]
async fn reinitialization_preserves_masked_values() {
    let mut page = MemoryPage::from_html(CONTACT_PAGE);
    let init = initializer();
    init.run(&mut page).await.unwrap();

    let field = page.marked_inputs("phone").await.unwrap()[0].field;
    page.type_text(field, "9991234567").unwrap();

    // A second run stands in for a duplicate DOMContentLoaded firing.
    let second = init.run(&mut page).await.unwrap();
    assert_eq!(second.fields_bound, 0);
    assert_eq!(second.fields_skipped, 1);
    assert_eq!(second.forms_hooked, 0);
    assert_eq!(page.value_of(field), Some("+7 (999) 123-45-67"));
}

#[tokio::test]
async fn vendor_scripts_inject_only_when_absent() {
    let mut page = MemoryPage::from_html(CONTACT_PAGE);
    page.define_global("jQuery");
    initializer().run(&mut page).await.unwrap();

    assert_eq!(page.injected_scripts().len(), 1);
    assert!(page.injected_scripts()[0].contains("jquery.mask"));
}
