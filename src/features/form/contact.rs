//! Contact form wiring.
//!
//! - blur validates the field
//! - input re-validates a field that is currently marked invalid
//! - submit validates every required field, then either simulates sending
//!   or focuses the first invalid field
//! - typing into `#phone` reformats it live
//!
//! Submission is simulated: no request leaves the page.

use std::rc::Rc;

use super::rules::{FieldKind, format_phone, validate_value};
use crate::config::SiteConfig;
use crate::error::Result;
use crate::runtime::{EventKind, Page, Target};
use crate::types::{Display, ElementFlags, ElementId};

pub const FORM_ID: &str = "contactForm";
pub const SUCCESS_ID: &str = "formSuccess";
pub const PHONE_ID: &str = "phone";
pub const REQUIRED_SELECTOR: &str = "input[required], textarea[required]";
pub const SUBMIT_SELECTOR: &str = "button[type=\"submit\"]";
pub const FIRST_ERROR_SELECTOR: &str = ".form-group.error input, .form-group.error textarea";
pub const NAMED_CONTROL_SELECTOR: &str = "input[name], textarea[name], select[name]";
pub const ERROR_CLASS: &str = "error";
pub const SENDING_TEXT: &str = "Sending...";

// =============================================================================
// Single field
// =============================================================================

/// Validate one control and update its error presentation.
///
/// Clears the container's error marker and the error text first, then sets
/// both again on failure. Controls whose name has no rule always pass.
pub fn validate_field(page: &Page, field: ElementId) -> bool {
    let mut doc = page.document_mut();
    let name = doc.attribute(field, "name").unwrap_or_default().to_string();
    let container = doc.parent(field);
    let error_element = doc.element_by_id(&format!("{name}Error"));

    if let Some(container) = container {
        doc.remove_class(container, ERROR_CLASS);
    }
    if let Some(error_element) = error_element {
        doc.set_text(error_element, "");
    }

    let outcome = match FieldKind::from_name(&name) {
        Some(kind) => validate_value(kind, doc.value(field)),
        None => Ok(()),
    };

    match outcome {
        Ok(()) => true,
        Err(err) => {
            if let Some(container) = container {
                doc.add_class(container, ERROR_CLASS);
            }
            if let Some(error_element) = error_element {
                doc.set_text(error_element, &err.to_string());
            }
            false
        }
    }
}

// =============================================================================
// ContactForm
// =============================================================================

struct ContactFormInner {
    page: Page,
    form: ElementId,
    fields: Vec<ElementId>,
    submit_button: Option<ElementId>,
    success_panel: Option<ElementId>,
    config: SiteConfig,
}

/// The wired contact form.
#[derive(Clone)]
pub struct ContactForm {
    inner: Rc<ContactFormInner>,
}

impl std::fmt::Debug for ContactForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactForm")
            .field("form", &self.inner.form)
            .field("fields", &self.inner.fields)
            .finish()
    }
}

impl ContactForm {
    pub fn form(&self) -> ElementId {
        self.inner.form
    }

    /// Required controls in document order.
    pub fn fields(&self) -> &[ElementId] {
        &self.inner.fields
    }

    /// Validate every required field. All fields are checked so every error
    /// shows at once.
    pub fn validate_all(&self) -> bool {
        self.inner
            .fields
            .iter()
            .fold(true, |valid, field| validate_field(&self.inner.page, *field) && valid)
    }

    /// Whether the simulated request is in flight.
    pub fn is_sending(&self) -> bool {
        self.inner
            .submit_button
            .is_some_and(|b| self.inner.page.document().flags(b).contains(ElementFlags::DISABLED))
    }

    fn handle_submit(&self) {
        if self.is_sending() {
            return;
        }
        if self.validate_all() {
            self.begin_sending();
        } else {
            self.focus_first_error();
        }
    }

    fn begin_sending(&self) {
        let page = &self.inner.page;
        let button_label = self.inner.submit_button.map(|button| {
            let mut doc = page.document_mut();
            let text = doc.text(button).to_string();
            doc.set_text(button, SENDING_TEXT);
            doc.set_flag(button, ElementFlags::DISABLED, true);
            text
        });

        let form = self.clone();
        page.scheduler()
            .set_timeout(self.inner.config.submit_delay, move || {
                form.complete_sending(button_label.as_deref())
            });
    }

    fn complete_sending(&self, button_label: Option<&str>) -> Result<()> {
        let ContactFormInner {
            page,
            form,
            submit_button,
            success_panel,
            config,
            ..
        } = &*self.inner;

        page.document_mut().style_mut(*form).display = Some(Display::None);
        if let Some(panel) = success_panel {
            page.document_mut().style_mut(*panel).display = Some(Display::Block);
            page.scroll_to_element(*panel, config.anchor_offset);
        }

        if let (Some(button), Some(text)) = (submit_button, button_label) {
            let mut doc = page.document_mut();
            doc.set_text(*button, text);
            doc.set_flag(*button, ElementFlags::DISABLED, false);
        }

        let payload = self.payload()?;
        tracing::info!(?payload, "contact form submitted");
        Ok(())
    }

    /// Name/value pairs of every named control in the form.
    pub fn payload(&self) -> Result<Vec<(String, String)>> {
        let doc = self.inner.page.document();
        Ok(doc
            .query_all_within(self.inner.form, NAMED_CONTROL_SELECTOR)?
            .into_iter()
            .filter_map(|el| {
                doc.attribute(el, "name")
                    .map(|name| (name.to_string(), doc.value(el).to_string()))
            })
            .collect())
    }

    fn focus_first_error(&self) {
        let page = &self.inner.page;
        let first = page
            .document()
            .query_within(self.inner.form, FIRST_ERROR_SELECTOR);
        match first {
            Ok(Some(field)) => {
                page.focus(field);
                let container = page.document().parent(field);
                if let Some(container) = container {
                    page.scroll_to_element(container, self.inner.config.error_focus_offset);
                }
            }
            Ok(None) => {}
            Err(err) => tracing::error!(error = %err, "invalid error-field selector"),
        }
    }
}

/// Wire the contact form. `Ok(None)` when the page has no `#contactForm`.
pub fn init_contact_form(page: &Page, config: &SiteConfig) -> Result<Option<ContactForm>> {
    let (form, fields, submit_button, success_panel, phone) = {
        let doc = page.document();
        let Some(form) = doc.element_by_id(FORM_ID) else {
            tracing::debug!("no contact form, validation skipped");
            return Ok(None);
        };
        (
            form,
            doc.query_all_within(form, REQUIRED_SELECTOR)?,
            doc.query_within(form, SUBMIT_SELECTOR)?,
            doc.element_by_id(SUCCESS_ID),
            doc.element_by_id(PHONE_ID),
        )
    };

    let contact = ContactForm {
        inner: Rc::new(ContactFormInner {
            page: page.clone(),
            form,
            fields,
            submit_button,
            success_panel,
            config: config.clone(),
        }),
    };

    for field in contact.fields().iter().copied() {
        let p = page.clone();
        page.listen(Target::Element(field), EventKind::Blur, move |_| {
            validate_field(&p, field);
            Ok(())
        });

        let p = page.clone();
        page.listen(Target::Element(field), EventKind::Input, move |_| {
            let errored = {
                let doc = p.document();
                doc.parent(field).is_some_and(|c| doc.has_class(c, ERROR_CLASS))
            };
            if errored {
                validate_field(&p, field);
            }
            Ok(())
        });
    }

    let submit = contact.clone();
    page.listen(Target::Element(form), EventKind::Submit, move |event| {
        event.prevent_default();
        submit.handle_submit();
        Ok(())
    });

    if let Some(phone) = phone {
        let p = page.clone();
        page.listen(Target::Element(phone), EventKind::Input, move |_| {
            let mut doc = p.document_mut();
            let formatted = format_phone(doc.value(phone));
            doc.set_value(phone, &formatted);
            Ok(())
        });
    }

    tracing::debug!(fields = contact.fields().len(), "contact form activated");
    Ok(Some(contact))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::storefront_page;
    use crate::types::{ScrollBehavior, ms};

    fn setup() -> (Page, ContactForm) {
        let page = storefront_page();
        let form = init_contact_form(&page, &SiteConfig::default()).unwrap().unwrap();
        (page, form)
    }

    fn by_id(page: &Page, id: &str) -> ElementId {
        page.document().element_by_id(id).unwrap()
    }

    fn set_value(page: &Page, id: &str, value: &str) {
        let field = by_id(page, id);
        page.document_mut().set_value(field, value);
    }

    fn fill_valid(page: &Page) {
        for (id, value) in [
            ("firstName", "Ada"),
            ("lastName", "Lovelace"),
            ("email", "ada@example.com"),
            ("phone", "5551234567"),
            ("message", "Please send a quote for floor cleaner."),
        ] {
            set_value(page, id, value);
        }
    }

    fn is_marked(page: &Page, id: &str) -> bool {
        let field = by_id(page, id);
        let doc = page.document();
        doc.parent(field).is_some_and(|c| doc.has_class(c, ERROR_CLASS))
    }

    #[test]
    fn test_missing_form_is_skipped() {
        let page = Page::default();
        assert!(init_contact_form(&page, &SiteConfig::default()).unwrap().is_none());
    }

    #[test]
    fn test_blur_marks_and_clears() {
        let (page, _) = setup();
        let email = by_id(&page, "email");
        page.focus(email);
        page.blur(email);
        assert!(is_marked(&page, "email"));
        let error = by_id(&page, "emailError");
        assert_eq!(page.document().text(error), "Email address is required");

        page.type_into(email, "ada@example.com");
        assert!(!is_marked(&page, "email"));
        assert_eq!(page.document().text(error), "");
    }

    #[test]
    fn test_input_does_not_validate_clean_field() {
        let (page, _) = setup();
        page.type_into(by_id(&page, "firstName"), "A");
        assert!(!is_marked(&page, "firstName"));
    }

    #[test]
    fn test_one_empty_field_only_that_one_marked() {
        let (page, form) = setup();
        fill_valid(&page);
        set_value(&page, "lastName", "");

        assert!(!form.validate_all());
        for kind in FieldKind::ALL {
            assert_eq!(is_marked(&page, kind.name()), kind == FieldKind::LastName, "{kind:?}");
        }
    }

    #[test]
    fn test_invalid_submit_focuses_first_error() {
        let (page, form) = setup();
        fill_valid(&page);
        set_value(&page, "email", "a@b");
        set_value(&page, "message", "short");

        assert!(page.submit(form.form()));
        let email = by_id(&page, "email");
        assert_eq!(page.focused(), Some(email));
        assert_eq!(page.scheduler().active_count(), 0);

        // The error's container lands 120px below the top.
        let group_top = {
            let doc = page.document();
            doc.rect(doc.parent(email).unwrap()).top
        };
        assert_eq!(group_top, 3670.0);
        assert_eq!(page.scroll_y(), group_top - 120.0);
        assert_eq!(page.last_scroll_behavior(), Some(ScrollBehavior::Smooth));
    }

    #[test]
    fn test_valid_submit_simulates_sending() {
        let (page, form) = setup();
        fill_valid(&page);
        let button = page.document().query(SUBMIT_SELECTOR).unwrap().unwrap();
        let success = by_id(&page, SUCCESS_ID);

        page.submit(form.form());
        assert!(form.is_sending());
        assert_eq!(page.document().text(button), SENDING_TEXT);

        page.advance(ms(1999));
        assert_eq!(page.document().style(form.form()).display, None);

        page.advance(ms(1));
        let doc = page.document();
        assert_eq!(doc.style(form.form()).display, Some(Display::None));
        assert_eq!(doc.style(success).display, Some(Display::Block));
        assert_eq!(doc.text(button), "Send Message");
        assert!(!doc.flags(button).contains(ElementFlags::DISABLED));
    }

    #[test]
    fn test_submit_while_sending_ignored() {
        let (page, form) = setup();
        fill_valid(&page);
        page.submit(form.form());
        page.submit(form.form());
        assert_eq!(page.scheduler().active_count(), 1);
    }

    #[test]
    fn test_phone_formats_live() {
        let (page, _) = setup();
        let phone = by_id(&page, "phone");
        page.type_into(phone, "555");
        assert_eq!(page.document().value(phone), "(555");
        page.type_into(phone, "(555) 12");
        assert_eq!(page.document().value(phone), "(555) 12");
        page.type_into(phone, "(555) 1234-56789x");
        assert_eq!(page.document().value(phone), "(555) 123-4567");
    }

    #[test]
    fn test_payload_lists_named_controls() {
        let (page, form) = setup();
        fill_valid(&page);
        let payload = form.payload().unwrap();
        assert!(payload.contains(&("email".to_string(), "ada@example.com".to_string())));
        assert!(payload.iter().any(|(name, _)| name == "company"));
    }
}
