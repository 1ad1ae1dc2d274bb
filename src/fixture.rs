//! Fixture - A parsed storefront page
//!
//! Builds the markup every feature expects, laid out top to bottom with
//! document-pixel rects, so tests and the demo runner can drive a realistic
//! page without a browser.
//!
//! Layout (top, height):
//!
//! | section            | top  | height |
//! |--------------------|------|--------|
//! | header             | 0    | 80     |
//! | hero / slider      | 80   | 400    |
//! | stats              | 500  | 100    |
//! | `#services`        | 1000 | 600    |
//! | faq                | 1800 | 200    |
//! | products           | 2300 | 400    |
//! | lazy image         | 2800 | 300    |
//! | contact            | 3300 | 700    |

use crate::dom::Document;
use crate::runtime::Page;
use crate::types::{ElementId, Rect};

struct Builder {
    doc: Document,
}

impl Builder {
    /// Append a `<tag>` under `parent` with the given attributes.
    fn el(&mut self, parent: ElementId, tag: &str, attrs: &[(&str, &str)]) -> ElementId {
        let el = self.doc.create_element(tag);
        for (name, value) in attrs {
            self.doc.set_attribute(el, name, value);
        }
        self.doc.append_child(parent, el);
        el
    }

    fn text(&mut self, parent: ElementId, tag: &str, attrs: &[(&str, &str)], text: &str) -> ElementId {
        let el = self.el(parent, tag, attrs);
        self.doc.set_text(el, text);
        el
    }

    fn at(&mut self, el: ElementId, top: f64, height: f64) -> ElementId {
        self.doc.set_rect(el, Rect::new(top, height));
        el
    }
}

/// A fresh storefront page: parsed, visible, at `/`, scrolled to the top.
pub fn storefront_page() -> Page {
    let mut b = Builder { doc: Document::new() };
    let body = b.doc.body();

    // ----- Header -----
    let header = b.el(body, "header", &[("class", "header")]);
    b.at(header, 0.0, 80.0);
    let nav = b.el(header, "nav", &[("class", "navbar")]);
    b.text(nav, "a", &[("class", "logo"), ("href", "index.html")], "Brightline Supply");
    let menu = b.el(nav, "ul", &[("class", "nav-menu")]);
    for (href, label) in [
        ("index.html", "Home"),
        ("products.html", "Products"),
        ("contact.html", "Contact"),
    ] {
        let li = b.el(menu, "li", &[]);
        b.text(li, "a", &[("class", "nav-link"), ("href", href)], label);
    }
    let hamburger = b.el(nav, "button", &[("class", "hamburger"), ("aria-label", "Toggle menu")]);
    for _ in 0..3 {
        b.el(hamburger, "span", &[("class", "bar")]);
    }

    // ----- Hero slider -----
    let hero = b.el(body, "section", &[("class", "hero")]);
    b.at(hero, 80.0, 400.0);
    let slider = b.el(hero, "div", &[("class", "slider")]);
    b.at(slider, 80.0, 400.0);
    for (i, title) in ["Commercial Cleaning", "Bulk Supplies", "Same-Day Delivery"]
        .into_iter()
        .enumerate()
    {
        let id = format!("slide-{i}");
        let slide = b.el(slider, "div", &[("class", "slide"), ("id", id.as_str())]);
        b.at(slide, 80.0, 400.0);
        b.text(slide, "h1", &[], title);
    }
    b.text(slider, "button", &[("class", "prev-btn"), ("aria-label", "Previous slide")], "<");
    b.text(slider, "button", &[("class", "next-btn"), ("aria-label", "Next slide")], ">");
    let indicators = b.el(slider, "div", &[("class", "slider-indicators")]);
    for i in 0..3 {
        let index = i.to_string();
        b.el(indicators, "span", &[("class", "indicator"), ("data-slide", index.as_str())]);
    }
    b.text(hero, "a", &[("class", "btn btn-primary"), ("href", "#services")], "Our Services");

    // ----- Stats -----
    let stats = b.el(body, "section", &[("class", "stats")]);
    b.at(stats, 500.0, 100.0);
    for (i, label) in ["20+ years", "500 clients"].into_iter().enumerate() {
        let id = format!("stat-{}", i + 1);
        let stat = b.text(stats, "div", &[("class", "stat"), ("id", id.as_str())], label);
        b.at(stat, 500.0, 100.0);
    }

    // ----- Services -----
    let services = b.el(body, "section", &[("class", "services"), ("id", "services")]);
    b.at(services, 1000.0, 600.0);
    for (i, name) in ["Janitorial", "Floor Care", "Sanitation"].into_iter().enumerate() {
        let id = format!("service-{}", i + 1);
        let card = b.el(services, "div", &[("class", "service-card"), ("id", id.as_str())]);
        b.at(card, 1100.0, 250.0);
        b.text(card, "h3", &[], name);
    }

    // ----- FAQ -----
    let faq = b.el(body, "section", &[("class", "faq")]);
    b.at(faq, 1800.0, 200.0);
    let item = b.el(faq, "div", &[("class", "faq-item"), ("id", "faq-1")]);
    b.at(item, 1800.0, 200.0);
    b.text(item, "h4", &[], "Do you deliver on weekends?");

    // ----- Products -----
    let products = b.el(body, "section", &[("class", "products")]);
    b.at(products, 2300.0, 400.0);
    let tabs = b.el(products, "div", &[("class", "filter-tabs")]);
    for (category, label) in [
        ("all", "All"),
        ("disinfectants", "Disinfectants"),
        ("cleaners", "Cleaners"),
    ] {
        let class = if category == "all" { "tab-btn active" } else { "tab-btn" };
        b.text(tabs, "button", &[("class", class), ("data-category", category)], label);
    }
    let grid = b.el(products, "div", &[("class", "product-grid")]);
    for (id, category, name) in [
        ("card-a", "disinfectants", "Hospital-Grade Disinfectant"),
        ("card-b", "cleaners", "Neutral Floor Cleaner"),
        ("card-c", "disinfectants", "Surface Sanitizer Wipes"),
    ] {
        let card = b.el(grid, "div", &[("class", "product-card"), ("id", id), ("data-category", category)]);
        b.at(card, 2400.0, 300.0);
        b.text(card, "h3", &[], name);
    }

    // ----- Lazy image -----
    let gallery = b.el(body, "section", &[("class", "gallery")]);
    b.at(gallery, 2800.0, 300.0);
    let img = b.el(
        gallery,
        "img",
        &[("id", "lazy-1"), ("data-src", "images/warehouse.jpg"), ("alt", "Our warehouse")],
    );
    b.at(img, 2800.0, 300.0);

    // ----- Contact -----
    let contact = b.el(body, "section", &[("class", "contact")]);
    b.at(contact, 3300.0, 700.0);
    let info = b.text(contact, "div", &[("class", "contact-item")], "Call us: (555) 010-2000");
    b.at(info, 3300.0, 80.0);
    let form = b.el(contact, "form", &[("id", "contactForm")]);
    b.at(form, 3400.0, 600.0);
    let mut top = 3400.0;
    for (name, tag, kind, required) in [
        ("firstName", "input", "text", true),
        ("lastName", "input", "text", true),
        ("company", "input", "text", false),
        ("email", "input", "email", true),
        ("phone", "input", "tel", true),
        ("message", "textarea", "", true),
    ] {
        let group = b.el(form, "div", &[("class", "form-group")]);
        b.at(group, top, 90.0);
        b.text(group, "label", &[("for", name)], name);
        let mut attrs = vec![("id", name), ("name", name)];
        if !kind.is_empty() {
            attrs.push(("type", kind));
        }
        if required {
            attrs.push(("required", ""));
        }
        let control = b.el(group, tag, &attrs);
        b.at(control, top + 30.0, 40.0);
        if required {
            let id = format!("{name}Error");
            b.el(group, "span", &[("class", "error-message"), ("id", id.as_str())]);
        }
        top += 90.0;
    }
    b.text(form, "button", &[("type", "submit"), ("class", "btn btn-primary")], "Send Message");

    let success = b.el(contact, "div", &[("class", "form-success"), ("id", "formSuccess")]);
    b.at(success, 3400.0, 200.0);
    b.text(success, "p", &[], "Thanks! We will be in touch shortly.");

    // ----- Footer -----
    let footer = b.el(body, "footer", &[("class", "footer")]);
    b.at(footer, 4000.0, 200.0);
    b.text(footer, "a", &[("href", "#nowhere")], "Back to top");

    Page::new(b.doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_markup() {
        let page = storefront_page();
        let doc = page.document();
        assert_eq!(doc.query_all(".slide").unwrap().len(), 3);
        assert_eq!(doc.query_all(".indicator").unwrap().len(), 3);
        assert_eq!(doc.query_all("#contactForm [required]").unwrap().len(), 5);
        assert!(doc.query("main").unwrap().is_none());
        assert_eq!(doc.rect(doc.element_by_id("services").unwrap()).top, 1000.0);
    }
}
