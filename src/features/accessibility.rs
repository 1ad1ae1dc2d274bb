//! Accessibility inserts: skip link, main landmark, focus outlines.

use crate::error::Result;
use crate::runtime::{EventKind, Page, Target};
use crate::types::ElementId;

pub const SKIP_LINK_CLASS: &str = "skip-link";
pub const SKIP_LINK_TEXT: &str = "Skip to main content";
pub const MAIN_ID: &str = "main";

const SKIP_LINK_HIDDEN_TOP: &str = "-40px";
const SKIP_LINK_FOCUSED_TOP: &str = "6px";

const SKIP_LINK_CSS: &str = "position: absolute; left: 6px; background: var(--primary-color); \
color: white; padding: 8px; text-decoration: none; transition: top 0.3s; z-index: 1001; border-radius: 4px;";

const FOCUS_CSS: &str = "\
.skip-link:focus { top: 6px !important; }
button:focus-visible, a:focus-visible, input:focus-visible, textarea:focus-visible, select:focus-visible {
    outline: 2px solid var(--primary-color);
    outline-offset: 2px;
}
";

/// What the accessibility pass added to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessibilityInserts {
    pub skip_link: ElementId,
    pub stylesheet: ElementId,
    /// Element tagged as the main landmark, if one had to be tagged.
    pub landmark: Option<ElementId>,
}

/// Insert the skip link, tag a main landmark if none exists, and add the
/// focus-outline stylesheet.
pub fn init_accessibility(page: &Page) -> Result<AccessibilityInserts> {
    let skip_link = {
        let mut doc = page.document_mut();
        let link = doc.create_element("a");
        doc.set_attribute(link, "href", &format!("#{MAIN_ID}"));
        doc.set_text(link, SKIP_LINK_TEXT);
        doc.add_class(link, SKIP_LINK_CLASS);
        let style = doc.style_mut(link);
        style.css_text = Some(SKIP_LINK_CSS.to_string());
        style.top = Some(SKIP_LINK_HIDDEN_TOP.to_string());
        let body = doc.body();
        doc.insert_first(body, link);
        link
    };

    for (kind, top) in [
        (EventKind::Focus, SKIP_LINK_FOCUSED_TOP),
        (EventKind::Blur, SKIP_LINK_HIDDEN_TOP),
    ] {
        let p = page.clone();
        page.listen(Target::Element(skip_link), kind, move |_| {
            p.document_mut().style_mut(skip_link).top = Some(top.to_string());
            Ok(())
        });
    }

    let mut doc = page.document_mut();
    let landmark = if doc.query("main")?.is_none() {
        let candidate = match doc.query(".hero")? {
            Some(hero) => Some(hero),
            None => doc.query("section")?,
        };
        if let Some(el) = candidate {
            doc.set_attribute(el, "id", MAIN_ID);
        }
        candidate
    } else {
        None
    };

    let stylesheet = doc.create_element("style");
    doc.set_text(stylesheet, FOCUS_CSS);
    let head = doc.head();
    doc.append_child(head, stylesheet);

    Ok(AccessibilityInserts {
        skip_link,
        stylesheet,
        landmark,
    })
}
