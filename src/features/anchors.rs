//! Smooth in-page anchor scrolling.

use crate::config::SiteConfig;
use crate::error::Result;
use crate::runtime::{EventKind, Page, Target};

pub const ANCHOR_LINK_SELECTOR: &str = "a[href^=\"#\"]";

/// Intercept clicks on `#fragment` links whose target exists and scroll to
/// it smoothly, `anchor_offset` pixels short of its top.
///
/// Links present at call time are wired; links added later are not.
pub fn init_smooth_scrolling(page: &Page, config: &SiteConfig) -> Result<()> {
    let links = page.document().query_all(ANCHOR_LINK_SELECTOR)?;
    let offset = config.anchor_offset;

    for link in links {
        let p = page.clone();
        page.listen(Target::Element(link), EventKind::Click, move |event| {
            let target = {
                let doc = p.document();
                let fragment = doc
                    .attribute(link, "href")
                    .and_then(|href| href.strip_prefix('#'))
                    .unwrap_or_default();
                if fragment.is_empty() {
                    None
                } else {
                    doc.element_by_id(fragment)
                }
            };
            if let Some(target) = target {
                event.prevent_default();
                p.scroll_to_element(target, offset);
            }
            Ok(())
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::storefront_page;
    use crate::types::{ElementId, ScrollBehavior};

    fn link_to(page: &Page, href: &str) -> ElementId {
        page.document()
            .query(&format!("a[href=\"{href}\"]"))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_anchor_click_scrolls_with_offset() {
        let page = storefront_page();
        init_smooth_scrolling(&page, &SiteConfig::default()).unwrap();
        let services_top = {
            let doc = page.document();
            doc.rect(doc.element_by_id("services").unwrap()).top
        };

        assert!(page.click(link_to(&page, "#services")));
        assert_eq!(page.scroll_y(), services_top - 100.0);
        assert_eq!(page.last_scroll_behavior(), Some(ScrollBehavior::Smooth));
    }

    #[test]
    fn test_missing_target_keeps_default() {
        let page = storefront_page();
        init_smooth_scrolling(&page, &SiteConfig::default()).unwrap();
        assert!(!page.click(link_to(&page, "#nowhere")));
        assert_eq!(page.last_scroll_behavior(), None);
    }
}
