//! One-shot visibility behaviors: scroll-reveal and lazy images.
//!
//! Both register elements with a visibility observer, act the first time an
//! element becomes visible, and stop watching it right away.

use crate::config::SiteConfig;
use crate::error::Result;
use crate::runtime::{EventKind, ObserverOptions, Page, Target, VisibilityObserver};

pub const REVEAL_SELECTOR: &str = ".service-card, .benefit-card, .product-card, .faq-item, .contact-item, .stat";
pub const LAZY_IMAGE_SELECTOR: &str = "img[data-src]";
pub const DEFERRED_SOURCE_ATTR: &str = "data-src";

const REVEAL_OFFSET: &str = "translateY(30px)";
const REVEAL_SETTLED: &str = "translateY(0)";
const REVEAL_TRANSITION: &str = "opacity 0.6s ease, transform 0.6s ease";
const IMAGE_TRANSITION: &str = "opacity 0.3s ease";

// =============================================================================
// SCROLL REVEAL
// =============================================================================

/// Hide the elements matching `config.reveal_selector` and reveal each the
/// first time it scrolls into view.
///
/// Returns the observer, or `None` when nothing matches.
pub fn init_scroll_reveal(page: &Page, config: &SiteConfig) -> Result<Option<VisibilityObserver>> {
    let elements = page.document().query_all(&config.reveal_selector)?;
    if elements.is_empty() {
        return Ok(None);
    }

    let options = ObserverOptions {
        threshold: config.reveal_threshold,
        bottom_margin: config.reveal_bottom_margin,
    };
    let p = page.clone();
    let observer = page.observe_visibility(options, move |entries, observer| {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            let mut doc = p.document_mut();
            let style = doc.style_mut(entry.target);
            style.opacity = Some(1.0);
            style.transform = Some(REVEAL_SETTLED.to_string());
            observer.unobserve(entry.target);
        }
        Ok(())
    });

    {
        let mut doc = page.document_mut();
        for el in elements {
            let style = doc.style_mut(el);
            style.opacity = Some(0.0);
            style.transform = Some(REVEAL_OFFSET.to_string());
            style.transition = Some(REVEAL_TRANSITION.to_string());
            observer.observe(el);
        }
    }

    tracing::debug!(elements = observer.observed_count(), "scroll reveal activated");
    Ok(Some(observer))
}

// =============================================================================
// LAZY IMAGES
// =============================================================================

/// Defer `img[data-src]` sources until the image first becomes visible.
///
/// The image fades in once the host reports the new source loaded.
pub fn init_lazy_images(page: &Page) -> Result<Option<VisibilityObserver>> {
    let images = page.document().query_all(LAZY_IMAGE_SELECTOR)?;
    if images.is_empty() {
        return Ok(None);
    }

    let p = page.clone();
    let observer = page.observe_visibility(ObserverOptions::default(), move |entries, observer| {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            let img = entry.target;
            {
                let mut doc = p.document_mut();
                if let Some(src) = doc.remove_attribute(img, DEFERRED_SOURCE_ATTR) {
                    doc.set_attribute(img, "src", &src);
                }
            }
            observer.unobserve(img);

            let loaded = p.clone();
            p.listen(Target::Element(img), EventKind::Load, move |_| {
                loaded.document_mut().style_mut(img).opacity = Some(1.0);
                Ok(())
            });
        }
        Ok(())
    });

    {
        let mut doc = page.document_mut();
        for img in images {
            let style = doc.style_mut(img);
            style.opacity = Some(0.0);
            style.transition = Some(IMAGE_TRANSITION.to_string());
            observer.observe(img);
        }
    }

    Ok(Some(observer))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::storefront_page;
    use crate::types::{ElementId, ScrollBehavior};

    fn by_id(page: &Page, id: &str) -> ElementId {
        page.document().element_by_id(id).unwrap()
    }

    #[test]
    fn test_reveal_once_on_entering_view() {
        let page = storefront_page();
        let observer = init_scroll_reveal(&page, &SiteConfig::default()).unwrap().unwrap();
        let faq = by_id(&page, "faq-1");
        assert_eq!(page.document().style(faq).opacity, Some(0.0));

        page.poll_observers();
        assert!(observer.is_observing(faq));

        page.scroll_to(1500.0, ScrollBehavior::Instant);
        assert_eq!(page.document().style(faq).opacity, Some(1.0));
        assert!(!observer.is_observing(faq));

        // Scrolling away does not hide it again.
        page.scroll_to(0.0, ScrollBehavior::Instant);
        assert_eq!(page.document().style(faq).opacity, Some(1.0));
    }

    #[test]
    fn test_cards_above_fold_reveal_on_first_poll() {
        let page = storefront_page();
        let observer = init_scroll_reveal(&page, &SiteConfig::default()).unwrap().unwrap();
        let stat = by_id(&page, "stat-1");
        page.poll_observers();
        assert_eq!(page.document().style(stat).transform.as_deref(), Some("translateY(0)"));
        assert!(!observer.is_observing(stat));
    }

    #[test]
    fn test_lazy_image_swaps_source_then_fades_in() {
        let page = storefront_page();
        let observer = init_lazy_images(&page).unwrap().unwrap();
        let img = by_id(&page, "lazy-1");

        page.poll_observers();
        assert!(page.document().attribute(img, "src").is_none());

        page.scroll_to(2200.0, ScrollBehavior::Instant);
        {
            let doc = page.document();
            assert_eq!(doc.attribute(img, "src"), Some("images/warehouse.jpg"));
            assert!(!doc.has_attribute(img, DEFERRED_SOURCE_ATTR));
            assert_eq!(doc.style(img).opacity, Some(0.0));
        }
        assert!(!observer.is_observing(img));

        page.finish_image_load(img);
        assert_eq!(page.document().style(img).opacity, Some(1.0));
    }

    #[test]
    fn test_no_targets_no_observer() {
        let page = Page::default();
        assert!(init_scroll_reveal(&page, &SiteConfig::default()).unwrap().is_none());
        assert!(init_lazy_images(&page).unwrap().is_none());
    }
}
