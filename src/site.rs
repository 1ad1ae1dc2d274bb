//! Site - Startup sequence for every page behavior
//!
//! `boot` runs the startup pass once the document is parsed: immediately if
//! it already is, otherwise on `DOMContentLoaded`. The pass initializes each
//! feature in a fixed order under a single guard. The first error stops the
//! pass and is logged; features initialized before it stay live. The pass runs
//! at most once, whether or not it succeeds.
//!
//! # Example
//!
//! ```ignore
//! let page = Page::new(document);
//! let handle = boot(&page, SiteConfig::default());
//! // ... later
//! if let Some(carousel) = handle.site().and_then(|s| s.carousel) {
//!     carousel.next();
//! }
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::SiteConfig;
use crate::dom::ReadyState;
use crate::error::Result;
use crate::features::accessibility::{AccessibilityInserts, init_accessibility};
use crate::features::anchors::init_smooth_scrolling;
use crate::features::carousel::{Carousel, init_carousel};
use crate::features::filter::{ProductFilter, init_product_filter};
use crate::features::form::{ContactForm, init_contact_form};
use crate::features::navigation::{MobileMenu, init_header_scroll, init_mobile_navigation, set_active_nav_link};
use crate::features::reveal::{init_lazy_images, init_scroll_reveal};
use crate::runtime::{EventKind, Page, Target, VisibilityObserver};

/// Handles to every feature the startup pass activated.
#[derive(Debug, Clone, Default)]
pub struct Site {
    pub menu: Option<MobileMenu>,
    pub accessibility: Option<AccessibilityInserts>,
    pub carousel: Option<Carousel>,
    pub filter: Option<ProductFilter>,
    pub contact_form: Option<ContactForm>,
    pub reveal: Option<VisibilityObserver>,
    pub lazy_images: Option<VisibilityObserver>,
}

impl Site {
    /// Run the startup pass. Stops at the first error.
    pub fn init(page: &Page, config: &SiteConfig) -> Result<Self> {
        let mut site = Self::default();

        set_active_nav_link(page)?;
        site.menu = init_mobile_navigation(page)?;
        init_header_scroll(page, config)?;
        init_smooth_scrolling(page, config)?;
        site.accessibility = Some(init_accessibility(page)?);
        site.carousel = init_carousel(page, config)?;
        site.filter = init_product_filter(page, config)?;
        site.contact_form = init_contact_form(page, config)?;
        site.reveal = init_scroll_reveal(page, config)?;
        site.lazy_images = init_lazy_images(page)?;

        // Deliver whatever is already on screen.
        page.poll_observers();

        tracing::info!(
            carousel = site.carousel.is_some(),
            filter = site.filter.is_some(),
            contact_form = site.contact_form.is_some(),
            "site initialized"
        );
        Ok(site)
    }
}

/// Result of [`boot`]. Empty until the startup pass has run successfully.
#[derive(Debug, Clone, Default)]
pub struct SiteHandle {
    site: Rc<RefCell<Option<Site>>>,
    attempted: Rc<Cell<bool>>,
}

impl SiteHandle {
    /// The activated site, once startup has completed.
    pub fn site(&self) -> Option<Site> {
        self.site.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.site.borrow().is_some()
    }

    /// Whether the startup pass has run, successfully or not.
    pub fn is_attempted(&self) -> bool {
        self.attempted.get()
    }
}

/// Run the guarded startup pass as soon as the document is parsed.
pub fn boot(page: &Page, config: SiteConfig) -> SiteHandle {
    let handle = SiteHandle::default();

    match page.ready_state() {
        ReadyState::Loading => {
            tracing::debug!("document still loading, deferring startup");
            let (p, h) = (page.clone(), handle.clone());
            page.listen(Target::Document, EventKind::DomContentLoaded, move |_| {
                if !h.is_attempted() {
                    run_guarded(&p, &config, &h);
                }
                Ok(())
            });
        }
        ReadyState::Interactive => run_guarded(page, &config, &handle),
    }

    handle
}

fn run_guarded(page: &Page, config: &SiteConfig, handle: &SiteHandle) {
    handle.attempted.set(true);
    match Site::init(page, config) {
        Ok(site) => *handle.site.borrow_mut() = Some(site),
        Err(err) => tracing::error!(error = %err, "error initializing site"),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::storefront_page;
    use crate::types::ms;

    fn broken_reveal() -> SiteConfig {
        SiteConfig::default().with_reveal_selector("[broken")
    }

    fn active_slide(page: &Page) -> Option<String> {
        let doc = page.document();
        let slide = doc.query(".slide.active").unwrap()?;
        doc.attribute(slide, "id").map(str::to_string)
    }

    #[test]
    fn test_boot_runs_immediately_when_parsed() {
        let page = storefront_page();
        let handle = boot(&page, SiteConfig::default());
        let site = handle.site().unwrap();
        assert!(site.menu.is_some());
        assert!(site.carousel.is_some());
        assert!(site.filter.is_some());
        assert!(site.contact_form.is_some());
        assert!(site.reveal.is_some());
        assert!(site.lazy_images.is_some());
    }

    #[test]
    fn test_boot_waits_for_dom_content_loaded() {
        let page = storefront_page();
        page.set_ready_state(ReadyState::Loading);
        let handle = boot(&page, SiteConfig::default());
        assert!(!handle.is_ready());
        assert_eq!(page.scheduler().active_count(), 0);

        page.finish_parsing();
        assert!(handle.is_ready());
        assert_eq!(page.scheduler().interval_count(), 1);

        // A second DOMContentLoaded does not start a second pass.
        page.finish_parsing();
        assert_eq!(page.scheduler().interval_count(), 1);
    }

    #[test]
    fn test_failed_step_keeps_earlier_features_live() {
        let page = storefront_page();
        let handle = boot(&page, broken_reveal());
        assert!(handle.is_attempted());
        assert!(!handle.is_ready());
        assert!(handle.site().is_none());

        // The carousel started before the reveal step failed.
        assert_eq!(page.scheduler().interval_count(), 1);
        assert_eq!(active_slide(&page).as_deref(), Some("slide-0"));
        page.advance(ms(5000));
        assert_eq!(active_slide(&page).as_deref(), Some("slide-1"));

        // Later steps never ran: the lazy image keeps its deferred source.
        let doc = page.document();
        let img = doc.element_by_id("lazy-1").unwrap();
        assert!(doc.attribute(img, "src").is_none());
        assert_eq!(doc.style(doc.element_by_id("stat-1").unwrap()).opacity, None);
    }

    #[test]
    fn test_failed_deferred_pass_runs_only_once() {
        let page = storefront_page();
        page.set_ready_state(ReadyState::Loading);
        let handle = boot(&page, broken_reveal());
        assert!(!handle.is_attempted());

        page.finish_parsing();
        assert!(handle.is_attempted());
        assert!(!handle.is_ready());
        assert_eq!(page.scheduler().interval_count(), 1);

        page.finish_parsing();
        assert!(!handle.is_ready());
        assert_eq!(page.scheduler().interval_count(), 1);
    }

    #[test]
    fn test_empty_page_boots_with_nothing_active() {
        let page = Page::default();
        let site = boot(&page, SiteConfig::default()).site().unwrap();
        assert!(site.carousel.is_none());
        assert!(site.menu.is_none());
        assert!(site.contact_form.is_none());
        assert!(site.accessibility.is_some());
    }
}
