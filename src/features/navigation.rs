//! Navigation - mobile menu, header scroll state, active link
//!
//! # API
//!
//! - `init_mobile_navigation` - hamburger toggles the menu and body scroll lock
//! - `init_header_scroll` - header gets `scrolled` past the threshold (debounced)
//! - `set_active_nav_link` - marks the link for the current path

use spark_signals::{signal, Signal};

use crate::config::SiteConfig;
use crate::error::Result;
use crate::runtime::{Debounced, EventKind, Page, Target};
use crate::types::ElementId;

pub const HAMBURGER_SELECTOR: &str = ".hamburger";
pub const NAV_MENU_SELECTOR: &str = ".nav-menu";
pub const NAV_LINK_SELECTOR: &str = ".nav-link";
pub const HEADER_SELECTOR: &str = ".header";
pub const ACTIVE_CLASS: &str = "active";
pub const SCROLLED_CLASS: &str = "scrolled";
pub const HOME_PAGE: &str = "index.html";

// =============================================================================
// MOBILE MENU
// =============================================================================

/// Handle to the wired mobile menu.
#[derive(Clone)]
pub struct MobileMenu {
    page: Page,
    hamburger: ElementId,
    menu: ElementId,
    open: Signal<bool>,
}

impl std::fmt::Debug for MobileMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MobileMenu")
            .field("open", &self.is_open())
            .finish()
    }
}

impl MobileMenu {
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Toggle both markers together and lock body scroll to match.
    pub fn toggle(&self) {
        let open = {
            let mut doc = self.page.document_mut();
            let open = doc.toggle_class(self.hamburger, ACTIVE_CLASS);
            doc.set_class(self.menu, ACTIVE_CLASS, open);
            open
        };
        self.apply_scroll_lock(open);
    }

    pub fn close(&self) {
        {
            let mut doc = self.page.document_mut();
            doc.remove_class(self.hamburger, ACTIVE_CLASS);
            doc.remove_class(self.menu, ACTIVE_CLASS);
        }
        self.apply_scroll_lock(false);
    }

    fn apply_scroll_lock(&self, open: bool) {
        let mut doc = self.page.document_mut();
        let body = doc.body();
        doc.style_mut(body).overflow = open.then(|| "hidden".to_string());
        self.open.set(open);
    }
}

/// Wire the hamburger. `Ok(None)` when the button or the menu is missing.
pub fn init_mobile_navigation(page: &Page) -> Result<Option<MobileMenu>> {
    let (hamburger, menu, links) = {
        let doc = page.document();
        let (Some(hamburger), Some(menu)) = (doc.query(HAMBURGER_SELECTOR)?, doc.query(NAV_MENU_SELECTOR)?)
        else {
            tracing::debug!("no hamburger menu, mobile navigation skipped");
            return Ok(None);
        };
        (hamburger, menu, doc.query_all(NAV_LINK_SELECTOR)?)
    };

    let nav = MobileMenu {
        page: page.clone(),
        hamburger,
        menu,
        open: signal(false),
    };

    let toggle = nav.clone();
    page.listen(Target::Element(hamburger), EventKind::Click, move |_| {
        toggle.toggle();
        Ok(())
    });

    for link in links {
        let close = nav.clone();
        page.listen(Target::Element(link), EventKind::Click, move |_| {
            close.close();
            Ok(())
        });
    }

    let outside = nav.clone();
    page.listen(Target::Document, EventKind::Click, move |event| {
        let Some(target) = event.target else {
            return Ok(());
        };
        let inside = {
            let doc = outside.page.document();
            doc.contains(hamburger, target) || doc.contains(menu, target)
        };
        if !inside {
            outside.close();
        }
        Ok(())
    });

    Ok(Some(nav))
}

// =============================================================================
// HEADER SCROLL
// =============================================================================

/// Toggle the header's `scrolled` marker on (debounced) scroll.
pub fn init_header_scroll(page: &Page, config: &SiteConfig) -> Result<()> {
    let Some(header) = page.document().query(HEADER_SELECTOR)? else {
        return Ok(());
    };

    let p = page.clone();
    let threshold = config.header_scroll_threshold;
    let debounced = Debounced::new(page.scheduler().clone(), config.header_debounce, move || {
        let scrolled = p.scroll_y() > threshold;
        p.document_mut().set_class(header, SCROLLED_CLASS, scrolled);
        Ok(())
    });

    page.listen(Target::Document, EventKind::Scroll, move |_| {
        debounced.call();
        Ok(())
    });
    Ok(())
}

// =============================================================================
// ACTIVE LINK
// =============================================================================

/// Last path segment, with an empty segment standing for the home page.
pub fn current_page_name(path: &str) -> &str {
    match path.rsplit('/').next() {
        Some("") | None => HOME_PAGE,
        Some(name) => name,
    }
}

/// Mark the nav link whose `href` names the current page.
pub fn set_active_nav_link(page: &Page) -> Result<()> {
    let path = page.path();
    let current = current_page_name(&path);

    let mut doc = page.document_mut();
    for link in doc.query_all(NAV_LINK_SELECTOR)? {
        let matches = doc.attribute(link, "href") == Some(current);
        doc.set_class(link, ACTIVE_CLASS, matches);
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
