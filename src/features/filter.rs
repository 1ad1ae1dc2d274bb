//! Product filter tabs.
//!
//! Clicking a tab shows only the cards whose `data-category` matches the
//! tab's (every card for `all`). Shown cards start transparent and offset,
//! then settle after a short delay. Exactly one tab is active afterwards.

use std::rc::Rc;

use crate::config::SiteConfig;
use crate::error::Result;
use crate::runtime::{EventKind, Page, Target};
use crate::types::ElementId;

pub const TAB_SELECTOR: &str = ".tab-btn";
pub const CARD_SELECTOR: &str = ".product-card";
pub const CATEGORY_KEY: &str = "category";
pub const ALL_CATEGORIES: &str = "all";
pub const HIDDEN_CLASS: &str = "hidden";
pub const ACTIVE_CLASS: &str = "active";

const ENTER_TRANSFORM: &str = "translateY(20px)";
const SETTLED_TRANSFORM: &str = "translateY(0)";
const SETTLE_TRANSITION: &str = "opacity 0.3s ease, transform 0.3s ease";

struct FilterInner {
    page: Page,
    tabs: Vec<ElementId>,
    cards: Vec<ElementId>,
    config: SiteConfig,
}

/// The wired product filter.
#[derive(Clone)]
pub struct ProductFilter {
    inner: Rc<FilterInner>,
}

impl std::fmt::Debug for ProductFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductFilter")
            .field("tabs", &self.inner.tabs.len())
            .field("cards", &self.inner.cards.len())
            .finish()
    }
}

impl ProductFilter {
    /// Show the cards in `category` and mark its tab active.
    pub fn apply(&self, category: &str) {
        let FilterInner {
            page, tabs, cards, config,
        } = &*self.inner;

        let mut shown = Vec::new();
        {
            let mut doc = page.document_mut();
            for card in cards.iter().copied() {
                let matches = category == ALL_CATEGORIES || doc.dataset(card, CATEGORY_KEY) == Some(category);
                if matches {
                    doc.remove_class(card, HIDDEN_CLASS);
                    let style = doc.style_mut(card);
                    style.opacity = Some(0.0);
                    style.transform = Some(ENTER_TRANSFORM.to_string());
                    shown.push(card);
                } else {
                    doc.add_class(card, HIDDEN_CLASS);
                }
            }

            for tab in tabs.iter().copied() {
                doc.remove_class(tab, ACTIVE_CLASS);
            }
            if let Some(tab) = tabs
                .iter()
                .copied()
                .find(|tab| doc.dataset(*tab, CATEGORY_KEY) == Some(category))
            {
                doc.add_class(tab, ACTIVE_CLASS);
            }
        }

        for card in shown {
            let p = page.clone();
            page.scheduler().set_timeout(config.filter_transition_delay, move || {
                let mut doc = p.document_mut();
                let style = doc.style_mut(card);
                style.transition = Some(SETTLE_TRANSITION.to_string());
                style.opacity = Some(1.0);
                style.transform = Some(SETTLED_TRANSFORM.to_string());
                Ok(())
            });
        }
    }
}

/// Wire the tabs. `Ok(None)` unless the page has both tabs and cards.
pub fn init_product_filter(page: &Page, config: &SiteConfig) -> Result<Option<ProductFilter>> {
    let (tabs, cards) = {
        let doc = page.document();
        (doc.query_all(TAB_SELECTOR)?, doc.query_all(CARD_SELECTOR)?)
    };
    if tabs.is_empty() || cards.is_empty() {
        return Ok(None);
    }

    let filter = ProductFilter {
        inner: Rc::new(FilterInner {
            page: page.clone(),
            tabs,
            cards,
            config: config.clone(),
        }),
    };

    for tab in filter.inner.tabs.iter().copied() {
        let f = filter.clone();
        page.listen(Target::Element(tab), EventKind::Click, move |_| {
            let category = f.inner.page.document().dataset(tab, CATEGORY_KEY).map(str::to_string);
            match category {
                Some(category) => f.apply(&category),
                None => tracing::debug!(%tab, "filter tab without a category"),
            }
            Ok(())
        });
    }

    Ok(Some(filter))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::storefront_page;
    use crate::types::ms;

    fn tab(page: &Page, category: &str) -> ElementId {
        page.document()
            .query(&format!(".tab-btn[data-category=\"{category}\"]"))
            .unwrap()
            .unwrap()
    }

    fn visible_cards(page: &Page) -> Vec<String> {
        let doc = page.document();
        doc.query_all(CARD_SELECTOR)
            .unwrap()
            .into_iter()
            .filter(|c| !doc.has_class(*c, HIDDEN_CLASS))
            .map(|c| doc.attribute(c, "id").unwrap().to_string())
            .collect()
    }

    fn active_tabs(page: &Page) -> Vec<ElementId> {
        let doc = page.document();
        doc.query_all(TAB_SELECTOR)
            .unwrap()
            .into_iter()
            .filter(|t| doc.has_class(*t, ACTIVE_CLASS))
            .collect()
    }

    #[test]
    fn test_category_shows_matching_cards_only() {
        let page = storefront_page();
        init_product_filter(&page, &SiteConfig::default()).unwrap().unwrap();

        page.click(tab(&page, "disinfectants"));
        assert_eq!(visible_cards(&page), vec!["card-a", "card-c"]);
        assert_eq!(active_tabs(&page), vec![tab(&page, "disinfectants")]);
    }

    #[test]
    fn test_all_shows_everything() {
        let page = storefront_page();
        init_product_filter(&page, &SiteConfig::default()).unwrap().unwrap();

        page.click(tab(&page, "cleaners"));
        page.click(tab(&page, "all"));
        assert_eq!(visible_cards(&page), vec!["card-a", "card-b", "card-c"]);
        assert_eq!(active_tabs(&page), vec![tab(&page, "all")]);
    }

    #[test]
    fn test_shown_cards_settle_after_delay() {
        let page = storefront_page();
        init_product_filter(&page, &SiteConfig::default()).unwrap().unwrap();
        page.click(tab(&page, "cleaners"));

        let card = page.document().element_by_id("card-b").unwrap();
        assert_eq!(page.document().style(card).opacity, Some(0.0));
        page.advance(ms(50));
        let doc = page.document();
        assert_eq!(doc.style(card).opacity, Some(1.0));
        assert_eq!(doc.style(card).transform.as_deref(), Some("translateY(0)"));
    }

    #[test]
    fn test_skipped_without_cards() {
        let page = Page::default();
        assert!(init_product_filter(&page, &SiteConfig::default()).unwrap().is_none());
    }
}
