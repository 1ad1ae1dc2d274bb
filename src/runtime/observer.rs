//! Visibility observer - polled-geometry intersection watching
//!
//! Stand-in for the host's intersection facility. Each observer watches a set
//! of elements and reports when an element's visible fraction crosses the
//! threshold. The page polls observers after every scroll, viewport change,
//! and at the end of startup.
//!
//! # Pattern
//!
//! - The first poll after `observe` always reports the element
//! - Later polls report only elements whose intersecting state changed
//! - `unobserve` from inside the callback stops all further reports
//!
//! # Example
//!
//! ```ignore
//! let observer = page.observe_visibility(ObserverOptions::default(), |entries, observer| {
//!     for entry in entries.iter().filter(|e| e.is_intersecting) {
//!         observer.unobserve(entry.target);
//!     }
//!     Ok(())
//! });
//! observer.observe(card);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::dom::Document;
use crate::error::Result;
use crate::types::ElementId;

// =============================================================================
// TYPES
// =============================================================================

/// The visible part of the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_y: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            height: 800.0,
        }
    }
}

/// Threshold and root margin for an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Visible fraction (0.0..=1.0) at which an element counts as intersecting.
    pub threshold: f64,
    /// Pixels trimmed off the bottom of the viewport.
    pub bottom_margin: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            bottom_margin: 0.0,
        }
    }
}

/// One element's visibility report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub ratio: f64,
    pub is_intersecting: bool,
}

type Callback = Box<dyn Fn(&[IntersectionEntry], &VisibilityObserver) -> Result<()>>;

struct ObserverInner {
    options: ObserverOptions,
    /// Watched elements with their last reported state (`None` = never reported).
    targets: RefCell<Vec<(ElementId, Option<bool>)>>,
    callback: Callback,
}

/// Handle to a visibility observer. Clones share the same watch list.
#[derive(Clone)]
pub struct VisibilityObserver {
    inner: Rc<ObserverInner>,
}

impl std::fmt::Debug for VisibilityObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityObserver")
            .field("options", &self.inner.options)
            .field("targets", &self.inner.targets.borrow().len())
            .finish()
    }
}

// =============================================================================
// OBSERVER
// =============================================================================

impl VisibilityObserver {
    pub fn new(
        options: ObserverOptions,
        callback: impl Fn(&[IntersectionEntry], &VisibilityObserver) -> Result<()> + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(ObserverInner {
                options,
                targets: RefCell::new(Vec::new()),
                callback: Box::new(callback),
            }),
        }
    }

    pub fn options(&self) -> ObserverOptions {
        self.inner.options
    }

    /// Start watching an element. Watching twice is a no-op.
    pub fn observe(&self, el: ElementId) {
        let mut targets = self.inner.targets.borrow_mut();
        if !targets.iter().any(|(t, _)| *t == el) {
            targets.push((el, None));
        }
    }

    /// Stop watching an element.
    pub fn unobserve(&self, el: ElementId) {
        self.inner.targets.borrow_mut().retain(|(t, _)| *t != el);
    }

    pub fn is_observing(&self, el: ElementId) -> bool {
        self.inner.targets.borrow().iter().any(|(t, _)| *t == el)
    }

    pub fn observed_count(&self) -> usize {
        self.inner.targets.borrow().len()
    }

    /// Compute entries whose state changed since the last poll.
    pub fn take_changes(&self, doc: &Document, viewport: Viewport) -> Vec<IntersectionEntry> {
        let ObserverOptions {
            threshold,
            bottom_margin,
        } = self.inner.options;
        let from = viewport.scroll_y;
        let to = viewport.scroll_y + viewport.height - bottom_margin;

        let mut changes = Vec::new();
        for (el, last) in self.inner.targets.borrow_mut().iter_mut() {
            let ratio = doc.rect(*el).coverage(from, to);
            let is_intersecting = ratio > 0.0 && ratio >= threshold;
            if *last != Some(is_intersecting) {
                *last = Some(is_intersecting);
                changes.push(IntersectionEntry {
                    target: *el,
                    ratio,
                    is_intersecting,
                });
            }
        }
        changes
    }

    /// Hand entries to the callback.
    pub fn deliver(&self, entries: &[IntersectionEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        (self.inner.callback)(entries, self)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;
    use std::cell::Cell;

    fn setup() -> (Document, ElementId) {
        let mut doc = Document::new();
        let card = doc.create_element("div");
        let body = doc.body();
        doc.append_child(body, card);
        doc.set_rect(card, Rect::new(1000.0, 200.0));
        (doc, card)
    }

    #[test]
    fn test_threshold_with_margin() {
        let (doc, card) = setup();
        let observer = VisibilityObserver::new(
            ObserverOptions {
                threshold: 0.1,
                bottom_margin: 50.0,
            },
            |_, _| Ok(()),
        );
        observer.observe(card);

        // Band ends at 1020: exactly 10% of the card is visible.
        let vp = Viewport {
            scroll_y: 270.0,
            height: 800.0,
        };
        let entries = observer.take_changes(&doc, vp);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_intersecting);

        let vp = Viewport {
            scroll_y: 260.0,
            height: 800.0,
        };
        let entries = observer.take_changes(&doc, vp);
        assert!(!entries[0].is_intersecting);
    }

    #[test]
    fn test_only_changes_reported() {
        let (doc, card) = setup();
        let observer = VisibilityObserver::new(ObserverOptions::default(), |_, _| Ok(()));
        observer.observe(card);

        assert_eq!(observer.take_changes(&doc, Viewport::default()).len(), 1);
        assert!(observer.take_changes(&doc, Viewport::default()).is_empty());
    }

    #[test]
    fn test_unobserve_inside_callback() {
        let (doc, card) = setup();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let observer = VisibilityObserver::new(ObserverOptions::default(), move |entries, observer| {
            c.set(c.get() + 1);
            for entry in entries {
                observer.unobserve(entry.target);
            }
            Ok(())
        });
        observer.observe(card);
        observer.observe(card);
        assert_eq!(observer.observed_count(), 1);

        let entries = observer.take_changes(&doc, Viewport::default());
        observer.deliver(&entries).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(!observer.is_observing(card));
    }
}
