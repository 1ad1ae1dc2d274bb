//! Page - The host environment the behaviors run in
//!
//! Bundles the document, the timer queue, the listener registry, visibility
//! observers, and window state (viewport, location, tab visibility, focus).
//! `Page` is a cheap-to-clone handle; listeners and tasks capture clones.
//!
//! Besides what the behaviors consume, the page exposes the host's side of
//! the boundary: `click`, `key_down`, `touch_start`, `type_into`, `scroll_to`,
//! `set_hidden` and friends. Tests and the demo runner drive the page
//! through these.
//!
//! Borrow discipline: document borrows never span a dispatch or an observer
//! delivery, so listeners are free to mutate the document.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;
use std::time::Duration;

use spark_signals::{signal, Signal};

use super::events::{Event, EventKind, EventRegistry, ListenerId, Target};
use super::observer::{IntersectionEntry, ObserverOptions, Viewport, VisibilityObserver};
use super::scheduler::Scheduler;
use crate::dom::{Document, ReadyState};
use crate::error::Result;
use crate::types::{ElementFlags, ElementId, ScrollBehavior};

struct PageInner {
    document: RefCell<Document>,
    scheduler: Scheduler,
    events: EventRegistry,
    observers: RefCell<Vec<VisibilityObserver>>,
    viewport: Cell<Viewport>,
    last_scroll: Cell<Option<ScrollBehavior>>,
    path: RefCell<String>,
    hidden: Cell<bool>,
    ready_state: Cell<ReadyState>,
    /// Currently focused element (reactive).
    focused: Signal<Option<ElementId>>,
}

/// Handle to the page.
#[derive(Clone)]
pub struct Page {
    inner: Rc<PageInner>,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("path", &*self.inner.path.borrow())
            .field("viewport", &self.inner.viewport.get())
            .field("hidden", &self.inner.hidden.get())
            .field("scheduler", &self.inner.scheduler)
            .finish()
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Document::new())
    }
}

impl Page {
    /// Wrap a parsed document. The page starts visible, at `/`, scrolled to top.
    pub fn new(document: Document) -> Self {
        Self {
            inner: Rc::new(PageInner {
                document: RefCell::new(document),
                scheduler: Scheduler::new(),
                events: EventRegistry::new(),
                observers: RefCell::new(Vec::new()),
                viewport: Cell::new(Viewport::default()),
                last_scroll: Cell::new(None),
                path: RefCell::new("/".to_string()),
                hidden: Cell::new(false),
                ready_state: Cell::new(ReadyState::Interactive),
                focused: signal(None),
            }),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Borrow the document. Do not hold across a dispatch.
    pub fn document(&self) -> Ref<'_, Document> {
        self.inner.document.borrow()
    }

    /// Mutably borrow the document. Do not hold across a dispatch.
    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.inner.document.borrow_mut()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.inner.scheduler
    }

    pub fn events(&self) -> &EventRegistry {
        &self.inner.events
    }

    /// Advance the virtual clock.
    pub fn advance(&self, by: Duration) -> usize {
        self.inner.scheduler.advance(by)
    }

    pub fn viewport(&self) -> Viewport {
        self.inner.viewport.get()
    }

    pub fn scroll_y(&self) -> f64 {
        self.inner.viewport.get().scroll_y
    }

    /// Behavior of the most recent `scroll_to`, if any.
    pub fn last_scroll_behavior(&self) -> Option<ScrollBehavior> {
        self.inner.last_scroll.get()
    }

    pub fn path(&self) -> String {
        self.inner.path.borrow().clone()
    }

    pub fn set_path(&self, path: &str) {
        *self.inner.path.borrow_mut() = path.to_string();
    }

    pub fn is_hidden(&self) -> bool {
        self.inner.hidden.get()
    }

    pub fn ready_state(&self) -> ReadyState {
        self.inner.ready_state.get()
    }

    pub fn set_ready_state(&self, state: ReadyState) {
        self.inner.ready_state.set(state);
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.inner.focused.get()
    }

    // =========================================================================
    // Listeners and dispatch
    // =========================================================================

    /// Register a listener.
    pub fn listen(
        &self,
        target: Target,
        kind: EventKind,
        listener: impl Fn(&Event) -> Result<()> + 'static,
    ) -> ListenerId {
        self.inner.events.add(target, kind, listener)
    }

    /// Dispatch an event. Returns whether the default action was prevented.
    pub fn dispatch(&self, event: Event) -> bool {
        let path = match event.target {
            Some(target) => {
                let doc = self.document();
                let mut path = vec![target];
                let mut cursor = doc.parent(target);
                while let Some(node) = cursor {
                    path.push(node);
                    cursor = doc.parent(node);
                }
                path
            }
            None => Vec::new(),
        };
        self.inner.events.dispatch(&path, &event)
    }

    // =========================================================================
    // Host simulation: input
    // =========================================================================

    /// Click an element. Returns whether the default action was prevented.
    pub fn click(&self, el: ElementId) -> bool {
        self.dispatch(Event::on(EventKind::Click, el))
    }

    /// Press a key with nothing in particular focused.
    pub fn key_down(&self, key: &str) -> bool {
        self.dispatch(Event::new(EventKind::KeyDown).with_key(key))
    }

    pub fn touch_start(&self, el: ElementId, screen_x: f64) {
        self.dispatch(Event::on(EventKind::TouchStart, el).with_screen_x(screen_x));
    }

    pub fn touch_end(&self, el: ElementId, screen_x: f64) {
        self.dispatch(Event::on(EventKind::TouchEnd, el).with_screen_x(screen_x));
    }

    /// A full swipe gesture from `from_x` to `to_x`.
    pub fn swipe(&self, el: ElementId, from_x: f64, to_x: f64) {
        self.touch_start(el, from_x);
        self.touch_end(el, to_x);
    }

    pub fn pointer_enter(&self, el: ElementId) {
        self.dispatch(Event::on(EventKind::PointerEnter, el));
    }

    pub fn pointer_leave(&self, el: ElementId) {
        self.dispatch(Event::on(EventKind::PointerLeave, el));
    }

    /// Replace a control's value as if typed, then fire `input`.
    pub fn type_into(&self, el: ElementId, value: &str) {
        self.document_mut().set_value(el, value);
        self.dispatch(Event::on(EventKind::Input, el));
    }

    /// Submit a form. Returns whether the default action was prevented.
    pub fn submit(&self, form: ElementId) -> bool {
        self.dispatch(Event::on(EventKind::Submit, form))
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Move focus to `el`, blurring the previous element first.
    pub fn focus(&self, el: ElementId) {
        let previous = self.focused();
        if previous == Some(el) {
            return;
        }
        if let Some(prev) = previous {
            self.blur(prev);
        }

        self.document_mut().set_flag(el, ElementFlags::FOCUSED, true);
        self.inner.focused.set(Some(el));
        self.dispatch(Event::on(EventKind::Focus, el));
    }

    /// Remove focus from `el` if it has it.
    pub fn blur(&self, el: ElementId) {
        if self.focused() != Some(el) {
            return;
        }
        self.document_mut().set_flag(el, ElementFlags::FOCUSED, false);
        self.inner.focused.set(None);
        self.dispatch(Event::on(EventKind::Blur, el));
    }

    // =========================================================================
    // Window
    // =========================================================================

    /// Scroll the window. Fires `scroll` and polls visibility observers.
    pub fn scroll_to(&self, top: f64, behavior: ScrollBehavior) {
        let mut viewport = self.inner.viewport.get();
        viewport.scroll_y = top.max(0.0);
        self.inner.viewport.set(viewport);
        self.inner.last_scroll.set(Some(behavior));

        self.dispatch(Event::new(EventKind::Scroll));
        self.poll_observers();
    }

    /// Smoothly scroll so `el` sits `offset` pixels below the top.
    pub fn scroll_to_element(&self, el: ElementId, offset: f64) {
        let top = self.document().rect(el).top;
        self.scroll_to(top - offset, ScrollBehavior::Smooth);
    }

    /// Resize the viewport and poll visibility observers.
    pub fn set_viewport_height(&self, height: f64) {
        let mut viewport = self.inner.viewport.get();
        viewport.height = height;
        self.inner.viewport.set(viewport);
        self.poll_observers();
    }

    /// Change tab visibility and fire `visibilitychange`.
    pub fn set_hidden(&self, hidden: bool) {
        self.inner.hidden.set(hidden);
        self.dispatch(Event::new(EventKind::VisibilityChange));
    }

    /// Fire `beforeunload`. Timers are left to their listeners.
    pub fn unload(&self) {
        self.dispatch(Event::new(EventKind::BeforeUnload));
    }

    /// Finish parsing and fire `DOMContentLoaded`.
    pub fn finish_parsing(&self) {
        self.inner.ready_state.set(ReadyState::Interactive);
        self.dispatch(Event::new(EventKind::DomContentLoaded));
    }

    /// Mark an image's current source as loaded and fire `load` on it.
    pub fn finish_image_load(&self, img: ElementId) {
        self.document_mut().set_flag(img, ElementFlags::LOADED, true);
        self.dispatch(Event::on(EventKind::Load, img));
    }

    // =========================================================================
    // Visibility observers
    // =========================================================================

    /// Create and register a visibility observer.
    pub fn observe_visibility(
        &self,
        options: ObserverOptions,
        callback: impl Fn(&[IntersectionEntry], &VisibilityObserver) -> Result<()> + 'static,
    ) -> VisibilityObserver {
        let observer = VisibilityObserver::new(options, callback);
        self.inner.observers.borrow_mut().push(observer.clone());
        observer
    }

    /// Check every observer against the current viewport and deliver changes.
    pub fn poll_observers(&self) {
        let observers = self.inner.observers.borrow().clone();
        let viewport = self.viewport();
        for observer in observers {
            let entries = {
                let doc = self.document();
                observer.take_changes(&doc, viewport)
            };
            if let Err(err) = observer.deliver(&entries) {
                tracing::error!(error = %err, "uncaught error in visibility observer");
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rect;

    fn setup() -> (Page, ElementId, ElementId) {
        let page = Page::default();
        let (outer, inner) = {
            let mut doc = page.document_mut();
            let body = doc.body();
            let outer = doc.create_element("div");
            let inner = doc.create_element("button");
            doc.append_child(body, outer);
            doc.append_child(outer, inner);
            (outer, inner)
        };
        (page, outer, inner)
    }

    #[test]
    fn test_click_bubbles_to_document() {
        let (page, outer, inner) = setup();
        let hits = Rc::new(RefCell::new(Vec::new()));
        for target in [Target::Document, Target::Element(outer)] {
            let hits = hits.clone();
            page.listen(target, EventKind::Click, move |event| {
                hits.borrow_mut().push((target, event.target));
                Ok(())
            });
        }

        page.click(inner);
        let hits = hits.borrow();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0], (Target::Element(outer), Some(inner)));
    }

    #[test]
    fn test_listener_can_mutate_document() {
        let (page, outer, inner) = setup();
        let p = page.clone();
        page.listen(Target::Element(inner), EventKind::Click, move |_| {
            p.document_mut().add_class(outer, "clicked");
            Ok(())
        });
        page.click(inner);
        assert!(page.document().has_class(outer, "clicked"));
    }

    #[test]
    fn test_focus_moves_and_blurs_previous() {
        let (page, outer, inner) = setup();
        let blurred = Rc::new(Cell::new(false));
        let b = blurred.clone();
        page.listen(Target::Element(outer), EventKind::Blur, move |_| {
            b.set(true);
            Ok(())
        });

        page.focus(outer);
        assert_eq!(page.focused(), Some(outer));
        page.focus(inner);
        assert!(blurred.get());
        assert_eq!(page.focused(), Some(inner));
        assert!(page.document().flags(inner).contains(ElementFlags::FOCUSED));
        assert!(!page.document().flags(outer).contains(ElementFlags::FOCUSED));
    }

    #[test]
    fn test_scroll_to_element_is_smooth_and_clamped() {
        let (page, outer, _) = setup();
        page.document_mut().set_rect(outer, Rect::new(40.0, 10.0));
        page.scroll_to_element(outer, 100.0);
        assert_eq!(page.scroll_y(), 0.0);
        assert_eq!(page.last_scroll_behavior(), Some(ScrollBehavior::Smooth));

        page.document_mut().set_rect(outer, Rect::new(900.0, 10.0));
        page.scroll_to_element(outer, 100.0);
        assert_eq!(page.scroll_y(), 800.0);
    }

    #[test]
    fn test_scroll_polls_observers() {
        let (page, outer, _) = setup();
        page.document_mut().set_rect(outer, Rect::new(2000.0, 100.0));
        let seen = Rc::new(Cell::new(0));
        let s = seen.clone();
        let observer = page.observe_visibility(ObserverOptions::default(), move |entries, _| {
            s.set(s.get() + entries.iter().filter(|e| e.is_intersecting).count());
            Ok(())
        });
        observer.observe(outer);

        page.poll_observers();
        assert_eq!(seen.get(), 0);
        page.scroll_to(1500.0, ScrollBehavior::Instant);
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_taller_viewport_polls_observers() {
        let (page, outer, _) = setup();
        page.document_mut().set_rect(outer, Rect::new(1000.0, 100.0));
        let seen = Rc::new(Cell::new(0));
        let s = seen.clone();
        let observer = page.observe_visibility(ObserverOptions::default(), move |entries, _| {
            s.set(s.get() + entries.iter().filter(|e| e.is_intersecting).count());
            Ok(())
        });
        observer.observe(outer);

        page.poll_observers();
        assert_eq!(seen.get(), 0);
        page.set_viewport_height(1200.0);
        assert_eq!(page.viewport().height, 1200.0);
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_unload_only_fires_before_unload() {
        let (page, _, _) = setup();
        let unloaded = Rc::new(Cell::new(false));
        let u = unloaded.clone();
        page.listen(Target::Document, EventKind::BeforeUnload, move |_| {
            u.set(true);
            Ok(())
        });
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        page.scheduler().set_timeout(Duration::from_millis(100), move || {
            f.set(true);
            Ok(())
        });

        page.unload();
        assert!(unloaded.get());
        assert_eq!(page.scheduler().active_count(), 1);
        page.advance(Duration::from_millis(100));
        assert!(fired.get());
    }
}
