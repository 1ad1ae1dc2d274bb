//! Events - Event types and listener registry
//!
//! Listeners attach to an element or to the document. The document target
//! also stands in for the window: scroll, visibility and unload listeners
//! live there.
//!
//! # Dispatch order
//!
//! 1. Listeners on the target, in registration order
//! 2. Listeners on each ancestor, nearest first (bubbling kinds only)
//! 3. Listeners on the document (bubbling kinds, or document-targeted events)
//!
//! A listener returning `Err` is logged as an uncaught script error; the
//! remaining listeners still run.
//!
//! # Example
//!
//! ```ignore
//! let id = registry.add(Target::Element(button), EventKind::Click, |event| {
//!     event.prevent_default();
//!     Ok(())
//! });
//! registry.remove(id);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::Result;
use crate::types::ElementId;

// =============================================================================
// TYPES
// =============================================================================

/// The event kinds the page behaviors listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
    TouchStart,
    TouchEnd,
    PointerEnter,
    PointerLeave,
    Scroll,
    VisibilityChange,
    Focus,
    Blur,
    Input,
    Submit,
    Load,
    BeforeUnload,
    DomContentLoaded,
}

impl EventKind {
    /// Whether element-targeted events of this kind propagate to ancestors.
    pub fn bubbles(self) -> bool {
        matches!(
            self,
            EventKind::Click
                | EventKind::KeyDown
                | EventKind::TouchStart
                | EventKind::TouchEnd
                | EventKind::Input
                | EventKind::Submit
        )
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Document,
    Element(ElementId),
}

/// A dispatched event.
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    /// Originating element. `None` for document-level events.
    pub target: Option<ElementId>,
    /// Key name for keyboard events (e.g. "ArrowLeft", "Enter").
    pub key: Option<String>,
    /// Horizontal screen coordinate for touch events.
    pub screen_x: f64,
    default_prevented: Cell<bool>,
}

impl Event {
    /// A document-level event.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            target: None,
            key: None,
            screen_x: 0.0,
            default_prevented: Cell::new(false),
        }
    }

    /// An event originating at `target`.
    pub fn on(kind: EventKind, target: ElementId) -> Self {
        Self {
            target: Some(target),
            ..Self::new(kind)
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_screen_x(mut self, x: f64) -> Self {
        self.screen_x = x;
        self
    }

    /// Suppress the host's default action.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Event listener. Return `Err` to report an uncaught error.
pub type Listener = Rc<dyn Fn(&Event) -> Result<()>>;

/// Handle for removing a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

// =============================================================================
// REGISTRY
// =============================================================================

struct Registration {
    id: ListenerId,
    target: Target,
    kind: EventKind,
    listener: Listener,
}

#[derive(Default)]
struct RegistryState {
    registrations: Vec<Registration>,
    next_id: u64,
}

/// Shared listener registry. Clones share the same listeners.
#[derive(Clone, Default)]
pub struct EventRegistry {
    state: Rc<RefCell<RegistryState>>,
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("listeners", &self.state.borrow().registrations.len())
            .finish()
    }
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn add(
        &self,
        target: Target,
        kind: EventKind,
        listener: impl Fn(&Event) -> Result<()> + 'static,
    ) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = ListenerId(state.next_id);
        state.next_id += 1;
        state.registrations.push(Registration {
            id,
            target,
            kind,
            listener: Rc::new(listener),
        });
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.registrations.len();
        state.registrations.retain(|r| r.id != id);
        state.registrations.len() != before
    }

    /// Number of listeners for a target and kind.
    pub fn count(&self, target: Target, kind: EventKind) -> usize {
        self.state
            .borrow()
            .registrations
            .iter()
            .filter(|r| r.target == target && r.kind == kind)
            .count()
    }

    fn snapshot(&self, target: Target, kind: EventKind) -> Vec<Listener> {
        self.state
            .borrow()
            .registrations
            .iter()
            .filter(|r| r.target == target && r.kind == kind)
            .map(|r| r.listener.clone())
            .collect()
    }

    /// Dispatch `event` along `path` (target first, then ancestors).
    ///
    /// `path` is empty for document-level events. Returns whether a listener
    /// called `prevent_default`.
    pub fn dispatch(&self, path: &[ElementId], event: &Event) -> bool {
        let mut listeners = Vec::new();
        let mut targets = path.iter().copied().map(Target::Element);
        if let Some(first) = targets.next() {
            listeners.extend(self.snapshot(first, event.kind));
        }
        if path.is_empty() || event.kind.bubbles() {
            for ancestor in targets {
                listeners.extend(self.snapshot(ancestor, event.kind));
            }
            listeners.extend(self.snapshot(Target::Document, event.kind));
        }

        for listener in listeners {
            if let Err(err) = listener(event) {
                tracing::error!(kind = ?event.kind, error = %err, "uncaught error in event listener");
            }
        }
        event.default_prevented()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SiteError;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> impl Fn(&Event) -> Result<()> + 'static {
        let log = log.clone();
        move |_| {
            log.borrow_mut().push(name);
            Ok(())
        }
    }

    #[test]
    fn test_bubbling_order() {
        let registry = EventRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (child, parent) = (ElementId(2), ElementId(1));

        registry.add(Target::Document, EventKind::Click, recorder(&log, "document"));
        registry.add(Target::Element(parent), EventKind::Click, recorder(&log, "parent"));
        registry.add(Target::Element(child), EventKind::Click, recorder(&log, "child-1"));
        registry.add(Target::Element(child), EventKind::Click, recorder(&log, "child-2"));

        registry.dispatch(&[child, parent], &Event::on(EventKind::Click, child));
        assert_eq!(*log.borrow(), vec!["child-1", "child-2", "parent", "document"]);
    }

    #[test]
    fn test_non_bubbling_stays_on_target() {
        let registry = EventRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (child, parent) = (ElementId(2), ElementId(1));

        registry.add(Target::Element(parent), EventKind::Blur, recorder(&log, "parent"));
        registry.add(Target::Document, EventKind::Blur, recorder(&log, "document"));
        registry.add(Target::Element(child), EventKind::Blur, recorder(&log, "child"));

        registry.dispatch(&[child, parent], &Event::on(EventKind::Blur, child));
        assert_eq!(*log.borrow(), vec!["child"]);
    }

    #[test]
    fn test_document_event_reaches_document_listeners() {
        let registry = EventRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        registry.add(Target::Document, EventKind::VisibilityChange, recorder(&log, "doc"));
        registry.dispatch(&[], &Event::new(EventKind::VisibilityChange));
        assert_eq!(*log.borrow(), vec!["doc"]);
    }

    #[test]
    fn test_prevent_default_and_errors() {
        let registry = EventRegistry::new();
        let el = ElementId(5);
        registry.add(Target::Element(el), EventKind::Click, |_| Err(SiteError::Task("boom".into())));
        registry.add(Target::Element(el), EventKind::Click, |event| {
            event.prevent_default();
            Ok(())
        });
        assert!(registry.dispatch(&[el], &Event::on(EventKind::Click, el)));
    }

    #[test]
    fn test_remove_listener() {
        let registry = EventRegistry::new();
        let id = registry.add(Target::Document, EventKind::Scroll, |_| Ok(()));
        assert_eq!(registry.count(Target::Document, EventKind::Scroll), 1);
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert_eq!(registry.count(Target::Document, EventKind::Scroll), 0);
    }
}
