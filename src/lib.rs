//! # site-behaviors
//!
//! Headless page behaviors for a small storefront site.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for the
//! reactive bits (current slide, menu state, focused element).
//!
//! ## Architecture
//!
//! Every behavior reacts to events on a [`Page`]: an in-memory document plus a
//! single-threaded runtime (virtual-clock scheduler, bubbling event dispatch,
//! polled visibility observers). Nothing needs a browser, so every behavior is
//! driven and tested the same way a host would drive it:
//!
//! ```text
//! host input → Page::dispatch → feature listener → Document mutation
//!                                      ↓
//!                               Scheduler timers → Document mutation
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (ElementId, ElementFlags, Rect, Style)
//! - [`dom`] - Element arena and selector engine
//! - [`runtime`] - Scheduler, events, debounce, visibility observers, Page
//! - [`features`] - Carousel, contact form, navigation, filter, reveal, anchors, accessibility
//! - [`site`] - Guarded startup sequence
//! - [`config`] - Timings and thresholds
//! - [`fixture`] - A ready-made storefront page for tests and demos
//!
//! ## Example
//!
//! ```ignore
//! use site_behaviors::{boot, fixture::storefront_page, SiteConfig, ms};
//!
//! let page = storefront_page();
//! let handle = boot(&page, SiteConfig::default());
//! page.advance(ms(5000)); // autoplay moves to slide 1
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod features;
pub mod fixture;
pub mod runtime;
pub mod site;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::SiteConfig;
pub use dom::{Document, ReadyState, Selector};
pub use error::{Result, SiteError};

pub use runtime::{
    Debounced, Event, EventKind, EventRegistry, IntersectionEntry, ListenerId, ObserverOptions, Page,
    Scheduler, Target, TimerId, Viewport, VisibilityObserver,
};

pub use features::carousel::{Carousel, DomSlideView, Intent, NavigateHandler, SlideView};
pub use features::filter::ProductFilter;
pub use features::form::{ContactForm, FieldError, FieldKind};
pub use features::navigation::MobileMenu;

pub use site::{Site, SiteHandle, boot};
