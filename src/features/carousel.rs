//! Carousel - Hero slider with autoplay
//!
//! State machine over slides `0..N` (N fixed at construction):
//!
//! - `show(i)` deactivates everything, then activates slide `i`
//! - `next` / `prev` wrap around
//! - autoplay advances every `autoplay_delay`
//! - every manual navigation stops the running timer and starts a fresh one
//! - hover pauses, leaving resumes; tab hidden pauses, visible resumes from
//!   the current slide
//!
//! The controller never touches the document directly. It talks to a
//! [`SlideView`], which marks slides active and reports user intents back.
//! [`DomSlideView`] is the page-backed view.
//!
//! # Example
//!
//! ```ignore
//! let view = DomSlideView::find(&page)?;
//! let carousel = Carousel::attach(view, page.scheduler().clone(), &config);
//! carousel.next();
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use spark_signals::{signal, Signal};

use crate::config::SiteConfig;
use crate::error::Result;
use crate::runtime::{EventKind, Page, Scheduler, Target, TimerId};
use crate::types::ElementId;

// =============================================================================
// MARKUP CONTRACT
// =============================================================================

pub const SLIDE_SELECTOR: &str = ".slide";
pub const INDICATOR_SELECTOR: &str = ".indicator";
pub const PREV_BUTTON_SELECTOR: &str = ".prev-btn";
pub const NEXT_BUTTON_SELECTOR: &str = ".next-btn";
pub const SLIDER_SELECTOR: &str = ".slider";
pub const ACTIVE_CLASS: &str = "active";

// =============================================================================
// VIEW
// =============================================================================

/// What the user (or the host) asked the carousel to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    Next,
    Prev,
    GoTo(usize),
    /// Pointer entered the slider.
    Pause,
    /// Pointer left the slider.
    Resume,
    TouchStart(f64),
    TouchEnd(f64),
    PageHidden,
    PageVisible,
    Unload,
}

/// Receives intents from a view.
pub type NavigateHandler = Rc<dyn Fn(Intent)>;

/// Presentation side of the carousel.
pub trait SlideView {
    /// Number of slides. Fixed for the view's lifetime.
    fn slide_count(&self) -> usize;

    /// Mark slide `index` (and its indicator, if any) active.
    fn activate(&self, index: usize);

    /// Clear the active marker from slide `index` (and its indicator).
    fn deactivate(&self, index: usize);

    /// Route user intents to `handler`.
    fn on_navigate(&self, handler: NavigateHandler);
}

// =============================================================================
// CONTROLLER
// =============================================================================

struct CarouselInner {
    view: Box<dyn SlideView>,
    scheduler: Scheduler,
    delay: Duration,
    swipe_threshold: f64,
    slide_count: usize,
    current: Signal<usize>,
    autoplay: Cell<Option<TimerId>>,
    touch_start_x: Cell<f64>,
}

/// Carousel controller. Clones share state.
#[derive(Clone)]
pub struct Carousel {
    inner: Rc<CarouselInner>,
}

impl std::fmt::Debug for Carousel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Carousel")
            .field("current", &self.current_index())
            .field("slides", &self.inner.slide_count)
            .field("autoplay", &self.inner.autoplay.get())
            .finish()
    }
}

impl Carousel {
    /// Build a controller over `view`. Returns `None` when there are no slides.
    ///
    /// Nothing is shown and no timer runs until [`Carousel::attach`] or
    /// [`Carousel::play`].
    pub fn new(view: impl SlideView + 'static, scheduler: Scheduler, config: &SiteConfig) -> Option<Self> {
        let slide_count = view.slide_count();
        if slide_count == 0 {
            return None;
        }
        Some(Self {
            inner: Rc::new(CarouselInner {
                view: Box::new(view),
                scheduler,
                delay: config.autoplay_delay,
                swipe_threshold: config.swipe_threshold,
                slide_count,
                current: signal(0),
                autoplay: Cell::new(None),
                touch_start_x: Cell::new(0.0),
            }),
        })
    }

    /// Build, wire the view's intents, show the first slide and start autoplay.
    pub fn attach(view: impl SlideView + 'static, scheduler: Scheduler, config: &SiteConfig) -> Option<Self> {
        let carousel = Self::new(view, scheduler, config)?;

        let handler = carousel.clone();
        carousel
            .inner
            .view
            .on_navigate(Rc::new(move |intent| handler.handle(intent)));

        carousel.show(0);
        carousel.play();
        tracing::debug!(slides = carousel.inner.slide_count, "carousel activated");
        Some(carousel)
    }

    pub fn current_index(&self) -> usize {
        self.inner.current.get()
    }

    /// Reactive handle to the current index.
    pub fn index_signal(&self) -> Signal<usize> {
        self.inner.current.clone()
    }

    pub fn slide_count(&self) -> usize {
        self.inner.slide_count
    }

    /// Whether an autoplay timer is live.
    pub fn is_playing(&self) -> bool {
        self.inner
            .autoplay
            .get()
            .is_some_and(|id| self.inner.scheduler.is_active(id))
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Activate slide `index`. Callers pass an already wrapped index.
    pub fn show(&self, index: usize) {
        let view = &self.inner.view;
        for i in 0..self.inner.slide_count {
            view.deactivate(i);
        }
        view.activate(index);
        self.inner.current.set(index);
    }

    pub fn next(&self) {
        let n = self.inner.slide_count;
        self.show((self.current_index() + 1) % n);
    }

    pub fn prev(&self) {
        let n = self.inner.slide_count;
        self.show((self.current_index() + n - 1) % n);
    }

    // -------------------------------------------------------------------------
    // Autoplay
    // -------------------------------------------------------------------------

    /// Stop any running timer, then start a new one.
    pub fn play(&self) {
        self.pause();
        let carousel = self.clone();
        let id = self.inner.scheduler.set_interval(self.inner.delay, move || {
            carousel.next();
            Ok(())
        });
        self.inner.autoplay.set(Some(id));
    }

    /// Stop the running timer, if any.
    pub fn pause(&self) {
        if let Some(id) = self.inner.autoplay.take() {
            self.inner.scheduler.clear(id);
        }
    }

    // -------------------------------------------------------------------------
    // Intents
    // -------------------------------------------------------------------------

    /// React to a user or host intent.
    pub fn handle(&self, intent: Intent) {
        match intent {
            Intent::Next => {
                self.next();
                self.play();
            }
            Intent::Prev => {
                self.prev();
                self.play();
            }
            Intent::GoTo(index) if index < self.inner.slide_count => {
                self.show(index);
                self.play();
            }
            Intent::GoTo(index) => {
                tracing::debug!(index, "ignoring indicator past the last slide");
            }
            Intent::Pause | Intent::PageHidden | Intent::Unload => self.pause(),
            Intent::Resume | Intent::PageVisible => self.play(),
            Intent::TouchStart(x) => self.inner.touch_start_x.set(x),
            Intent::TouchEnd(x) => self.finish_swipe(x),
        }
    }

    fn finish_swipe(&self, end_x: f64) {
        let diff = self.inner.touch_start_x.get() - end_x;
        if diff.abs() <= self.inner.swipe_threshold {
            return;
        }
        // Leftward swipe (finger moved left) advances.
        if diff > 0.0 {
            self.next();
        } else {
            self.prev();
        }
        self.play();
    }
}

// =============================================================================
// DOM VIEW
// =============================================================================

/// Page-backed slide view.
#[derive(Debug, Clone)]
pub struct DomSlideView {
    page: Page,
    slides: Vec<ElementId>,
    indicators: Vec<ElementId>,
    prev_button: Option<ElementId>,
    next_button: Option<ElementId>,
    slider: Option<ElementId>,
}

impl DomSlideView {
    /// Locate the slider markup. `Ok(None)` when the page has no slides.
    pub fn find(page: &Page) -> Result<Option<Self>> {
        let doc = page.document();
        let slides = doc.query_all(SLIDE_SELECTOR)?;
        if slides.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            page: page.clone(),
            slides,
            indicators: doc.query_all(INDICATOR_SELECTOR)?,
            prev_button: doc.query(PREV_BUTTON_SELECTOR)?,
            next_button: doc.query(NEXT_BUTTON_SELECTOR)?,
            slider: doc.query(SLIDER_SELECTOR)?,
        }))
    }

    fn mark(&self, index: usize, on: bool) {
        let mut doc = self.page.document_mut();
        if let Some(slide) = self.slides.get(index) {
            doc.set_class(*slide, ACTIVE_CLASS, on);
        }
        if let Some(indicator) = self.indicators.get(index) {
            doc.set_class(*indicator, ACTIVE_CLASS, on);
        }
    }

    fn forward(&self, target: Target, kind: EventKind, handler: &NavigateHandler, intent: Intent) {
        let handler = handler.clone();
        self.page.listen(target, kind, move |_| {
            handler(intent);
            Ok(())
        });
    }
}

impl SlideView for DomSlideView {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn activate(&self, index: usize) {
        self.mark(index, true);
    }

    fn deactivate(&self, index: usize) {
        self.mark(index, false);
    }

    fn on_navigate(&self, handler: NavigateHandler) {
        if let Some(next) = self.next_button {
            self.forward(Target::Element(next), EventKind::Click, &handler, Intent::Next);
        }
        if let Some(prev) = self.prev_button {
            self.forward(Target::Element(prev), EventKind::Click, &handler, Intent::Prev);
        }
        for (index, indicator) in self.indicators.iter().enumerate() {
            self.forward(Target::Element(*indicator), EventKind::Click, &handler, Intent::GoTo(index));
        }

        if let Some(slider) = self.slider {
            let target = Target::Element(slider);
            self.forward(target, EventKind::PointerEnter, &handler, Intent::Pause);
            self.forward(target, EventKind::PointerLeave, &handler, Intent::Resume);

            let h = handler.clone();
            self.page.listen(target, EventKind::TouchStart, move |event| {
                h(Intent::TouchStart(event.screen_x));
                Ok(())
            });
            let h = handler.clone();
            self.page.listen(target, EventKind::TouchEnd, move |event| {
                h(Intent::TouchEnd(event.screen_x));
                Ok(())
            });
        }

        let h = handler.clone();
        self.page.listen(Target::Document, EventKind::KeyDown, move |event| {
            match event.key.as_deref() {
                Some("ArrowLeft") => h(Intent::Prev),
                Some("ArrowRight") => h(Intent::Next),
                _ => {}
            }
            Ok(())
        });

        let (h, page) = (handler.clone(), self.page.clone());
        self.page.listen(Target::Document, EventKind::VisibilityChange, move |_| {
            h(if page.is_hidden() {
                Intent::PageHidden
            } else {
                Intent::PageVisible
            });
            Ok(())
        });

        self.forward(Target::Document, EventKind::BeforeUnload, &handler, Intent::Unload);
    }
}

/// Find the slider on `page` and start it. `Ok(None)` when there are no slides.
pub fn init_carousel(page: &Page, config: &SiteConfig) -> Result<Option<Carousel>> {
    let Some(view) = DomSlideView::find(page)? else {
        tracing::debug!("no slides, carousel skipped");
        return Ok(None);
    };
    Ok(Carousel::attach(view, page.scheduler().clone(), config))
}

// =============================================================================
// TESTS
// =============================================================================
