//! Core types shared by the document model, the runtime and the features.
//!
//! Nothing here knows about carousels or forms. These are the handles and
//! value types the page is built from.

use std::fmt;
use std::time::Duration;

// =============================================================================
// ElementId - Arena handle into the document
// =============================================================================

/// Handle to an element in a [`Document`](crate::dom::Document).
///
/// Handles are plain indices. They are only meaningful for the document that
/// created them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    /// Raw arena index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Element state flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Boolean element states the host tracks outside the attribute map.
    ///
    /// Combine with bitwise OR: `ElementFlags::DISABLED | ElementFlags::FOCUSED`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ElementFlags: u8 {
        const NONE = 0;
        const DISABLED = 1 << 0;
        const FOCUSED = 1 << 1;
        /// Image finished loading its current source.
        const LOADED = 1 << 2;
    }
}

// =============================================================================
// Rect - Layout geometry in document coordinates
// =============================================================================

/// Vertical layout box of an element, in document pixels.
///
/// Only the vertical axis matters for scrolling and reveal checks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Fraction of this rect covered by the band `[from, to)`.
    ///
    /// Zero-height rects count as fully covered when their top lies in the band.
    pub fn coverage(&self, from: f64, to: f64) -> f64 {
        if self.height <= 0.0 {
            return if self.top >= from && self.top < to { 1.0 } else { 0.0 };
        }
        let overlap = self.bottom().min(to) - self.top.max(from);
        (overlap / self.height).clamp(0.0, 1.0)
    }
}

// =============================================================================
// Inline style
// =============================================================================

/// CSS `display` values the behaviors toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    None,
    Block,
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Display::None => f.write_str("none"),
            Display::Block => f.write_str("block"),
        }
    }
}

/// The inline style properties the page behaviors read or write.
///
/// `None` means "not set inline", which is what clearing a property in the
/// browser amounts to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub opacity: Option<f32>,
    pub transform: Option<String>,
    pub transition: Option<String>,
    pub display: Option<Display>,
    pub overflow: Option<String>,
    pub top: Option<String>,
    /// Raw declarations assigned wholesale (`style.cssText`).
    pub css_text: Option<String>,
}

/// How a scroll request should move the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Instant,
    Smooth,
}

/// Milliseconds helper used throughout the config and tests.
#[inline]
pub const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
