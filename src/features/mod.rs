//! Features Module - The page behaviors
//!
//! Each feature looks up its markup, wires listeners on the [`Page`], and
//! returns a handle (or `None` when its markup is absent). Features never
//! depend on each other.
//!
//! - **navigation** - Mobile menu, header scroll state, active nav link
//! - **anchors** - Smooth in-page anchor scrolling
//! - **accessibility** - Skip link, main landmark, focus outlines
//! - **carousel** - Hero slider with autoplay, keyboard, swipe
//! - **filter** - Product category tabs
//! - **form** - Contact form validation, phone formatting, simulated send
//! - **reveal** - Scroll-reveal and lazy images
//!
//! [`Page`]: crate::runtime::Page

pub mod accessibility;
pub mod anchors;
pub mod carousel;
pub mod filter;
pub mod form;
pub mod navigation;
pub mod reveal;
