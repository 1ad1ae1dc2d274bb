//! DOM Module - Headless document the page behaviors act on
//!
//! - **Document** - Element arena, class/attribute/style access, queries
//! - **Selector** - Parsed CSS selector subset used by the queries

mod document;
pub mod selector;

pub use document::*;
pub use selector::Selector;
