//! Contact form - field rules and page wiring
//!
//! - **rules** - Pure per-field validation, messages, phone formatting
//! - **contact** - Blur/input/submit handling, simulated sending

mod contact;
pub mod rules;

pub use contact::*;
pub use rules::{FieldError, FieldKind, format_phone, validate_value};
