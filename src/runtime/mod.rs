//! Runtime Module - The single-threaded host loop
//!
//! - **Scheduler** - Virtual clock, timeouts and intervals
//! - **Events** - Event types, listener registry, bubbling dispatch
//! - **Debounce** - Trailing-edge coalescing on the scheduler
//! - **Observer** - Polled-geometry visibility watching
//! - **Page** - Document + runtime + window state in one handle

mod debounce;
mod events;
mod observer;
mod page;
mod scheduler;

pub use debounce::*;
pub use events::*;
pub use observer::*;
pub use page::*;
pub use scheduler::*;
