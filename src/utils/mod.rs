//! Utility Module
//!
//! - [`Timer`]: frame clock feeding the per-frame update
//! - [`Changed`]: on-change detection for props and debug controls

pub mod change;
pub mod time;

pub use change::Changed;
pub use time::Timer;
