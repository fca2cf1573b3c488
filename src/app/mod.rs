//! Host integration surface.
//!
//! The host owns the window, camera and render loop. Each frame it ticks its
//! [`Timer`](crate::utils::Timer), feeds pointer events into [`Input`], and
//! hands a [`FrameState`] to [`Avatar::update`](crate::avatar::Avatar::update).

pub mod frame;
pub mod input;

pub use frame::FrameState;
pub use input::Input;
