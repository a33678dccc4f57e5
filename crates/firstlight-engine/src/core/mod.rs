//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! the lessons: the lifecycle hooks an application implements, the per-frame
//! context it receives, and the state machine that orders those hooks.

mod app;
mod ctx;
mod lifecycle;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
pub use lifecycle::{Lifecycle, LifecycleError, Phase};
