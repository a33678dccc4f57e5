//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window, wires them to the GPU layer, and
//! drives an [`App`](crate::core::App) through its lifecycle hooks.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
