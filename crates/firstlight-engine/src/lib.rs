//! firstlight engine crate.
//!
//! Owns the platform + GPU runtime pieces the lessons are built on: the
//! window loop and its lifecycle hooks, the wgpu device/surface, frame timing,
//! logging, shader/pipeline helpers and the heightmap loader.

pub mod assets;
pub mod coords;
pub mod core;
pub mod device;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
