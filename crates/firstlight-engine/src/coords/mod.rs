//! Small value types shared by the runtime and renderers.

mod color;
mod viewport;

pub use color::Color;
pub use viewport::Viewport;
