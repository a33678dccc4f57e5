use anyhow::Result;

use firstlight_engine::device::GpuInit;
use firstlight_engine::logging::{init_logging, LoggingConfig};
use firstlight_engine::window::{Runtime, RuntimeConfig};
use firstlight_lessons::gradient_quad::GradientQuadLesson;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(
        RuntimeConfig::default().with_title("Gradient Quad"),
        GpuInit::linear(),
        GradientQuadLesson::new(),
    )
}
