use anyhow::Result;

use firstlight_engine::device::GpuInit;
use firstlight_engine::logging::{init_logging, LoggingConfig};
use firstlight_engine::window::{Runtime, RuntimeConfig};
use firstlight_lessons::spin_quad::SpinQuadLesson;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(
        RuntimeConfig::default().with_title("Spin Quad"),
        GpuInit::linear(),
        SpinQuadLesson::new(),
    )
}
