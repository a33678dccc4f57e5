use std::path::PathBuf;

use anyhow::Result;

use firstlight_engine::device::GpuInit;
use firstlight_engine::logging::{init_logging, LoggingConfig};
use firstlight_engine::window::{Runtime, RuntimeConfig};
use firstlight_lessons::terrain::{TerrainLesson, DEFAULT_HEIGHTMAP};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HEIGHTMAP));

    Runtime::run(
        RuntimeConfig::default(),
        GpuInit::linear(),
        TerrainLesson::new(path),
    )
}
