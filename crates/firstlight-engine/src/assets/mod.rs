//! File-backed inputs.
//!
//! The only asset the lessons read from disk is a grayscale heightmap.

mod heightmap;

pub use heightmap::{Heightmap, HeightmapError, HEIGHTMAP_SIZE};
