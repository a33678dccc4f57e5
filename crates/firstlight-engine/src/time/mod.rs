//! Redraw timing. The runtime owns one clock per session and feeds every
//! tick's `FrameTime` to the lesson's update hook.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime, MAX_DT, MIN_DT};
