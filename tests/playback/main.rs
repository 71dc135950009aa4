//! End-to-end playback tests for `bootanim-rs`

mod common;
mod load;
mod play;
mod time;
mod volume;
