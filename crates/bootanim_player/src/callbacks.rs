//! Playback observer hooks.

use bootanim_types::animation::Part;

/// Hooks invoked while an animation plays.
///
/// Every method defaults to a no-op. Implementations typically start the
/// part's audio clip from [`Callbacks::play_part`].
pub trait Callbacks {
	/// Called once per animation before playback, nested animations first
	fn init(&self, _parts: &[Part]) {}

	/// Called at the start of every repeat of a part
	fn play_part(&self, _index: usize, _part: &Part, _repeat: u32) {}

	/// Called once when an exit request is observed
	fn shutdown(&self) {}
}

/// Callbacks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallbacks;

impl Callbacks for NoopCallbacks {}

/// Callbacks that log each hook at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCallbacks;

impl Callbacks for LogCallbacks {
	fn init(&self, parts: &[Part]) {
		log::debug!("init: {} parts", parts.len());
	}

	fn play_part(&self, index: usize, part: &Part, repeat: u32) {
		log::debug!(
			"play part {index} '{}' repeat {repeat}{}",
			part.path,
			if part.audio.is_some() {
				" (audio)"
			} else {
				""
			}
		);
	}

	fn shutdown(&self) {
		log::debug!("shutdown");
	}
}
