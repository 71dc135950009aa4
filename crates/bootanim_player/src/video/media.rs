//! Media service seam.

use std::{
	path::Path,
	thread,
	time::{Duration, Instant},
};

use crate::error::PlayerError;

/// Retries between progress logs while waiting for the service
const LOG_EVERY: u32 = 10;

/// A video player instance
pub trait MediaPlayer: Send {
	/// Selects the file to play
	fn set_data_source(&mut self, path: &Path) -> Result<(), PlayerError>;

	/// Enables or disables looping
	fn set_looping(&mut self, looping: bool);

	/// Prepares playback
	fn prepare(&mut self) -> Result<(), PlayerError>;

	/// Sets the gain of both channels
	fn set_volume(&mut self, gain: f32);

	/// Starts playback
	fn start(&mut self) -> Result<(), PlayerError>;

	/// Whether playback reached the end
	fn is_complete(&self) -> bool;

	/// Stops playback
	fn stop(&mut self);

	/// Returns the player to its idle state
	fn reset(&mut self);
}

/// Provider of [`MediaPlayer`]s
pub trait MediaService {
	/// Whether the service is up
	fn is_available(&self) -> bool;

	/// Creates a player
	fn create_player(&self) -> Result<Box<dyn MediaPlayer>, PlayerError>;
}

/// Waits until `service` is available, polling every `poll`.
///
/// Gives up after `timeout` and returns false.
pub fn wait_for_media_service(service: &dyn MediaService, poll: Duration, timeout: Duration) -> bool {
	let start = Instant::now();
	let mut retries: u32 = 0;

	while !service.is_available() {
		if start.elapsed() >= timeout {
			log::error!("media service unavailable after {:?}", start.elapsed());
			return false;
		}
		retries += 1;
		if retries % LOG_EVERY == 0 {
			log::warn!("still waiting for the media service after {retries} retries");
		}
		thread::sleep(poll);
	}

	if start.elapsed() > Duration::from_millis(100) {
		log::info!("media service became available after {:?}", start.elapsed());
	}
	true
}
