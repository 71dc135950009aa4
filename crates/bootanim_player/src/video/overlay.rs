//! On-screen volume indicator shown while the boot video plays.

use std::{
	sync::mpsc::{Receiver, TryRecvError},
	thread,
	time::{Duration, Instant},
};

use bootanim_types::animation::{Animation, Frame};

use super::{
	media::MediaPlayer,
	volume::{VolumeCommand, VolumeController},
};
use crate::{
	control::ControlEvent,
	error::PlayerError,
	render::{LAYER_UI_HIDE, LAYER_UI_SHOW, Rect, Region, Renderer},
	texture::TextureCache,
};

/// Draws one frame of the volume bundle per volume level.
///
/// Frames `0..=100` show the level, frame 101 the muted state. The overlay
/// is anchored to the bottom centre of the surface and hides itself after
/// an idle period unless muted.
#[derive(Debug)]
pub struct VolumeOverlay<'a> {
	animation: &'a Animation,
	frames: &'a [Frame],
	hide_after: Duration,
	tick: Duration,
}

impl<'a> VolumeOverlay<'a> {
	/// Uses the first part of `animation` as the level frames
	pub fn new(animation: &'a Animation, hide_after: Duration, tick: Duration) -> Result<Self, PlayerError> {
		let part = animation.parts.first().ok_or_else(|| {
			PlayerError::Media(format!("volume bundle '{}' has no parts", animation.file_name))
		})?;
		Ok(Self {
			animation,
			frames: part.frames(),
			hide_after,
			tick,
		})
	}

	/// Runs until `player` completes, applying key actions from `events`
	pub fn run(
		&self,
		renderer: &mut dyn Renderer,
		volume: &mut VolumeController,
		events: &Receiver<ControlEvent>,
		player: &mut dyn MediaPlayer,
	) -> Result<(), PlayerError> {
		let mut cache = TextureCache::new();
		let mut drawn: Option<usize> = None;
		let mut shown_at: Option<Instant> = None;

		if let Some(part) = self.animation.parts.first() {
			let [r, g, b] = part.background_color;
			renderer.set_clear_color([r, g, b, 0.0]);
		}

		while !player.is_complete() {
			let mut touched = false;
			loop {
				match events.try_recv() {
					Ok(event) => match VolumeCommand::from_event(event) {
						Some(command) => {
							volume.apply(command, Some(&mut *player));
							touched = true;
						}
						None => log::trace!("volume overlay: ignoring {event:?}"),
					},
					Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
				}
			}

			// Every key press restarts the idle timer, even at the end of the range
			if touched {
				let index = volume.state().overlay_index();
				if drawn != Some(index) && self.draw(renderer, &mut cache, index) {
					drawn = Some(index);
				}
				if drawn == Some(index) {
					renderer.set_layer(LAYER_UI_SHOW);
					shown_at = Some(Instant::now());
				}
			}

			thread::sleep(self.tick);

			if !volume.state().is_muted() && shown_at.is_some_and(|t| t.elapsed() > self.hide_after) {
				log::debug!("volume overlay: hiding");
				renderer.set_layer(LAYER_UI_HIDE);
				shown_at = None;
			}
		}

		renderer.set_layer(LAYER_UI_HIDE);
		cache.release_all(renderer);
		Ok(())
	}

	fn draw(&self, renderer: &mut dyn Renderer, cache: &mut TextureCache, index: usize) -> bool {
		let Some(frame) = self.frames.get(index) else {
			log::warn!("volume overlay: no frame for level index {index}");
			return false;
		};
		let texture = match cache.acquire(renderer, (0, index), frame, 1, true) {
			Ok(texture) => texture,
			Err(e) => {
				log::error!("volume overlay: '{}': {e}", frame.name);
				return false;
			}
		};

		let (width, height) = renderer.size();
		let xc = (width.saturating_sub(self.animation.width) / 2).saturating_add(frame.trim.x);
		let yc = height.saturating_sub(self.animation.height).saturating_add(frame.trim.y);
		let dst = Rect::from_size(xc, yc, frame.trim.width, frame.trim.height);

		for rect in Region::from_rect(Rect::new(0, 0, width, height)).subtract(dst).rects() {
			renderer.clear(*rect);
		}
		renderer.draw(texture.id, texture.crop, dst);
		renderer.present()
	}
}
