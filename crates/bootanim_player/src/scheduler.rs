//! Frame-accurate playback of an [`Animation`].

use std::{
	thread,
	time::{Duration, Instant},
};

use bootanim_types::animation::{Animation, Part};

use crate::{
	callbacks::Callbacks,
	clock::ClockOverlay,
	control::ExitSignal,
	properties::{PropertyStore, keys},
	render::{Rect, Region, Renderer, limit_surface_size},
	texture::TextureCache,
	viewport::InsetAnimator,
};

/// Where playback currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
	/// Nothing played yet
	#[default]
	NotStarted,
	/// Showing repeat `repeat` of part `part`
	PlayingPart {
		/// Part index within its animation
		part: usize,
		/// Zero based repeat
		repeat: u32,
	},
	/// Part `part` finished its repeats
	PartComplete {
		/// Part index within its animation
		part: usize,
	},
	/// Every part finished
	AnimationComplete,
}

/// How a playback ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
	/// All parts played to the end
	Completed,
	/// An exit request cut playback short
	Exited,
	/// The surface went away
	Aborted,
}

/// Everything the scheduler drives while playing
pub struct PlaybackContext<'a> {
	/// Drawing surface
	pub renderer: &'a mut dyn Renderer,
	/// Property source for resize limits and the inset
	pub props: &'a dyn PropertyStore,
	/// Observer hooks
	pub callbacks: &'a dyn Callbacks,
	/// Exit state
	pub exit: &'a mut ExitSignal,
	/// Display inset animation
	pub inset: &'a mut InsetAnimator,
	/// Clock overlay, when enabled
	pub clock: Option<&'a ClockOverlay>,
}

/// Plays animations part by part, frame by frame
#[derive(Debug, Default)]
pub struct Scheduler {
	state: PlaybackState,
	frames_presented: u64,
}

impl Scheduler {
	/// Creates an idle scheduler
	pub fn new() -> Self {
		Self::default()
	}

	/// Current state
	pub fn state(&self) -> PlaybackState {
		self.state
	}

	/// Frames presented so far
	pub fn frames_presented(&self) -> u64 {
		self.frames_presented
	}

	/// Plays `animation` until it completes, exit cuts it short, or the
	/// surface fails.
	pub fn play(&mut self, animation: &Animation, ctx: &mut PlaybackContext<'_>) -> PlaybackOutcome {
		let outcome = self.play_animation(animation, ctx);
		if outcome == PlaybackOutcome::Aborted {
			log::error!("playback of '{}' aborted", animation.file_name);
			return outcome;
		}

		self.state = PlaybackState::AnimationComplete;
		if ctx.exit.is_pending() {
			PlaybackOutcome::Exited
		} else {
			PlaybackOutcome::Completed
		}
	}

	fn play_animation(&mut self, animation: &Animation, ctx: &mut PlaybackContext<'_>) -> PlaybackOutcome {
		let frame_duration = animation.frame_duration();
		let mut cache = TextureCache::new();

		for (index, part) in animation.parts.iter().enumerate() {
			if let Some(nested) = part.animation() {
				if self.play_animation(nested, ctx) == PlaybackOutcome::Aborted {
					cache.release_all(ctx.renderer);
					return PlaybackOutcome::Aborted;
				}
				if ctx.exit.check(ctx.callbacks) {
					break;
				}
				continue;
			}

			let outcome = self.play_part(animation, index, part, frame_duration, &mut cache, ctx);
			cache.release_part(ctx.renderer, index);
			if outcome == PlaybackOutcome::Aborted {
				cache.release_all(ctx.renderer);
				return outcome;
			}
			self.state = PlaybackState::PartComplete {
				part: index,
			};
		}

		cache.release_all(ctx.renderer);
		PlaybackOutcome::Completed
	}

	fn play_part(
		&mut self,
		animation: &Animation,
		index: usize,
		part: &Part,
		frame_duration: Duration,
		cache: &mut TextureCache,
		ctx: &mut PlaybackContext<'_>,
	) -> PlaybackOutcome {
		let keep = part.count != 1;
		let [r, g, b] = part.background_color;
		let mut repeat: u32 = 0;

		while part.is_infinite() || repeat < part.count {
			if ctx.exit.check(ctx.callbacks) && !part.play_until_complete {
				break;
			}

			self.state = PlaybackState::PlayingPart {
				part: index,
				repeat,
			};
			ctx.callbacks.play_part(index, part, repeat);
			ctx.renderer.set_clear_color([r, g, b, 1.0]);

			for (frame_index, frame) in part.frames().iter().enumerate() {
				if ctx.exit.is_pending() && !part.play_until_complete {
					break;
				}

				self.handle_resize(ctx);
				let start = Instant::now();

				let texture = match cache.acquire(ctx.renderer, (index, frame_index), frame, repeat, keep) {
					Ok(texture) => Some(texture),
					Err(e) => {
						log::error!("'{}/{}': {e}", part.path, frame.name);
						None
					}
				};

				let (width, height) = ctx.renderer.size();
				let xc = (width.saturating_sub(animation.width) / 2).saturating_add(frame.trim.x);
				let yc = (height.saturating_sub(animation.height) / 2).saturating_add(frame.trim.y);
				let dst = Rect::from_size(xc, yc, frame.trim.width, frame.trim.height);

				let outside = Region::from_rect(Rect::new(0, 0, width, height)).subtract(dst);
				for rect in outside.rects() {
					ctx.renderer.clear(*rect);
				}
				if let Some(texture) = &texture {
					ctx.renderer.draw(texture.id, texture.crop, dst);
				}
				if let Some(clock) = ctx.clock {
					clock.draw(ctx.renderer, part.clock_pos, &chrono::Local::now());
				}
				if let Some(step) = ctx.inset.step(ctx.props, height, frame_duration) {
					ctx.renderer.apply_inset(step);
				}

				if !ctx.renderer.present() {
					if let Some(texture) = texture.filter(|t| t.transient) {
						ctx.renderer.delete(texture.id);
					}
					return PlaybackOutcome::Aborted;
				}
				self.frames_presented += 1;

				if let Some(texture) = texture.filter(|t| t.transient) {
					ctx.renderer.delete(texture.id);
				}

				let deadline = start + frame_duration;
				let now = Instant::now();
				if deadline > now {
					thread::sleep(deadline - now);
				}

				ctx.exit.check(ctx.callbacks);
			}

			if part.pause > 0 {
				thread::sleep(frame_duration * part.pause);
			}

			if ctx.exit.check(ctx.callbacks) && part.is_infinite() && ctx.inset.is_settled() {
				break;
			}
			repeat = repeat.saturating_add(1);
		}

		PlaybackOutcome::Completed
	}

	fn handle_resize(&mut self, ctx: &mut PlaybackContext<'_>) {
		let Some((width, height)) = ctx.renderer.poll_resize() else {
			return;
		};
		let max_w = ctx.props.get_int_in_range(keys::MAX_GRAPHICS_WIDTH, 0, 0, i64::from(i32::MAX)) as i32;
		let max_h = ctx.props.get_int_in_range(keys::MAX_GRAPHICS_HEIGHT, 0, 0, i64::from(i32::MAX)) as i32;
		let (width, height) = limit_surface_size(width, height, max_w, max_h);
		log::info!("display resized, surface now {width}x{height}");
		ctx.renderer.resize(width, height);
	}
}
