//! Built-in animation shown when no bundle is available.
//!
//! A logo mask, opaque except for a transparent wordmark band, sits on top
//! of a wide shine gradient that sweeps left to right underneath it.

use std::{
	thread,
	time::{Duration, Instant},
};

use image::{Rgba, RgbaImage};

use crate::{
	callbacks::Callbacks,
	control::ExitSignal,
	error::PlayerError,
	render::{Rect, Renderer},
	scheduler::PlaybackOutcome,
	texture::{TextureImage, TextureParams},
};

/// Frame period of the fallback animation (12 fps)
pub const FRAME_PERIOD: Duration = Duration::from_micros(83_333);

/// Horizontal offset of the shine `elapsed` after the start.
///
/// The shine advances 4 pixels per 16.667 ms and wraps every `shine_width`.
pub fn shine_offset(elapsed: Duration, shine_width: u32) -> i32 {
	if shine_width == 0 {
		return 0;
	}
	let steps = elapsed.as_secs_f64() / 0.016_667;
	let t = 4.0 * steps / f64::from(shine_width);
	((1.0 - t.fract()) * f64::from(shine_width)) as i32
}

/// The generated logo textures
#[derive(Debug, Clone)]
pub struct LogoAnimation {
	mask: TextureImage,
	shine: TextureImage,
}

impl Default for LogoAnimation {
	fn default() -> Self {
		Self::generate(256, 64)
	}
}

impl LogoAnimation {
	/// Generates a `width x height` logo; the shine is twice as wide
	pub fn generate(width: u32, height: u32) -> Self {
		let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
		let (rx, ry) = (width as f32 * 0.42, height as f32 * 0.3);
		let mask = RgbaImage::from_fn(width, height, |x, y| {
			let dx = (x as f32 + 0.5 - cx) / rx;
			let dy = (y as f32 + 0.5 - cy) / ry;
			// Superellipse band
			if dx.powi(4) + dy.powi(4) <= 1.0 {
				Rgba([0, 0, 0, 0])
			} else {
				Rgba([0, 0, 0, 255])
			}
		});

		let shine_width = width * 2;
		let shine = RgbaImage::from_fn(shine_width, height, |x, _| {
			let d = (x as f32 - shine_width as f32 / 2.0).abs() / (shine_width as f32 / 4.0);
			let v = 48.0 + 207.0 * (1.0 - d).max(0.0);
			let v = v as u8;
			Rgba([v, v, v, 255])
		});

		Self {
			mask: TextureImage::from_rgba(mask, true),
			shine: TextureImage::from_rgba(shine, true),
		}
	}

	/// Logo size
	pub fn size(&self) -> (u32, u32) {
		(self.mask.width, self.mask.height)
	}

	/// Plays until exit is requested or presenting fails
	pub fn play(
		&self,
		renderer: &mut dyn Renderer,
		exit: &mut ExitSignal,
		callbacks: &dyn Callbacks,
	) -> Result<PlaybackOutcome, PlayerError> {
		let npot = renderer.supports_npot();
		let mask = TextureImage::from_rgba(self.mask.pixels.clone(), npot);
		let shine = TextureImage::from_rgba(self.shine.pixels.clone(), npot);
		let mask_id = renderer.upload(&mask, TextureParams::NEAREST)?;
		let shine_id = match renderer.upload(&shine, TextureParams::NEAREST) {
			Ok(id) => id,
			Err(e) => {
				renderer.delete(mask_id);
				return Err(e);
			}
		};

		callbacks.init(&[]);

		renderer.set_clear_color([0.0, 0.0, 0.0, 1.0]);
		let (w, h) = renderer.size();
		renderer.clear(Rect::new(0, 0, w, h));
		let mut outcome = if renderer.present() {
			PlaybackOutcome::Exited
		} else {
			PlaybackOutcome::Aborted
		};

		let (mw, mh) = (mask.width as i32, mask.height as i32);
		let sw = shine.width as i32;
		let start = Instant::now();

		while outcome != PlaybackOutcome::Aborted && !exit.is_pending() {
			let frame_start = Instant::now();
			if let Some((nw, nh)) = renderer.poll_resize() {
				renderer.resize(nw, nh);
			}
			let (w, h) = renderer.size();
			let xc = (w - mw) / 2;
			let yc = (h - mh) / 2;
			let logo = Rect::from_size(xc, yc, mw, mh);
			let x = xc - shine_offset(start.elapsed(), shine.width);

			renderer.set_clip(None);
			renderer.clear(Rect::new(0, 0, w, h));

			renderer.set_clip(Some(logo));
			renderer.set_blend(false);
			renderer.draw(shine_id, shine.crop(), Rect::from_size(x, yc, sw, mh));
			renderer.draw(shine_id, shine.crop(), Rect::from_size(x + sw, yc, sw, mh));

			renderer.set_blend(true);
			renderer.draw(mask_id, mask.crop(), logo);
			renderer.set_blend(false);
			renderer.set_clip(None);

			if !renderer.present() {
				outcome = PlaybackOutcome::Aborted;
				break;
			}

			let elapsed = frame_start.elapsed();
			if elapsed < FRAME_PERIOD {
				thread::sleep(FRAME_PERIOD - elapsed);
			}
			exit.check(callbacks);
		}

		renderer.delete(mask_id);
		renderer.delete(shine_id);
		Ok(outcome)
	}
}
