//! Clock overlay drawn on top of animation frames.

use std::sync::{
	Arc,
	atomic::{AtomicBool, Ordering},
};

use bootanim_types::file::{ClockPosition, FontGrid};
use chrono::{DateTime, TimeZone};

use crate::{
	error::PlayerError,
	render::{Rect, Renderer},
	texture::{TextureId, TextureImage, TextureParams},
	time_check::TimeAccuracy,
};

/// Length of a formatted `HH:MM` clock
pub const CLOCK_TEXT_LEN: usize = 5;

/// Clock glyph texture and grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockFont {
	/// Uploaded font bitmap
	pub texture: TextureId,
	/// Glyph geometry
	pub grid: FontGrid,
}

impl ClockFont {
	/// Decodes and uploads a font bitmap
	pub fn load(renderer: &mut dyn Renderer, data: &[u8]) -> Result<Self, PlayerError> {
		let image = TextureImage::decode(data, renderer.supports_npot())?;
		let grid = FontGrid::from_size(image.width, image.height).ok_or(PlayerError::FontTooSmall {
			width: image.width,
			height: image.height,
		})?;
		let texture = renderer.upload(&image, TextureParams::NEAREST)?;
		Ok(Self {
			texture,
			grid,
		})
	}

	/// Deletes the font texture
	pub fn release(self, renderer: &mut dyn Renderer) {
		renderer.delete(self.texture);
	}
}

/// Formats `time` as `HH:MM` (24-hour) or `H:MM` (12-hour).
///
/// Returns `None` when the formatted text is not exactly five characters
/// before the leading pad is trimmed.
pub fn format_clock<Tz: TimeZone>(time: &DateTime<Tz>, twelve_hour: bool) -> Option<String>
where
	Tz::Offset: std::fmt::Display,
{
	let format = if twelve_hour {
		"%l:%M"
	} else {
		"%H:%M"
	};
	let text = time.format(format).to_string();
	if text.chars().count() != CLOCK_TEXT_LEN {
		log::error!("clock text '{text}' is not {CLOCK_TEXT_LEN} characters");
		return None;
	}
	Some(text.trim_start_matches(' ').to_string())
}

/// Resolves the top-left corner of a `len` character string.
///
/// Returns `None` when the position is not valid.
pub fn layout_text(len: usize, grid: &FontGrid, pos: ClockPosition, canvas: (i32, i32)) -> Option<(i32, i32)> {
	let width = grid.text_width(len) as i32;
	let height = grid.char_height as i32;
	Some((pos.x.resolve(canvas.0, width)?, pos.y.resolve(canvas.1, height)?))
}

/// Draws `text` with its top-left corner at `(x, y)`
pub fn draw_text(renderer: &mut dyn Renderer, font: &ClockFont, text: &str, x: i32, y: i32, bold: bool) {
	let cw = font.grid.char_width as i32;
	let ch = font.grid.char_height as i32;
	for (i, c) in text.chars().enumerate() {
		let glyph = font.grid.glyph_rect(c, bold);
		let src = Rect::from_size(glyph.x as i32, glyph.y as i32, glyph.width as i32, glyph.height as i32);
		renderer.draw(font.texture, src, Rect::from_size(x + i as i32 * cw, y, cw, ch));
	}
}

/// Clock state shared by the scheduler and the time watcher
#[derive(Debug)]
pub struct ClockOverlay {
	font: ClockFont,
	accuracy: Arc<TimeAccuracy>,
	enabled: Arc<AtomicBool>,
}

impl ClockOverlay {
	/// Creates an enabled overlay
	pub fn new(font: ClockFont, accuracy: Arc<TimeAccuracy>) -> Self {
		Self {
			font,
			accuracy,
			enabled: Arc::new(AtomicBool::new(true)),
		}
	}

	/// Flag cleared when the clock is disabled for good
	pub fn enabled_flag(&self) -> Arc<AtomicBool> {
		self.enabled.clone()
	}

	/// Accuracy flags consulted before drawing
	pub fn accuracy(&self) -> Arc<TimeAccuracy> {
		self.accuracy.clone()
	}

	/// Whether the clock may still be drawn
	pub fn is_enabled(&self) -> bool {
		self.enabled.load(Ordering::Acquire)
	}

	/// Font in use
	pub fn font(&self) -> &ClockFont {
		&self.font
	}

	/// Draws the clock at `pos` when enabled, the time is accurate and the
	/// position is valid. Returns true if something was drawn.
	pub fn draw<Tz: TimeZone>(&self, renderer: &mut dyn Renderer, pos: ClockPosition, now: &DateTime<Tz>) -> bool
	where
		Tz::Offset: std::fmt::Display,
	{
		if !self.is_enabled() || !self.accuracy.is_accurate() || !pos.is_valid() {
			return false;
		}

		let Some(text) = format_clock(now, self.accuracy.is_twelve_hour()) else {
			self.enabled.store(false, Ordering::Release);
			return false;
		};
		let Some((x, y)) = layout_text(text.len(), &self.font.grid, pos, renderer.size()) else {
			return false;
		};

		renderer.set_blend(true);
		draw_text(renderer, &self.font, &text, x, y, false);
		renderer.set_blend(false);
		true
	}

	/// Deletes the font texture
	pub fn release(self, renderer: &mut dyn Renderer) {
		self.font.release(renderer);
	}
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use bootanim_types::file::TextCoord;
	use chrono::{NaiveDate, Utc};
	use image::{ImageFormat, Rgba, RgbaImage};

	use super::*;
	use crate::render::CpuRenderer;

	fn at(h: u32, m: u32) -> DateTime<Utc> {
		NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(h, m, 0).unwrap().and_utc()
	}

	fn font_png() -> Vec<u8> {
		let img = RgbaImage::from_pixel(160, 120, Rgba([255, 255, 255, 255]));
		let mut out = Cursor::new(Vec::new());
		img.write_to(&mut out, ImageFormat::Png).unwrap();
		out.into_inner()
	}

	#[test]
	fn test_formats() {
		assert_eq!(format_clock(&at(9, 5), false).as_deref(), Some("09:05"));
		assert_eq!(format_clock(&at(21, 30), false).as_deref(), Some("21:30"));
		assert_eq!(format_clock(&at(21, 30), true).as_deref(), Some("9:30"));
		assert_eq!(format_clock(&at(12, 0), true).as_deref(), Some("12:00"));
	}

	#[test]
	fn test_layout() {
		let grid = FontGrid::from_size(160, 120).unwrap();
		assert_eq!((grid.char_width, grid.char_height), (10, 10));

		let pos = ClockPosition {
			x: TextCoord::Center,
			y: TextCoord::Offset(-20),
		};
		assert_eq!(layout_text(5, &grid, pos, (480, 800)), Some((215, 770)));
		assert_eq!(layout_text(5, &grid, ClockPosition::MISSING, (480, 800)), None);
	}

	#[test]
	fn test_draws_only_when_accurate() {
		let mut renderer = CpuRenderer::new(100, 100);
		let font = ClockFont::load(&mut renderer, &font_png()).unwrap();
		let accuracy = Arc::new(TimeAccuracy::default());
		let overlay = ClockOverlay::new(font, accuracy.clone());
		let pos = ClockPosition {
			x: TextCoord::Center,
			y: TextCoord::Center,
		};

		assert!(!overlay.draw(&mut renderer, pos, &at(10, 0)));
		accuracy.set_accurate(true);
		assert!(overlay.draw(&mut renderer, pos, &at(10, 0)));
		assert_eq!(renderer.stats().draws, 5);
		assert!(!overlay.draw(&mut renderer, ClockPosition::MISSING, &at(10, 0)));

		overlay.release(&mut renderer);
		assert_eq!(renderer.live_textures(), 0);
	}

	#[test]
	fn test_tiny_font_is_rejected() {
		let mut renderer = CpuRenderer::new(10, 10);
		let img = RgbaImage::new(8, 8);
		let mut out = Cursor::new(Vec::new());
		img.write_to(&mut out, ImageFormat::Png).unwrap();
		assert!(matches!(
			ClockFont::load(&mut renderer, &out.into_inner()),
			Err(PlayerError::FontTooSmall { .. })
		));
	}
}
