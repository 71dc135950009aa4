//! Rendering seam.
//!
//! Playback drives a [`Renderer`]; the platform supplies the implementation.
//! [`CpuRenderer`] composites into an in-memory framebuffer and is used by the
//! demos and tests.

mod cpu;
mod region;

pub use cpu::{CpuRenderer, RenderStats};
pub use region::{Rect, Region};

use crate::{
	error::PlayerError,
	texture::{TextureId, TextureImage, TextureParams},
	viewport::InsetStep,
};

/// Layer of the video surface
pub const LAYER_VIDEO: i32 = 0x3000_0000;

/// Layer that puts the animation surface above the video
pub const LAYER_UI_SHOW: i32 = 0x4000_0000;

/// Layer that puts the animation surface below the video
pub const LAYER_UI_HIDE: i32 = 0x2000_0000;

/// Drawing surface used by playback
pub trait Renderer {
	/// Surface size in pixels
	fn size(&self) -> (i32, i32);

	/// Whether textures may have non power of two sizes
	fn supports_npot(&self) -> bool;

	/// Uploads an image
	fn upload(&mut self, image: &TextureImage, params: TextureParams) -> Result<TextureId, PlayerError>;

	/// Deletes a texture; unknown ids are ignored
	fn delete(&mut self, id: TextureId);

	/// Sets the colour used by [`Renderer::clear`]
	fn set_clear_color(&mut self, rgba: [f32; 4]);

	/// Fills `rect` with the clear colour
	fn clear(&mut self, rect: Rect);

	/// Draws the `src` region of a texture scaled into `dst`
	fn draw(&mut self, id: TextureId, src: Rect, dst: Rect);

	/// Enables alpha blending for subsequent draws
	fn set_blend(&mut self, enabled: bool);

	/// Restricts drawing to `rect`
	fn set_clip(&mut self, rect: Option<Rect>);

	/// Shows the frame; false when the surface is gone
	fn present(&mut self) -> bool;

	/// Applies a display-inset step to the surface geometry
	fn apply_inset(&mut self, step: InsetStep);

	/// Moves the surface to a compositor layer
	fn set_layer(&mut self, layer: i32);

	/// Returns the new display size if the display changed since last call
	fn poll_resize(&mut self) -> Option<(i32, i32)>;

	/// Resizes the surface
	fn resize(&mut self, width: i32, height: i32);

	/// Mirrors the surface onto additional physical displays
	fn set_display_targets(&mut self, ids: &[u64]);
}

/// Shrinks `(width, height)` to fit the maximum graphics size, keeping the
/// aspect ratio. A zero maximum means unbounded.
pub fn limit_surface_size(width: i32, height: i32, max_width: i32, max_height: i32) -> (i32, i32) {
	if width <= 0 || height <= 0 {
		return (width, height);
	}

	let aspect = f64::from(width) / f64::from(height);
	let (mut w, mut h) = (width, height);

	if max_width != 0 && w > max_width {
		h = (f64::from(max_width) / aspect) as i32;
		w = max_width;
	}
	if max_height != 0 && h > max_height {
		h = max_height;
		w = (f64::from(max_height) * aspect) as i32;
	}

	(w, h)
}

/// Parses a comma separated list of physical display ids.
///
/// Anything but digits and commas invalidates the whole value.
pub fn parse_display_ids(value: &str) -> Option<Vec<u64>> {
	if !value.chars().all(|c| c.is_ascii_digit() || c == ',') {
		log::error!("invalid display id list '{value}', expected digits and commas only");
		return None;
	}

	Some(value.split(',').filter(|s| !s.is_empty()).filter_map(|s| s.parse().ok()).collect())
}

/// Built-in display rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
	/// 0 degrees
	#[default]
	Rotate0,
	/// 90 degrees
	Rotate90,
	/// 180 degrees
	Rotate180,
	/// 270 degrees
	Rotate270,
}

impl Rotation {
	/// Rotation for a `persist.sys.builtinrotation` value
	pub fn from_property(value: i64) -> Self {
		match value {
			1 => Self::Rotate90,
			2 => Self::Rotate180,
			3 => Self::Rotate270,
			_ => Self::Rotate0,
		}
	}

	/// Surface size for a display of the given size
	pub fn apply(self, width: i32, height: i32) -> (i32, i32) {
		match self {
			Self::Rotate90 | Self::Rotate270 => (height, width),
			Self::Rotate0 | Self::Rotate180 => (width, height),
		}
	}
}
