use std::collections::HashMap;

use image::{Rgba, RgbaImage};

use super::{Rect, Renderer};
use crate::{
	error::PlayerError,
	texture::{TextureId, TextureImage, TextureParams},
	viewport::InsetStep,
};

/// Counters kept by [`CpuRenderer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
	/// Successful presents
	pub presents: u64,
	/// Texture draws
	pub draws: u64,
	/// Clear calls
	pub clears: u64,
	/// Texture uploads
	pub uploads: u64,
	/// Texture deletions
	pub deletes: u64,
}

/// Software renderer compositing into an RGBA framebuffer
#[derive(Debug)]
pub struct CpuRenderer {
	frame: RgbaImage,
	textures: HashMap<TextureId, RgbaImage>,
	next_id: u32,
	clear_color: Rgba<u8>,
	blend: bool,
	clip: Option<Rect>,
	npot: bool,
	layer: i32,
	inset: Option<InsetStep>,
	display_targets: Vec<u64>,
	pending_resize: Option<(i32, i32)>,
	fail_after: Option<u64>,
	stats: RenderStats,
}

impl CpuRenderer {
	/// Creates a renderer with a black `width x height` framebuffer
	pub fn new(width: u32, height: u32) -> Self {
		Self {
			frame: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
			textures: HashMap::new(),
			next_id: 1,
			clear_color: Rgba([0, 0, 0, 255]),
			blend: false,
			clip: None,
			npot: true,
			layer: 0,
			inset: None,
			display_targets: Vec::new(),
			pending_resize: None,
			fail_after: None,
			stats: RenderStats::default(),
		}
	}

	/// Reports no NPOT support, forcing padded uploads
	pub fn without_npot(mut self) -> Self {
		self.npot = false;
		self
	}

	/// Fails every present after `presents` successful ones
	pub fn fail_presents_after(mut self, presents: u64) -> Self {
		self.fail_after = Some(presents);
		self
	}

	/// Queues a display size change reported by the next
	/// [`Renderer::poll_resize`]
	pub fn queue_resize(&mut self, width: i32, height: i32) {
		self.pending_resize = Some((width, height));
	}

	/// Counters
	pub fn stats(&self) -> RenderStats {
		self.stats
	}

	/// Textures uploaded and not yet deleted
	pub fn live_textures(&self) -> usize {
		self.textures.len()
	}

	/// Current framebuffer
	pub fn frame(&self) -> &RgbaImage {
		&self.frame
	}

	/// Current compositor layer
	pub fn layer(&self) -> i32 {
		self.layer
	}

	/// Last inset step applied
	pub fn inset(&self) -> Option<InsetStep> {
		self.inset
	}

	/// Mirror targets
	pub fn display_targets(&self) -> &[u64] {
		&self.display_targets
	}

	fn visible(&self, rect: Rect) -> Option<Rect> {
		let bounds = Rect::new(0, 0, self.frame.width() as i32, self.frame.height() as i32);
		let rect = rect.intersect(&bounds)?;
		match self.clip {
			Some(clip) => rect.intersect(&clip),
			None => Some(rect),
		}
	}
}

fn to_u8(v: f32) -> u8 {
	(v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
	let a = u32::from(src[3]);
	let mix = |s: u8, d: u8| ((u32::from(s) * a + u32::from(d) * (255 - a)) / 255) as u8;
	Rgba([mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2]), 255])
}

impl Renderer for CpuRenderer {
	fn size(&self) -> (i32, i32) {
		(self.frame.width() as i32, self.frame.height() as i32)
	}

	fn supports_npot(&self) -> bool {
		self.npot
	}

	fn upload(&mut self, image: &TextureImage, _params: TextureParams) -> Result<TextureId, PlayerError> {
		let (w, h) = image.pixels.dimensions();
		if !self.npot && !(w.is_power_of_two() && h.is_power_of_two()) {
			return Err(PlayerError::Renderer(format!("{w}x{h} texture needs NPOT support")));
		}

		let id = TextureId(self.next_id);
		self.next_id += 1;
		self.textures.insert(id, image.pixels.clone());
		self.stats.uploads += 1;
		Ok(id)
	}

	fn delete(&mut self, id: TextureId) {
		if self.textures.remove(&id).is_some() {
			self.stats.deletes += 1;
		}
	}

	fn set_clear_color(&mut self, rgba: [f32; 4]) {
		self.clear_color = Rgba(rgba.map(to_u8));
	}

	fn clear(&mut self, rect: Rect) {
		self.stats.clears += 1;
		let Some(rect) = self.visible(rect) else {
			return;
		};
		for y in rect.top..rect.bottom {
			for x in rect.left..rect.right {
				self.frame.put_pixel(x as u32, y as u32, self.clear_color);
			}
		}
	}

	fn draw(&mut self, id: TextureId, src: Rect, dst: Rect) {
		self.stats.draws += 1;
		let Some(texture) = self.textures.get(&id) else {
			log::warn!("draw with unknown texture {id:?}");
			return;
		};
		if src.is_empty() || dst.is_empty() {
			return;
		}
		let Some(visible) = self.visible(dst) else {
			return;
		};

		// Nearest-neighbour scaling of src into dst
		for y in visible.top..visible.bottom {
			let sy = i64::from(src.top)
				+ (i64::from(y) - i64::from(dst.top)) * i64::from(src.height()) / i64::from(dst.height());
			for x in visible.left..visible.right {
				let sx = i64::from(src.left)
					+ (i64::from(x) - i64::from(dst.left)) * i64::from(src.width()) / i64::from(dst.width());
				if sx < 0 || sy < 0 || sx >= i64::from(texture.width()) || sy >= i64::from(texture.height()) {
					continue;
				}
				let texel = *texture.get_pixel(sx as u32, sy as u32);
				let pixel = if self.blend {
					blend_over(*self.frame.get_pixel(x as u32, y as u32), texel)
				} else {
					texel
				};
				self.frame.put_pixel(x as u32, y as u32, pixel);
			}
		}
	}

	fn set_blend(&mut self, enabled: bool) {
		self.blend = enabled;
	}

	fn set_clip(&mut self, rect: Option<Rect>) {
		self.clip = rect;
	}

	fn present(&mut self) -> bool {
		if self.fail_after.is_some_and(|n| self.stats.presents >= n) {
			return false;
		}
		self.stats.presents += 1;
		true
	}

	fn apply_inset(&mut self, step: InsetStep) {
		self.inset = Some(step);
	}

	fn set_layer(&mut self, layer: i32) {
		self.layer = layer;
	}

	fn poll_resize(&mut self) -> Option<(i32, i32)> {
		self.pending_resize.take()
	}

	fn resize(&mut self, width: i32, height: i32) {
		log::debug!("resize {}x{} -> {width}x{height}", self.frame.width(), self.frame.height());
		self.frame = RgbaImage::from_pixel(width.max(0) as u32, height.max(0) as u32, self.clear_color);
	}

	fn set_display_targets(&mut self, ids: &[u64]) {
		self.display_targets = ids.to_vec();
	}
}
