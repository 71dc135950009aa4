//! Decoded frame images and the per-playback texture cache.

use std::collections::HashMap;

use bootanim_types::animation::Frame;
use image::RgbaImage;

use crate::{
	error::PlayerError,
	render::{Rect, Renderer},
};

/// Handle to a texture owned by a [`Renderer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
	/// Nearest texel
	Nearest,
	/// Bilinear
	#[default]
	Linear,
}

/// Texture coordinate wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Wrap {
	/// Repeat outside `[0, 1]`
	#[default]
	Repeat,
	/// Clamp to the edge texel
	ClampToEdge,
}

/// Sampling parameters for an upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureParams {
	/// Minification filter
	pub min_filter: Filter,
	/// Magnification filter
	pub mag_filter: Filter,
	/// Wrap mode on both axes
	pub wrap: Wrap,
}

impl TextureParams {
	/// Nearest filtering, used for fonts and the fallback logo
	pub const NEAREST: Self = Self {
		min_filter: Filter::Nearest,
		mag_filter: Filter::Nearest,
		wrap: Wrap::Repeat,
	};
}

/// RGBA8 image ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
	/// Pixels, possibly padded to a power of two
	pub pixels: RgbaImage,
	/// Real image width
	pub width: u32,
	/// Real image height
	pub height: u32,
}

impl TextureImage {
	/// Decodes an encoded image.
	///
	/// Without NPOT support the pixels are padded to the next power of two
	/// on each axis; [`TextureImage::crop`] still covers the real image.
	pub fn decode(data: &[u8], npot: bool) -> Result<Self, PlayerError> {
		let image = image::load_from_memory(data)?.to_rgba8();
		Ok(Self::from_rgba(image, npot))
	}

	/// Wraps already decoded pixels
	pub fn from_rgba(image: RgbaImage, npot: bool) -> Self {
		let (width, height) = image.dimensions();
		let (tw, th) = (width.next_power_of_two(), height.next_power_of_two());

		let pixels = if npot || (tw == width && th == height) {
			image
		} else {
			let mut padded = RgbaImage::new(tw, th);
			image::imageops::replace(&mut padded, &image, 0, 0);
			padded
		};

		Self {
			pixels,
			width,
			height,
		}
	}

	/// Region of the texture holding the real image
	pub fn crop(&self) -> Rect {
		Rect::from_size(0, 0, self.width as i32, self.height as i32)
	}
}

/// A texture handed out by [`TextureCache::acquire`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedTexture {
	/// Texture handle
	pub id: TextureId,
	/// Real image area inside the texture
	pub crop: Rect,
	/// Delete after presenting; the cache does not own it
	pub transient: bool,
}

/// Textures of one animation playback, keyed by `(part, frame)`
#[derive(Debug, Default)]
pub struct TextureCache {
	textures: HashMap<(usize, usize), (TextureId, Rect)>,
}

impl TextureCache {
	/// Creates an empty cache
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the texture for a frame.
	///
	/// On the first repeat (`repeat == 0`) the frame is decoded and
	/// uploaded; when `keep` is set (the part loops) the texture is cached
	/// and reused by later repeats. Without `keep` the returned texture is
	/// transient and must be deleted by the caller once presented.
	pub fn acquire(
		&mut self,
		renderer: &mut dyn Renderer,
		key: (usize, usize),
		frame: &Frame,
		repeat: u32,
		keep: bool,
	) -> Result<CachedTexture, PlayerError> {
		if repeat > 0
			&& let Some(&(id, crop)) = self.textures.get(&key)
		{
			return Ok(CachedTexture {
				id,
				crop,
				transient: false,
			});
		}

		let image = TextureImage::decode(&frame.data, renderer.supports_npot())?;
		let crop = image.crop();
		let id = renderer.upload(&image, TextureParams::default())?;

		if keep {
			if let Some((old, _)) = self.textures.insert(key, (id, crop)) {
				renderer.delete(old);
			}
		}

		Ok(CachedTexture {
			id,
			crop,
			transient: !keep,
		})
	}

	/// Deletes every texture of `part`
	pub fn release_part(&mut self, renderer: &mut dyn Renderer, part: usize) {
		self.textures.retain(|&(p, _), (id, _)| {
			if p == part {
				renderer.delete(*id);
				false
			} else {
				true
			}
		});
	}

	/// Deletes every cached texture
	pub fn release_all(&mut self, renderer: &mut dyn Renderer) {
		for (_, (id, _)) in self.textures.drain() {
			renderer.delete(id);
		}
	}

	/// Number of cached textures
	pub fn len(&self) -> usize {
		self.textures.len()
	}

	/// True when nothing is cached
	pub fn is_empty(&self) -> bool {
		self.textures.is_empty()
	}
}
