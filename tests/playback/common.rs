//! Bundle builders shared by the playback tests

use std::{
	fs,
	io::Cursor,
	path::{Path, PathBuf},
};

use bootanim_rs::prelude::*;
use image::{ImageFormat, Rgba, RgbaImage};

/// Encodes a solid `w x h` PNG
pub(crate) fn png(w: u32, h: u32, color: [u8; 4]) -> Vec<u8> {
	let img = RgbaImage::from_pixel(w, h, Rgba(color));
	let mut out = Cursor::new(Vec::new());
	img.write_to(&mut out, ImageFormat::Png).unwrap();
	out.into_inner()
}

/// Encodes a short silent WAV
pub(crate) fn wav() -> Vec<u8> {
	let spec = hound::WavSpec {
		channels: 1,
		sample_rate: 8000,
		bits_per_sample: 16,
		sample_format: hound::SampleFormat::Int,
	};
	let mut out = Cursor::new(Vec::new());
	let mut writer = hound::WavWriter::new(&mut out, spec).unwrap();
	for _ in 0..80 {
		writer.write_sample(0i16).unwrap();
	}
	writer.finalize().unwrap();
	out.into_inner()
}

/// Scratch directory removed on drop
pub(crate) struct Scratch(pub(crate) PathBuf);

impl Scratch {
	pub(crate) fn new(tag: &str) -> Self {
		let dir = std::env::temp_dir().join(format!("bootanim-it-{tag}-{}", std::process::id()));
		let _ = fs::remove_dir_all(&dir);
		fs::create_dir_all(&dir).unwrap();
		Self(dir)
	}

	pub(crate) fn path(&self, name: &str) -> PathBuf {
		self.0.join(name)
	}

	/// Writes a bundle with `desc` and the given entries
	pub(crate) fn bundle(&self, name: &str, desc: &str, entries: &[(&str, Vec<u8>)]) -> PathBuf {
		let mut builder = ArchiveBuilder::new();
		builder.add(DESC_ENTRY, desc.as_bytes());
		for (entry, data) in entries {
			builder.add(*entry, data);
		}
		let path = self.path(name);
		builder.save_to_file(&path).unwrap();
		path
	}
}

impl Drop for Scratch {
	fn drop(&mut self) {
		let _ = fs::remove_dir_all(&self.0);
	}
}

/// Loader whose `$SYSTEM` resolves to `system`
pub(crate) fn loader(system: &Path) -> Loader {
	Loader::new(system)
}
