//! Benchmark helper utilities for bootanim-rs
//!
//! This module generates synthetic descriptors and bundles so the benches
//! do not depend on files from a device image.

use std::io::Cursor;

use bootanim_types::file::{ArchiveBuilder, DESC_ENTRY};
use image::{ImageFormat, Rgba, RgbaImage};

/// Generates a descriptor with `parts` parts, every fourth one with a clock
pub fn generate_desc(width: u32, height: u32, fps: u32, parts: usize) -> String {
	let mut desc = format!("{width} {height} {fps}\n");
	for i in 0..parts {
		let kind = if i + 1 == parts {
			'c'
		} else {
			'p'
		};
		desc.push_str(&format!("{kind} {} 0 part{i} #{:06x}", i % 3 + 1, i * 0x10_1010 % 0xff_ffff));
		if i % 4 == 0 {
			desc.push_str(" c -40");
		}
		desc.push('\n');
	}
	desc
}

/// Encodes a solid PNG frame
pub fn generate_frame(width: u32, height: u32, shade: u8) -> Vec<u8> {
	let img = RgbaImage::from_pixel(width, height, Rgba([shade, shade, shade, 255]));
	let mut out = Cursor::new(Vec::new());
	// Writing into memory cannot fail for a valid buffer
	let _ = img.write_to(&mut out, ImageFormat::Png);
	out.into_inner()
}

/// Builds a stored bundle of `parts` parts with `frames` frames each
pub fn generate_bundle(width: u32, height: u32, parts: usize, frames: usize) -> Vec<u8> {
	let mut builder = ArchiveBuilder::new();
	builder.add(DESC_ENTRY, generate_desc(width, height, 30, parts).as_bytes());

	let frame = generate_frame(width, height, 0x80);
	let mut trim = String::new();
	for j in 0..frames {
		trim.push_str(&format!("{width}x{height}+0+{j}\n"));
	}
	for i in 0..parts {
		builder.add(format!("part{i}/"), &[]);
		for j in 0..frames {
			builder.add(format!("part{i}/{j:05}.png"), &frame);
		}
		builder.add(format!("part{i}/trim.txt"), trim.as_bytes());
	}
	builder.to_bytes().unwrap_or_default()
}

/// Common benchmark sizes
pub mod sizes {
	/// Small bundle: 2 parts of 10 frames
	pub const SMALL: (usize, usize) = (2, 10);
	/// Typical phone bundle: 3 parts of 60 frames
	pub const TYPICAL: (usize, usize) = (3, 60);
	/// Large bundle: 8 parts of 120 frames
	pub const LARGE: (usize, usize) = (8, 120);
}

#[cfg(test)]
mod tests {
	use bootanim_types::file::{Archive, Description};

	use super::*;

	#[test]
	fn test_generate_desc() {
		let desc = Description::parse(&generate_desc(480, 800, 30, 5));
		assert_eq!((desc.width, desc.height, desc.fps), (480, 800, 30));
		assert_eq!(desc.parts.len(), 5);
	}

	#[test]
	fn test_generate_bundle() {
		let (parts, frames) = sizes::SMALL;
		let archive = Archive::from_bytes(generate_bundle(16, 16, parts, frames).into()).unwrap();
		// desc + per part: dir, frames, trim
		assert_eq!(archive.len(), 1 + parts * (frames + 2));
	}
}
