//! `trim.txt` support.
//!
//! Each `\n` terminated line describes the visible rectangle of the frame at
//! the same index as `WIDTHxHEIGHT+X+Y`, in frame order.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static TRIM_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\s*([+-]?\d+)x\s*([+-]?\d+)\+\s*([+-]?\d+)\+\s*([+-]?\d+)")
		.unwrap_or_else(|e| unreachable!("{e}"))
});

/// Visible sub-rectangle of a frame, relative to the animation canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TrimRect {
	/// Visible width
	pub width: i32,
	/// Visible height
	pub height: i32,
	/// Left offset inside the canvas
	pub x: i32,
	/// Top offset inside the canvas
	pub y: i32,
}

impl TrimRect {
	/// Untrimmed rectangle covering the whole canvas
	pub fn full(width: i32, height: i32) -> Self {
		Self {
			width,
			height,
			x: 0,
			y: 0,
		}
	}

	/// Parses a single `WxH+X+Y` line
	pub fn parse(line: &str) -> Option<Self> {
		let caps = TRIM_RE.captures(line)?;
		Some(Self {
			width: caps[1].parse().ok()?,
			height: caps[2].parse().ok()?,
			x: caps[3].parse().ok()?,
			y: caps[4].parse().ok()?,
		})
	}
}

impl std::fmt::Display for TrimRect {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
	}
}

/// Anything carrying a trim rectangle
pub trait Trimmed {
	/// Replaces the trim rectangle
	fn set_trim(&mut self, trim: TrimRect);
}

/// Applies trim lines to `frames` in order.
///
/// Stops at the first malformed line, when lines run out, or when frames run
/// out. Returns how many frames were overridden.
pub fn apply_trim<T: Trimmed>(frames: &mut [T], text: &str) -> usize {
	let mut applied = 0;
	let mut rest = text;

	for frame in frames.iter_mut() {
		let Some(end) = rest.find('\n') else {
			break;
		};
		let line = &rest[..end];
		rest = &rest[end + 1..];

		match TrimRect::parse(line) {
			Some(trim) => {
				frame.set_trim(trim);
				applied += 1;
			}
			None => {
				log::error!("trim.txt: cannot parse line '{line}'");
				break;
			}
		}
	}

	applied
}
