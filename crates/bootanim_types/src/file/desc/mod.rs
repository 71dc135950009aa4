//! `desc.txt` animation descriptor support.
//!
//! The descriptor is line oriented. Only lines terminated by `\n` are read;
//! an unterminated trailing line is ignored.
//!
//! ```text
//! <width> <height> <fps>
//! <type> <count> <pause> <path> [#<RRGGBB> [<clockX> [<clockY>]]]
//! $SYSTEM
//! ```
//!
//! `type` is `p` for a regular part or `c` for a part that must play to
//! completion once started. `count` 0 repeats forever. `pause` is counted
//! in frames. `$SYSTEM` splices in the system default animation.

mod color;
mod position;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use color::parse_color;
pub use position::{ClockPosition, TextCoord, parse_position, parse_text_coord};

use super::error::{BundleError, FileType};

/// Longest part path kept from a descriptor line
pub const PATH_MAX: usize = 255;

/// Longest colour token (without the leading `#`)
pub const COLOR_LEN: usize = 6;

/// Longest clock position token
pub const TEXT_POS_LEN_MAX: usize = 16;

/// Marker line for the system animation
pub const SYSTEM_MARKER: &str = "$SYSTEM";

/// Part type character for play-until-complete parts
pub const COMPLETE_TYPE: char = 'c';

static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\s*([+-]?\d+)\s+([+-]?\d+)\s+([+-]?\d+)").unwrap_or_else(|e| unreachable!("{e}"))
});

static PART_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\s*(\S)\s*([+-]?\d+)\s+([+-]?\d+)").unwrap_or_else(|e| unreachable!("{e}"))
});

/// A part declared by a `desc.txt` line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartSpec {
	/// Directory inside the bundle holding the frames
	pub path: String,
	/// Repeat count, 0 means forever
	pub count: u32,
	/// Pause after each repeat, in frames
	pub pause: u32,
	/// Part ignores exit requests until its last repeat has played
	pub play_until_complete: bool,
	/// Background clear colour, normalized RGB
	pub background_color: [f32; 3],
	/// Clock placement
	pub clock_pos: ClockPosition,
}

/// One meaningful descriptor line after the header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PartLine {
	/// A part stored in this bundle
	Frames(PartSpec),
	/// `$SYSTEM`: the system default animation
	System,
}

/// Parsed `desc.txt`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Description {
	/// Declared frame width
	pub width: i32,
	/// Declared frame height
	pub height: i32,
	/// Declared frame rate
	pub fps: i32,
	/// Parts in declaration order
	pub parts: Vec<PartLine>,
}

impl Description {
	/// Parses a descriptor from raw bytes
	pub fn from_bytes(data: &[u8]) -> Result<Self, BundleError> {
		let text = std::str::from_utf8(data).map_err(|_| BundleError::BadEncoding {
			file_type: FileType::Desc,
		})?;
		Ok(Self::parse(text))
	}

	/// Parses descriptor text.
	///
	/// Malformed lines are skipped; a header line may appear more than once
	/// and the last one wins.
	pub fn parse(text: &str) -> Self {
		let mut desc = Self::default();

		let mut rest = text;
		while let Some(end) = rest.find('\n') {
			let line = &rest[..end];
			rest = &rest[end + 1..];
			desc.parse_line(line);
		}

		desc
	}

	fn parse_line(&mut self, line: &str) {
		if let Some((width, height, fps)) = parse_header(line) {
			log::trace!("desc: {width}x{height} @ {fps} fps");
			self.width = width;
			self.height = height;
			self.fps = fps;
		} else if let Some(part) = parse_part(line) {
			self.parts.push(PartLine::Frames(part));
		} else if line == SYSTEM_MARKER {
			self.parts.push(PartLine::System);
		}
	}

	/// Iterates over parts stored in this bundle
	pub fn frame_parts(&self) -> impl Iterator<Item = &PartSpec> {
		self.parts.iter().filter_map(|p| match p {
			PartLine::Frames(spec) => Some(spec),
			PartLine::System => None,
		})
	}
}

fn parse_header(line: &str) -> Option<(i32, i32, i32)> {
	let caps = HEADER_RE.captures(line)?;
	let width = caps[1].parse().ok()?;
	let height = caps[2].parse().ok()?;
	let fps = caps[3].parse().ok()?;
	Some((width, height, fps))
}

fn parse_part(line: &str) -> Option<PartSpec> {
	let caps = PART_RE.captures(line)?;
	let kind = caps[1].chars().next()?;
	let count: i32 = caps[2].parse().ok()?;
	let pause: i32 = caps[3].parse().ok()?;

	let tail = &line[caps.get(0)?.end()..];
	let (path, tail) = scan_token(tail, PATH_MAX);
	if path.is_empty() {
		return None;
	}

	let (Ok(count), Ok(pause)) = (u32::try_from(count), u32::try_from(pause)) else {
		log::warn!("desc: negative count/pause in '{line}', part skipped");
		return None;
	};

	// Optional tokens only follow a colour, like the rest of the line
	let (color, pos1, pos2) = match tail.trim_start().strip_prefix('#') {
		Some(after) => {
			let (color, after) = scan_token(after, COLOR_LEN);
			let (pos1, after) = scan_token(after, TEXT_POS_LEN_MAX);
			let (pos2, _) = scan_token(after, TEXT_POS_LEN_MAX);
			(color, pos1, pos2)
		}
		None => ("000000", "", ""),
	};

	let mut background_color = [0.0; 3];
	if !parse_color(color, &mut background_color) {
		log::error!("desc: invalid color '#{color}'");
		background_color = [0.0; 3];
	}

	Some(PartSpec {
		path: path.to_string(),
		count,
		pause,
		play_until_complete: kind == COMPLETE_TYPE,
		background_color,
		clock_pos: parse_position(pos1, pos2),
	})
}

/// Skips leading whitespace, then takes at most `max` non-whitespace chars.
fn scan_token(s: &str, max: usize) -> (&str, &str) {
	let s = s.trim_start();
	let end = s
		.char_indices()
		.take_while(|(_, c)| !c.is_whitespace())
		.take(max)
		.last()
		.map_or(0, |(i, c)| i + c.len_utf8());
	s.split_at(end)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn frames(desc: &Description) -> Vec<&PartSpec> {
		desc.frame_parts().collect()
	}

	#[test]
	fn test_header_and_parts() {
		let desc = Description::parse("480 800 30\np 1 0 part0\nc 0 5 part1 #102030\n");
		assert_eq!((desc.width, desc.height, desc.fps), (480, 800, 30));

		let parts = frames(&desc);
		assert_eq!(parts.len(), 2);
		assert_eq!(parts[0].path, "part0");
		assert_eq!(parts[0].count, 1);
		assert!(!parts[0].play_until_complete);
		assert_eq!(parts[0].background_color, [0.0; 3]);
		assert_eq!(parts[0].clock_pos, ClockPosition::MISSING);

		assert_eq!(parts[1].count, 0);
		assert_eq!(parts[1].pause, 5);
		assert!(parts[1].play_until_complete);
		assert_eq!(parts[1].background_color, [16.0 / 255.0, 32.0 / 255.0, 48.0 / 255.0]);
	}

	#[test]
	fn test_last_header_wins() {
		let desc = Description::parse("100 200 10\n480 800 30\n");
		assert_eq!((desc.width, desc.height, desc.fps), (480, 800, 30));
		assert!(desc.parts.is_empty());
	}

	#[test]
	fn test_header_ignores_trailing_tokens() {
		let desc = Description::parse("1080 1920 60 extra\n");
		assert_eq!((desc.width, desc.height, desc.fps), (1080, 1920, 60));
	}

	#[test]
	fn test_unterminated_line_is_ignored() {
		let desc = Description::parse("480 800 30\np 1 0 part0");
		assert_eq!(desc.fps, 30);
		assert!(desc.parts.is_empty());
	}

	#[test]
	fn test_empty_description_defaults_to_zero() {
		let desc = Description::parse("");
		assert_eq!((desc.width, desc.height, desc.fps), (0, 0, 0));
	}

	#[test]
	fn test_system_marker() {
		let desc = Description::parse("1 1 1\n$SYSTEM\np 1 0 a\n");
		assert_eq!(desc.parts[0], PartLine::System);
		assert!(matches!(desc.parts[1], PartLine::Frames(_)));
		// Marker must be the whole line
		let desc = Description::parse(" $SYSTEM\n");
		assert!(desc.parts.is_empty());
	}

	#[test]
	fn test_clock_position_follows_color() {
		let desc = Description::parse("p 0 0 part0 #ffffff c -40\np 0 0 part1 #000000 60\np 0 0 part2 10 20\n");
		let parts = frames(&desc);

		assert_eq!(parts[0].clock_pos.x, TextCoord::Center);
		assert_eq!(parts[0].clock_pos.y, TextCoord::Offset(-40));

		assert_eq!(parts[1].clock_pos.x, TextCoord::Center);
		assert_eq!(parts[1].clock_pos.y, TextCoord::Offset(60));

		// Without '#', trailing tokens are not a clock position
		assert_eq!(parts[2].clock_pos, ClockPosition::MISSING);
	}

	#[test_log::test]
	fn test_invalid_color_defaults_to_black() {
		let desc = Description::parse("p 1 0 part0 #12zz56\n");
		assert_eq!(frames(&desc)[0].background_color, [0.0; 3]);
	}

	#[test_log::test]
	fn test_negative_values_skip_line() {
		let desc = Description::parse("p -1 0 part0\np 1 -3 part1\np 2 0 part2\n");
		let parts = frames(&desc);
		assert_eq!(parts.len(), 1);
		assert_eq!(parts[0].path, "part2");
	}

	#[test]
	fn test_malformed_lines_are_skipped() {
		let desc = Description::parse("hello\np x 0 part0\np 1 0\n\n# comment\n");
		assert!(desc.parts.is_empty());
	}

	#[test]
	fn test_long_tokens_are_truncated() {
		let path = "d".repeat(300);
		let desc = Description::parse(&format!("p 1 0 {path}\n"));
		assert_eq!(frames(&desc)[0].path.len(), PATH_MAX);

		let (token, rest) = scan_token("  abcdefgh ij", 6);
		assert_eq!(token, "abcdef");
		assert_eq!(rest, "gh ij");
	}

	#[test]
	fn test_bytes_must_be_utf8() {
		assert!(Description::from_bytes(b"480 800 30\n").is_ok());
		assert!(matches!(
			Description::from_bytes(&[0xff, 0xfe, b'\n']),
			Err(BundleError::BadEncoding { .. })
		));
	}
}
