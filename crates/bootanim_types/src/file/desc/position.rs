//! Clock position parsing.
//!
//! A coordinate is either `c` (centre on that axis), a non-negative offset
//! from the top/left edge, or a negative offset measured from the
//! bottom/right edge.

use serde::{Deserialize, Serialize};

/// One clock coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextCoord {
	/// Not specified; the part draws no clock
	#[default]
	Missing,
	/// Centred on the axis
	Center,
	/// Pixel offset; negative values count from the far edge
	Offset(i32),
}

impl TextCoord {
	/// Returns true unless the coordinate is [`TextCoord::Missing`]
	pub fn is_present(self) -> bool {
		!matches!(self, Self::Missing)
	}

	/// Resolves the coordinate against a canvas dimension.
	///
	/// `extent` is the size of the drawn item along the same axis.
	/// Returns `None` for a missing coordinate.
	pub fn resolve(self, canvas: i32, extent: i32) -> Option<i32> {
		match self {
			Self::Missing => None,
			Self::Center => Some((canvas - extent) / 2),
			Self::Offset(v) if v < 0 => Some(canvas + v - extent),
			Self::Offset(v) => Some(v),
		}
	}
}

impl std::fmt::Display for TextCoord {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Missing => write!(f, "-"),
			Self::Center => write!(f, "c"),
			Self::Offset(v) => write!(f, "{v}"),
		}
	}
}

/// Where a part draws the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ClockPosition {
	/// Horizontal coordinate
	pub x: TextCoord,
	/// Vertical coordinate
	pub y: TextCoord,
}

impl ClockPosition {
	/// Position with both coordinates missing
	pub const MISSING: Self = Self {
		x: TextCoord::Missing,
		y: TextCoord::Missing,
	};

	/// Returns true when both coordinates are present
	pub fn is_valid(&self) -> bool {
		self.x.is_present() && self.y.is_present()
	}
}

/// Parses a single coordinate token.
///
/// Accepts `c`, or an integer in C `strtol` base-0 notation (decimal, `0x`
/// hexadecimal, leading-`0` octal) that spans the whole token. Values that
/// do not fit an `i32`, and the `i32` extremes themselves, are rejected.
pub fn parse_text_coord(s: &str) -> Option<TextCoord> {
	if s == "c" {
		return Some(TextCoord::Center);
	}

	let value = parse_c_long(s)?;
	let value = i32::try_from(value).ok()?;
	if value == i32::MAX || value == i32::MIN {
		return None;
	}
	Some(TextCoord::Offset(value))
}

/// Parses a pair of clock position tokens.
///
/// * both empty: both coordinates missing
/// * exactly one non-empty: that value is `y` and `x` is centred
/// * both non-empty: `(x, y)`
///
/// Any parse failure yields [`ClockPosition::MISSING`].
pub fn parse_position(first: &str, second: &str) -> ClockPosition {
	let parsed = match (first.is_empty(), second.is_empty()) {
		(true, true) => None,
		(false, true) => parse_text_coord(first).map(|y| (TextCoord::Center, y)),
		(true, false) => parse_text_coord(second).map(|y| (TextCoord::Center, y)),
		(false, false) => parse_text_coord(first).zip(parse_text_coord(second)),
	};

	match parsed {
		Some((x, y)) => ClockPosition {
			x,
			y,
		},
		None => ClockPosition::MISSING,
	}
}

fn parse_c_long(s: &str) -> Option<i64> {
	let (negative, body) = match s.as_bytes().first()? {
		b'-' => (true, &s[1..]),
		b'+' => (false, &s[1..]),
		_ => (false, s),
	};

	let (radix, digits) = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
		(16, hex)
	} else if body.len() > 1 && body.starts_with('0') {
		(8, &body[1..])
	} else {
		(10, body)
	};

	if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
		return None;
	}

	let magnitude = i64::from_str_radix(digits, radix).ok()?;
	Some(if negative {
		-magnitude
	} else {
		magnitude
	})
}
