//! Clock font glyph grid.
//!
//! The clock font is a single bitmap holding the printable ASCII range
//! (`' '` through `'~'` plus one spare cell) in 16 columns by 6 rows. Every
//! row is two glyph lines tall: regular weight on top, bold underneath.

/// Conventional entry name for the font inside a bundle
pub const CLOCK_FONT_ENTRY: &str = "clock_font.png";

/// First character present in the font
pub const FIRST_CHAR: u8 = b' ';

/// One past the last printable character
pub const LAST_CHAR: u8 = b'~' + 1;

/// Glyph columns
pub const COLUMNS: u32 = 16;

/// Glyph rows (each a regular plus a bold line)
pub const ROWS: u32 = (LAST_CHAR - FIRST_CHAR) as u32 / COLUMNS;

/// Replacement glyph for characters outside the font
pub const FALLBACK_CHAR: u8 = b'?';

/// Source rectangle of one glyph inside the font bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlyphRect {
	/// Left edge
	pub x: u32,
	/// Top edge
	pub y: u32,
	/// Width
	pub width: u32,
	/// Height
	pub height: u32,
}

/// Character cell geometry derived from the font bitmap size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontGrid {
	/// Width of one character cell
	pub char_width: u32,
	/// Height of one glyph line (half a grid row)
	pub char_height: u32,
}

impl FontGrid {
	/// Derives cell geometry from the bitmap dimensions.
	///
	/// Returns `None` when the bitmap is too small to hold a single glyph.
	pub fn from_size(width: u32, height: u32) -> Option<Self> {
		let char_width = width / COLUMNS;
		let char_height = height / ROWS / 2;
		if char_width == 0 || char_height == 0 {
			return None;
		}
		Some(Self {
			char_width,
			char_height,
		})
	}

	/// Width of a rendered string of `len` characters
	pub fn text_width(&self, len: usize) -> u32 {
		self.char_width * len as u32
	}

	/// Locates the glyph for `c`.
	///
	/// Characters outside the font map to `?`.
	pub fn glyph_rect(&self, c: char, bold: bool) -> GlyphRect {
		let code = match u8::try_from(c) {
			Ok(b) if (FIRST_CHAR..=LAST_CHAR).contains(&b) => b,
			_ => FALLBACK_CHAR,
		};
		let index = u32::from(code - FIRST_CHAR);
		let row = index / COLUMNS;
		let col = index % COLUMNS;

		let line = u32::from(bold);

		GlyphRect {
			x: col * self.char_width,
			y: (row * 2 + line) * self.char_height,
			width: self.char_width,
			height: self.char_height,
		}
	}
}
