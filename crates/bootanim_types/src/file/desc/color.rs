//! HTML-style `RRGGBB` colour parsing.

/// Parses a `RRGGBB` string into normalized RGB components.
///
/// Each hex pair becomes `value / 255.0`. On any malformed input the
/// function returns `false` and leaves `color` untouched.
///
/// ```
/// use bootanim_types::file::desc::parse_color;
///
/// let mut color = [0.5; 3];
/// assert!(parse_color("ff0080", &mut color));
/// assert_eq!(color, [1.0, 0.0, 128.0 / 255.0]);
///
/// assert!(!parse_color("ff00zz", &mut color));
/// assert_eq!(color, [1.0, 0.0, 128.0 / 255.0]);
/// ```
pub fn parse_color(s: &str, color: &mut [f32; 3]) -> bool {
	if s.len() != 6 {
		return false;
	}

	let Ok(bytes) = hex::decode(s) else {
		return false;
	};

	for (dst, value) in color.iter_mut().zip(bytes) {
		*dst = f32::from(value) / 255.0;
	}
	true
}
