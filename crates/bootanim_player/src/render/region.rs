/// Axis aligned rectangle, `right` and `bottom` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
	/// Left edge
	pub left: i32,
	/// Top edge
	pub top: i32,
	/// Right edge, exclusive
	pub right: i32,
	/// Bottom edge, exclusive
	pub bottom: i32,
}

impl Rect {
	/// Rectangle from its edges
	pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
		Self {
			left,
			top,
			right,
			bottom,
		}
	}

	/// Rectangle from origin and size, saturating at the `i32` range
	pub const fn from_size(x: i32, y: i32, width: i32, height: i32) -> Self {
		Self::new(x, y, x.saturating_add(width), y.saturating_add(height))
	}

	/// Width, zero when inverted
	pub fn width(&self) -> i32 {
		self.right.saturating_sub(self.left).max(0)
	}

	/// Height, zero when inverted
	pub fn height(&self) -> i32 {
		self.bottom.saturating_sub(self.top).max(0)
	}

	/// True when the rectangle covers no pixel
	pub fn is_empty(&self) -> bool {
		self.width() == 0 || self.height() == 0
	}

	/// Overlap of two rectangles
	pub fn intersect(&self, other: &Self) -> Option<Self> {
		let r = Self::new(
			self.left.max(other.left),
			self.top.max(other.top),
			self.right.min(other.right),
			self.bottom.min(other.bottom),
		);
		(!r.is_empty()).then_some(r)
	}

	/// Whether `(x, y)` lies inside
	pub fn contains(&self, x: i32, y: i32) -> bool {
		x >= self.left && x < self.right && y >= self.top && y < self.bottom
	}
}

/// Set of non-overlapping rectangles
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Region {
	rects: Vec<Rect>,
}

impl Region {
	/// Region made of a single rectangle
	pub fn from_rect(rect: Rect) -> Self {
		let rects = if rect.is_empty() {
			Vec::new()
		} else {
			vec![rect]
		};
		Self {
			rects,
		}
	}

	/// Removes `hole` from every rectangle.
	///
	/// Each rectangle splits into at most four bands: full-width bands above
	/// and below the hole, and side bands level with it.
	pub fn subtract(&self, hole: Rect) -> Self {
		let mut rects = Vec::with_capacity(self.rects.len() * 4);

		for rect in &self.rects {
			let Some(cut) = rect.intersect(&hole) else {
				rects.push(*rect);
				continue;
			};

			let bands = [
				Rect::new(rect.left, rect.top, rect.right, cut.top),
				Rect::new(rect.left, cut.bottom, rect.right, rect.bottom),
				Rect::new(rect.left, cut.top, cut.left, cut.bottom),
				Rect::new(cut.right, cut.top, rect.right, cut.bottom),
			];
			rects.extend(bands.into_iter().filter(|r| !r.is_empty()));
		}

		Self {
			rects,
		}
	}

	/// Rectangles of the region
	pub fn rects(&self) -> &[Rect] {
		&self.rects
	}

	/// Covered pixel count
	pub fn area(&self) -> i64 {
		self.rects.iter().map(|r| i64::from(r.width()) * i64::from(r.height())).sum()
	}

	/// True when the region covers nothing
	pub fn is_empty(&self) -> bool {
		self.rects.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_subtract_centre_hole() {
		let screen = Region::from_rect(Rect::new(0, 0, 100, 100));
		let hole = Rect::new(25, 25, 75, 75);
		let outside = screen.subtract(hole);
		assert_eq!(outside.rects().len(), 4);
		assert_eq!(outside.area(), 100 * 100 - 50 * 50);
		for r in outside.rects() {
			assert!(r.intersect(&hole).is_none());
		}
	}

	#[test]
	fn test_subtract_partial_and_disjoint() {
		let screen = Region::from_rect(Rect::new(0, 0, 100, 100));
		let outside = screen.subtract(Rect::new(-10, -10, 50, 100));
		assert_eq!(outside.rects(), &[Rect::new(50, 0, 100, 100)]);

		let outside = screen.subtract(Rect::new(200, 200, 300, 300));
		assert_eq!(outside.rects(), &[Rect::new(0, 0, 100, 100)]);

		assert!(screen.subtract(Rect::new(0, 0, 100, 100)).is_empty());
	}

	#[test]
	fn test_rect_helpers() {
		let r = Rect::from_size(10, 20, 30, 40);
		assert_eq!((r.width(), r.height()), (30, 40));
		assert!(r.contains(10, 20));
		assert!(!r.contains(40, 20));
		assert!(Rect::new(5, 5, 5, 10).is_empty());
		assert!(Region::from_rect(Rect::default()).is_empty());
	}

	#[test]
	fn test_extreme_sizes_saturate() {
		let r = Rect::from_size(i32::MAX, 0, 8, 8);
		assert_eq!(r, Rect::new(i32::MAX, 0, i32::MAX, 8));
		assert!(r.is_empty());

		let r = Rect::from_size(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
		assert_eq!((r.right, r.width()), (-1, i32::MAX));
		assert_eq!(Rect::new(i32::MIN, 0, i32::MAX, 1).width(), i32::MAX);

		let screen = Region::from_rect(Rect::new(0, 0, 16, 16));
		assert_eq!(screen.subtract(Rect::from_size(i32::MAX, i32::MAX, i32::MAX, i32::MAX)), screen);
	}
}
