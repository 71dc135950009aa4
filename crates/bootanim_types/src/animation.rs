//! Animation data model.
//!
//! An [`Animation`] owns its parts; a part either holds frames from the
//! bundle or wraps a whole nested animation (the `$SYSTEM` splice). The
//! tree never shares nodes.

use std::time::Duration;

use bytes::Bytes;

use crate::{
	audio::AudioClip,
	file::{
		DescError,
		desc::{ClockPosition, PartSpec},
		trim::{TrimRect, Trimmed},
	},
};

/// One image inside a part
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
	/// Entry file name (without the part directory)
	pub name: String,
	/// Encoded image bytes, sliced from the bundle
	pub data: Bytes,
	/// Visible region within the canvas
	pub trim: TrimRect,
}

impl Trimmed for Frame {
	fn set_trim(&mut self, trim: TrimRect) {
		self.trim = trim;
	}
}

/// What a part plays
#[derive(Debug, Clone, PartialEq)]
pub enum PartContent {
	/// Frames stored under the part directory, ordered by name
	Frames(Vec<Frame>),
	/// A complete animation loaded from another bundle
	Nested(Box<Animation>),
}

/// One section of an animation
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
	/// Directory inside the bundle (empty for nested parts)
	pub path: String,
	/// Repeat count, 0 repeats until exit
	pub count: u32,
	/// Frames to wait after each repeat
	pub pause: u32,
	/// Exit requests are ignored until the part finishes
	pub play_until_complete: bool,
	/// Normalized RGB background
	pub background_color: [f32; 3],
	/// Clock placement
	pub clock_pos: ClockPosition,
	/// Frames or nested animation
	pub content: PartContent,
	/// Optional sound played when the part starts
	pub audio: Option<AudioClip>,
}

impl Part {
	/// Creates an empty frame part from a descriptor line
	pub fn from_spec(spec: &PartSpec) -> Self {
		Self {
			path: spec.path.clone(),
			count: spec.count,
			pause: spec.pause,
			play_until_complete: spec.play_until_complete,
			background_color: spec.background_color,
			clock_pos: spec.clock_pos,
			content: PartContent::Frames(Vec::new()),
			audio: None,
		}
	}

	/// Creates a part that plays `animation` once
	pub fn nested(animation: Animation) -> Self {
		Self {
			path: String::new(),
			count: 1,
			pause: 0,
			play_until_complete: false,
			background_color: [0.0; 3],
			clock_pos: ClockPosition::MISSING,
			content: PartContent::Nested(Box::new(animation)),
			audio: None,
		}
	}

	/// Frames of a frame part; empty for nested parts
	pub fn frames(&self) -> &[Frame] {
		match &self.content {
			PartContent::Frames(frames) => frames,
			PartContent::Nested(_) => &[],
		}
	}

	/// Mutable frames of a frame part
	pub fn frames_mut(&mut self) -> Option<&mut Vec<Frame>> {
		match &mut self.content {
			PartContent::Frames(frames) => Some(frames),
			PartContent::Nested(_) => None,
		}
	}

	/// The wrapped animation, if any
	pub fn animation(&self) -> Option<&Animation> {
		match &self.content {
			PartContent::Nested(animation) => Some(animation),
			PartContent::Frames(_) => None,
		}
	}

	/// Inserts a frame keeping frames sorted by name.
	///
	/// A frame with the same name as an existing one replaces it.
	pub fn insert_frame(&mut self, frame: Frame) {
		let Some(frames) = self.frames_mut() else {
			return;
		};
		match frames.binary_search_by(|f| f.name.as_str().cmp(&frame.name)) {
			Ok(pos) => frames[pos] = frame,
			Err(pos) => frames.insert(pos, frame),
		}
	}

	/// Returns true for parts that repeat until exit
	pub fn is_infinite(&self) -> bool {
		self.count == 0
	}

	/// Returns true if the part declares a usable clock position
	pub fn has_clock(&self) -> bool {
		self.clock_pos.is_valid()
	}
}

/// A playable animation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Animation {
	/// Bundle the animation was loaded from
	pub file_name: String,
	/// Canvas width
	pub width: i32,
	/// Canvas height
	pub height: i32,
	/// Frames per second
	pub fps: i32,
	/// Parts in play order
	pub parts: Vec<Part>,
	/// Encoded `clock_font.png`, if the bundle carries one
	pub clock_font: Option<Bytes>,
}

impl Animation {
	/// Creates an animation with no parts
	pub fn new(file_name: impl Into<String>, width: i32, height: i32, fps: i32) -> Self {
		Self {
			file_name: file_name.into(),
			width,
			height,
			fps,
			parts: Vec::new(),
			clock_font: None,
		}
	}

	/// Time budget of one frame, `1s / fps` truncated to whole nanoseconds
	pub fn frame_duration(&self) -> Duration {
		match u32::try_from(self.fps) {
			Ok(fps) if fps > 0 => Duration::from_secs(1) / fps,
			_ => Duration::ZERO,
		}
	}

	/// Checks the rules playback relies on
	pub fn validate(&self) -> Result<(), DescError> {
		if self.fps <= 0 {
			return Err(DescError::ZeroFps(self.fps));
		}
		if let Some(part) = self.parts.iter().find(|p| p.play_until_complete && p.is_infinite()) {
			return Err(DescError::UnboundedCompletePart {
				path: part.path.clone(),
			});
		}
		Ok(())
	}

	/// Returns true if any part, nested ones included, wants a clock
	pub fn wants_clock(&self) -> bool {
		self.parts.iter().any(|p| match &p.content {
			PartContent::Frames(_) => p.has_clock(),
			PartContent::Nested(inner) => inner.wants_clock(),
		})
	}

	/// Total number of frames across all parts, nested ones included
	pub fn frame_count(&self) -> usize {
		self.parts
			.iter()
			.map(|p| match &p.content {
				PartContent::Frames(frames) => frames.len(),
				PartContent::Nested(inner) => inner.frame_count(),
			})
			.sum()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::desc::TextCoord;

	fn frame(name: &str) -> Frame {
		Frame {
			name: name.to_string(),
			data: Bytes::new(),
			trim: TrimRect::full(10, 10),
		}
	}

	fn spec(path: &str, count: u32, complete: bool) -> PartSpec {
		PartSpec {
			path: path.to_string(),
			count,
			pause: 0,
			play_until_complete: complete,
			background_color: [0.0; 3],
			clock_pos: ClockPosition::MISSING,
		}
	}

	#[test]
	fn test_frames_sorted_by_name() {
		let mut part = Part::from_spec(&spec("part0", 1, false));
		for name in ["002.png", "000.png", "001.png", "000.png"] {
			part.insert_frame(frame(name));
		}
		let names: Vec<_> = part.frames().iter().map(|f| f.name.as_str()).collect();
		assert_eq!(names, ["000.png", "001.png", "002.png"]);
	}

	#[test]
	fn test_frame_duration_truncates() {
		assert_eq!(Animation::new("a", 1, 1, 30).frame_duration(), Duration::from_nanos(33_333_333));
		assert_eq!(Animation::new("a", 1, 1, 10).frame_duration(), Duration::from_millis(100));
		assert_eq!(Animation::new("a", 1, 1, 0).frame_duration(), Duration::ZERO);
	}

	#[test]
	fn test_validate_rules() {
		let mut anim = Animation::new("a", 480, 800, 0);
		assert_eq!(anim.validate(), Err(DescError::ZeroFps(0)));

		anim.fps = 30;
		anim.parts.push(Part::from_spec(&spec("part0", 0, false)));
		assert_eq!(anim.validate(), Ok(()));

		anim.parts.push(Part::from_spec(&spec("part1", 0, true)));
		assert_eq!(
			anim.validate(),
			Err(DescError::UnboundedCompletePart {
				path: "part1".to_string()
			})
		);
	}

	#[test]
	fn test_nested_parts() {
		let mut inner = Animation::new("system", 10, 10, 5);
		let mut part = Part::from_spec(&spec("p", 1, false));
		part.clock_pos = ClockPosition {
			x: TextCoord::Center,
			y: TextCoord::Offset(5),
		};
		part.insert_frame(frame("a.png"));
		inner.parts.push(part);

		let mut outer = Animation::new("boot", 10, 10, 5);
		outer.parts.push(Part::nested(inner));

		let nested = &outer.parts[0];
		assert!(nested.frames().is_empty());
		assert_eq!(nested.count, 1);
		assert!(nested.animation().is_some());
		assert!(outer.wants_clock());
		assert_eq!(outer.frame_count(), 1);
	}
}
