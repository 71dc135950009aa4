//! Display inset animation.
//!
//! Some panels hide a strip at the top. Once the animation is asked to stop,
//! the visible area is eased from full height down to the inset region over
//! 200 ms, then the projection is fixed to the final crop.

use std::{f64::consts::PI, time::Duration};

use crate::properties::{PropertyStore, keys};

/// Time to slide from no inset to the full inset
pub const INSET_DURATION: Duration = Duration::from_millis(200);

/// What the surface should do this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsetStep {
	/// Crop `top` rows from the surface
	Crop {
		/// Rows hidden at the top
		top: i32,
	},
	/// Move the surface up by `inset` rows and keep the crop permanently
	Finalize {
		/// Final inset
		inset: i32,
	},
}

/// Eases the top display inset in over [`INSET_DURATION`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsetAnimator {
	target: i32,
	current: i32,
	shutting_down: bool,
}

impl InsetAnimator {
	/// Creates an animator; the target is read lazily on first step
	pub fn new(shutting_down: bool) -> Self {
		Self {
			target: -1,
			current: 0,
			shutting_down,
		}
	}

	/// Inset target, -1 while unknown and 0 once finalized or disabled
	pub fn target(&self) -> i32 {
		self.target
	}

	/// Current inset
	pub fn current(&self) -> i32 {
		self.current
	}

	/// True once the inset reached its target
	pub fn is_settled(&self) -> bool {
		self.current >= self.target
	}

	/// Advances by one frame of length `timestep` on a surface of `height`
	/// rows. Returns `None` when nothing changes.
	pub fn step(&mut self, props: &dyn PropertyStore, height: i32, timestep: Duration) -> Option<InsetStep> {
		if self.shutting_down || self.target == 0 {
			return None;
		}

		if self.target < 0 {
			let max = i64::from(height / 2);
			self.target = props.get_int_in_range(keys::DISPLAY_INSET_TOP, -1, -1, max) as i32;
			if self.target <= 0 {
				return None;
			}
		}

		let step = if self.current < self.target {
			let fraction = f64::from(self.current) / f64::from(self.target);
			let eased = ((fraction + 1.0) * PI).cos() / 2.0 + 0.5;
			InsetStep::Crop {
				top: (eased * f64::from(self.target)) as i32,
			}
		} else {
			let inset = self.target;
			self.target = 0;
			self.current = 0;
			InsetStep::Finalize {
				inset,
			}
		};

		let delta = timestep.as_nanos() * self.target.max(0) as u128 / INSET_DURATION.as_nanos();
		self.current += delta as i32;

		Some(step)
	}
}
