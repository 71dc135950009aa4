//! Boot video volume state and its persisted form.

use std::sync::Arc;

use super::media::MediaPlayer;
use crate::{
	control::ControlEvent,
	properties::{PropertyStore, keys},
};

/// Highest volume level
pub const VOLUME_MAX: u32 = 100;

/// Added to the saved level when persisting a muted state
pub const MUTE_OFFSET: i64 = 1000;

/// Overlay frame index shown while muted
pub const MUTED_INDEX: usize = VOLUME_MAX as usize + 1;

/// A volume key action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeCommand {
	/// One step louder, unmuting first
	Up,
	/// One step quieter, unmuting first
	Down,
	/// Toggle mute
	Mute,
}

impl VolumeCommand {
	/// Command carried by a control event
	pub fn from_event(event: ControlEvent) -> Option<Self> {
		match event {
			ControlEvent::VolumeUp => Some(Self::Up),
			ControlEvent::VolumeDown => Some(Self::Down),
			ControlEvent::Mute => Some(Self::Mute),
			ControlEvent::ExitRequested => None,
		}
	}
}

/// Volume level, remembering the level while muted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeState {
	/// Playing at this level
	Unmuted(u32),
	/// Silent; the level to restore
	Muted(u32),
}

impl Default for VolumeState {
	fn default() -> Self {
		Self::Unmuted(VOLUME_MAX / 2)
	}
}

impl VolumeState {
	/// Applies a key action
	pub fn apply(self, command: VolumeCommand) -> Self {
		match (command, self) {
			(VolumeCommand::Up, Self::Unmuted(level) | Self::Muted(level)) => {
				Self::Unmuted((level + 1).min(VOLUME_MAX))
			}
			(VolumeCommand::Down, Self::Unmuted(level) | Self::Muted(level)) => {
				Self::Unmuted(level.saturating_sub(1))
			}
			(VolumeCommand::Mute, Self::Unmuted(level)) => Self::Muted(level),
			(VolumeCommand::Mute, Self::Muted(level)) => Self::Unmuted(level),
		}
	}

	/// Persisted value: the level, plus [`MUTE_OFFSET`] when muted
	pub fn encode(self) -> i64 {
		match self {
			Self::Unmuted(level) => i64::from(level),
			Self::Muted(level) => i64::from(level) + MUTE_OFFSET,
		}
	}

	/// Reads a persisted value
	pub fn decode(value: i64) -> Self {
		let level = clamp_level(value % MUTE_OFFSET);
		if value / MUTE_OFFSET != 0 {
			Self::Muted(level)
		} else {
			Self::Unmuted(level)
		}
	}

	/// State at start-up.
	///
	/// Reads the persisted property; on first boot (unset or -1) the level
	/// comes from the vendor configuration value and is persisted.
	pub fn initial(props: &dyn PropertyStore, vendor_value: i64) -> Self {
		match props.get_int(keys::BOOT_VIDEO_VOLUME, -1) {
			-1 => {
				let state = Self::Unmuted(clamp_level(vendor_value % MUTE_OFFSET));
				props.set_int(keys::BOOT_VIDEO_VOLUME, state.encode());
				state
			}
			persisted => Self::decode(persisted),
		}
	}

	/// Whether the video is silent
	pub fn is_muted(self) -> bool {
		matches!(self, Self::Muted(_))
	}

	/// Player gain in `0.0..=1.0`
	pub fn gain(self) -> f32 {
		match self {
			Self::Unmuted(level) => level as f32 / VOLUME_MAX as f32,
			Self::Muted(_) => 0.0,
		}
	}

	/// Overlay frame to show: the level, or [`MUTED_INDEX`]
	pub fn overlay_index(self) -> usize {
		match self {
			Self::Unmuted(level) => level as usize,
			Self::Muted(_) => MUTED_INDEX,
		}
	}
}

fn clamp_level(value: i64) -> u32 {
	value.clamp(0, i64::from(VOLUME_MAX)) as u32
}

/// Applies volume commands, keeping the player and the property in sync
pub struct VolumeController {
	state: VolumeState,
	props: Arc<dyn PropertyStore>,
}

impl std::fmt::Debug for VolumeController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("VolumeController").field("state", &self.state).finish_non_exhaustive()
	}
}

impl VolumeController {
	/// Creates a controller starting at `state`
	pub fn new(state: VolumeState, props: Arc<dyn PropertyStore>) -> Self {
		Self {
			state,
			props,
		}
	}

	/// Current state
	pub fn state(&self) -> VolumeState {
		self.state
	}

	/// Applies `command`, updates the player gain and persists the result
	pub fn apply(&mut self, command: VolumeCommand, player: Option<&mut dyn MediaPlayer>) -> VolumeState {
		self.state = self.state.apply(command);
		if let Some(player) = player {
			player.set_volume(self.state.gain());
		}
		self.props.set_int(keys::BOOT_VIDEO_VOLUME, self.state.encode());
		log::debug!("volume {command:?} -> {:?}", self.state);
		self.state
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::properties::MemoryProperties;

	#[test]
	fn test_key_sequence() {
		let mut state = VolumeState::Unmuted(50);
		for command in [VolumeCommand::Up, VolumeCommand::Up, VolumeCommand::Up, VolumeCommand::Mute, VolumeCommand::Down]
		{
			state = state.apply(command);
		}
		assert_eq!(state, VolumeState::Unmuted(52));
	}

	#[test]
	fn test_limits() {
		assert_eq!(VolumeState::Unmuted(100).apply(VolumeCommand::Up), VolumeState::Unmuted(100));
		assert_eq!(VolumeState::Unmuted(0).apply(VolumeCommand::Down), VolumeState::Unmuted(0));
		assert_eq!(VolumeState::Muted(7).apply(VolumeCommand::Mute), VolumeState::Unmuted(7));
		assert_eq!(VolumeState::Muted(7).apply(VolumeCommand::Up), VolumeState::Unmuted(8));
	}

	#[test]
	fn test_persisted_form() {
		assert_eq!(VolumeState::Muted(40).encode(), 1040);
		assert_eq!(VolumeState::decode(1040), VolumeState::Muted(40));
		assert_eq!(VolumeState::decode(75), VolumeState::Unmuted(75));
		assert_eq!(VolumeState::decode(999), VolumeState::Unmuted(100));
		assert_eq!(VolumeState::Muted(40).overlay_index(), MUTED_INDEX);
		assert_eq!(VolumeState::Unmuted(40).overlay_index(), 40);
		assert!((VolumeState::Unmuted(25).gain() - 0.25).abs() < f32::EPSILON);
		assert_eq!(VolumeState::Muted(25).gain(), 0.0);
	}

	#[test]
	fn test_initial_state() {
		let props = MemoryProperties::new();
		assert_eq!(VolumeState::initial(&props, 2060), VolumeState::Unmuted(60));
		assert_eq!(props.get(keys::BOOT_VIDEO_VOLUME).as_deref(), Some("60"));

		props.set(keys::BOOT_VIDEO_VOLUME, "1030");
		assert_eq!(VolumeState::initial(&props, 2060), VolumeState::Muted(30));
	}

	#[test]
	fn test_controller_persists() {
		let props = Arc::new(MemoryProperties::new());
		let mut volume = VolumeController::new(VolumeState::Unmuted(10), props.clone());
		volume.apply(VolumeCommand::Mute, None);
		assert_eq!(props.get_int(keys::BOOT_VIDEO_VOLUME, -1), 1010);
		volume.apply(VolumeCommand::Up, None);
		assert_eq!(props.get_int(keys::BOOT_VIDEO_VOLUME, -1), 11);
		assert_eq!(volume.state(), VolumeState::Unmuted(11));
	}
}
