//! Boot video volume keys and persistence

use std::sync::Arc;

use bootanim_rs::{
	bootanim_player::{
		ControlEvent,
		properties::keys,
		video::{
			BootMode, KeyDecoder, VolumeCommand, VolumeController, VolumeState,
			input::codes::{KEY_MUTE, KEY_VOLUMEDOWN, KEY_VOLUMEUP, VALUE_PRESS, VALUE_RELEASE},
		},
	},
	prelude::*,
};

fn tap(decoder: &mut KeyDecoder, code: u16) -> Option<ControlEvent> {
	decoder.feed(code, VALUE_PRESS);
	decoder.feed(code, VALUE_RELEASE)
}

#[test]
fn test_keys_drive_volume_and_persist() {
	let props = Arc::new(MemoryProperties::new());
	props.set(keys::BOOT_VIDEO_VOLUME, "50");
	let mut volume = VolumeController::new(VolumeState::initial(props.as_ref(), 3070), props.clone());
	assert_eq!(volume.state(), VolumeState::Unmuted(50));

	let mut decoder = KeyDecoder::new();
	for code in [KEY_VOLUMEUP, KEY_VOLUMEUP, KEY_VOLUMEUP, KEY_MUTE, KEY_VOLUMEDOWN] {
		let event = tap(&mut decoder, code).expect("key fires");
		let command = VolumeCommand::from_event(event).expect("volume key");
		volume.apply(command, None);
		if command == VolumeCommand::Mute {
			assert_eq!(props.get_int(keys::BOOT_VIDEO_VOLUME, -1), 1053);
		}
	}

	assert_eq!(volume.state(), VolumeState::Unmuted(52));
	assert_eq!(props.get_int(keys::BOOT_VIDEO_VOLUME, -1), 52);
}

#[test]
fn test_vendor_value_selects_mode_and_first_boot_level() {
	let props = MemoryProperties::new();
	let vendor = 1035;
	assert_eq!(BootMode::from_vendor(vendor), BootMode::AnimationThenVideo);
	assert_eq!(VolumeState::initial(&props, vendor), VolumeState::Unmuted(35));
	assert_eq!(props.get_int(keys::BOOT_VIDEO_VOLUME, -1), 35);

	// A persisted muted level survives the next boot
	props.set(keys::BOOT_VIDEO_VOLUME, "1035");
	let state = VolumeState::initial(&props, vendor);
	assert!(state.is_muted());
	assert_eq!(state.apply(VolumeCommand::Up), VolumeState::Unmuted(36));
}
