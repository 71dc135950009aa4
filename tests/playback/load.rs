//! Bundle loading through the public API

use bootanim_rs::{bootanim_player::LoadError, prelude::*};

use crate::common::{Scratch, loader, png, wav};

#[test_log::test]
fn test_minimal_bundle_loads() {
	let dir = Scratch::new("minimal");
	let path = dir.bundle("boot.zip", "480 800 30\np 1 0 part0\n", &[("part0/000.png", png(480, 800, [9, 9, 9, 255]))]);

	let animation = loader(&dir.path("system.zip")).load(&path).unwrap();
	assert_eq!((animation.width, animation.height, animation.fps), (480, 800, 30));
	assert_eq!(animation.parts.len(), 1);
	assert_eq!(animation.parts[0].frames().len(), 1);
	assert_eq!(animation.parts[0].frames()[0].trim, TrimRect::full(480, 800));
	assert!(animation.clock_font.is_none());
	assert!(!animation.wants_clock());
}

#[test_log::test]
fn test_system_reference_cycle_is_cut() {
	let dir = Scratch::new("cycle");
	let system = dir.bundle("system.zip", "8 8 10\np 1 0 sys\n$SYSTEM\n", &[("sys/000.png", png(8, 8, [1, 2, 3, 255]))]);
	let boot = dir.bundle("boot.zip", "8 8 10\n$SYSTEM\np 1 0 own\n", &[("own/000.png", png(8, 8, [4, 5, 6, 255]))]);

	let mut loader = loader(&system);
	let animation = loader.load(&boot).unwrap();
	assert_eq!(animation.parts.len(), 2);

	let nested = animation.parts[0].animation().expect("nested system part");
	// The system bundle's own $SYSTEM line points back into itself
	assert_eq!(nested.parts.len(), 1);
	assert_eq!(nested.parts[0].path, "sys");
	assert_eq!(loader.in_progress().count(), 0);
}

#[test_log::test]
fn test_loading_twice_gives_equal_animations() {
	let dir = Scratch::new("twice");
	let path = dir.bundle(
		"boot.zip",
		"16 16 24\np 0 2 loop #102030\nc 1 0 end\n",
		&[
			("loop/000.png", png(16, 16, [255, 0, 0, 255])),
			("loop/001.png", png(16, 16, [0, 255, 0, 255])),
			("loop/audio.wav", wav()),
			("loop/trim.txt", b"8x8+4+4\n".to_vec()),
			("end/000.png", png(16, 16, [0, 0, 255, 255])),
		],
	);

	let mut loader = loader(&dir.path("system.zip"));
	let first = loader.load(&path).unwrap();
	let second = loader.load(&path).unwrap();
	assert_eq!(first, second);

	let looping = &first.parts[0];
	assert!(looping.is_infinite());
	assert_eq!(looping.pause, 2);
	assert!(looping.audio.is_some());
	assert_eq!(
		looping.frames()[0].trim,
		TrimRect {
			width: 8,
			height: 8,
			x: 4,
			y: 4,
		}
	);
	assert_eq!(looping.frames()[1].trim, TrimRect::full(16, 16));
	assert!(first.parts[1].play_until_complete);
}

#[test]
fn test_bundle_without_descriptor_is_rejected() {
	let dir = Scratch::new("nodesc");
	let mut builder = ArchiveBuilder::new();
	builder.add("part0/000.png", &png(4, 4, [0, 0, 0, 255]));
	let path = dir.path("boot.zip");
	builder.save_to_file(&path).unwrap();

	let err = loader(&dir.path("system.zip")).load(&path).unwrap_err();
	assert!(matches!(
		err,
		LoadError::Description {
			source: DescError::Missing,
			..
		}
	));
	assert_eq!(err.path(), &path);
}
