//! Wall clock trust and the time watcher

use std::{
	fs,
	sync::{Arc, atomic::AtomicBool},
	thread,
	time::{Duration, Instant},
};

use bootanim_rs::bootanim_player::{
	TimeAccuracy, TimeCheckThread,
	settings::TimePaths,
	time_check::{ACCURATE_TIME_EPOCH, is_plausible_change},
};

use crate::common::Scratch;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[test]
fn test_change_window_boundaries() {
	let now = ACCURATE_TIME_EPOCH + 1000 * DAY_MS;
	assert!(is_plausible_change(now - 29 * DAY_MS, now));
	assert!(!is_plausible_change(now - 31 * DAY_MS, now));
	assert!(is_plausible_change(now + 89 * 60_000, now));
	assert!(!is_plausible_change(now + 91 * 60_000, now));
	// A clock still at the epoch cannot be trusted
	assert!(!is_plausible_change(ACCURATE_TIME_EPOCH, ACCURATE_TIME_EPOCH + 1));
}

#[test]
fn test_recorded_change_decides_accuracy() {
	let dir = Scratch::new("timefile");
	let paths = TimePaths::under(dir.path("data"));
	fs::create_dir_all(&paths.time_dir).unwrap();

	let now = ACCURATE_TIME_EPOCH + 1000 * DAY_MS;
	fs::write(&paths.last_time_change, (now - 31 * DAY_MS).to_string()).unwrap();
	let accuracy = TimeAccuracy::default();
	assert!(!accuracy.update(&paths, false, now));

	fs::write(&paths.last_time_change, (now - 29 * DAY_MS).to_string()).unwrap();
	assert!(accuracy.update(&paths, false, now));
	assert!(accuracy.is_accurate());
	assert!(!accuracy.is_twelve_hour());
}

#[test_log::test]
fn test_watcher_sees_marker_written_later() {
	let dir = Scratch::new("watcher");
	let paths = TimePaths::under(dir.path("data"));
	fs::create_dir_all(&paths.data_dir).unwrap();

	let accuracy = Arc::new(TimeAccuracy::default());
	let enabled = Arc::new(AtomicBool::new(true));
	let thread = TimeCheckThread::spawn(accuracy.clone(), paths.clone(), enabled).expect("watcher starts");

	thread::sleep(Duration::from_millis(100));
	fs::create_dir_all(&paths.time_dir).unwrap();
	fs::write(&paths.twelve_hour_flag, b"").unwrap();
	fs::write(&paths.accurate_flag, b"").unwrap();

	let deadline = Instant::now() + Duration::from_secs(5);
	while !accuracy.is_accurate() && Instant::now() < deadline {
		thread::sleep(Duration::from_millis(20));
	}
	assert!(accuracy.is_accurate());
	assert!(accuracy.is_twelve_hour());
	thread.stop();
}
