//! Wall clock trust.
//!
//! The clock overlay is only drawn once the system time is believed to be
//! correct: either a flag file says so, or the last manual time change lies
//! within a plausible window around now. Until then a background thread
//! watches the marker directory.

use std::{
	fs,
	path::Path,
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
		mpsc::{self, RecvTimeoutError},
	},
	thread::JoinHandle,
	time::Duration,
};

use notify::{
	EventKind, RecommendedWatcher, RecursiveMode, Watcher,
	event::{AccessKind, AccessMode},
};

use crate::{properties::atoi, settings::TimePaths};

/// 2000-01-01T00:00:00Z in milliseconds
pub const ACCURATE_TIME_EPOCH: i64 = 946_684_800_000;

/// Oldest trusted manual time change, relative to now
pub const MAX_TIME_IN_PAST: i64 = 60_000 * 60 * 24 * 30;

/// Newest trusted manual time change, relative to now
pub const MAX_TIME_IN_FUTURE: i64 = 60_000 * 90;

/// Watcher wake-up interval
pub const WAKE_INTERVAL: Duration = Duration::from_secs(1);

/// Whether a manual time change at `last_ms` makes `now_ms` trustworthy
pub fn is_plausible_change(last_ms: i64, now_ms: i64) -> bool {
	ACCURATE_TIME_EPOCH < now_ms
		&& last_ms > ACCURATE_TIME_EPOCH
		&& last_ms > now_ms - MAX_TIME_IN_PAST
		&& last_ms < now_ms + MAX_TIME_IN_FUTURE
}

/// Shared time accuracy flags
#[derive(Debug, Default)]
pub struct TimeAccuracy {
	accurate: AtomicBool,
	twelve_hour: AtomicBool,
}

impl TimeAccuracy {
	/// Whether the wall clock can be shown
	pub fn is_accurate(&self) -> bool {
		self.accurate.load(Ordering::Acquire)
	}

	/// Whether the 12-hour format is preferred
	pub fn is_twelve_hour(&self) -> bool {
		self.twelve_hour.load(Ordering::Acquire)
	}

	/// Overrides the accuracy flag
	pub fn set_accurate(&self, accurate: bool) {
		self.accurate.store(accurate, Ordering::Release);
	}

	/// Re-reads the marker files. Returns whether time is accurate.
	///
	/// While shutting down time is treated as accurate without touching
	/// the flag, so no watcher is started.
	pub fn update(&self, paths: &TimePaths, shutting_down: bool, now_ms: i64) -> bool {
		if self.is_accurate() {
			return true;
		}
		if shutting_down {
			return true;
		}

		if paths.twelve_hour_flag.exists() {
			self.twelve_hour.store(true, Ordering::Release);
		}

		if paths.accurate_flag.exists() {
			log::debug!("time marked accurate by {}", paths.accurate_flag.display());
			self.set_accurate(true);
			return true;
		}

		if let Ok(text) = fs::read_to_string(&paths.last_time_change) {
			let last = atoi(&text);
			if last > 0 {
				self.set_accurate(is_plausible_change(last, now_ms));
			}
		}

		self.is_accurate()
	}
}

fn now_ms() -> i64 {
	chrono::Utc::now().timestamp_millis()
}

fn is_relevant(kind: &EventKind) -> bool {
	matches!(kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Access(AccessKind::Close(AccessMode::Write)))
}

fn same_name(a: &Path, b: &Path) -> bool {
	a.file_name().is_some() && a.file_name() == b.file_name()
}

/// Background watcher that flips [`TimeAccuracy`] once the markers appear
#[derive(Debug)]
pub struct TimeCheckThread {
	stop: Arc<AtomicBool>,
	handle: Option<JoinHandle<()>>,
}

impl TimeCheckThread {
	/// Starts watching `paths`.
	///
	/// Checks the markers once before anything else, so a watcher that
	/// cannot be set up only loses later updates. Returns `None` when time
	/// is already accurate or the watcher cannot be set up. The thread ends once time
	/// is accurate, `clock_enabled` clears, or [`TimeCheckThread::stop`].
	pub fn spawn(accuracy: Arc<TimeAccuracy>, paths: TimePaths, clock_enabled: Arc<AtomicBool>) -> Option<Self> {
		if accuracy.update(&paths, false, now_ms()) {
			return None;
		}

		let (tx, rx) = mpsc::channel();
		let mut watcher = match RecommendedWatcher::new(tx, notify::Config::default()) {
			Ok(w) => w,
			Err(e) => {
				log::error!("time check: cannot create watcher: {e}");
				return None;
			}
		};

		if let Err(e) = watcher.watch(&paths.data_dir, RecursiveMode::NonRecursive) {
			log::error!("time check: cannot watch {}: {e}", paths.data_dir.display());
			return None;
		}
		let mut time_watched = watch_time_dir(&mut watcher, &paths);

		// Markers written while the watches were being added
		if accuracy.update(&paths, false, now_ms()) {
			return None;
		}

		let stop = Arc::new(AtomicBool::new(false));
		let thread_stop = stop.clone();
		let handle = std::thread::Builder::new()
			.name("time-check".into())
			.spawn(move || {
				let running = || {
					!thread_stop.load(Ordering::Acquire)
						&& !accuracy.is_accurate()
						&& clock_enabled.load(Ordering::Acquire)
				};

				while running() {
					match rx.recv_timeout(WAKE_INTERVAL) {
						Ok(Ok(event)) if is_relevant(&event.kind) => {
							for path in &event.paths {
								if !time_watched && same_name(path, &paths.time_dir) {
									time_watched = watch_time_dir(&mut watcher, &paths);
									accuracy.update(&paths, false, now_ms());
								} else if time_watched
									&& (same_name(path, &paths.accurate_flag)
										|| same_name(path, &paths.last_time_change))
								{
									accuracy.update(&paths, false, now_ms());
								}
							}
						}
						Ok(Ok(_)) => {}
						Ok(Err(e)) => log::warn!("time check: watch error: {e}"),
						Err(RecvTimeoutError::Timeout) => {
							if !time_watched && paths.time_dir.is_dir() {
								time_watched = watch_time_dir(&mut watcher, &paths);
							}
							if time_watched {
								accuracy.update(&paths, false, now_ms());
							}
						}
						Err(RecvTimeoutError::Disconnected) => break,
					}
				}
				log::debug!("time check: done, accurate={}", accuracy.is_accurate());
			});

		match handle {
			Ok(handle) => Some(Self {
				stop,
				handle: Some(handle),
			}),
			Err(e) => {
				log::error!("time check: cannot spawn thread: {e}");
				None
			}
		}
	}

	/// Whether the thread is still running
	pub fn is_running(&self) -> bool {
		self.handle.as_ref().is_some_and(|h| !h.is_finished())
	}

	/// Signals the thread and waits for it
	pub fn stop(mut self) {
		self.shutdown();
	}

	fn shutdown(&mut self) {
		self.stop.store(true, Ordering::Release);
		if let Some(handle) = self.handle.take()
			&& handle.join().is_err()
		{
			log::error!("time check thread panicked");
		}
	}
}

impl Drop for TimeCheckThread {
	fn drop(&mut self) {
		self.shutdown();
	}
}

/// Adds the time directory watch and drops the data directory watch
fn watch_time_dir(watcher: &mut RecommendedWatcher, paths: &TimePaths) -> bool {
	if !paths.time_dir.is_dir() {
		return false;
	}
	if let Err(e) = watcher.watch(&paths.time_dir, RecursiveMode::NonRecursive) {
		log::warn!("time check: cannot watch {}: {e}", paths.time_dir.display());
		return false;
	}
	if let Err(e) = watcher.unwatch(&paths.data_dir) {
		log::debug!("time check: unwatch {}: {e}", paths.data_dir.display());
	}
	true
}
