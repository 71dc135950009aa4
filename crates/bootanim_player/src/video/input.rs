//! Volume key input.
//!
//! A background thread opens every device in the input directory, follows
//! devices appearing and disappearing, and turns completed key presses into
//! [`ControlEvent`]s.

use std::{
	path::{Path, PathBuf},
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
		mpsc::{self, Sender, TryRecvError},
	},
	thread::{self, JoinHandle},
	time::Duration,
};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::{control::ControlEvent, error::PlayerError};

/// Linux input key codes
pub mod codes {
	/// `KEY_PAGEUP`
	pub const KEY_PAGEUP: u16 = 104;
	/// `KEY_PAGEDOWN`
	pub const KEY_PAGEDOWN: u16 = 109;
	/// `KEY_MUTE`
	pub const KEY_MUTE: u16 = 113;
	/// `KEY_VOLUMEDOWN`
	pub const KEY_VOLUMEDOWN: u16 = 114;
	/// `KEY_VOLUMEUP`
	pub const KEY_VOLUMEUP: u16 = 115;

	/// Key released
	pub const VALUE_RELEASE: i32 = 0;
	/// Key pressed
	pub const VALUE_PRESS: i32 = 1;
	/// Key auto-repeat
	pub const VALUE_REPEAT: i32 = 2;
}

use codes::*;

/// Turns raw key events into volume actions.
///
/// A key fires when the previous key event had the same code and was either
/// a press followed by this release, or a repeat. The previous event is
/// tracked across all devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyDecoder {
	last: Option<(u16, i32)>,
}

impl KeyDecoder {
	/// Creates a decoder with no history
	pub fn new() -> Self {
		Self::default()
	}

	/// Feeds one key event
	pub fn feed(&mut self, code: u16, value: i32) -> Option<ControlEvent> {
		let done = matches!(self.last, Some((last_code, last_value))
			if last_code == code
				&& ((last_value == VALUE_PRESS && value == VALUE_RELEASE) || last_value == VALUE_REPEAT));
		self.last = Some((code, value));

		if !done {
			return None;
		}
		match code {
			KEY_VOLUMEUP | KEY_PAGEUP => Some(ControlEvent::VolumeUp),
			KEY_VOLUMEDOWN | KEY_PAGEDOWN => Some(ControlEvent::VolumeDown),
			KEY_MUTE => Some(ControlEvent::Mute),
			_ => None,
		}
	}
}

#[cfg(any(target_os = "linux", target_os = "android"))]
mod devices {
	use std::{collections::HashMap, io, path::Path, path::PathBuf};

	use evdev::{Device, EventType};

	/// Open evdev devices keyed by path
	#[derive(Default)]
	pub(super) struct Devices {
		open: HashMap<PathBuf, Device>,
	}

	impl Devices {
		pub(super) fn open(&mut self, path: &Path) {
			if self.open.contains_key(path) {
				return;
			}
			let device = match Device::open(path) {
				Ok(device) => device,
				Err(e) => {
					log::debug!("input: cannot open {}: {e}", path.display());
					return;
				}
			};
			if let Err(e) = device.set_nonblocking(true) {
				log::warn!("input: {}: cannot set non-blocking: {e}", path.display());
				return;
			}
			log::debug!("input: opened {} ({})", path.display(), device.name().unwrap_or("unknown"));
			self.open.insert(path.to_path_buf(), device);
		}

		pub(super) fn close(&mut self, path: &Path) {
			if self.open.remove(path).is_some() {
				log::debug!("input: closed {}", path.display());
			}
		}

		pub(super) fn len(&self) -> usize {
			self.open.len()
		}

		pub(super) fn drain_keys(&mut self, mut on_key: impl FnMut(u16, i32)) {
			let mut broken = Vec::new();
			for (path, device) in &mut self.open {
				match device.fetch_events() {
					Ok(events) => {
						for event in events.filter(|e| e.event_type() == EventType::KEY) {
							on_key(event.code(), event.value());
						}
					}
					Err(e) if e.kind() == io::ErrorKind::WouldBlock => {}
					Err(e) => {
						log::warn!("input: {}: {e}", path.display());
						broken.push(path.clone());
					}
				}
			}
			for path in broken {
				self.close(&path);
			}
		}
	}
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
mod devices {
	use std::path::Path;

	/// Input devices are not available on this platform
	#[derive(Default)]
	pub(super) struct Devices;

	impl Devices {
		pub(super) fn open(&mut self, path: &Path) {
			log::debug!("input: evdev unsupported, ignoring {}", path.display());
		}

		pub(super) fn close(&mut self, _path: &Path) {}

		pub(super) fn len(&self) -> usize {
			0
		}

		pub(super) fn drain_keys(&mut self, _on_key: impl FnMut(u16, i32)) {}
	}
}

/// Background input reader
#[derive(Debug)]
pub struct InputReader {
	stop: Arc<AtomicBool>,
	handle: Option<JoinHandle<()>>,
}

impl InputReader {
	/// Starts reading devices in `dir`, sending actions to `events`
	pub fn spawn(dir: impl Into<PathBuf>, sweep: Duration, events: Sender<ControlEvent>) -> Result<Self, PlayerError> {
		let dir = dir.into();
		let (tx, rx) = mpsc::channel();
		let mut watcher = RecommendedWatcher::new(tx, notify::Config::default())?;
		watcher.watch(&dir, RecursiveMode::NonRecursive)?;

		let stop = Arc::new(AtomicBool::new(false));
		let thread_stop = stop.clone();
		let handle = thread::Builder::new().name("input-reader".into()).spawn(move || {
			// Keeps the watch alive for the thread's lifetime
			let _watcher = watcher;
			let mut devices = devices::Devices::default();
			let mut decoder = KeyDecoder::new();

			scan_dir(&dir, &mut devices);
			log::debug!("input: {} devices in {}", devices.len(), dir.display());

			while !thread_stop.load(Ordering::Acquire) {
				loop {
					match rx.try_recv() {
						Ok(Ok(event)) => match event.kind {
							EventKind::Create(_) => event.paths.iter().for_each(|p| devices.open(p)),
							EventKind::Remove(_) => event.paths.iter().for_each(|p| devices.close(p)),
							_ => {}
						},
						Ok(Err(e)) => log::warn!("input: watch error: {e}"),
						Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
					}
				}

				let mut receiver_gone = false;
				devices.drain_keys(|code, value| {
					if let Some(action) = decoder.feed(code, value)
						&& events.send(action).is_err()
					{
						receiver_gone = true;
					}
				});
				if receiver_gone {
					log::debug!("input: receiver dropped, stopping");
					break;
				}

				thread::sleep(sweep);
			}
		})?;

		Ok(Self {
			stop,
			handle: Some(handle),
		})
	}

	/// Stops the thread, closing every device, and waits for it
	pub fn stop(mut self) {
		self.shutdown();
	}

	fn shutdown(&mut self) {
		self.stop.store(true, Ordering::Release);
		if let Some(handle) = self.handle.take()
			&& handle.join().is_err()
		{
			log::error!("input reader thread panicked");
		}
	}
}

impl Drop for InputReader {
	fn drop(&mut self) {
		self.shutdown();
	}
}

fn scan_dir(dir: &Path, devices: &mut devices::Devices) {
	let entries = match std::fs::read_dir(dir) {
		Ok(entries) => entries,
		Err(e) => {
			log::warn!("input: cannot scan {}: {e}", dir.display());
			return;
		}
	};
	for entry in entries.flatten() {
		devices.open(&entry.path());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_press_then_release_fires() {
		let mut keys = KeyDecoder::new();
		assert_eq!(keys.feed(KEY_VOLUMEUP, VALUE_PRESS), None);
		assert_eq!(keys.feed(KEY_VOLUMEUP, VALUE_RELEASE), Some(ControlEvent::VolumeUp));
		assert_eq!(keys.feed(KEY_PAGEDOWN, VALUE_PRESS), None);
		assert_eq!(keys.feed(KEY_PAGEDOWN, VALUE_RELEASE), Some(ControlEvent::VolumeDown));
		assert_eq!(keys.feed(KEY_MUTE, VALUE_PRESS), None);
		assert_eq!(keys.feed(KEY_MUTE, VALUE_RELEASE), Some(ControlEvent::Mute));
	}

	#[test]
	fn test_repeat_fires_on_next_event() {
		let mut keys = KeyDecoder::new();
		keys.feed(KEY_VOLUMEDOWN, VALUE_PRESS);
		assert_eq!(keys.feed(KEY_VOLUMEDOWN, VALUE_REPEAT), None);
		assert_eq!(keys.feed(KEY_VOLUMEDOWN, VALUE_REPEAT), Some(ControlEvent::VolumeDown));
		assert_eq!(keys.feed(KEY_VOLUMEDOWN, VALUE_RELEASE), Some(ControlEvent::VolumeDown));
	}

	#[test]
	fn test_interleaved_keys_do_not_fire() {
		let mut keys = KeyDecoder::new();
		keys.feed(KEY_VOLUMEUP, VALUE_PRESS);
		assert_eq!(keys.feed(KEY_VOLUMEDOWN, VALUE_RELEASE), None);
		assert_eq!(keys.feed(KEY_VOLUMEUP, VALUE_RELEASE), None);

		// Other keys are decoded but produce nothing
		keys.feed(30, VALUE_PRESS);
		assert_eq!(keys.feed(30, VALUE_RELEASE), None);
	}

	#[test_log::test]
	fn test_reader_starts_and_stops_on_empty_dir() {
		let dir = std::env::temp_dir().join(format!("bootanim-input-{}", std::process::id()));
		std::fs::create_dir_all(&dir).unwrap();

		let (tx, rx) = mpsc::channel();
		let reader = InputReader::spawn(&dir, Duration::from_millis(5), tx).unwrap();
		std::fs::write(dir.join("event9"), b"not a device").unwrap();
		thread::sleep(Duration::from_millis(30));
		reader.stop();
		assert!(rx.try_recv().is_err());

		std::fs::remove_dir_all(&dir).ok();
	}

	#[test]
	fn test_missing_dir_is_an_error() {
		let (tx, _rx) = mpsc::channel();
		assert!(InputReader::spawn("/nonexistent/input", Duration::from_millis(5), tx).is_err());
	}
}
