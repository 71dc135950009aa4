//! Runtime property access.
//!
//! The player reads a handful of named string properties (display targets,
//! exit flag, boot video mode, persisted volume...). [`PropertyStore`] is the
//! seam; [`MemoryProperties`] is an in-process implementation seeded from
//! settings.

use std::{
	collections::HashMap,
	sync::{PoisonError, RwLock},
};

/// Property names used by the player
pub mod keys {
	/// Non-zero requests the animation to stop
	pub const EXIT: &str = "service.bootanim.exit";
	/// Comma separated physical display ids to mirror onto
	pub const DISPLAYS: &str = "persist.service.bootanim.displays";
	/// Set to 1 while the player runs, 0 afterwards
	pub const BOOT_VIDEO_RUNNING: &str = "service.bootvideo.exit";
	/// Vendor boot video configuration: `mode * 1000 + default volume`
	pub const BOOT_VIDEO_VENDOR: &str = "persist.vendor.media.bootvideo";
	/// Persisted boot video volume: level, or level + 1000 when muted
	pub const BOOT_VIDEO_VOLUME: &str = "persist.sys.bootvideo";
	/// 1 when the video decoder renders through the display directly
	pub const OMX_DISPLAY_MODE: &str = "media.omx.display_mode";
	/// Non-empty while the device is shutting down
	pub const POWER_CTL: &str = "sys.powerctl";
	/// Built-in display rotation (0-3)
	pub const ROTATION: &str = "persist.sys.builtinrotation";
	/// Upper bound on surface width, 0 for none
	pub const MAX_GRAPHICS_WIDTH: &str = "ro.surface_flinger.max_graphics_width";
	/// Upper bound on surface height, 0 for none
	pub const MAX_GRAPHICS_HEIGHT: &str = "ro.surface_flinger.max_graphics_height";
	/// Encryption state
	pub const DECRYPT: &str = "vold.decrypt";
	/// 1 selects the dark product animation
	pub const THEME: &str = "ro.boot.theme";
	/// True during a userspace reboot
	pub const USERSPACE_REBOOT: &str = "sys.init.userspace_reboot.in_progress";
	/// Top display inset that the animation crops away
	pub const DISPLAY_INSET_TOP: &str = "persist.sys.displayinset.top";
}

/// String key/value property source
pub trait PropertyStore: Send + Sync {
	/// Returns the value of `key`, if set
	fn get(&self, key: &str) -> Option<String>;

	/// Sets `key` to `value`
	fn set(&self, key: &str, value: &str);

	/// Returns the value, or `default` when unset
	fn get_or(&self, key: &str, default: &str) -> String {
		self.get(key).unwrap_or_else(|| default.to_string())
	}

	/// Reads an integer with C `atoi` leniency.
	///
	/// Unset or empty values yield `default`; any other value yields its
	/// leading integer, or 0 when there is none.
	fn get_int(&self, key: &str, default: i64) -> i64 {
		match self.get(key) {
			Some(v) if !v.is_empty() => atoi(&v),
			_ => default,
		}
	}

	/// Reads an integer strictly, returning `default` when the value does
	/// not parse or lies outside `min..=max`.
	fn get_int_in_range(&self, key: &str, default: i64, min: i64, max: i64) -> i64 {
		self.get(key)
			.and_then(|v| v.trim().parse::<i64>().ok())
			.filter(|v| (min..=max).contains(v))
			.unwrap_or(default)
	}

	/// Reads a boolean (`1/y/yes/on/true`, `0/n/no/off/false`)
	fn get_bool(&self, key: &str, default: bool) -> bool {
		match self.get(key).as_deref() {
			Some("1" | "y" | "yes" | "on" | "true") => true,
			Some("0" | "n" | "no" | "off" | "false") => false,
			_ => default,
		}
	}

	/// Stores an integer
	fn set_int(&self, key: &str, value: i64) {
		self.set(key, &value.to_string());
	}
}

/// C `atoi`: optional whitespace and sign, then as many digits as present.
pub fn atoi(s: &str) -> i64 {
	let s = s.trim_start();
	let (negative, rest) = match s.as_bytes().first() {
		Some(b'-') => (true, &s[1..]),
		Some(b'+') => (false, &s[1..]),
		_ => (false, s),
	};
	let mut value: i64 = 0;
	for c in rest.chars() {
		let Some(d) = c.to_digit(10) else {
			break;
		};
		value = value.saturating_mul(10).saturating_add(i64::from(d));
	}
	if negative {
		-value
	} else {
		value
	}
}

/// Thread-safe in-memory property store
#[derive(Debug, Default)]
pub struct MemoryProperties {
	values: RwLock<HashMap<String, String>>,
}

impl MemoryProperties {
	/// Creates an empty store
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store holding `values`
	pub fn from_map(values: HashMap<String, String>) -> Self {
		Self {
			values: RwLock::new(values),
		}
	}

	/// Removes `key`
	pub fn remove(&self, key: &str) {
		self.values.write().unwrap_or_else(PoisonError::into_inner).remove(key);
	}

	/// Copy of every property
	pub fn snapshot(&self) -> HashMap<String, String> {
		self.values.read().unwrap_or_else(PoisonError::into_inner).clone()
	}
}

impl PropertyStore for MemoryProperties {
	fn get(&self, key: &str) -> Option<String> {
		self.values.read().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
	}

	fn set(&self, key: &str, value: &str) {
		log::trace!("property {key} = {value}");
		self.values
			.write()
			.unwrap_or_else(PoisonError::into_inner)
			.insert(key.to_string(), value.to_string());
	}
}

impl<const N: usize> From<[(&str, &str); N]> for MemoryProperties {
	fn from(values: [(&str, &str); N]) -> Self {
		Self::from_map(values.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
	}
}
