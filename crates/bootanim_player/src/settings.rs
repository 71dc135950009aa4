//! Player settings.
//!
//! Settings are layered with the `config` crate: built-in defaults, then an
//! optional TOML file, then `BOOTANIM_*` environment variables (nested keys
//! separated by `__`, e.g. `BOOTANIM_TIMING__MEDIA_TIMEOUT_MS=2000`).

use std::{collections::HashMap, path::Path, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{
	error::PlayerError,
	properties::MemoryProperties,
};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "BOOTANIM";

/// Animation bundle search paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlePaths {
	/// Updatable APEX boot animation
	pub apex: PathBuf,
	/// Product boot animation
	pub product: PathBuf,
	/// Product boot animation for the dark theme
	pub product_dark: PathBuf,
	/// OEM boot animation
	pub oem: PathBuf,
	/// System boot animation, also the `$SYSTEM` target
	pub system: PathBuf,
	/// Candidates while the device is encrypted
	pub encrypted: Vec<PathBuf>,
	/// Candidates while shutting down
	pub shutdown: Vec<PathBuf>,
	/// Candidates during a userspace reboot
	pub userspace_reboot: Vec<PathBuf>,
}

impl Default for BundlePaths {
	fn default() -> Self {
		Self {
			apex: "/apex/com.android.bootanimation/etc/bootanimation.zip".into(),
			product: "/product/media/bootanimation.zip".into(),
			product_dark: "/product/media/bootanimation-dark.zip".into(),
			oem: "/oem/media/bootanimation.zip".into(),
			system: "/system/media/bootanimation.zip".into(),
			encrypted: vec![
				"/product/media/bootanimation-encrypted.zip".into(),
				"/system/media/bootanimation-encrypted.zip".into(),
			],
			shutdown: vec![
				"/product/media/shutdownanimation.zip".into(),
				"/oem/media/shutdownanimation.zip".into(),
				"/system/media/shutdownanimation.zip".into(),
			],
			userspace_reboot: vec![
				"/product/media/userspace-reboot.zip".into(),
				"/oem/media/userspace-reboot.zip".into(),
				"/system/media/userspace-reboot.zip".into(),
			],
		}
	}
}

/// Time marker locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimePaths {
	/// Directory in which the time directory appears
	pub data_dir: PathBuf,
	/// Directory holding the markers
	pub time_dir: PathBuf,
	/// Present once the clock is known to be accurate
	pub accurate_flag: PathBuf,
	/// Present when the user prefers a 12-hour clock
	pub twelve_hour_flag: PathBuf,
	/// Milliseconds since epoch of the last manual time change
	pub last_time_change: PathBuf,
}

impl TimePaths {
	/// Builds the marker paths beneath `data_dir/time`
	pub fn under(data_dir: impl Into<PathBuf>) -> Self {
		let data_dir = data_dir.into();
		let time_dir = data_dir.join("time");
		Self {
			accurate_flag: time_dir.join("time_is_accurate"),
			twelve_hour_flag: time_dir.join("time_format_12_hour"),
			last_time_change: time_dir.join("last_time_change"),
			data_dir,
			time_dir,
		}
	}
}

impl Default for TimePaths {
	fn default() -> Self {
		Self::under("/data/system")
	}
}

/// Boot video resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoPaths {
	/// Video file candidates, first readable wins
	pub videos: Vec<PathBuf>,
	/// Volume overlay bundle candidates
	pub volume_bundles: Vec<PathBuf>,
	/// Input device directory
	pub input_dir: PathBuf,
	/// Hex counter of frames rendered by the video decoder
	pub frame_count: PathBuf,
}

impl Default for VideoPaths {
	fn default() -> Self {
		Self {
			videos: vec!["/data/bootvideo".into(), "/vendor/etc/bootvideo".into()],
			volume_bundles: vec!["/system/media/bootvideo.zip".into(), "/vendor/etc/bootvideo.zip".into()],
			input_dir: "/dev/input".into(),
			frame_count: "/sys/module/amvideo/parameters/new_frame_count".into(),
		}
	}
}

/// Timeouts and poll intervals, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
	/// Idle time before the volume overlay hides itself
	pub volume_ui_hide_ms: u64,
	/// Volume overlay loop period
	pub volume_ui_tick_ms: u64,
	/// Media service poll interval
	pub media_poll_ms: u64,
	/// Give up waiting for the media service after this long
	pub media_timeout_ms: u64,
	/// Input device sweep interval
	pub input_sweep_ms: u64,
	/// Exit property poll interval while a video plays
	pub exit_poll_ms: u64,
}

impl Timing {
	/// Volume overlay hide timeout
	pub fn volume_ui_hide(&self) -> Duration {
		Duration::from_millis(self.volume_ui_hide_ms)
	}

	/// Volume overlay loop period
	pub fn volume_ui_tick(&self) -> Duration {
		Duration::from_millis(self.volume_ui_tick_ms)
	}

	/// Media service poll interval
	pub fn media_poll(&self) -> Duration {
		Duration::from_millis(self.media_poll_ms)
	}

	/// Media service timeout
	pub fn media_timeout(&self) -> Duration {
		Duration::from_millis(self.media_timeout_ms)
	}

	/// Input sweep interval
	pub fn input_sweep(&self) -> Duration {
		Duration::from_millis(self.input_sweep_ms)
	}

	/// Exit poll interval
	pub fn exit_poll(&self) -> Duration {
		Duration::from_millis(self.exit_poll_ms)
	}
}

impl Default for Timing {
	fn default() -> Self {
		Self {
			volume_ui_hide_ms: 4000,
			volume_ui_tick_ms: 20,
			media_poll_ms: 100,
			media_timeout_ms: 30_000,
			input_sweep_ms: 20,
			exit_poll_ms: 200,
		}
	}
}

/// Everything the player reads from its environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Bundle search paths
	pub bundles: BundlePaths,
	/// Time marker paths
	pub time: TimePaths,
	/// Clock font used when the bundle carries none
	pub clock_font_fallback: PathBuf,
	/// Boot video resources
	pub video: VideoPaths,
	/// Timeouts and intervals
	pub timing: Timing,
	/// Initial property values
	pub properties: HashMap<String, String>,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			bundles: BundlePaths::default(),
			time: TimePaths::default(),
			clock_font_fallback: "images/clock_font.png".into(),
			video: VideoPaths::default(),
			timing: Timing::default(),
			properties: HashMap::new(),
		}
	}
}

impl Settings {
	/// Loads settings: defaults, then `path` if given and present, then the
	/// environment.
	pub fn load(path: Option<&Path>) -> Result<Self, PlayerError> {
		let mut builder = config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

		if let Some(path) = path {
			log::debug!("settings: reading {}", path.display());
			builder = builder.add_source(config::File::from(path).required(false));
		}

		let settings = builder
			.add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true))
			.build()?
			.try_deserialize::<Self>()?;

		Ok(settings)
	}

	/// Path spliced in by `$SYSTEM`
	pub fn system_animation(&self) -> &Path {
		&self.bundles.system
	}

	/// Property store seeded with [`Settings::properties`]
	pub fn property_store(&self) -> MemoryProperties {
		MemoryProperties::from_map(self.properties.clone())
	}
}
