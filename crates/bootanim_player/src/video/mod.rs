//! Boot video playback.
//!
//! On devices configured for it, a video file plays before, after or instead
//! of the animation. While it plays, volume keys adjust its gain and an
//! overlay drawn from a small bundle shows the level.

pub mod input;
pub mod media;
pub mod overlay;
pub mod volume;

use std::{
	fs::File,
	io::Read,
	path::{Path, PathBuf},
	sync::{Arc, mpsc},
	thread,
	time::Duration,
};

use bootanim_types::animation::Animation;

pub use self::{
	input::{InputReader, KeyDecoder},
	media::{MediaPlayer, MediaService, wait_for_media_service},
	overlay::VolumeOverlay,
	volume::{VolumeCommand, VolumeController, VolumeState},
};
use crate::{
	control::ExitSignal,
	loader::Loader,
	properties::{PropertyStore, keys},
	render::{LAYER_UI_HIDE, LAYER_UI_SHOW, Renderer},
	settings::Settings,
};

/// Poll period while waiting on the decoder (60 Hz)
pub const CHECK_DELAY: Duration = Duration::from_micros(16_667);

/// What plays, read from the vendor configuration value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BootMode {
	/// Only the animation
	#[default]
	Animation,
	/// Animation until exit, then the video
	AnimationThenVideo,
	/// Video, then the animation once
	VideoThenAnimation,
	/// Only the video
	VideoOnly,
}

impl BootMode {
	/// Mode encoded in the thousands of the vendor value; unknown modes
	/// play the animation.
	pub fn from_vendor(value: i64) -> Self {
		match value / 1000 {
			1 => Self::AnimationThenVideo,
			2 => Self::VideoThenAnimation,
			3 => Self::VideoOnly,
			_ => Self::Animation,
		}
	}

	/// Whether the video plays at all
	pub fn plays_video(self) -> bool {
		self != Self::Animation
	}

	/// Whether the video waits for the exit request once it ends
	pub fn holds_until_exit(self) -> bool {
		matches!(self, Self::AnimationThenVideo | Self::VideoOnly)
	}
}

/// Whether the decoder's hex frame counter at `path` is above zero
pub fn video_has_frames(path: &Path) -> bool {
	let mut buf = [0u8; 16];
	let read = match File::open(path).and_then(|mut f| f.read(&mut buf)) {
		Ok(read) => read,
		Err(e) => {
			log::error!("cannot read frame counter {}: {e}", path.display());
			return false;
		}
	};
	parse_hex_prefix(&String::from_utf8_lossy(&buf[..read])) > 0
}

/// `strtol(s, NULL, 16)` for non-negative values
fn parse_hex_prefix(s: &str) -> i64 {
	let s = s.trim_start();
	let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
	s.chars()
		.map_while(|c| c.to_digit(16))
		.fold(0i64, |acc, d| acc.saturating_mul(16).saturating_add(i64::from(d)))
}

/// How a video playback attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoOutcome {
	/// No readable video file
	NoVideo,
	/// The media service never came up
	ServiceUnavailable,
	/// Creating or preparing the player failed
	PlayerFailed,
	/// The video played to the end
	Played,
}

/// Runs one video playback with its volume overlay and key input
pub struct VideoCoordinator<'a> {
	settings: &'a Settings,
	props: Arc<dyn PropertyStore>,
	service: &'a dyn MediaService,
}

impl std::fmt::Debug for VideoCoordinator<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("VideoCoordinator").field("video", &self.settings.video).finish_non_exhaustive()
	}
}

impl<'a> VideoCoordinator<'a> {
	/// Creates a coordinator
	pub fn new(settings: &'a Settings, props: Arc<dyn PropertyStore>, service: &'a dyn MediaService) -> Self {
		Self {
			settings,
			props,
			service,
		}
	}

	/// First readable video candidate
	pub fn find_video(&self) -> Option<PathBuf> {
		self.settings.video.videos
			.iter()
			.find(|p| File::open(p).is_ok_and(|f| f.metadata().is_ok_and(|m| m.is_file())))
			.cloned()
	}

	/// Plays the video for `mode`.
	///
	/// Blocks until the video completes and, for modes that hold, until exit
	/// is requested. The input reader is always stopped before returning.
	pub fn run(
		&self,
		renderer: &mut dyn Renderer,
		mode: BootMode,
		volume: &mut VolumeController,
		exit: &mut ExitSignal,
	) -> VideoOutcome {
		let Some(video) = self.find_video() else {
			log::error!("no boot video found");
			return VideoOutcome::NoVideo;
		};
		log::debug!("boot video '{}'", video.display());

		let timing = &self.settings.timing;
		if !wait_for_media_service(self.service, timing.media_poll(), timing.media_timeout()) {
			return VideoOutcome::ServiceUnavailable;
		}

		let mut player = match self.service.create_player() {
			Ok(player) => player,
			Err(e) => {
				log::error!("cannot create media player: {e}");
				return VideoOutcome::PlayerFailed;
			}
		};

		player.reset();
		let prepared = player.set_data_source(&video).and_then(|()| {
			player.set_looping(false);
			player.prepare()
		});
		if let Err(e) = prepared {
			log::error!("cannot prepare '{}': {e}", video.display());
			player.stop();
			player.reset();
			return VideoOutcome::PlayerFailed;
		}

		log::debug!("boot video volume {:?}", volume.state());
		player.set_volume(volume.state().gain());
		if let Err(e) = player.start() {
			log::error!("cannot start '{}': {e}", video.display());
			player.stop();
			player.reset();
			return VideoOutcome::PlayerFailed;
		}

		let direct = self.props.get_int(keys::OMX_DISPLAY_MODE, 0) == 1;
		if direct {
			while !video_has_frames(&self.settings.video.frame_count) && !player.is_complete() {
				thread::sleep(CHECK_DELAY);
			}
		}

		match mode {
			BootMode::VideoThenAnimation | BootMode::VideoOnly => {
				if direct {
					renderer.set_layer(LAYER_UI_SHOW);
				}
			}
			_ => renderer.set_layer(LAYER_UI_HIDE),
		}
		if direct {
			renderer.present();
		}

		let (tx, rx) = mpsc::channel();
		let mut reader = match InputReader::spawn(&self.settings.video.input_dir, timing.input_sweep(), tx) {
			Ok(reader) => Some(reader),
			Err(e) => {
				log::warn!("volume keys unavailable: {e}");
				None
			}
		};

		let shown = self.load_volume_bundle().is_some_and(|bundle| {
			let result = VolumeOverlay::new(&bundle, timing.volume_ui_hide(), timing.volume_ui_tick())
				.and_then(|overlay| overlay.run(renderer, volume, &rx, player.as_mut()));
			if let Err(e) = &result {
				log::error!("volume overlay: {e}");
			}
			result.is_ok()
		});

		if !shown {
			if let Some(reader) = reader.take() {
				reader.stop();
			}
			while !player.is_complete() {
				thread::sleep(CHECK_DELAY);
			}
		}

		if mode.holds_until_exit() {
			log::debug!("boot video done, waiting for exit");
			while !exit.poll() {
				thread::sleep(timing.exit_poll());
			}
		}

		if let Some(reader) = reader.take() {
			reader.stop();
		}
		player.stop();
		player.reset();

		if mode == BootMode::VideoThenAnimation {
			renderer.set_layer(LAYER_UI_SHOW);
		}
		VideoOutcome::Played
	}

	fn load_volume_bundle(&self) -> Option<Animation> {
		let path = self.settings.video.volume_bundles.iter().find(|p| p.is_file())?;
		match Loader::new(self.settings.system_animation()).load(path) {
			Ok(bundle) => Some(bundle),
			Err(e) => {
				log::error!("volume bundle: {e}");
				None
			}
		}
	}
}
