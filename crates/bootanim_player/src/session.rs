//! A complete boot (or shutdown) animation session.
//!
//! [`BootAnimation`] owns the surface and picks what to play: the bundle
//! animation, the boot video in one of its modes, or the built-in logo when
//! no bundle is installed.

use std::{
	fs,
	path::{Path, PathBuf},
	sync::{Arc, mpsc::Receiver},
	time::Instant,
};

use bootanim_types::animation::Animation;

use crate::{
	callbacks::Callbacks,
	clock::{ClockFont, ClockOverlay},
	control::{ControlEvent, ExitHandle, ExitSignal},
	error::PlayerError,
	fallback::LogoAnimation,
	loader::Loader,
	properties::{PropertyStore, keys},
	render::{Renderer, Rotation, parse_display_ids},
	scheduler::{PlaybackContext, PlaybackOutcome, Scheduler},
	settings::Settings,
	time_check::{TimeAccuracy, TimeCheckThread},
	video::{BootMode, MediaService, VideoCoordinator, VideoOutcome, VolumeController, VolumeState},
	viewport::InsetAnimator,
};

/// What a session ended up playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionReport {
	/// Outcome of the last animation played, bundle or built-in
	pub animation: Option<PlaybackOutcome>,
	/// Outcome of the boot video, when the mode plays one
	pub video: Option<VideoOutcome>,
}

/// Boot animation session over a renderer `R`
pub struct BootAnimation<R: Renderer> {
	settings: Settings,
	props: Arc<dyn PropertyStore>,
	renderer: R,
	callbacks: Box<dyn Callbacks>,
	media: Option<Box<dyn MediaService>>,
	exit: ExitSignal,
	shutting_down: bool,
	rotation: Rotation,
	bundle: Option<PathBuf>,
	animation: Option<Animation>,
	started: Instant,
}

impl<R: Renderer + std::fmt::Debug> std::fmt::Debug for BootAnimation<R> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BootAnimation")
			.field("renderer", &self.renderer)
			.field("shutting_down", &self.shutting_down)
			.field("rotation", &self.rotation)
			.field("bundle", &self.bundle)
			.finish_non_exhaustive()
	}
}

impl<R: Renderer> BootAnimation<R> {
	/// Sets up the surface and preloads the bundle
	pub fn new(settings: Settings, props: Arc<dyn PropertyStore>, mut renderer: R, callbacks: Box<dyn Callbacks>) -> Self {
		let started = Instant::now();
		let shutting_down = !props.get_or(keys::POWER_CTL, "").is_empty();
		let phase = phase(shutting_down);

		let rotation = Rotation::from_property(props.get_int(keys::ROTATION, 0));
		if rotation == Rotation::Rotate0 {
			log::debug!("no built-in rotation");
		}
		log::info!("{phase}AnimationStartTiming {:?}", started.elapsed());

		let (width, height) = renderer.size();
		let (rotated_width, rotated_height) = rotation.apply(width, height);
		if (rotated_width, rotated_height) != (width, height) {
			renderer.resize(rotated_width, rotated_height);
		}

		let displays = props.get_or(keys::DISPLAYS, "");
		if !displays.is_empty()
			&& let Some(ids) = parse_display_ids(&displays)
		{
			log::debug!("mirroring onto displays {ids:?}");
			renderer.set_display_targets(&ids);
		}

		log::info!("{phase}AnimationPreloadTiming {:?}", started.elapsed());
		let bundle = Loader::find_animation_file(&settings.bundles, props.as_ref(), shutting_down);
		let animation = bundle.as_deref().and_then(|path| match Loader::new(settings.system_animation()).load(path) {
			Ok(animation) => Some(animation),
			Err(e) => {
				log::error!("preload failed: {e}");
				None
			}
		});
		log::info!("{phase}AnimationPreloadStopTiming {:?}", started.elapsed());

		let exit = ExitSignal::new(props.clone());
		Self {
			settings,
			props,
			renderer,
			callbacks,
			media: None,
			exit,
			shutting_down,
			rotation,
			bundle,
			animation,
			started,
		}
	}

	/// Uses `service` to play the boot video
	pub fn with_media_service(mut self, service: Box<dyn MediaService>) -> Self {
		self.media = Some(service);
		self
	}

	/// Also stops on [`ControlEvent::ExitRequested`] messages from `events`
	pub fn with_control_events(mut self, events: Receiver<ControlEvent>) -> Self {
		self.exit = self.exit.with_events(events);
		self
	}

	/// Handle that stops playback from another thread
	pub fn exit_handle(&self) -> ExitHandle {
		self.exit.handle()
	}

	/// Drawing surface
	pub fn renderer(&self) -> &R {
		&self.renderer
	}

	/// Whether this is a shutdown animation
	pub fn is_shutting_down(&self) -> bool {
		self.shutting_down
	}

	/// Built-in rotation applied to the surface
	pub fn rotation(&self) -> Rotation {
		self.rotation
	}

	/// Selected bundle, if any
	pub fn bundle(&self) -> Option<&Path> {
		self.bundle.as_deref()
	}

	/// Preloaded animation, until it is played
	pub fn animation(&self) -> Option<&Animation> {
		self.animation.as_ref()
	}

	/// Plays according to the boot video configuration.
	///
	/// The running property reads 1 for the duration of the call.
	pub fn run(&mut self) -> Result<SessionReport, PlayerError> {
		self.props.set(keys::BOOT_VIDEO_RUNNING, "1");
		let report = self.play();
		self.props.set(keys::BOOT_VIDEO_RUNNING, "0");
		log::info!("{}AnimationStopTiming {:?}", phase(self.shutting_down), self.started.elapsed());
		report
	}

	fn play(&mut self) -> Result<SessionReport, PlayerError> {
		let mut report = SessionReport::default();
		if self.bundle.is_none() {
			log::info!("{}AnimationShownTiming {:?}", phase(self.shutting_down), self.started.elapsed());
			let outcome = LogoAnimation::default().play(&mut self.renderer, &mut self.exit, self.callbacks.as_ref())?;
			report.animation = Some(outcome);
			return Ok(report);
		}

		let vendor = self.props.get_int(keys::BOOT_VIDEO_VENDOR, -1);
		if vendor == -1 {
			report.animation = Some(self.movie()?);
			return Ok(report);
		}

		let mode = BootMode::from_vendor(vendor);
		let mut volume = VolumeController::new(VolumeState::initial(self.props.as_ref(), vendor), self.props.clone());
		log::debug!("boot mode {mode:?}, volume {:?}", volume.state());

		match mode {
			BootMode::Animation => report.animation = Some(self.movie()?),
			BootMode::AnimationThenVideo => {
				report.animation = Some(self.movie()?);
				report.video = Some(self.video(mode, &mut volume));
			}
			BootMode::VideoThenAnimation => {
				report.video = Some(self.video(mode, &mut volume));
				report.animation = Some(self.movie()?);
			}
			BootMode::VideoOnly => report.video = Some(self.video(mode, &mut volume)),
		}
		Ok(report)
	}

	fn video(&mut self, mode: BootMode, volume: &mut VolumeController) -> VideoOutcome {
		let Some(service) = self.media.as_deref() else {
			log::error!("boot video requested without a media service");
			return VideoOutcome::ServiceUnavailable;
		};
		VideoCoordinator::new(&self.settings, self.props.clone(), service).run(
			&mut self.renderer,
			mode,
			volume,
			&mut self.exit,
		)
	}

	/// Plays the bundle animation, loading it again if already played
	fn movie(&mut self) -> Result<PlaybackOutcome, PlayerError> {
		let animation = match (self.animation.take(), &self.bundle) {
			(Some(animation), _) => animation,
			(None, Some(path)) => Loader::new(self.settings.system_animation()).load(path)?,
			(None, None) => return Ok(PlaybackOutcome::Aborted),
		};

		for part in &animation.parts {
			if let Some(nested) = part.animation() {
				self.callbacks.init(&nested.parts);
			}
		}
		self.callbacks.init(&animation.parts);

		let clock = if animation.wants_clock() {
			self.load_clock(&animation)
		} else {
			None
		};
		let time_check = match &clock {
			Some(overlay) if !self.shutting_down => {
				TimeCheckThread::spawn(overlay.accuracy(), self.settings.time.clone(), overlay.enabled_flag())
			}
			_ => None,
		};

		log::info!("{}AnimationShownTiming {:?}", phase(self.shutting_down), self.started.elapsed());
		let mut inset = InsetAnimator::new(self.shutting_down);
		let mut scheduler = Scheduler::new();
		let outcome = scheduler.play(&animation, &mut PlaybackContext {
			renderer: &mut self.renderer,
			props: self.props.as_ref(),
			callbacks: self.callbacks.as_ref(),
			exit: &mut self.exit,
			inset: &mut inset,
			clock: clock.as_ref(),
		});
		log::debug!("'{}': {outcome:?} after {} frames", animation.file_name, scheduler.frames_presented());

		if let Some(thread) = time_check {
			thread.stop();
		}
		if let Some(overlay) = clock {
			overlay.release(&mut self.renderer);
		}
		Ok(outcome)
	}

	fn load_clock(&mut self, animation: &Animation) -> Option<ClockOverlay> {
		let data = match &animation.clock_font {
			Some(data) => data.to_vec(),
			None => match fs::read(&self.settings.clock_font_fallback) {
				Ok(data) => data,
				Err(e) => {
					log::warn!("clock disabled: {}: {e}", self.settings.clock_font_fallback.display());
					return None;
				}
			},
		};
		match ClockFont::load(&mut self.renderer, &data) {
			Ok(font) => Some(ClockOverlay::new(font, Arc::new(TimeAccuracy::default()))),
			Err(e) => {
				log::warn!("clock disabled: {e}");
				None
			}
		}
	}
}

fn phase(shutting_down: bool) -> &'static str {
	if shutting_down {
		"Shutdown"
	} else {
		"Boot"
	}
}
