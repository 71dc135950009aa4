//! Sessions and scheduling through the public API

use std::{
	sync::{Arc, Mutex},
	thread,
	time::{Duration, Instant},
};

use bootanim_rs::{
	bootanim_player::{
		ExitSignal, InsetAnimator, PlaybackContext, SessionReport, Settings, properties::keys,
	},
	prelude::*,
};

use crate::common::{Scratch, loader, png, wav};

type Events = Arc<Mutex<Vec<String>>>;

struct Recorder(Events);

impl Callbacks for Recorder {
	fn init(&self, parts: &[Part]) {
		self.0.lock().unwrap().push(format!("init {}", parts.len()));
	}

	fn play_part(&self, index: usize, part: &Part, repeat: u32) {
		let audio = if part.audio.is_some() {
			" audio"
		} else {
			""
		};
		self.0.lock().unwrap().push(format!("part {index}.{repeat}{audio}"));
	}

	fn shutdown(&self) {
		self.0.lock().unwrap().push("shutdown".into());
	}
}

fn settings_for(dir: &Scratch, bundle: &std::path::Path) -> Settings {
	let mut settings = Settings::default();
	settings.bundles.apex = bundle.to_path_buf();
	settings.bundles.system = dir.path("system.zip");
	settings.time = bootanim_rs::bootanim_player::settings::TimePaths::under(dir.path("data"));
	settings.clock_font_fallback = dir.path("clock_font.png");
	settings
}

#[test_log::test]
fn test_session_plays_minimal_bundle_to_completion() {
	let dir = Scratch::new("e2e");
	let bundle = dir.bundle("boot.zip", "480 800 30\np 1 0 part0\n", &[("part0/000.png", png(480, 800, [200, 10, 10, 255]))]);
	let props = Arc::new(MemoryProperties::new());
	let events = Events::default();

	let mut session = BootAnimation::new(
		settings_for(&dir, &bundle),
		props.clone(),
		CpuRenderer::new(480, 800),
		Box::new(Recorder(events.clone())),
	);
	let report = session.run().unwrap();

	assert_eq!(
		report,
		SessionReport {
			animation: Some(PlaybackOutcome::Completed),
			video: None,
		}
	);
	assert_eq!(*events.lock().unwrap(), ["init 1", "part 0.0"]);
	let renderer = session.renderer();
	assert_eq!(renderer.stats().presents, 1);
	assert_eq!(renderer.frame().get_pixel(240, 400).0[..3], [200, 10, 10]);
	assert_eq!(renderer.live_textures(), 0);
	assert_eq!(props.get(keys::BOOT_VIDEO_RUNNING).as_deref(), Some("0"));
}

#[test_log::test]
fn test_frame_pacing_follows_fps() {
	let dir = Scratch::new("pacing");
	let frames: Vec<_> = (0..5).map(|i| (format!("p/{i:03}.png"), png(8, 8, [i * 40, 0, 0, 255]))).collect();
	let entries: Vec<_> = frames.iter().map(|(n, d)| (n.as_str(), d.clone())).collect();
	let bundle = dir.bundle("boot.zip", "8 8 10\np 1 0 p\n", &entries);
	let animation = loader(&dir.path("system.zip")).load(&bundle).unwrap();

	let props = Arc::new(MemoryProperties::new());
	let mut renderer = CpuRenderer::new(8, 8);
	let mut exit = ExitSignal::new(props.clone());
	let mut inset = InsetAnimator::new(false);
	let mut scheduler = Scheduler::new();

	let start = Instant::now();
	let outcome = scheduler.play(&animation, &mut PlaybackContext {
		renderer: &mut renderer,
		props: props.as_ref(),
		callbacks: &NoopCallbacks,
		exit: &mut exit,
		inset: &mut inset,
		clock: None,
	});
	let elapsed = start.elapsed();

	assert_eq!(outcome, PlaybackOutcome::Completed);
	assert_eq!(scheduler.frames_presented(), 5);
	assert!(elapsed >= Duration::from_millis(450), "{elapsed:?}");
	assert!(elapsed < Duration::from_secs(3), "{elapsed:?}");
}

#[test_log::test]
fn test_exit_property_stops_looping_part_and_finishes_complete_part() {
	let dir = Scratch::new("exit");
	let bundle = dir.bundle(
		"boot.zip",
		"8 8 50\np 0 0 loop\nc 1 0 outro\n",
		&[
			("loop/000.png", png(8, 8, [1, 1, 1, 255])),
			("loop/001.png", png(8, 8, [2, 2, 2, 255])),
			("outro/000.png", png(8, 8, [3, 3, 3, 255])),
			("outro/001.png", png(8, 8, [4, 4, 4, 255])),
			("outro/audio.wav", wav()),
		],
	);
	let props = Arc::new(MemoryProperties::new());
	let events = Events::default();
	let mut session = BootAnimation::new(
		settings_for(&dir, &bundle),
		props.clone(),
		CpuRenderer::new(8, 8),
		Box::new(Recorder(events.clone())),
	);

	let setter = {
		let props = props.clone();
		thread::spawn(move || {
			thread::sleep(Duration::from_millis(150));
			props.set(keys::EXIT, "1");
		})
	};
	let start = Instant::now();
	let report = session.run().unwrap();
	setter.join().unwrap();

	assert_eq!(report.animation, Some(PlaybackOutcome::Exited));
	assert!(start.elapsed() < Duration::from_secs(3));

	let events = events.lock().unwrap();
	assert_eq!(events.iter().filter(|e| *e == "shutdown").count(), 1);
	assert_eq!(events.last().map(String::as_str), Some("part 1.0 audio"));
	// The outro still shows both frames after the exit request
	assert_eq!(session.renderer().frame().get_pixel(4, 4).0[0], 4);
}

#[test_log::test]
fn test_exit_handle_stops_builtin_logo() {
	let dir = Scratch::new("logo");
	let props = Arc::new(MemoryProperties::new());
	let mut session = BootAnimation::new(
		settings_for(&dir, &dir.path("missing.zip")),
		props,
		CpuRenderer::new(320, 240),
		Box::new(NoopCallbacks),
	);
	let handle = session.exit_handle();
	let stopper = thread::spawn(move || {
		thread::sleep(Duration::from_millis(250));
		handle.request();
	});

	let report = session.run().unwrap();
	stopper.join().unwrap();
	assert_eq!(report.animation, Some(PlaybackOutcome::Exited));
	assert!(session.renderer().stats().presents >= 2);
}
