//! Boot animation bundle utility.
//!
//! Provides three subcommands:
//! - `inspect`: list a bundle's entries and the parsed animation.
//! - `pack`: build a stored bundle from a directory tree.
//! - `play`: play a bundle on the CPU renderer and save the last frame.

use std::{
	cell::RefCell,
	fs,
	io::Cursor,
	path::{Path, PathBuf},
	sync::Arc,
	thread,
	time::Duration,
};

use anyhow::{Context, Result, bail};
use bootanim_rs::{
	bootanim_player::{
		BootAnimation, Callbacks, CpuRenderer, LogCallbacks, PropertyStore, Settings, properties::keys,
	},
	prelude::*,
};
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use walkdir::WalkDir;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Inspect(opts) => run_inspect(opts),
		Command::Pack(opts) => run_pack(opts),
		Command::Play(opts) => run_play(opts),
	}
}

#[derive(Parser)]
#[command(name = "bootanim_utils")]
#[command(author = "bootanim-rs project")]
#[command(version)]
#[command(about = "Inspect, pack and play boot animation bundles", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Show the entries and parsed animation of a bundle
	Inspect(InspectArgs),
	/// Pack a directory into a stored bundle
	Pack(PackArgs),
	/// Play a bundle on the CPU renderer
	Play(PlayArgs),
}

#[derive(Args)]
struct InspectArgs {
	/// Bundle to inspect
	#[arg(value_name = "BUNDLE")]
	bundle: PathBuf,

	/// Print a JSON summary instead of text
	#[arg(long, default_value_t = false)]
	json: bool,
}

#[derive(Args)]
struct PackArgs {
	/// Directory holding desc.txt and the part directories
	#[arg(value_name = "DIR")]
	dir: PathBuf,

	/// Output bundle
	#[arg(value_name = "OUT")]
	out: PathBuf,
}

#[derive(Args)]
struct PlayArgs {
	/// Bundle to play
	#[arg(value_name = "BUNDLE")]
	bundle: PathBuf,

	/// Optional settings file (TOML)
	#[arg(short, long, value_name = "FILE", env = "BOOTANIM_SETTINGS")]
	settings: Option<PathBuf>,

	/// Surface width
	#[arg(long, default_value_t = 1080)]
	width: u32,

	/// Surface height
	#[arg(long, default_value_t = 1920)]
	height: u32,

	/// Request exit after this many milliseconds
	#[arg(long, value_name = "MS")]
	exit_after_ms: Option<u64>,

	/// Save the last presented frame as PNG
	#[arg(long, value_name = "FILE")]
	out: Option<PathBuf>,

	/// Play part audio through the default output device
	#[arg(long, default_value_t = false)]
	audio: bool,
}

fn run_inspect(args: InspectArgs) -> Result<()> {
	let archive = Archive::open(&args.bundle).with_context(|| format!("Failed to open {}", args.bundle.display()))?;
	let mut loader = Loader::new(sibling(&args.bundle, "bootanimation.zip"));
	let animation = loader.load(&args.bundle).with_context(|| format!("Failed to load {}", args.bundle.display()))?;

	if args.json {
		let summary = serde_json::json!({
			"file": animation.file_name,
			"width": animation.width,
			"height": animation.height,
			"fps": animation.fps,
			"clock_font": animation.clock_font.is_some(),
			"entries": archive.len(),
			"parts": animation.parts.iter().map(|part| serde_json::json!({
				"path": part.path,
				"count": part.count,
				"pause": part.pause,
				"play_until_complete": part.play_until_complete,
				"frames": part.frames().len(),
				"nested": part.animation().map(|a| a.file_name.clone()),
				"audio_ms": part.audio.as_ref().map(|a| a.duration().as_millis() as u64),
				"clock": part.has_clock(),
			})).collect::<Vec<_>>(),
		});
		println!("{}", serde_json::to_string_pretty(&summary)?);
		return Ok(());
	}

	println!("Bundle: {} ({} entries)", args.bundle.display(), archive.len());
	for entry in archive.entries() {
		let method = if entry.is_stored() {
			"stored"
		} else {
			"compressed"
		};
		println!("  {:<40} {:>10} bytes  crc {:08x}  {method}", entry.name, entry.uncompressed_size, entry.crc32);
	}

	println!();
	println!(
		"Animation: {}x{} @ {} fps, {} frames, clock font: {}",
		animation.width,
		animation.height,
		animation.fps,
		animation.frame_count(),
		if animation.clock_font.is_some() {
			"yes"
		} else {
			"no"
		}
	);
	for (index, part) in animation.parts.iter().enumerate() {
		match part.animation() {
			Some(nested) => println!("  [{index}] nested '{}' ({} parts)", nested.file_name, nested.parts.len()),
			None => println!(
				"  [{index}] '{}' count={} pause={} frames={}{}{}{}",
				part.path,
				part.count,
				part.pause,
				part.frames().len(),
				if part.play_until_complete {
					" complete"
				} else {
					""
				},
				if part.audio.is_some() {
					" audio"
				} else {
					""
				},
				if part.has_clock() {
					" clock"
				} else {
					""
				},
			),
		}
	}
	Ok(())
}

fn run_pack(args: PackArgs) -> Result<()> {
	if !args.dir.join(DESC_ENTRY).is_file() {
		bail!("{} has no {DESC_ENTRY}", args.dir.display());
	}

	let mut files = Vec::new();
	for entry in WalkDir::new(&args.dir).follow_links(false).sort_by_file_name() {
		let entry = match entry {
			Ok(entry) => entry,
			Err(err) => {
				warn!("{err}");
				continue;
			}
		};
		if entry.depth() == 0 {
			continue;
		}
		let relative = entry.path().strip_prefix(&args.dir)?;
		let name = relative.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/");
		if entry.file_type().is_dir() {
			files.push((format!("{name}/"), Vec::new()));
		} else if entry.file_type().is_file() {
			let data = fs::read(entry.path()).with_context(|| format!("Failed to read {}", entry.path().display()))?;
			files.push((name, data));
		}
	}

	let mut builder = ArchiveBuilder::new();
	for (name, data) in &files {
		builder.add(name.as_str(), data);
	}
	builder.save_to_file(&args.out).with_context(|| format!("Failed to write {}", args.out.display()))?;
	info!("packed {} entries into {}", builder.len(), args.out.display());
	Ok(())
}

fn run_play(args: PlayArgs) -> Result<()> {
	let mut settings = Settings::load(args.settings.as_deref())?;
	settings.bundles.apex = args.bundle.clone();
	let props: Arc<dyn PropertyStore> = Arc::new(settings.property_store());
	props.set(keys::EXIT, "0");

	let callbacks: Box<dyn Callbacks> = if args.audio {
		match AudioCallbacks::new() {
			Ok(audio) => Box::new(audio),
			Err(e) => {
				warn!("audio disabled: {e}");
				Box::new(LogCallbacks)
			}
		}
	} else {
		Box::new(LogCallbacks)
	};

	let renderer = CpuRenderer::new(args.width, args.height);
	let mut session = BootAnimation::new(settings, props, renderer, callbacks);
	if session.bundle().is_none() {
		warn!("{} is not readable, playing the built-in logo", args.bundle.display());
	}

	let stopper = args.exit_after_ms.map(|ms| {
		let handle = session.exit_handle();
		thread::spawn(move || {
			thread::sleep(Duration::from_millis(ms));
			handle.request();
		})
	});
	if stopper.is_none() && session.animation().is_some_and(|a| a.parts.iter().any(Part::is_infinite)) {
		warn!("the bundle loops forever; pass --exit-after-ms to stop it");
	}

	let report = session.run()?;
	if let Some(stopper) = stopper
		&& stopper.join().is_err()
	{
		bail!("exit timer panicked");
	}

	let stats = session.renderer().stats();
	println!("Outcome: {report:?}");
	println!("Frames presented: {}, textures uploaded: {}", stats.presents, stats.uploads);

	if let Some(out) = args.out {
		session.renderer().frame().save(&out).with_context(|| format!("Failed to save {}", out.display()))?;
		println!("Last frame saved to {}", out.display());
	}
	Ok(())
}

/// Plays each part's clip when the part starts
struct AudioCallbacks {
	_stream: rodio::OutputStream,
	sink: RefCell<Option<rodio::Sink>>,
	handle: rodio::OutputStreamHandle,
}

impl AudioCallbacks {
	fn new() -> Result<Self> {
		let (stream, handle) = rodio::OutputStream::try_default().context("No audio output device")?;
		Ok(Self {
			_stream: stream,
			sink: RefCell::new(None),
			handle,
		})
	}
}

impl Callbacks for AudioCallbacks {
	fn play_part(&self, index: usize, part: &Part, repeat: u32) {
		let Some(clip) = &part.audio else {
			return;
		};
		if repeat > 0 {
			return;
		}
		let source = match rodio::Decoder::new(Cursor::new(clip.as_bytes().clone())) {
			Ok(source) => source,
			Err(e) => {
				warn!("part {index} audio: {e}");
				return;
			}
		};
		match rodio::Sink::try_new(&self.handle) {
			Ok(sink) => {
				sink.append(source);
				*self.sink.borrow_mut() = Some(sink);
			}
			Err(e) => warn!("part {index} audio: {e}"),
		}
	}

	fn shutdown(&self) {
		if let Some(sink) = self.sink.borrow_mut().take() {
			sink.stop();
		}
	}
}

fn sibling(path: &Path, name: &str) -> PathBuf {
	path.parent().map_or_else(|| PathBuf::from(name), |dir| dir.join(name))
}
