//! Turns bundle archives into [`Animation`]s.

use std::{
	collections::{HashMap, HashSet},
	fs::File,
	path::{Path, PathBuf},
};

use bootanim_types::{
	animation::{Animation, Frame, Part},
	audio::AudioClip,
	file::{
		AUDIO_ENTRY, Archive, CLOCK_FONT_ENTRY, DESC_ENTRY, DescError, Description, PartLine, TRIM_ENTRY, TrimRect,
		apply_trim, zip::constants::MAX_ENTRY_NAME,
	},
};

use crate::{
	error::LoadError,
	properties::{PropertyStore, keys},
	settings::BundlePaths,
};

/// Loads bundles, refusing to re-enter a bundle already being loaded
#[derive(Debug)]
pub struct Loader {
	system_animation: PathBuf,
	loading: HashSet<PathBuf>,
}

impl Loader {
	/// Creates a loader; `$SYSTEM` lines load `system_animation`
	pub fn new(system_animation: impl Into<PathBuf>) -> Self {
		Self {
			system_animation: system_animation.into(),
			loading: HashSet::new(),
		}
	}

	/// Bundles currently being loaded
	pub fn in_progress(&self) -> impl Iterator<Item = &Path> {
		self.loading.iter().map(PathBuf::as_path)
	}

	/// Loads the bundle at `path`.
	///
	/// `$SYSTEM` parts are loaded recursively; a nested bundle that fails to
	/// load, including one that would recurse into a bundle already being
	/// loaded, is left out with a warning.
	pub fn load(&mut self, path: impl AsRef<Path>) -> Result<Animation, LoadError> {
		let path = path.as_ref().to_path_buf();
		if !self.loading.insert(path.clone()) {
			return Err(LoadError::Cycle {
				path,
			});
		}

		let result = self.load_bundle(&path);
		self.loading.remove(&path);

		if let Ok(animation) = &result {
			log::debug!(
				"loaded '{}': {}x{} @ {} fps, {} parts, {} frames",
				path.display(),
				animation.width,
				animation.height,
				animation.fps,
				animation.parts.len(),
				animation.frame_count()
			);
		}
		result
	}

	fn load_bundle(&mut self, path: &Path) -> Result<Animation, LoadError> {
		let archive = Archive::open(path).map_err(|source| LoadError::Open {
			path: path.to_path_buf(),
			source,
		})?;

		let desc_entry = archive.find(DESC_ENTRY).ok_or_else(|| LoadError::Description {
			path: path.to_path_buf(),
			source: DescError::Missing,
		})?;
		let desc = archive
			.entry_data(desc_entry)
			.and_then(|data| Description::from_bytes(&data))
			.map_err(|source| LoadError::Read {
				path: path.to_path_buf(),
				source,
			})?;

		let mut animation = Animation::new(path.display().to_string(), desc.width, desc.height, desc.fps);
		for line in &desc.parts {
			match line {
				PartLine::Frames(spec) => animation.parts.push(Part::from_spec(spec)),
				PartLine::System => {
					let system = self.system_animation.clone();
					match self.load(&system) {
						Ok(nested) => animation.parts.push(Part::nested(nested)),
						Err(e) => log::warn!("skipping $SYSTEM part: {e}"),
					}
				}
			}
		}

		animation.validate().map_err(|source| LoadError::Description {
			path: path.to_path_buf(),
			source,
		})?;

		self.collect_entries(&archive, &mut animation);
		Ok(animation)
	}

	fn collect_entries(&self, archive: &Archive, animation: &mut Animation) {
		let full = TrimRect::full(animation.width, animation.height);
		let mut trims = HashMap::new();

		for entry in archive.entries() {
			if entry.name.len() > MAX_ENTRY_NAME {
				log::error!("entry name too long: '{}'", entry.name);
				continue;
			}
			let leaf = entry.base_name();
			if leaf.is_empty() {
				continue;
			}

			if entry.name == CLOCK_FONT_ENTRY {
				match archive.entry_data(entry) {
					Ok(data) => animation.clock_font = Some(data),
					Err(e) => log::error!("cannot read {CLOCK_FONT_ENTRY}: {e}"),
				}
				continue;
			}

			let dir = entry.dir_name();
			for (index, part) in animation.parts.iter_mut().enumerate() {
				if part.path != dir || part.frames_mut().is_none() {
					continue;
				}
				if !entry.is_stored() {
					log::error!("'{}' is compressed; only stored entries are supported", entry.name);
					continue;
				}
				let data = match archive.entry_data(entry) {
					Ok(data) => data,
					Err(e) => {
						log::error!("cannot read '{}': {e}", entry.name);
						continue;
					}
				};

				match leaf {
					AUDIO_ENTRY => match AudioClip::from_wav(data) {
						Ok(clip) => part.audio = Some(clip),
						Err(e) => log::warn!("'{}': invalid audio: {e}", entry.name),
					},
					TRIM_ENTRY => {
						trims.insert(index, data);
					}
					_ => part.insert_frame(Frame {
						name: leaf.to_string(),
						data,
						trim: full,
					}),
				}
			}
		}

		for (index, data) in trims {
			let text = String::from_utf8_lossy(&data);
			if let Some(frames) = animation.parts[index].frames_mut() {
				let applied = apply_trim(frames, &text);
				log::trace!("part {index}: {applied} trim rects");
			}
		}
	}

	/// Picks the bundle to play.
	///
	/// The first readable candidate wins: encrypted bundles while the device
	/// is encrypted, userspace reboot bundles during a userspace reboot,
	/// shutdown bundles while shutting down, otherwise the boot list (APEX,
	/// product or its dark variant, OEM, system).
	pub fn find_animation_file(
		paths: &BundlePaths,
		props: &dyn PropertyStore,
		shutting_down: bool,
	) -> Option<PathBuf> {
		let decrypt = props.get_or(keys::DECRYPT, "");
		let encrypted = props.get_int(keys::DECRYPT, 0) != 0 || decrypt == "trigger_restart_min_framework";

		if !shutting_down
			&& encrypted
			&& let Some(path) = first_readable(&paths.encrypted)
		{
			return Some(path);
		}

		let candidates = if props.get_bool(keys::USERSPACE_REBOOT, false) {
			paths.userspace_reboot.clone()
		} else if shutting_down {
			paths.shutdown.clone()
		} else {
			let product = if props.get_int_in_range(keys::THEME, 0, 0, 1) == 1 {
				paths.product_dark.clone()
			} else {
				paths.product.clone()
			};
			vec![paths.apex.clone(), product, paths.oem.clone(), paths.system.clone()]
		};

		let found = first_readable(&candidates);
		match &found {
			Some(path) => log::info!("using animation '{}'", path.display()),
			None => log::info!("no animation bundle found"),
		}
		found
	}
}

fn first_readable(candidates: &[PathBuf]) -> Option<PathBuf> {
	candidates.iter().find(|p| File::open(p).is_ok_and(|f| f.metadata().is_ok_and(|m| m.is_file()))).cloned()
}
