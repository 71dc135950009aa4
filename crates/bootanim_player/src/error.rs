//! Error types for loading and playback.

use std::path::PathBuf;

use bootanim_types::file::{BundleError, DescError};
use thiserror::Error;

/// Reasons a bundle could not be turned into an animation
#[derive(Debug, Error)]
pub enum LoadError {
	/// The path is already being loaded further up the stack
	#[error("'{}' is already being loaded; cyclic references are not allowed", path.display())]
	Cycle {
		/// Bundle path
		path: PathBuf,
	},

	/// The archive could not be opened or parsed
	#[error("failed to open animation bundle '{}': {source}", path.display())]
	Open {
		/// Bundle path
		path: PathBuf,
		/// Underlying container error
		#[source]
		source: BundleError,
	},

	/// `desc.txt` could not be read
	#[error("failed to read desc.txt in '{}': {source}", path.display())]
	Read {
		/// Bundle path
		path: PathBuf,
		/// Underlying container error
		#[source]
		source: BundleError,
	},

	/// `desc.txt` is missing or describes an unplayable animation
	#[error("invalid animation '{}': {source}", path.display())]
	Description {
		/// Bundle path
		path: PathBuf,
		/// Validation failure
		#[source]
		source: DescError,
	},
}

impl LoadError {
	/// Bundle path the error refers to
	pub fn path(&self) -> &PathBuf {
		match self {
			Self::Cycle {
				path,
			}
			| Self::Open {
				path, ..
			}
			| Self::Read {
				path, ..
			}
			| Self::Description {
				path, ..
			} => path,
		}
	}
}

/// Runtime errors outside of bundle loading
#[derive(Debug, Error)]
pub enum PlayerError {
	/// Settings could not be assembled
	#[error("settings: {0}")]
	Settings(#[from] config::ConfigError),

	/// A filesystem watcher could not be set up
	#[error("watcher: {0}")]
	Watch(#[from] notify::Error),

	/// An image could not be decoded
	#[error("image: {0}")]
	Decode(#[from] image::ImageError),

	/// Bundle level failure
	#[error(transparent)]
	Bundle(#[from] BundleError),

	/// Bundle could not be loaded
	#[error(transparent)]
	Load(#[from] LoadError),

	/// The clock font bitmap cannot hold a glyph grid
	#[error("clock font {width}x{height} is too small for a 16x6 glyph grid")]
	FontTooSmall {
		/// Bitmap width
		width: u32,
		/// Bitmap height
		height: u32,
	},

	/// Media service or player failure
	#[error("media: {0}")]
	Media(String),

	/// Rendering backend failure
	#[error("renderer: {0}")]
	Renderer(String),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}
