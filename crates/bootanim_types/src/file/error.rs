//! Error types for bundle parsing and manipulation.

use thiserror::Error;

/// File kinds found inside (or as) a boot animation bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// The bundle container itself
	Zip,
	/// `desc.txt` animation descriptor
	Desc,
	/// Per-part `trim.txt`
	Trim,
	/// Per-part `audio.wav`
	Audio,
	/// Clock font bitmap
	Font,
}

impl std::fmt::Display for FileType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Zip => write!(f, "ZIP"),
			Self::Desc => write!(f, "desc.txt"),
			Self::Trim => write!(f, "trim.txt"),
			Self::Audio => write!(f, "audio.wav"),
			Self::Font => write!(f, "clock font"),
		}
	}
}

/// Errors that can occur when reading or writing a bundle container
#[derive(Debug, Error)]
pub enum BundleError {
	/// Not enough data to parse
	#[error("{file_type}: insufficient data, expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// File being parsed
		file_type: FileType,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// A record signature did not match
	#[error("{file_type}: invalid signature, expected {expected:08X}, got {actual:08X}")]
	InvalidSignature {
		/// File being parsed
		file_type: FileType,
		/// Expected signature
		expected: u32,
		/// Signature found in the data
		actual: u32,
	},

	/// No end of central directory record was found
	#[error("end of central directory record not found")]
	MissingDirectory,

	/// A named entry does not exist in the container
	#[error("{file_type}: entry not found: {name}")]
	EntryNotFound {
		/// File being looked up
		file_type: FileType,
		/// Entry name
		name: String,
	},

	/// The entry uses a compression method other than "stored"
	#[error("entry '{name}' is compressed (method {method}); only stored entries are supported")]
	Compressed {
		/// Entry name
		name: String,
		/// ZIP compression method id
		method: u16,
	},

	/// An entry's data range lies outside the container
	#[error("entry '{name}' data out of range: needs {required} bytes, container has {available}")]
	OutOfRange {
		/// Entry name
		name: String,
		/// Number of bytes required
		required: usize,
		/// Number of bytes available
		available: usize,
	},

	/// The entry is too large to be written
	#[error("entry '{name}' too large for a ZIP32 container")]
	TooLarge {
		/// Entry name
		name: String,
	},

	/// Text payload is not valid UTF-8
	#[error("{file_type}: invalid UTF-8 text")]
	BadEncoding {
		/// File being decoded
		file_type: FileType,
	},

	/// Audio payload rejected by the WAV reader
	#[error(transparent)]
	Wav(#[from] hound::Error),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

impl BundleError {
	/// Creates an [`BundleError::InsufficientData`] error.
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Creates an [`BundleError::InvalidSignature`] error.
	pub fn invalid_signature(file_type: FileType, expected: u32, actual: u32) -> Self {
		Self::InvalidSignature {
			file_type,
			expected,
			actual,
		}
	}

	/// Creates an [`BundleError::EntryNotFound`] error.
	pub fn entry_not_found(file_type: FileType, name: impl Into<String>) -> Self {
		Self::EntryNotFound {
			file_type,
			name: name.into(),
		}
	}
}

/// Errors produced while validating an animation descriptor
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescError {
	/// The bundle has no `desc.txt`
	#[error("desc.txt is missing")]
	Missing,

	/// No usable frame rate was declared
	#[error("animation declares fps {0}; fps must be positive")]
	ZeroFps(i32),

	/// A part must play to completion yet repeats forever
	#[error("part '{path}' is play-until-complete with an infinite repeat count")]
	UnboundedCompletePart {
		/// Part directory
		path: String,
	},
}
