//! Prelude module for `bootanim_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```
//! use bootanim_types::prelude::*;
//!
//! let desc = Description::parse("480 800 30\np 1 0 part0\n");
//! assert_eq!(desc.parts.len(), 1);
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Entry names
	AUDIO_ENTRY,
	CLOCK_FONT_ENTRY,
	DESC_ENTRY,
	TRIM_ENTRY,

	// Container
	Archive,
	ArchiveBuilder,
	ZipEntry,

	// Errors
	BundleError,
	DescError,
	FileType,

	// Descriptor
	ClockPosition,
	Description,
	PartLine,
	PartSpec,
	TextCoord,

	// Trim and font
	FontGrid,
	GlyphRect,
	TrimRect,
	apply_trim,
};

// Model types
#[doc(inline)]
pub use crate::animation::{Animation, Frame, Part, PartContent};

#[doc(inline)]
pub use crate::audio::AudioClip;

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
