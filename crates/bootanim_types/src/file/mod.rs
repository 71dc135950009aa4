//! Bundle file format support for `bootanim-rs`.

mod error;

pub mod desc;
pub mod font;
pub mod trim;
pub mod zip;

/// Descriptor entry name at the bundle root
pub const DESC_ENTRY: &str = "desc.txt";

/// Per-part audio entry name
pub const AUDIO_ENTRY: &str = "audio.wav";

/// Per-part trim entry name
pub const TRIM_ENTRY: &str = "trim.txt";

// Re-export unified error types
pub use error::{BundleError, DescError, FileType};

// Re-export main file types
pub use desc::{ClockPosition, Description, PartLine, PartSpec, TextCoord};
pub use font::{CLOCK_FONT_ENTRY, FontGrid, GlyphRect};
pub use trim::{TrimRect, apply_trim};
pub use zip::{Archive, ArchiveBuilder, Entry as ZipEntry};
