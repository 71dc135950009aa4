//! This crate provides the data model and bundle formats for the `bootanim-rs` project.
//!
//! # File Formats
//!
//! - **ZIP**: stored (uncompressed) bundle container, read zero-copy
//! - **`desc.txt`**: canvas size, frame rate and part list
//! - **`trim.txt`**: per-frame visible rectangles
//! - **`clock_font.png`**: glyph grid geometry for the clock overlay
//! - **`audio.wav`**: per-part sound, validated on load
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use bootanim_types::prelude::*;
//!
//! let archive = Archive::open("/system/media/bootanimation.zip").unwrap();
//! let desc = Description::from_bytes(&archive.read(DESC_ENTRY).unwrap()).unwrap();
//! println!("{}x{} @ {} fps", desc.width, desc.height, desc.fps);
//! ```
//!
//! Or use explicit paths:
//!
//! ```
//! use bootanim_types::file::desc::{parse_position, TextCoord};
//!
//! let pos = parse_position("c", "-40");
//! assert_eq!(pos.y, TextCoord::Offset(-40));
//! ```

pub mod animation;
pub mod audio;
pub mod file;

/// `use bootanim_types::prelude::*;` to import commonly used items.
pub mod prelude;
