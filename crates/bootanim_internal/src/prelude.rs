//! Prelude module for `bootanim_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use bootanim_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let desc = Description::parse("480 800 30\np 1 0 part0\n");
//! let animation = Animation::new("bootanimation.zip", desc.width, desc.height, desc.fps);
//! let mut renderer = CpuRenderer::new(480, 800);
//! assert_eq!(renderer.size(), (480, 800));
//! assert!(animation.validate().is_ok());
//! ```

// Re-export everything from bootanim_types::prelude
#[doc(inline)]
pub use bootanim_types::prelude::*;

// Runtime types
#[doc(inline)]
pub use bootanim_player::{
	BootAnimation, BootMode, Callbacks, ControlEvent, CpuRenderer, ExitHandle, LoadError, Loader, LogCallbacks,
	MemoryProperties, NoopCallbacks, PlaybackOutcome, PlayerError, PropertyStore, Renderer, Scheduler, SessionReport,
	Settings,
};

// Re-export the entire member crates for advanced usage
#[doc(inline)]
pub use bootanim_player;
#[doc(inline)]
pub use bootanim_types;
