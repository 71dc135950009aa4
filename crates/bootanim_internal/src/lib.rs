//! This module is separated into its own crate to enable simple dynamic linking for `bootanim`, and should not be used directly.

/// `use bootanim::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the member crates for convenience
pub use bootanim_player;
pub use bootanim_types;

// Re-export commonly used types at crate root
pub use bootanim_player::{BootAnimation, Loader, PlayerError, Settings};
pub use bootanim_types::file::{Archive, BundleError, Description};
