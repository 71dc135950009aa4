#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `bootanim-rs` plays Android style boot animation bundles: a stored ZIP
//! holding `desc.txt`, per-part frame directories and optional clock font,
//! trim and audio entries.
//!
//! See [`bootanim_player`] for the runtime and [`bootanim_types`] for the
//! bundle formats.
//!
pub use bootanim_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use bootanim_dylib;
