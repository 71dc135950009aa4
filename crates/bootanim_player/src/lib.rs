//! Runtime of the `bootanim-rs` project: loads a boot animation bundle and
//! plays it frame by frame on a [`Renderer`].
//!
//! # Overview
//!
//! - [`Loader`] reads a bundle, following `$SYSTEM` parts and rejecting cycles
//! - [`Scheduler`] plays parts at the bundle frame rate, honouring exit requests
//! - [`ClockOverlay`] and [`TimeCheckThread`] show the wall clock once it is trusted
//! - [`video`] plays the boot video with its volume overlay
//! - [`BootAnimation`] ties it together for one boot or shutdown
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use bootanim_player::{BootAnimation, CpuRenderer, LogCallbacks, Settings};
//!
//! let settings = Settings::load(None).unwrap();
//! let props = Arc::new(settings.property_store());
//! let mut session = BootAnimation::new(settings, props, CpuRenderer::new(1080, 1920), Box::new(LogCallbacks));
//! let report = session.run().unwrap();
//! println!("{report:?}");
//! ```

pub mod callbacks;
pub mod clock;
pub mod control;
pub mod error;
pub mod fallback;
pub mod loader;
pub mod properties;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod texture;
pub mod time_check;
pub mod video;
pub mod viewport;

pub use callbacks::{Callbacks, LogCallbacks, NoopCallbacks};
pub use clock::{ClockFont, ClockOverlay};
pub use control::{ControlEvent, ExitHandle, ExitSignal};
pub use error::{LoadError, PlayerError};
pub use fallback::LogoAnimation;
pub use loader::Loader;
pub use properties::{MemoryProperties, PropertyStore};
pub use render::{CpuRenderer, Rect, Renderer};
pub use scheduler::{PlaybackContext, PlaybackOutcome, PlaybackState, Scheduler};
pub use session::{BootAnimation, SessionReport};
pub use settings::Settings;
pub use time_check::{TimeAccuracy, TimeCheckThread};
pub use video::{BootMode, VideoCoordinator, VideoOutcome};
pub use viewport::InsetAnimator;
