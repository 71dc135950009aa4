//! Exit requests and control messages.

use std::sync::{
	Arc,
	atomic::{AtomicBool, Ordering},
	mpsc::{Receiver, TryRecvError},
};

use crate::{
	callbacks::Callbacks,
	properties::{PropertyStore, keys},
};

/// Messages delivered to the playback loops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlEvent {
	/// Volume up or page up key
	VolumeUp,
	/// Volume down or page down key
	VolumeDown,
	/// Mute key
	Mute,
	/// Stop the animation
	ExitRequested,
}

/// Cloneable handle that requests exit from any thread
#[derive(Debug, Clone, Default)]
pub struct ExitHandle(Arc<AtomicBool>);

impl ExitHandle {
	/// Requests exit
	pub fn request(&self) {
		self.0.store(true, Ordering::Release);
	}

	/// Whether exit was requested
	pub fn is_requested(&self) -> bool {
		self.0.load(Ordering::Acquire)
	}
}

/// Exit state of a playback session.
///
/// Exit becomes pending when the handle is triggered, the exit property
/// parses to a non-zero integer, or an [`ControlEvent::ExitRequested`]
/// arrives. Once pending it stays pending.
pub struct ExitSignal {
	handle: ExitHandle,
	props: Arc<dyn PropertyStore>,
	events: Option<Receiver<ControlEvent>>,
	notified: bool,
}

impl std::fmt::Debug for ExitSignal {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ExitSignal")
			.field("pending", &self.is_pending())
			.field("notified", &self.notified)
			.finish_non_exhaustive()
	}
}

impl ExitSignal {
	/// Creates a signal reading the exit property from `props`
	pub fn new(props: Arc<dyn PropertyStore>) -> Self {
		Self {
			handle: ExitHandle::default(),
			props,
			events: None,
			notified: false,
		}
	}

	/// Also listens for [`ControlEvent::ExitRequested`] on `events`
	pub fn with_events(mut self, events: Receiver<ControlEvent>) -> Self {
		self.events = Some(events);
		self
	}

	/// Handle that can request exit from elsewhere
	pub fn handle(&self) -> ExitHandle {
		self.handle.clone()
	}

	/// Requests exit
	pub fn request(&self) {
		self.handle.request();
	}

	/// Whether exit is pending
	pub fn is_pending(&self) -> bool {
		self.handle.is_requested()
	}

	/// Polls every source and latches a request. Returns the pending state.
	pub fn poll(&mut self) -> bool {
		if self.props.get_int(keys::EXIT, 0) != 0 {
			self.request();
		}

		if let Some(events) = &self.events {
			loop {
				match events.try_recv() {
					Ok(ControlEvent::ExitRequested) => self.request(),
					Ok(other) => log::trace!("ignoring {other:?} during playback"),
					Err(TryRecvError::Empty) => break,
					Err(TryRecvError::Disconnected) => {
						self.events = None;
						break;
					}
				}
			}
		}

		self.is_pending()
	}

	/// Polls, and notifies `callbacks` the first time exit is observed
	pub fn check(&mut self, callbacks: &dyn Callbacks) -> bool {
		let pending = self.poll();
		if pending && !self.notified {
			self.notified = true;
			log::info!("exit requested");
			callbacks.shutdown();
		}
		pending
	}
}
