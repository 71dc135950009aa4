//! Part audio clips.

use std::{io::Cursor, time::Duration};

use bytes::Bytes;

use crate::file::BundleError;

/// A WAV clip attached to a part, played when the part starts.
///
/// The raw file is kept as-is for the audio sink; only the header is parsed.
#[derive(Debug, Clone)]
pub struct AudioClip {
	data: Bytes,
	spec: hound::WavSpec,
	frames: u32,
}

impl AudioClip {
	/// Validates a WAV payload
	pub fn from_wav(data: Bytes) -> Result<Self, BundleError> {
		let reader = hound::WavReader::new(Cursor::new(data.clone()))?;
		let spec = reader.spec();
		let frames = reader.duration();
		Ok(Self {
			data,
			spec,
			frames,
		})
	}

	/// Sample format, rate and channel count
	pub fn spec(&self) -> hound::WavSpec {
		self.spec
	}

	/// Playing time of the clip
	pub fn duration(&self) -> Duration {
		if self.spec.sample_rate == 0 {
			return Duration::ZERO;
		}
		Duration::from_secs_f64(f64::from(self.frames) / f64::from(self.spec.sample_rate))
	}

	/// Raw WAV bytes
	pub fn as_bytes(&self) -> &Bytes {
		&self.data
	}
}

impl PartialEq for AudioClip {
	fn eq(&self, other: &Self) -> bool {
		self.data == other.data
	}
}
