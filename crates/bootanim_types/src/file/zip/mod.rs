//! Stored ZIP container support.
//!
//! Boot animation bundles are ZIP archives whose entries are stored without
//! compression so frames can be handed to the decoder straight out of the
//! archive buffer. This module reads the end of central directory record and
//! the central directory, and exposes each stored entry as a zero-copy
//! [`Bytes`] slice. Compressed entries are listed but cannot be read.

mod builder;
pub mod constants;
mod crc;
mod entry;


use std::{fs, path::Path};

use bytes::Bytes;

pub use builder::ArchiveBuilder;
pub use crc::crc32;
pub use entry::Entry;

use constants::{
	EOCD_SIGNATURE, EOCD_SIZE, LOCAL_HEADER_SIGNATURE, LOCAL_HEADER_SIZE, MAX_COMMENT_SIZE,
};
use entry::{read_u16, read_u32};

use super::error::{BundleError, FileType};

/// A parsed stored-ZIP archive
#[derive(Debug, Clone)]
pub struct Archive {
	/// Whole archive contents
	data: Bytes,
	/// Central directory entries in archive order
	entries: Vec<Entry>,
}

impl Archive {
	/// Reads and parses an archive from disk
	pub fn open(path: impl AsRef<Path>) -> Result<Self, BundleError> {
		let data = fs::read(path.as_ref())?;
		Self::from_bytes(Bytes::from(data))
	}

	/// Parses an archive held in memory
	pub fn from_bytes(data: Bytes) -> Result<Self, BundleError> {
		let eocd = find_eocd(&data)?;

		let total_entries = read_u16(&data, eocd + 10) as usize;
		let cd_size = read_u32(&data, eocd + 12) as usize;
		let cd_offset = read_u32(&data, eocd + 16) as usize;

		let cd_end = cd_offset.checked_add(cd_size).unwrap_or(usize::MAX);
		if cd_end > eocd {
			return Err(BundleError::insufficient_data(FileType::Zip, cd_end, eocd));
		}

		let mut entries = Vec::with_capacity(total_entries);
		let mut cursor = cd_offset;
		for _ in 0..total_entries {
			let (entry, len) = Entry::from_bytes(&data[cursor..cd_end])?;
			cursor += len;
			entries.push(entry);
		}

		log::trace!("zip: {} entries, central directory at {:#x}", entries.len(), cd_offset);

		Ok(Self {
			data,
			entries,
		})
	}

	/// Entries in central directory order
	pub fn entries(&self) -> &[Entry] {
		&self.entries
	}

	/// Number of entries
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if the archive has no entries
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Looks up an entry by its full name
	pub fn find(&self, name: &str) -> Option<&Entry> {
		self.entries.iter().find(|e| e.name == name)
	}

	/// Returns the data of a stored entry without copying
	pub fn entry_data(&self, entry: &Entry) -> Result<Bytes, BundleError> {
		if !entry.is_stored() {
			return Err(BundleError::Compressed {
				name: entry.name.clone(),
				method: entry.method,
			});
		}

		let header = entry.local_header_offset as usize;
		let fixed_end = header + LOCAL_HEADER_SIZE;
		if fixed_end > self.data.len() {
			return Err(BundleError::OutOfRange {
				name: entry.name.clone(),
				required: fixed_end,
				available: self.data.len(),
			});
		}

		let signature = read_u32(&self.data, header);
		if signature != LOCAL_HEADER_SIGNATURE {
			return Err(BundleError::invalid_signature(
				FileType::Zip,
				LOCAL_HEADER_SIGNATURE,
				signature,
			));
		}

		// Local name/extra lengths may differ from the central copy
		let name_len = read_u16(&self.data, header + 26) as usize;
		let extra_len = read_u16(&self.data, header + 28) as usize;
		let start = fixed_end + name_len + extra_len;
		let end = start + entry.compressed_size as usize;
		if end > self.data.len() {
			return Err(BundleError::OutOfRange {
				name: entry.name.clone(),
				required: end,
				available: self.data.len(),
			});
		}

		Ok(self.data.slice(start..end))
	}

	/// Reads a stored entry by name
	pub fn read(&self, name: &str) -> Result<Bytes, BundleError> {
		let entry = self.find(name).ok_or_else(|| BundleError::entry_not_found(FileType::Zip, name))?;
		self.entry_data(entry)
	}

	/// Returns the raw archive bytes
	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}
}

/// Scans backwards for the end of central directory record.
fn find_eocd(data: &[u8]) -> Result<usize, BundleError> {
	if data.len() < EOCD_SIZE {
		return Err(BundleError::insufficient_data(FileType::Zip, EOCD_SIZE, data.len()));
	}

	let last = data.len() - EOCD_SIZE;
	let first = last.saturating_sub(MAX_COMMENT_SIZE);
	(first..=last)
		.rev()
		.find(|&pos| read_u32(data, pos) == EOCD_SIGNATURE)
		.ok_or(BundleError::MissingDirectory)
}
