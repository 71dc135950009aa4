//! Central directory entries.

use super::constants::{CENTRAL_HEADER_SIGNATURE, CENTRAL_HEADER_SIZE, METHOD_STORED};
use crate::file::error::{BundleError, FileType};

/// One file record from the central directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
	/// Full entry name, `/` separated
	pub name: String,
	/// Compression method id (0 = stored)
	pub method: u16,
	/// CRC-32 of the uncompressed data
	pub crc32: u32,
	/// Compressed size in bytes
	pub compressed_size: u32,
	/// Uncompressed size in bytes
	pub uncompressed_size: u32,
	/// Offset of the local file header from the start of the archive
	pub local_header_offset: u32,
}

impl Entry {
	/// Parses one central directory header from the start of `data`.
	///
	/// Returns the entry and the total record length (fixed part plus the
	/// variable name/extra/comment fields).
	pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), BundleError> {
		if data.len() < CENTRAL_HEADER_SIZE {
			return Err(BundleError::insufficient_data(
				FileType::Zip,
				CENTRAL_HEADER_SIZE,
				data.len(),
			));
		}

		let signature = read_u32(data, 0);
		if signature != CENTRAL_HEADER_SIGNATURE {
			return Err(BundleError::invalid_signature(
				FileType::Zip,
				CENTRAL_HEADER_SIGNATURE,
				signature,
			));
		}

		let method = read_u16(data, 10);
		let crc32 = read_u32(data, 16);
		let compressed_size = read_u32(data, 20);
		let uncompressed_size = read_u32(data, 24);
		let name_len = read_u16(data, 28) as usize;
		let extra_len = read_u16(data, 30) as usize;
		let comment_len = read_u16(data, 32) as usize;
		let local_header_offset = read_u32(data, 42);

		let record_len = CENTRAL_HEADER_SIZE + name_len + extra_len + comment_len;
		if data.len() < record_len {
			return Err(BundleError::insufficient_data(FileType::Zip, record_len, data.len()));
		}

		let name_bytes = &data[CENTRAL_HEADER_SIZE..CENTRAL_HEADER_SIZE + name_len];
		let name = String::from_utf8_lossy(name_bytes).into_owned();

		Ok((
			Self {
				name,
				method,
				crc32,
				compressed_size,
				uncompressed_size,
				local_header_offset,
			},
			record_len,
		))
	}

	/// Returns true if the entry data is stored without compression
	pub fn is_stored(&self) -> bool {
		self.method == METHOD_STORED
	}

	/// Returns true if the entry names a directory
	pub fn is_dir(&self) -> bool {
		self.name.ends_with('/')
	}

	/// Directory part of the name, without the trailing slash
	///
	/// Root-level entries return an empty string.
	pub fn dir_name(&self) -> &str {
		match self.name.rfind('/') {
			Some(pos) => &self.name[..pos],
			None => "",
		}
	}

	/// Final path component of the name
	pub fn base_name(&self) -> &str {
		match self.name.rfind('/') {
			Some(pos) => &self.name[pos + 1..],
			None => &self.name,
		}
	}
}

pub(super) fn read_u16(data: &[u8], offset: usize) -> u16 {
	u16::from_le_bytes([data[offset], data[offset + 1]])
}

pub(super) fn read_u32(data: &[u8], offset: usize) -> u32 {
	u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}
