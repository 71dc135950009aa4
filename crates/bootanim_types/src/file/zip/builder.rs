//! Stored ZIP archive construction.

use std::{
	fs,
	io::{self, Write},
	path::Path,
};

use super::{
	constants::{
		CENTRAL_HEADER_SIGNATURE, EOCD_SIGNATURE, LOCAL_HEADER_SIGNATURE, METHOD_STORED,
		VERSION_NEEDED,
	},
	crc::crc32,
};
use crate::file::error::BundleError;

#[derive(Debug, Clone)]
struct PendingEntry {
	name: String,
	method: u16,
	data: Vec<u8>,
}

/// Builds uncompressed ZIP archives in memory.
///
/// # Examples
///
/// ```
/// use bootanim_types::file::zip::{Archive, ArchiveBuilder};
///
/// let mut builder = ArchiveBuilder::new();
/// builder.add("desc.txt", b"480 800 30\np 1 0 part0\n");
/// builder.add("part0/000.png", &[0u8; 4]);
/// let bytes = builder.to_bytes().unwrap();
///
/// let archive = Archive::from_bytes(bytes.into()).unwrap();
/// assert_eq!(archive.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder {
	entries: Vec<PendingEntry>,
}

impl ArchiveBuilder {
	/// Creates an empty builder
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a stored entry
	pub fn add(&mut self, name: impl Into<String>, data: &[u8]) -> &mut Self {
		self.add_with_method(name, data, METHOD_STORED)
	}

	/// Appends an entry tagged with an arbitrary compression method.
	///
	/// The payload is written as given; no compression is performed.
	pub fn add_with_method(&mut self, name: impl Into<String>, data: &[u8], method: u16) -> &mut Self {
		self.entries.push(PendingEntry {
			name: name.into(),
			method,
			data: data.to_vec(),
		});
		self
	}

	/// Number of pending entries
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if nothing has been added
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Serializes the archive
	pub fn to_bytes(&self) -> Result<Vec<u8>, BundleError> {
		let mut out = Vec::new();
		let mut central = Vec::new();

		for entry in &self.entries {
			let too_large = || BundleError::TooLarge {
				name: entry.name.clone(),
			};
			let size = u32::try_from(entry.data.len()).map_err(|_| too_large())?;
			let name_len = u16::try_from(entry.name.len()).map_err(|_| too_large())?;
			let offset = u32::try_from(out.len()).map_err(|_| too_large())?;
			let crc = crc32(&entry.data);

			// Local file header
			out.extend_from_slice(&LOCAL_HEADER_SIGNATURE.to_le_bytes());
			out.extend_from_slice(&VERSION_NEEDED.to_le_bytes());
			out.extend_from_slice(&0u16.to_le_bytes()); // flags
			out.extend_from_slice(&entry.method.to_le_bytes());
			out.extend_from_slice(&0u16.to_le_bytes()); // mod time
			out.extend_from_slice(&0u16.to_le_bytes()); // mod date
			out.extend_from_slice(&crc.to_le_bytes());
			out.extend_from_slice(&size.to_le_bytes());
			out.extend_from_slice(&size.to_le_bytes());
			out.extend_from_slice(&name_len.to_le_bytes());
			out.extend_from_slice(&0u16.to_le_bytes()); // extra
			out.extend_from_slice(entry.name.as_bytes());
			out.extend_from_slice(&entry.data);

			// Central directory header
			central.extend_from_slice(&CENTRAL_HEADER_SIGNATURE.to_le_bytes());
			central.extend_from_slice(&VERSION_NEEDED.to_le_bytes()); // made by
			central.extend_from_slice(&VERSION_NEEDED.to_le_bytes());
			central.extend_from_slice(&0u16.to_le_bytes());
			central.extend_from_slice(&entry.method.to_le_bytes());
			central.extend_from_slice(&0u16.to_le_bytes());
			central.extend_from_slice(&0u16.to_le_bytes());
			central.extend_from_slice(&crc.to_le_bytes());
			central.extend_from_slice(&size.to_le_bytes());
			central.extend_from_slice(&size.to_le_bytes());
			central.extend_from_slice(&name_len.to_le_bytes());
			central.extend_from_slice(&0u16.to_le_bytes()); // extra
			central.extend_from_slice(&0u16.to_le_bytes()); // comment
			central.extend_from_slice(&0u16.to_le_bytes()); // disk
			central.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
			central.extend_from_slice(&0u32.to_le_bytes()); // external attrs
			central.extend_from_slice(&offset.to_le_bytes());
			central.extend_from_slice(entry.name.as_bytes());
		}

		let count = u16::try_from(self.entries.len()).map_err(|_| BundleError::TooLarge {
			name: "<central directory>".to_string(),
		})?;
		let cd_offset = u32::try_from(out.len()).map_err(|_| BundleError::TooLarge {
			name: "<central directory>".to_string(),
		})?;
		let cd_size = central.len() as u32;
		out.extend_from_slice(&central);

		// End of central directory
		out.extend_from_slice(&EOCD_SIGNATURE.to_le_bytes());
		out.extend_from_slice(&0u16.to_le_bytes());
		out.extend_from_slice(&0u16.to_le_bytes());
		out.extend_from_slice(&count.to_le_bytes());
		out.extend_from_slice(&count.to_le_bytes());
		out.extend_from_slice(&cd_size.to_le_bytes());
		out.extend_from_slice(&cd_offset.to_le_bytes());
		out.extend_from_slice(&0u16.to_le_bytes());

		Ok(out)
	}

	/// Writes the archive to any writer
	pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), BundleError> {
		let bytes = self.to_bytes()?;
		writer.write_all(&bytes)?;
		Ok(())
	}

	/// Writes the archive to a file
	pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), BundleError> {
		let file = fs::File::create(path)?;
		let mut writer = io::BufWriter::new(file);
		self.write_to(&mut writer)?;
		writer.flush()?;
		Ok(())
	}
}
