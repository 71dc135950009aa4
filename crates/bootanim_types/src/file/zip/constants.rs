//! ZIP container constants.
//!
//! Only the subset of the PKWARE APPNOTE needed for uncompressed bundles is
//! described here.

/// Local file header signature (`PK\x03\x04`)
pub const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4B50;

/// Central directory file header signature (`PK\x01\x02`)
pub const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4B50;

/// End of central directory signature (`PK\x05\x06`)
pub const EOCD_SIGNATURE: u32 = 0x0605_4B50;

/// Size of the fixed part of a local file header
pub const LOCAL_HEADER_SIZE: usize = 30;

/// Size of the fixed part of a central directory header
pub const CENTRAL_HEADER_SIZE: usize = 46;

/// Size of the fixed part of the end of central directory record
pub const EOCD_SIZE: usize = 22;

/// Largest possible archive comment; bounds the backwards EOCD scan
pub const MAX_COMMENT_SIZE: usize = 0xFFFF;

/// Compression method: stored (no compression)
pub const METHOD_STORED: u16 = 0;

/// Compression method: deflate
pub const METHOD_DEFLATED: u16 = 8;

/// "Version needed to extract" written for stored entries (2.0)
pub const VERSION_NEEDED: u16 = 20;

/// Longest entry name accepted while iterating a bundle
pub const MAX_ENTRY_NAME: usize = 256;
