//! CRC-32 (IEEE 802.3, reflected) used by ZIP entries.

const POLYNOMIAL: u32 = 0xEDB8_8320;

const fn make_table() -> [u32; 256] {
	let mut table = [0u32; 256];
	let mut i = 0;
	while i < 256 {
		let mut crc = i as u32;
		let mut bit = 0;
		while bit < 8 {
			crc = if crc & 1 != 0 {
				(crc >> 1) ^ POLYNOMIAL
			} else {
				crc >> 1
			};
			bit += 1;
		}
		table[i] = crc;
		i += 1;
	}
	table
}

static TABLE: [u32; 256] = make_table();

/// Computes the CRC-32 checksum of `data`.
pub fn crc32(data: &[u8]) -> u32 {
	let mut crc = 0xFFFF_FFFFu32;
	for &byte in data {
		crc = TABLE[((crc ^ u32::from(byte)) & 0xFF) as usize] ^ (crc >> 8);
	}
	!crc
}
