//! The sector-allocated region container.
//!
//! A region file stores up to 1024 chunk records for a 32x32 area.
//! The first two 4KiB sectors hold the header: a location table followed
//! by a timestamp table. Every chunk record starts on a sector boundary
//! and occupies a whole number of sectors.

pub mod header;
pub mod sector;
pub mod timestamp;
pub mod coord;
pub mod info;
pub mod compressionscheme;
pub mod managedsector;
pub mod sectormanager;
pub mod regionfile;

pub use coord::RegionCoord;
pub use sector::RegionSector;
pub use timestamp::Timestamp;
pub use header::RegionHeader;
pub use compressionscheme::CompressionScheme;
pub use info::{
	ChunkInfo,
	ChunkStatus,
};
pub use regionfile::{
	ChunkData,
	RegionConfig,
	RegionFile,
};

/// Size of a single sector in bytes.
pub const SECTOR_SIZE: u64 = 4096;

/// The number of sectors occupied by the header.
pub const HEADER_SECTORS: u64 = 2;

/// Size of the header in bytes.
pub const HEADER_SIZE: u64 = SECTOR_SIZE * HEADER_SECTORS;

/// Bytes in front of every chunk record's payload: a 4-byte length and
/// the scheme byte.
pub const RECORD_HEADER_SIZE: u64 = 5;

/// The largest sector offset a location entry can express.
pub const MAX_SECTOR_OFFSET: u64 = 0xFFFFFF;

/// The largest sector count a location entry can express.
pub const MAX_SECTOR_COUNT: u64 = 0xFF;

/// Tests if a value is a multiple of 4096.
pub const fn is_multiple_of_4096(n: u64) -> bool {
	(n & 4095) == 0
}

/// Counts the number of 4KiB sectors required to accomodate `size` bytes.
pub const fn required_sectors(size: u64) -> u64 {
	let sub = size >> 12;
	// true => 1 | false => 0
	let overflow = !is_multiple_of_4096(size) as u64;
	sub + overflow
}

/// Returns the number of bytes that must be added to `size` to
/// reach the next multiple of 4096.
pub const fn pad_size(size: u64) -> u64 {
	(4096 - (size & 4095)) & 4095
}
