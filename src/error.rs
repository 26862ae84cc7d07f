use std::path::PathBuf;

use thiserror::Error;

use crate::nbt::NbtError;
use crate::world::io::region::{
	coord::RegionCoord,
	info::ChunkStatus,
};

/// The master error type.
#[derive(Debug, Error)]
pub enum McError {
	#[error("IO Error: {0}")]
	IoError(#[from] std::io::Error),
	#[error("NBT Error: {0}")]
	Nbt(#[from] NbtError),
	/// The compressed stream could not be inflated. This is kept apart from
	/// [McError::Nbt] so that a bad compression stream is never confused with
	/// bad tag data.
	#[error("Failed to decompress data: {0}")]
	Decompression(std::io::Error),
	#[error("Invalid Compression value: {0}")]
	InvalidCompressionScheme(u8),
	#[error("Attempted to write chunk data that takes up more that 255 4KiB blocks.")]
	ChunkTooLarge,
	#[error("Failed to allocate RegionSector.")]
	RegionAllocationFailure,
	#[error("Region file is too small to contain a header.")]
	InvalidRegionFile,
	#[error("Chunk {coord} is corrupt: {status}")]
	CorruptChunk {
		coord: RegionCoord,
		status: ChunkStatus,
	},
	#[error("World Directory not found. {0}")]
	WorldDirectoryNotFound(PathBuf),
	#[error("No region files were found in {0}")]
	UnknownWorldFormat(PathBuf),
}

impl McError {
	/// Convenience for returning a [McError::CorruptChunk].
	#[inline(always)]
	pub fn corrupt<T>(coord: RegionCoord, status: ChunkStatus) -> Result<T, Self> {
		Err(McError::CorruptChunk { coord, status })
	}
}

pub type McResult<T> = Result<T,McError>;
