use crate::for_each_int_type;
use std::io::SeekFrom;

/// A region file contains up to 1024 chunks, which is 32x32 chunks.
/// This struct represents a chunk coordinate within a region file.
/// The coordinate can be an absolute coordinate and it will be
/// normalized to relative coordinates.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct RegionCoord(u16);

impl RegionCoord {
	/// Create a new RegionCoord.
	/// The x and z are wrapped into the 0..32 range, so `(32, 33)` becomes
	/// `(0, 1)` and `(-1, -1)` becomes `(31, 31)`.
	pub fn new(x: i32, z: i32) -> Self {
		let xmod = (x & 31) as u16;
		let zmod = (z & 31) as u16;
		Self(xmod | (zmod << 5))
	}

	/// The slot this coordinate occupies in the header tables.
	pub fn index(&self) -> usize {
		self.0 as usize
	}

	pub fn x(&self) -> i32 {
		(self.0 & 31) as i32
	}

	pub fn z(&self) -> i32 {
		((self.0 >> 5) & 31) as i32
	}

	/// Every coordinate in slot order.
	pub fn all() -> impl Iterator<Item = RegionCoord> {
		(0u16..1024).map(RegionCoord)
	}

	/// Get a [SeekFrom] value that can be used to seek to the location where
	/// this chunk's sector offset is stored in the sector offset table.
	pub fn sector_table_offset(&self) -> SeekFrom {
		SeekFrom::Start(self.0 as u64 * 4)
	}

	/// Get a [SeekFrom] value that can be used to seek to the location where
	/// this chunk's timestamp is stored in the timestamp table.
	pub fn timestamp_table_offset(&self) -> SeekFrom {
		SeekFrom::Start(self.0 as u64 * 4 + 4096)
	}
}

macro_rules! __regioncoord_impl {
	($type:ty) => {
		impl From<($type, $type)> for RegionCoord {
			fn from(value: ($type, $type)) -> Self {
				Self::new(value.0 as i32, value.1 as i32)
			}
		}
	};
}

for_each_int_type!(__regioncoord_impl);

impl From<ChunkPos> for RegionCoord {
	fn from(value: ChunkPos) -> Self {
		value.local()
	}
}

impl From<RegionCoord> for (i32, i32) {
	fn from(value: RegionCoord) -> Self {
		(value.x(), value.z())
	}
}

impl std::fmt::Display for RegionCoord {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "({}, {})", self.x(), self.z())
	}
}

/// An absolute chunk position in a world.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct ChunkPos {
	pub x: i32,
	pub z: i32,
}

impl ChunkPos {
	pub const fn new(x: i32, z: i32) -> Self {
		Self { x, z }
	}

	/// The coordinate of the region that holds this chunk.
	pub const fn region(self) -> (i32, i32) {
		(self.x.div_euclid(32), self.z.div_euclid(32))
	}

	/// The position of this chunk within its region.
	pub fn local(self) -> RegionCoord {
		RegionCoord::new(self.x.rem_euclid(32), self.z.rem_euclid(32))
	}

	/// The inverse of [ChunkPos::region] and [ChunkPos::local].
	/// Returns `None` if the position does not fit in an `i32`.
	pub fn from_region((rx, rz): (i32, i32), coord: RegionCoord) -> Option<Self> {
		Some(Self::new(
			rx.checked_mul(32)?.checked_add(coord.x())?,
			rz.checked_mul(32)?.checked_add(coord.z())?,
		))
	}
}

impl From<(i32, i32)> for ChunkPos {
	fn from(value: (i32, i32)) -> Self {
		Self::new(value.0, value.1)
	}
}

impl std::fmt::Display for ChunkPos {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "[{}, {}]", self.x, self.z)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wraps_into_region() {
		let coord = RegionCoord::new(33, -1);
		assert_eq!((coord.x(), coord.z()), (1, 31));
		assert_eq!(coord.index(), 1 + 31 * 32);
		assert_eq!(RegionCoord::from((5u8, 2u8)).index(), 5 + 2 * 32);
		assert_eq!(RegionCoord::all().count(), 1024);
	}

	#[test]
	fn chunk_positions() {
		let pos = ChunkPos::new(-1, 32);
		assert_eq!(pos.region(), (-1, 1));
		assert_eq!(pos.local(), RegionCoord::new(31, 0));
		assert_eq!(ChunkPos::new(-33, 0).region(), (-2, 0));
		assert_eq!(ChunkPos::new(-33, 0).local().x(), 31);
		for pos in [pos, ChunkPos::new(i32::MIN, i32::MAX), ChunkPos::new(-33, 0)] {
			assert_eq!(ChunkPos::from_region(pos.region(), pos.local()), Some(pos));
		}
		assert_eq!(ChunkPos::from_region((70_000_000, 0), RegionCoord::new(0, 0)), None);
	}
}
