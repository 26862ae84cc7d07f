use std::ops::Range;

use super::{
	sector::*,
	HEADER_SECTORS,
};

/// A range of sectors tracked by the [super::sectormanager::SectorManager].
/// Unlike a [RegionSector], this is not limited to 255 sectors.
/// Ordering is by `start`, then `end`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct ManagedSector {
	pub start: u32,
	pub end: u32,
}

impl From<Range<u32>> for ManagedSector {
	fn from(value: Range<u32>) -> Self {
		Self::new(value.start, value.end)
	}
}

impl std::fmt::Display for ManagedSector {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "(start: {}, end: {})", self.start, self.end)
	}
}

impl From<RegionSector> for ManagedSector {
	fn from(value: RegionSector) -> Self {
		ManagedSector::new(
			value.sector_offset() as u32,
			value.sector_end_offset() as u32
		)
	}
}

impl ManagedSector {
	pub const HEADER: Self = Self::new(0, HEADER_SECTORS as u32);

	/// Create a new [ManagedSector] from the start and end offsets.
	/// Ensure that `start` <= `end`.
	pub const fn new(start: u32, end: u32) -> Self {
		Self {
			start,
			end
		}
	}

	/// Creates a new [ManagedSector] that starts at `end_offset` and
	/// ends at `u32::MAX`.
	pub const fn end_sector(end_offset: u32) -> Self {
		Self {
			start: end_offset,
			end: u32::MAX
		}
	}

	pub const fn size(&self) -> u32 {
		self.end - self.start
	}

	/// Determines if this sector has a size of 0.
	pub const fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Determines if this sector has a size greater than 0.
	pub const fn not_empty(&self) -> bool {
		self.start < self.end
	}

	/// Absorbs the other [ManagedSector] and all space in between into
	/// this [ManagedSector].
	pub fn absorb(&mut self, other: Self) {
		self.start = self.start.min(other.start);
		self.end = self.end.max(other.end);
	}

	/// Takes `size` sectors off the front of this range. Returns `None`
	/// (leaving this range untouched) if there isn't enough space.
	pub fn allocate(&mut self, size: u8) -> Option<RegionSector> {
		let new_start = self.start.checked_add(size as u32)?;
		if new_start > self.end {
			return None
		}
		let start = self.start;
		self.start = new_start;
		Some(RegionSector::new(start, size))
	}

	/// Checks intersection between two sectors.
	pub const fn intersects(&self, other: &Self) -> bool {
		self.start < other.end
		&& other.start < self.end
	}
}
