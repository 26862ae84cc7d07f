use std::ops::Range;
use crate::ioext::*;
use crate::{
	for_each_int_type,
	McResult,
};
use std::io::{
	Read, Write,
	SeekFrom,
};

use super::{
	MAX_SECTOR_OFFSET,
	SECTOR_SIZE,
};

/// A location table entry.
/// Offset and count are packed together the same way they are on disk.
/// |Offset:3|Count:1|
/// An offset of zero means the chunk is not present, whatever the count.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct RegionSector(u32);

impl RegionSector {
	/// Provide offset and count in 4KiB sectors.
	/// Offsets wider than 24 bits are truncated.
	pub const fn new(offset: u32, count: u8) -> Self {
		Self(((offset & MAX_SECTOR_OFFSET as u32) << 8) | count as u32)
	}

	/// Creates a new empty RegionSector.
	pub const fn empty() -> Self {
		Self(0)
	}

	/// The 4KiB sector offset.
	/// Multiply this by `4096` to get the seek offset.
	pub const fn sector_offset(&self) -> u64 {
		(self.0 >> 8) as u64
	}

	/// The sector that marks the end of this sector range and the start of
	/// the next.
	pub const fn sector_end_offset(&self) -> u64 {
		self.sector_offset() + self.sector_count()
	}

	/// The 4KiB sector count.
	pub const fn sector_count(&self) -> u64 {
		(self.0 & 0xFF) as u64
	}

	/// The offset in bytes that this sector begins
	/// at in the region file.
	pub const fn offset(&self) -> u64 {
		self.sector_offset() * SECTOR_SIZE
	}

	/// The offset in bytes that this sector ends at in the region file.
	pub const fn end_offset(&self) -> u64 {
		self.sector_end_offset() * SECTOR_SIZE
	}

	/// The size in bytes that this sector occupies.
	pub const fn size(&self) -> u64 {
		self.sector_count() * SECTOR_SIZE
	}

	/// Determines if this is an "empty" sector, meaning no chunk is present.
	/// Only the offset decides this; the header occupies sector 0, so no
	/// record can start there.
	pub const fn is_empty(&self) -> bool {
		self.sector_offset() == 0
	}

	/// Tests if two sectors intersect.
	/// Ranges of zero sectors never intersect anything.
	pub fn intersects(self, rhs: Self) -> bool {
		self.sector_count() > 0
		&& rhs.sector_count() > 0
		&& self.sector_offset() < rhs.sector_end_offset()
		&& rhs.sector_offset() < self.sector_end_offset()
	}

	/// The range of sectors covered.
	pub fn range(&self) -> Range<u64> {
		self.sector_offset()..self.sector_end_offset()
	}
}

macro_rules! __regionsector_impls {
	($type:ty) => {
		impl From<Range<$type>> for RegionSector {
			fn from(value: Range<$type>) -> Self {
				RegionSector::new(value.start as u32, (value.end - value.start) as u8)
			}
		}
	};
}

for_each_int_type!(__regionsector_impls);

impl Readable for RegionSector {
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self> {
		Ok(Self(reader.read_value()?))
	}
}

impl Writable for RegionSector {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		writer.write_value(self.0)
	}
}

impl Seekable for RegionSector {
	/// A [SeekFrom] that points to this [RegionSector]
	fn seeker(&self) -> SeekFrom {
		SeekFrom::Start(self.offset())
	}
}

impl std::fmt::Display for RegionSector {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "sectors {}..{}", self.sector_offset(), self.sector_end_offset())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn packing() {
		let sector = RegionSector::new(2, 3);
		assert_eq!(sector.sector_offset(), 2);
		assert_eq!(sector.sector_count(), 3);
		assert_eq!(sector.offset(), 8192);
		assert_eq!(sector.end_offset(), 20480);
		let mut bytes = Vec::new();
		bytes.write_value(sector).unwrap();
		assert_eq!(bytes, [0, 0, 2, 3]);
		assert_eq!(RegionSector::from(5u32..9), RegionSector::new(5, 4));
	}

	#[test]
	fn intersection() {
		let a = RegionSector::new(2, 3);
		assert!(a.intersects(RegionSector::new(4, 1)));
		assert!(!a.intersects(RegionSector::new(5, 1)));
		assert!(!a.intersects(RegionSector::new(3, 0)));
		assert!(RegionSector::new(0, 1).intersects(RegionSector::new(0, 2)));
	}

	#[test]
	fn zero_offset_is_empty() {
		assert!(RegionSector::empty().is_empty());
		assert!(RegionSector::new(0, 1).is_empty());
		assert!(RegionSector::new(0, 255).is_empty());
		assert!(!RegionSector::new(1, 0).is_empty());
		assert!(!RegionSector::new(2, 1).is_empty());
	}
}
