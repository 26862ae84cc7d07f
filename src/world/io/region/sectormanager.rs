use log::debug;
use sorted_vec::SortedVec;

use crate::{
	McResult, McError,
};

use super::{
	header::SectorTable,
	managedsector::ManagedSector,
	sector::RegionSector,
	HEADER_SECTORS,
	MAX_SECTOR_OFFSET,
};

pub trait SectorAllocator {
	/// Returns a sector range to the pool.
	fn free(&mut self, sector: RegionSector);
	/// Reserves `size` contiguous sectors.
	#[must_use]
	fn allocate(&mut self, size: u8) -> Option<RegionSector>;

	#[inline(always)]
	fn allocate_err(&mut self, size: u8) -> McResult<RegionSector> {
		self.allocate(size).ok_or(McError::RegionAllocationFailure)
	}
}

/// Manages unused sectors in a region file so that chunks can be stored
/// without intersecting one another.
///
/// Free ranges are kept sorted by start sector and never touch each other
/// (adjacent ranges are merged when freed). Everything at or beyond
/// `end_sector.start` is unclaimed space at the end of the file, which is
/// where allocations go when no free range is large enough.
#[derive(Debug, Clone)]
pub struct SectorManager {
	unused_sectors: SortedVec<ManagedSector>,
	end_sector: ManagedSector,
}

impl SectorAllocator for SectorManager {
	/// Frees a sector, allowing it to be reused.
	/// Only supply sectors that were handed out by this manager (or that
	/// were live in the table it was built from).
	fn free(&mut self, sector: RegionSector) {
		if sector.sector_count() == 0 {
			return;
		}
		let mut freed_sector = ManagedSector::from(sector);
		if freed_sector.start < HEADER_SECTORS as u32 {
			return;
		}
		// The right neighbour (if any) sits where freed_sector would be inserted,
		// the left neighbour just before it.
		let index = self.unused_sectors.partition_point(|unused| unused.start < freed_sector.start);
		if index < self.unused_sectors.len() && self.unused_sectors[index].start == freed_sector.end {
			freed_sector.absorb(self.unused_sectors.remove_index(index));
		}
		if index > 0 && self.unused_sectors[index - 1].end == freed_sector.start {
			freed_sector.absorb(self.unused_sectors.remove_index(index - 1));
		}
		if freed_sector.end >= self.end_sector.start {
			self.end_sector.absorb(freed_sector);
		} else {
			self.unused_sectors.insert(freed_sector);
		}
	}

	/// Allocate a sector of a specified size.
	/// The first free range that is large enough is used. Otherwise the
	/// sectors are taken from the end of the file. Returns `None` if the
	/// resulting offset can not be stored in a location entry.
	fn allocate(&mut self, size: u8) -> Option<RegionSector> {
		if size == 0 {
			return None;
		}
		let found = self.unused_sectors
			.iter()
			.position(|sector| sector.size() >= size as u32);
		if let Some(index) = found {
			let mut sector = self.unused_sectors.remove_index(index);
			let allocated = sector.allocate(size);
			if sector.not_empty() {
				self.unused_sectors.insert(sector);
			}
			return allocated;
		}
		if self.end_sector.start as u64 > MAX_SECTOR_OFFSET {
			return None;
		}
		let allocated = self.end_sector.allocate(size)?;
		debug!("Extending region to sector {}.", self.end_sector.start);
		Some(allocated)
	}
}

impl Default for SectorManager {
	fn default() -> Self {
		Self::new()
	}
}

impl SectorManager {
	/// A manager for a region file that only contains its header.
	pub fn new() -> Self {
		Self {
			unused_sectors: SortedVec::new(),
			end_sector: ManagedSector::end_sector(HEADER_SECTORS as u32),
		}
	}

	/// Creates a [SectorManager] from a location table.
	/// Every non-empty range in the table is considered occupied, including
	/// ranges that overlap each other or the header. The gaps between them
	/// become the free list.
	pub fn from_table(table: &SectorTable) -> Self {
		let mut occupied = table.iter()
			.filter(|sector| !sector.is_empty() && sector.sector_count() > 0)
			.map(|&sector| ManagedSector::from(sector))
			.collect::<Vec<ManagedSector>>();
		occupied.sort();
		let mut unused_sectors = SortedVec::new();
		let mut cursor = HEADER_SECTORS as u32;
		for sector in occupied {
			if sector.start > cursor {
				unused_sectors.insert(ManagedSector::new(cursor, sector.start));
			}
			cursor = cursor.max(sector.end);
		}
		Self {
			unused_sectors,
			end_sector: ManagedSector::end_sector(cursor),
		}
	}

	pub fn unused_sectors(&self) -> &[ManagedSector] {
		self.unused_sectors.as_slice()
	}

	/// The first sector past every allocated range.
	pub fn end_offset(&self) -> u32 {
		self.end_sector.start
	}

	/// Counts the number of unused 4KiB blocks. This is helpful for determining
	/// if the region file needs to be defragmented.
	pub fn count_unused_blocks(&self) -> u32 {
		self.unused_sectors.iter()
			.map(|sect| sect.size())
			.sum()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::world::io::region::coord::RegionCoord;

	fn table(entries: &[(i32, u32, u8)]) -> SectorTable {
		let mut table = SectorTable::default();
		for &(slot, offset, count) in entries {
			table[RegionCoord::new(slot % 32, slot / 32)] = RegionSector::new(offset, count);
		}
		table
	}

	#[test]
	fn gaps_become_free_ranges() {
		let manager = SectorManager::from_table(&table(&[(0, 5, 2), (1, 2, 1), (2, 10, 1)]));
		assert_eq!(manager.unused_sectors(), &[ManagedSector::new(3, 5), ManagedSector::new(7, 10)]);
		assert_eq!(manager.end_offset(), 11);
		assert_eq!(manager.count_unused_blocks(), 5);
	}

	#[test]
	fn zero_offset_slots_are_ignored() {
		let manager = SectorManager::from_table(&table(&[(0, 0, 5), (1, 3, 1)]));
		assert_eq!(manager.unused_sectors(), &[ManagedSector::new(2, 3)]);
		assert_eq!(manager.end_offset(), 4);
	}

	#[test]
	fn empty_table() {
		let manager = SectorManager::from_table(&SectorTable::default());
		assert!(manager.unused_sectors().is_empty());
		assert_eq!(manager.end_offset(), 2);
	}

	#[test]
	fn first_fit() {
		let mut manager = SectorManager::from_table(&table(&[(0, 3, 1), (1, 6, 1), (2, 9, 1)]));
		// Free ranges: 2..3, 4..6, 7..9
		assert_eq!(manager.allocate(2), Some(RegionSector::new(4, 2)));
		assert_eq!(manager.allocate(1), Some(RegionSector::new(2, 1)));
		assert_eq!(manager.allocate(3), Some(RegionSector::new(10, 3)));
		assert_eq!(manager.unused_sectors(), &[ManagedSector::new(7, 9)]);
		assert_eq!(manager.end_offset(), 13);
		assert_eq!(manager.allocate(0), None);
	}

	#[test]
	fn free_coalesces() {
		let mut manager = SectorManager::from_table(&table(&[(0, 2, 1), (1, 3, 1), (2, 4, 1), (3, 5, 1)]));
		manager.free(RegionSector::new(2, 1));
		manager.free(RegionSector::new(4, 1));
		assert_eq!(manager.unused_sectors(), &[ManagedSector::new(2, 3), ManagedSector::new(4, 5)]);
		manager.free(RegionSector::new(3, 1));
		assert_eq!(manager.unused_sectors(), &[ManagedSector::new(2, 5)]);
		// Adjacent to the end of the file, so everything collapses into it.
		manager.free(RegionSector::new(5, 1));
		assert!(manager.unused_sectors().is_empty());
		assert_eq!(manager.end_offset(), 2);
	}

	#[test]
	fn header_is_never_freed() {
		let mut manager = SectorManager::new();
		manager.free(RegionSector::new(0, 2));
		assert_eq!(manager.allocate(1), Some(RegionSector::new(2, 1)));
	}

	#[test]
	fn offset_limit() {
		let mut manager = SectorManager {
			unused_sectors: SortedVec::new(),
			end_sector: ManagedSector::end_sector(MAX_SECTOR_OFFSET as u32 + 1),
		};
		assert_eq!(manager.allocate(1), None);
		assert!(matches!(manager.allocate_err(1), Err(McError::RegionAllocationFailure)));
		// Free space below the limit is still usable.
		manager.free(RegionSector::new(2, 1));
		assert_eq!(manager.allocate(1), Some(RegionSector::new(2, 1)));
	}
}
