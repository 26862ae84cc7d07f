use super::{
	coord::*,
	sector::*,
	timestamp::*,
	HEADER_SECTORS,
	SECTOR_SIZE,
};

/// The health of a single slot in a region file, judged from the header,
/// the file length, and the record's length prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkStatus {
	/// The slot is empty.
	NotCreated,
	/// The record looks intact.
	Ok,
	/// The location points into the header.
	InHeader,
	/// The location has a count of zero, or the record's length prefix is zero.
	ZeroLength,
	/// The location extends past the end of the file.
	OutOfFile,
	/// The location shares sectors with another chunk.
	Overlapping,
	/// The record's length prefix does not fit in the allocated sectors.
	MismatchedLength,
}

impl ChunkStatus {
	/// Classifies the location of the chunk at `coord` using only the header
	/// and the file length. The record itself is not consulted, so this can
	/// only yield [ChunkStatus::NotCreated], [ChunkStatus::InHeader],
	/// [ChunkStatus::ZeroLength], [ChunkStatus::OutOfFile],
	/// [ChunkStatus::Overlapping], or [ChunkStatus::Ok].
	pub fn of_location(coord: RegionCoord, sectors: &[RegionSector], file_len: u64) -> Self {
		let sector = sectors[coord.index()];
		if sector.is_empty() {
			return ChunkStatus::NotCreated;
		}
		if sector.sector_offset() < HEADER_SECTORS {
			return ChunkStatus::InHeader;
		}
		if sector.sector_count() == 0 {
			return ChunkStatus::ZeroLength;
		}
		if sector.end_offset() > file_len {
			return ChunkStatus::OutOfFile;
		}
		let overlapping = sectors.iter()
			.enumerate()
			.any(|(index, other)| {
				index != coord.index()
				&& !other.is_empty()
				&& sector.intersects(*other)
			});
		if overlapping {
			return ChunkStatus::Overlapping;
		}
		ChunkStatus::Ok
	}

	/// Refines an [ChunkStatus::Ok] location with the record's length prefix.
	pub fn with_length(self, sector: RegionSector, length: u32) -> Self {
		if self != ChunkStatus::Ok {
			return self;
		}
		if length == 0 {
			ChunkStatus::ZeroLength
		} else if length as u64 + 4 > sector.sector_count() * SECTOR_SIZE {
			ChunkStatus::MismatchedLength
		} else {
			ChunkStatus::Ok
		}
	}

	pub fn is_ok(self) -> bool {
		self == ChunkStatus::Ok
	}
}

impl std::fmt::Display for ChunkStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			ChunkStatus::NotCreated => "not created",
			ChunkStatus::Ok => "ok",
			ChunkStatus::InHeader => "location points into the header",
			ChunkStatus::ZeroLength => "zero length",
			ChunkStatus::OutOfFile => "location extends past the end of the file",
			ChunkStatus::Overlapping => "location overlaps another chunk",
			ChunkStatus::MismatchedLength => "length does not fit the allocated sectors",
		})
	}
}

/// One entry of a region file's metadata report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkInfo {
	pub coord: RegionCoord,
	pub sector: RegionSector,
	pub timestamp: Timestamp,
	/// The record's length prefix, if it could be read.
	pub length: Option<u32>,
	pub status: ChunkStatus,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sectors(entries: &[(usize, u32, u8)]) -> Vec<RegionSector> {
		let mut table = vec![RegionSector::empty(); 1024];
		for &(slot, offset, count) in entries {
			table[slot] = RegionSector::new(offset, count);
		}
		table
	}

	fn coord(slot: usize) -> RegionCoord {
		RegionCoord::new((slot % 32) as i32, (slot / 32) as i32)
	}

	#[test]
	fn location_classification() {
		let table = sectors(&[(0, 2, 1), (1, 1, 1), (2, 5, 0), (3, 9, 2), (4, 3, 2), (5, 4, 1), (7, 0, 3)]);
		let file_len = 8 * SECTOR_SIZE;
		assert_eq!(ChunkStatus::of_location(coord(0), &table, file_len), ChunkStatus::Ok);
		assert_eq!(ChunkStatus::of_location(coord(1), &table, file_len), ChunkStatus::InHeader);
		assert_eq!(ChunkStatus::of_location(coord(2), &table, file_len), ChunkStatus::ZeroLength);
		assert_eq!(ChunkStatus::of_location(coord(3), &table, file_len), ChunkStatus::OutOfFile);
		assert_eq!(ChunkStatus::of_location(coord(4), &table, file_len), ChunkStatus::Overlapping);
		assert_eq!(ChunkStatus::of_location(coord(5), &table, file_len), ChunkStatus::Overlapping);
		assert_eq!(ChunkStatus::of_location(coord(6), &table, file_len), ChunkStatus::NotCreated);
		// A zero offset means absent even with a count, and it does not
		// make the slots at the start of the file overlap it.
		assert_eq!(ChunkStatus::of_location(coord(7), &table, file_len), ChunkStatus::NotCreated);
	}

	#[test]
	fn length_classification() {
		let sector = RegionSector::new(2, 1);
		assert_eq!(ChunkStatus::Ok.with_length(sector, 0), ChunkStatus::ZeroLength);
		assert_eq!(ChunkStatus::Ok.with_length(sector, 4092), ChunkStatus::Ok);
		assert_eq!(ChunkStatus::Ok.with_length(sector, 4093), ChunkStatus::MismatchedLength);
		assert_eq!(ChunkStatus::OutOfFile.with_length(sector, 10), ChunkStatus::OutOfFile);
	}
}
