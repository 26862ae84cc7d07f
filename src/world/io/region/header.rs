use crate::{
	ioext::*,
	McResult,
};

use super::sector::*;
use super::timestamp::*;
use super::coord::*;

use std::{
	fmt::Debug,
	io::{
		Read, Write,
		SeekFrom,
	},
	ops::{
		Index, IndexMut,
	},
};

/// This trait defines the offset in a file where
/// a table can be found for a specific type.
/// It is implemented for [RegionSector] and [Timestamp].
pub trait RegionTableItem {
	/// The offset in the file that this type's table begins.
	const OFFSET: u64;
}

impl RegionTableItem for RegionSector {
	const OFFSET: u64 = 0;
}

impl RegionTableItem for Timestamp {
	const OFFSET: u64 = 4096;
}

/// A table of 1024 elements that contain information related to
/// a chunk within a Region file.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTable<T: RegionTableItem>(Box<[T; 1024]>);

/// A table of 1024 [RegionSector] elements for each potential chunk in
/// a 32x32 chunk region file.
pub type SectorTable = RegionTable<RegionSector>;

/// A table of 1024 [Timestamp] elements for each potential chunk in a
/// 32x32 chunk region file.
pub type TimestampTable = RegionTable<Timestamp>;

/// The header at the beginning of every region file.
/// It contains 1024 [RegionSector] elements and 1024 [Timestamp] elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionHeader {
	/// The location table, containing information about where chunks exist
	/// in the file.
	pub sectors: SectorTable,
	/// The timestamp table, which tells the last modification time for the chunk.
	pub timestamps: TimestampTable,
}

impl<T: RegionTableItem> RegionTable<T> {
	pub const OFFSET: u64 = T::OFFSET;

	/// Returns a [SeekFrom] value that will seek to the
	/// beginning of the table.
	pub const fn seeker() -> SeekFrom {
		SeekFrom::Start(Self::OFFSET)
	}

	/// Returns an iterator of the elements in the table.
	pub fn iter(&self) -> std::slice::Iter<T> {
		self.0.iter()
	}

	/// Returns a mutable iterator of the elements in the table.
	pub fn iter_mut(&mut self) -> std::slice::IterMut<T> {
		self.0.iter_mut()
	}

	/// The table in slot order.
	pub fn as_slice(&self) -> &[T] {
		&self.0[..]
	}
}

impl<T: Default + Copy + RegionTableItem> Default for RegionTable<T> {
	fn default() -> Self {
		Self(Box::new([T::default(); 1024]))
	}
}

impl<C: Into<RegionCoord>, T: RegionTableItem> Index<C> for RegionTable<T> {
	type Output = T;

	fn index(&self, index: C) -> &Self::Output {
		let coord: RegionCoord = index.into();
		&self.0[coord.index()]
	}
}

impl<C: Into<RegionCoord>, T: RegionTableItem> IndexMut<C> for RegionTable<T> {
	fn index_mut(&mut self, index: C) -> &mut Self::Output {
		let coord: RegionCoord = index.into();
		&mut self.0[coord.index()]
	}
}

impl<T: Readable + Default + Copy + RegionTableItem> Readable for RegionTable<T> {
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self> {
		let mut table = Self::default();
		for item in table.iter_mut() {
			*item = T::read_from(reader)?;
		}
		Ok(table)
	}
}

impl<T: Writable + RegionTableItem> Writable for RegionTable<T> {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		let mut write_size: usize = 0;
		for item in self.0.iter() {
			write_size += item.write_to(writer)?;
		}
		Ok(write_size)
	}
}

impl RegionHeader {
	/// Reads the header from the start of an in-memory copy of the first
	/// two sectors.
	pub fn from_bytes(mut bytes: &[u8]) -> McResult<Self> {
		Self::read_from(&mut bytes)
	}

	/// Serializes both tables into a single 8192 byte buffer.
	pub fn to_bytes(&self) -> McResult<Vec<u8>> {
		let mut buffer = Vec::with_capacity(8192);
		self.write_to(&mut buffer)?;
		Ok(buffer)
	}

	/// The location and timestamp stored for `coord`.
	pub fn get<C: Into<RegionCoord>>(&self, coord: C) -> (RegionSector, Timestamp) {
		let coord: RegionCoord = coord.into();
		(self.sectors[coord], self.timestamps[coord])
	}
}

impl Readable for RegionHeader {
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self> {
		Ok(Self {
			sectors: SectorTable::read_from(reader)?,
			timestamps: TimestampTable::read_from(reader)?,
		})
	}
}

impl Writable for RegionHeader {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		Ok(
			self.sectors.write_to(writer)? + self.timestamps.write_to(writer)?
		)
	}
}
