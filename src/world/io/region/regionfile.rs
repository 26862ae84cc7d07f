use std::{
	io::{
		BufReader, BufWriter,
		Read, Write,
		Seek, SeekFrom,
	},
	fs::File,
	path::{
		Path, PathBuf,
	},
};

use flate2::Compression;
use log::{
	debug,
	trace,
	warn,
};

use crate::{
	McResult, McError,
	ioext::*,
	nbt::{
		self,
		NamedTag,
		NbtError,
		tag::TagID,
	},
};

use super::{
	compressionscheme::*,
	coord::*,
	header::*,
	info::*,
	sector::*,
	sectormanager::*,
	timestamp::*,
	HEADER_SECTORS,
	HEADER_SIZE,
	MAX_SECTOR_COUNT,
	RECORD_HEADER_SIZE,
	SECTOR_SIZE,
	pad_size,
	required_sectors,
};

/// Settings used when a [RegionFile] compresses chunks on its own
/// (see [RegionFile::save_chunk]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionConfig {
	pub scheme: CompressionScheme,
	pub level: Compression,
}

impl Default for RegionConfig {
	fn default() -> Self {
		Self {
			scheme: CompressionScheme::ZLib,
			level: Compression::default(),
		}
	}
}

/// A chunk record as stored in the file: the scheme byte and the
/// (still compressed) payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkData {
	pub scheme: CompressionScheme,
	pub data: Vec<u8>,
}

impl ChunkData {
	pub fn decompress(&self) -> McResult<Vec<u8>> {
		self.scheme.decompress(&self.data)
	}

	/// Decompresses and parses the chunk. Chunks must have a Compound root.
	pub fn parse(&self) -> McResult<NamedTag> {
		let bytes = self.decompress()?;
		Ok(nbt::parse(&bytes)?.require_compound()?)
	}
}

/// A construct for working with region files.
/// Allows for reading, writing, and deleting chunk records.
///
/// Every write lands in the sectors first and the header entry is updated
/// afterwards, so an interrupted write leaves the previous version of the
/// chunk reachable.
pub struct RegionFile {
	path: PathBuf,
	/// This file handle is for both reading and writing.
	file_handle: File,
	header: RegionHeader,
	sector_manager: SectorManager,
	/// Length of the file in bytes, kept in step with every write.
	file_len: u64,
	config: RegionConfig,
	/// The record is assembled here before it is written so that its size
	/// (and therefore its sector count) is known up front.
	write_buf: Vec<u8>,
}

impl RegionFile {
	/// Opens the region file at `path` with the default [RegionConfig].
	/// See [RegionFile::open_with].
	pub fn open<P: AsRef<Path>>(path: P) -> McResult<Self> {
		Self::open_with(path, RegionConfig::default())
	}

	/// Opens or creates a region file.
	/// A missing or empty file is given a zeroed header. A file that is
	/// too short to hold a header is rejected with [McError::InvalidRegionFile].
	pub fn open_with<P: AsRef<Path>>(path: P, config: RegionConfig) -> McResult<Self> {
		let path = path.as_ref();
		let mut file_handle = File::options().read(true).write(true).create(true).open(path)?;
		let mut file_len = file_handle.metadata()?.len();
		let header = if file_len == 0 {
			file_handle.write_zeroes(HEADER_SIZE)?;
			file_handle.sync_data()?;
			file_len = HEADER_SIZE;
			debug!("Created region file {}.", path.display());
			RegionHeader::default()
		} else if file_len < HEADER_SIZE {
			return Err(McError::InvalidRegionFile);
		} else {
			file_handle.seek(SeekFrom::Start(0))?;
			let mut reader = BufReader::with_capacity(HEADER_SIZE as usize, (&mut file_handle).take(HEADER_SIZE));
			RegionHeader::read_from(&mut reader)?
		};
		let sector_manager = SectorManager::from_table(&header.sectors);
		Ok(Self {
			path: path.to_owned(),
			file_handle,
			header,
			sector_manager,
			file_len,
			config,
			write_buf: Vec::with_capacity(SECTOR_SIZE as usize * 2),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn header(&self) -> &RegionHeader {
		&self.header
	}

	pub fn config(&self) -> RegionConfig {
		self.config
	}

	pub fn sector_manager(&self) -> &SectorManager {
		&self.sector_manager
	}

	/// Length of the file in bytes.
	pub fn file_len(&self) -> u64 {
		self.file_len
	}

	/// Length of the file in whole sectors, rounding up.
	pub fn len_sectors(&self) -> u64 {
		required_sectors(self.file_len)
	}

	pub fn sector<C: Into<RegionCoord>>(&self, coord: C) -> RegionSector {
		self.header.sectors[coord]
	}

	pub fn timestamp<C: Into<RegionCoord>>(&self, coord: C) -> Timestamp {
		self.header.timestamps[coord]
	}

	pub fn has_chunk<C: Into<RegionCoord>>(&self, coord: C) -> bool {
		!self.header.sectors[coord].is_empty()
	}

	/// The number of slots with a non-zero location.
	pub fn chunk_count(&self) -> usize {
		self.header.sectors.iter()
			.filter(|sector| !sector.is_empty())
			.count()
	}

	fn location_status(&self, coord: RegionCoord) -> ChunkStatus {
		ChunkStatus::of_location(coord, self.header.sectors.as_slice(), self.file_len)
	}

	/// Reads the raw record for `coord`.
	/// Returns `Ok(None)` if the slot is empty. A slot whose location or
	/// length prefix is inconsistent fails with [McError::CorruptChunk].
	pub fn read_chunk<C: Into<RegionCoord>>(&mut self, coord: C) -> McResult<Option<ChunkData>> {
		let coord: RegionCoord = coord.into();
		let sector = self.header.sectors[coord];
		let status = self.location_status(coord);
		match status {
			ChunkStatus::NotCreated => return Ok(None),
			ChunkStatus::Ok => (),
			status => {
				warn!("Refusing to read chunk {coord} from {}: {status}.", self.path.display());
				return McError::corrupt(coord, status);
			}
		}
		self.file_handle.seek(sector.seeker())?;
		let mut reader = BufReader::new((&mut self.file_handle).take(sector.size()));
		let length: u32 = reader.read_value()?;
		let status = status.with_length(sector, length);
		if !status.is_ok() {
			warn!("Refusing to read chunk {coord} from {}: {status}.", self.path.display());
			return McError::corrupt(coord, status);
		}
		let scheme: CompressionScheme = reader.read_value()?;
		let mut data = vec![0u8; length as usize - 1];
		reader.read_exact(&mut data)?;
		Ok(Some(ChunkData {
			scheme,
			data,
		}))
	}

	/// Writes an already compressed payload to the slot at `coord`.
	///
	/// If the slot's current extent is intact and large enough, it is
	/// overwritten in place and keeps its sector count. Otherwise a new
	/// extent is allocated, the record is written there, the header entry is
	/// switched over, and only then is the old extent released.
	pub fn write_chunk<C: Into<RegionCoord>>(&mut self, coord: C, data: &[u8], scheme: CompressionScheme) -> McResult<RegionSector> {
		let coord: RegionCoord = coord.into();
		let record_size = RECORD_HEADER_SIZE + data.len() as u64;
		let required = required_sectors(record_size);
		if required > MAX_SECTOR_COUNT {
			return Err(McError::ChunkTooLarge);
		}
		self.write_buf.clear();
		// The length includes the scheme byte.
		self.write_buf.write_value((data.len() + 1) as u32)?;
		self.write_buf.write_value(scheme)?;
		self.write_buf.extend_from_slice(data);
		self.write_buf.write_zeroes(pad_size(record_size))?;

		let old = self.header.sectors[coord];
		let old_status = self.location_status(coord);
		let in_place = old_status.is_ok() && old.sector_count() >= required;
		let allocation = if in_place {
			old
		} else {
			let allocation = self.sector_manager.allocate_err(required as u8)?;
			if !old.is_empty() {
				debug!("Relocating chunk {coord} from {old} to {allocation}.");
			}
			allocation
		};
		let written = self.write_record(allocation)
			.and_then(|_| self.commit_slot(coord, allocation, Timestamp::utc_now()));
		if let Err(err) = written {
			if !in_place {
				self.sector_manager.free(allocation);
			}
			return Err(err);
		}
		if !in_place {
			self.release(old, old_status);
		}
		Ok(allocation)
	}

	/// Removes the chunk at `coord`. Both header entries are zeroed and the
	/// extent is returned to the allocator; the record bytes are left as they are.
	/// Returns `false` if there was nothing to delete.
	pub fn delete_chunk<C: Into<RegionCoord>>(&mut self, coord: C) -> McResult<bool> {
		let coord: RegionCoord = coord.into();
		let old = self.header.sectors[coord];
		if old.is_empty() {
			return Ok(false);
		}
		let old_status = self.location_status(coord);
		self.commit_slot(coord, RegionSector::empty(), Timestamp::default())?;
		self.release(old, old_status);
		Ok(true)
	}

	/// Reads, decompresses, and parses the chunk at `coord`.
	pub fn load_chunk<C: Into<RegionCoord>>(&mut self, coord: C) -> McResult<Option<NamedTag>> {
		match self.read_chunk(coord)? {
			Some(chunk) => Ok(Some(chunk.parse()?)),
			None => Ok(None),
		}
	}

	/// Serializes and compresses `tag` using this file's [RegionConfig],
	/// then writes it with [RegionFile::write_chunk].
	pub fn save_chunk<C: Into<RegionCoord>>(&mut self, coord: C, tag: &NamedTag) -> McResult<RegionSector> {
		let root = tag.tag.id();
		if root != TagID::Compound {
			return Err(NbtError::RootNotCompound(root).into());
		}
		let bytes = nbt::serialize(tag)?;
		let packed = self.config.scheme.compress(&bytes, self.config.level)?;
		self.write_chunk(coord, &packed, self.config.scheme)
	}

	/// Inspects every present slot without decompressing anything.
	/// Slots that are not [ChunkStatus::Ok] are logged as warnings.
	pub fn metadata(&mut self) -> McResult<Vec<ChunkInfo>> {
		let mut infos = Vec::new();
		for coord in RegionCoord::all() {
			let sector = self.header.sectors[coord];
			if sector.is_empty() {
				continue;
			}
			let mut status = self.location_status(coord);
			let mut length = None;
			if status.is_ok() {
				self.file_handle.seek(sector.seeker())?;
				let value: u32 = self.file_handle.read_value()?;
				status = status.with_length(sector, value);
				length = Some(value);
			}
			if !status.is_ok() {
				warn!("Chunk {coord} in {} is damaged: {status}.", self.path.display());
			}
			infos.push(ChunkInfo {
				coord,
				sector,
				timestamp: self.header.timestamps[coord],
				length,
				status,
			});
		}
		Ok(infos)
	}

	/// Rewrites every chunk back to back starting at the first sector after
	/// the header (in slot order), then truncates the file.
	/// Timestamps are kept. All chunks are read before anything is written,
	/// so a corrupt chunk aborts the operation without modifying the file.
	/// The rewrite itself is not crash safe.
	pub fn defragment(&mut self) -> McResult<()> {
		let mut records = Vec::new();
		for coord in RegionCoord::all() {
			if let Some(chunk) = self.read_chunk(coord)? {
				records.push((coord, chunk, self.header.timestamps[coord]));
			}
		}
		let mut header = RegionHeader::default();
		let mut cursor = HEADER_SECTORS;
		{
			let mut writer = BufWriter::new(&mut self.file_handle);
			writer.seek(SeekFrom::Start(HEADER_SIZE))?;
			for (coord, chunk, timestamp) in records.iter() {
				let record_size = RECORD_HEADER_SIZE + chunk.data.len() as u64;
				let count = required_sectors(record_size);
				writer.write_value((chunk.data.len() + 1) as u32)?;
				writer.write_value(chunk.scheme)?;
				writer.write_all(&chunk.data)?;
				writer.write_zeroes(pad_size(record_size))?;
				header.sectors[*coord] = RegionSector::new(cursor as u32, count as u8);
				header.timestamps[*coord] = *timestamp;
				cursor += count;
			}
			writer.seek(SeekFrom::Start(0))?;
			header.write_to(&mut writer)?;
			writer.flush()?;
		}
		let file_len = cursor * SECTOR_SIZE;
		self.file_handle.set_len(file_len)?;
		self.file_handle.sync_all()?;
		debug!(
			"Defragmented {}: {} chunks, {} -> {} bytes.",
			self.path.display(),
			records.len(),
			self.file_len,
			file_len,
		);
		self.header = header;
		self.file_len = file_len;
		self.sector_manager = SectorManager::from_table(&self.header.sectors);
		Ok(())
	}

	/// Flushes and syncs the file, then closes it.
	pub fn close(mut self) -> McResult<()> {
		self.file_handle.flush()?;
		self.file_handle.sync_all()?;
		Ok(())
	}

	fn write_record(&mut self, sector: RegionSector) -> McResult<()> {
		self.file_handle.seek(sector.seeker())?;
		self.file_handle.write_all(&self.write_buf)?;
		self.file_handle.sync_data()?;
		self.file_len = self.file_len.max(sector.offset() + self.write_buf.len() as u64);
		Ok(())
	}

	/// Writes both header entries for `coord`. This is the commit point of
	/// every write and delete.
	fn commit_slot(&mut self, coord: RegionCoord, sector: RegionSector, timestamp: Timestamp) -> McResult<()> {
		self.file_handle.seek(coord.sector_table_offset())?;
		self.file_handle.write_value(sector)?;
		self.file_handle.seek(coord.timestamp_table_offset())?;
		self.file_handle.write_value(timestamp)?;
		self.file_handle.sync_data()?;
		self.header.sectors[coord] = sector;
		self.header.timestamps[coord] = timestamp;
		trace!("Committed chunk {coord} at {sector} in {}.", self.path.display());
		Ok(())
	}

	/// Returns a no longer referenced extent to the allocator. Extents that
	/// were never trustworthy (in the header, past the end of the file, or
	/// shared with another chunk) are not freed directly; the allocator is
	/// rebuilt from the header instead.
	fn release(&mut self, old: RegionSector, old_status: ChunkStatus) {
		match old_status {
			ChunkStatus::NotCreated => (),
			ChunkStatus::Ok => self.sector_manager.free(old),
			status => {
				debug!("Rebuilding sector allocation for {} after releasing a {status} extent.", self.path.display());
				self.sector_manager = SectorManager::from_table(&self.header.sectors);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::compound;
	use crate::nbt::Tag;
	use rand::{
		Rng,
		SeedableRng,
		rngs::StdRng,
	};
	use std::collections::HashMap;

	fn temp_region() -> (tempfile::TempDir, PathBuf) {
		let _ = env_logger::builder().is_test(true).try_init();
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("r.0.0.mca");
		(dir, path)
	}

	fn disk_len(path: &Path) -> u64 {
		std::fs::metadata(path).unwrap().len()
	}

	fn patch(path: &Path, offset: u64, bytes: &[u8]) {
		let mut file = File::options().write(true).open(path).unwrap();
		file.seek(SeekFrom::Start(offset)).unwrap();
		file.write_all(bytes).unwrap();
	}

	fn payload(size: usize, seed: u8) -> Vec<u8> {
		(0..size).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect()
	}

	#[test]
	fn first_chunk_in_new_file() {
		let (_dir, path) = temp_region();
		let mut region = RegionFile::open(&path).unwrap();
		assert_eq!(disk_len(&path), 8192);
		assert_eq!(region.chunk_count(), 0);
		let tag = NamedTag::new("", compound! { ("x", 42i32) });
		let sector = region.save_chunk((0, 0), &tag).unwrap();
		assert_eq!(sector, RegionSector::new(2, 1));
		assert_eq!(disk_len(&path), 12288);
		assert!(region.timestamp((0, 0)).seconds() > 0);
		region.close().unwrap();

		let mut region = RegionFile::open(&path).unwrap();
		assert_eq!(region.chunk_count(), 1);
		assert_eq!(region.sector((0, 0)), RegionSector::new(2, 1));
		let loaded = region.load_chunk((0, 0)).unwrap().unwrap();
		assert_eq!(loaded, tag);
		assert_eq!(loaded.tag.get("x"), Some(&Tag::Int(42)));
		assert!(region.load_chunk((1, 0)).unwrap().is_none());
	}

	#[test]
	fn shrinking_rewrite_stays_in_place() {
		let (_dir, path) = temp_region();
		let mut region = RegionFile::open(&path).unwrap();
		let big = payload(10000, 1);
		let first = region.write_chunk((3, 4), &big, CompressionScheme::Uncompressed).unwrap();
		assert_eq!(first, RegionSector::new(2, 3));
		let small = payload(2000, 2);
		let second = region.write_chunk((3, 4), &small, CompressionScheme::Uncompressed).unwrap();
		assert_eq!(second, first);
		assert_eq!(region.file_len(), 5 * 4096);
		let chunk = region.read_chunk((3, 4)).unwrap().unwrap();
		assert_eq!(chunk.scheme, CompressionScheme::Uncompressed);
		assert_eq!(chunk.data, small);
	}

	#[test]
	fn growth_relocates() {
		let (_dir, path) = temp_region();
		let mut region = RegionFile::open(&path).unwrap();
		region.write_chunk((0, 0), &payload(100, 0), CompressionScheme::Uncompressed).unwrap();
		region.write_chunk((1, 0), &payload(100, 1), CompressionScheme::Uncompressed).unwrap();
		let grown = region.write_chunk((0, 0), &payload(5000, 2), CompressionScheme::Uncompressed).unwrap();
		assert_eq!(grown, RegionSector::new(4, 2));
		assert_eq!(region.sector_manager().unused_sectors().len(), 1);
		// The freed sector is reused by the next small chunk.
		let reused = region.write_chunk((2, 0), &payload(10, 3), CompressionScheme::Uncompressed).unwrap();
		assert_eq!(reused, RegionSector::new(2, 1));
		assert_eq!(region.read_chunk((0, 0)).unwrap().unwrap().data, payload(5000, 2));
		assert_eq!(region.read_chunk((1, 0)).unwrap().unwrap().data, payload(100, 1));
	}

	#[test]
	fn delete_and_reuse() {
		let (_dir, path) = temp_region();
		let mut region = RegionFile::open(&path).unwrap();
		region.write_chunk((5, 5), &payload(300, 0), CompressionScheme::Uncompressed).unwrap();
		region.write_chunk((6, 5), &payload(300, 1), CompressionScheme::Uncompressed).unwrap();
		assert!(region.delete_chunk((5, 5)).unwrap());
		assert!(!region.delete_chunk((5, 5)).unwrap());
		assert!(!region.has_chunk((5, 5)));
		assert_eq!(region.timestamp((5, 5)), Timestamp::default());
		assert_eq!(region.chunk_count(), 1);
		assert!(region.read_chunk((5, 5)).unwrap().is_none());
		drop(region);

		let mut region = RegionFile::open(&path).unwrap();
		assert!(!region.has_chunk((5, 5)));
		assert_eq!(region.sector_manager().unused_sectors().len(), 1);
		let sector = region.write_chunk((7, 5), &payload(50, 2), CompressionScheme::Uncompressed).unwrap();
		assert_eq!(sector, RegionSector::new(2, 1));
	}

	#[test]
	fn random_operations_never_overlap() {
		let (_dir, path) = temp_region();
		let mut region = RegionFile::open(&path).unwrap();
		let mut rng = StdRng::seed_from_u64(0x5EC7025);
		let mut model: HashMap<i32, Vec<u8>> = HashMap::new();
		for step in 0..400 {
			let slot = rng.gen_range(0..48);
			let coord = RegionCoord::new(slot % 32, slot / 32);
			if rng.gen_bool(0.25) {
				let existed = region.delete_chunk(coord).unwrap();
				assert_eq!(existed, model.remove(&slot).is_some());
			} else {
				let size = rng.gen_range(1..30000);
				let data = payload(size, step as u8);
				region.write_chunk(coord, &data, CompressionScheme::Uncompressed).unwrap();
				model.insert(slot, data);
			}
			let live: Vec<RegionSector> = region.header().sectors.iter()
				.copied()
				.filter(|sector| !sector.is_empty())
				.collect();
			assert_eq!(live.len(), model.len());
			for (index, a) in live.iter().enumerate() {
				assert!(a.sector_offset() >= 2, "step {step}: {a} is in the header");
				for b in live[index + 1..].iter() {
					assert!(!a.intersects(*b), "step {step}: {a} overlaps {b}");
				}
			}
		}
		drop(region);
		let mut region = RegionFile::open(&path).unwrap();
		for (slot, data) in model.iter() {
			let coord = RegionCoord::new(slot % 32, slot / 32);
			assert_eq!(&region.read_chunk(coord).unwrap().unwrap().data, data);
		}
		assert!(region.metadata().unwrap().iter().all(|info| info.status.is_ok()));
	}

	#[test]
	fn chunk_too_large() {
		let (_dir, path) = temp_region();
		let mut region = RegionFile::open(&path).unwrap();
		let data = vec![0u8; 255 * 4096];
		assert!(matches!(
			region.write_chunk((0, 0), &data, CompressionScheme::Uncompressed),
			Err(McError::ChunkTooLarge)
		));
		assert_eq!(region.chunk_count(), 0);
		let fits = vec![0u8; 255 * 4096 - 5];
		assert_eq!(region.write_chunk((0, 0), &fits, CompressionScheme::Uncompressed).unwrap().sector_count(), 255);
	}

	#[test]
	fn short_file_is_rejected() {
		let (_dir, path) = temp_region();
		std::fs::write(&path, [0u8; 100]).unwrap();
		assert!(matches!(RegionFile::open(&path), Err(McError::InvalidRegionFile)));
	}

	#[test]
	fn corruption_is_reported() {
		let (_dir, path) = temp_region();
		let mut region = RegionFile::open(&path).unwrap();
		for x in 0..5 {
			region.write_chunk((x, 0), &payload(100, x as u8), CompressionScheme::Uncompressed).unwrap();
		}
		drop(region);
		// (1, 0) points into the header.
		patch(&path, 4, &[0, 0, 1, 1]);
		// (2, 0) points past the end of the file.
		patch(&path, 8, &[0, 0, 50, 1]);
		// (3, 0) shares its sector with (4, 0).
		patch(&path, 12, &[0, 0, 6, 1]);
		// (0, 0) claims more bytes than its single sector holds.
		patch(&path, 2 * 4096, &[0, 0, 0x20, 0]);

		let mut region = RegionFile::open(&path).unwrap();
		let expect = [
			ChunkStatus::MismatchedLength,
			ChunkStatus::InHeader,
			ChunkStatus::OutOfFile,
			ChunkStatus::Overlapping,
			ChunkStatus::Overlapping,
		];
		let infos = region.metadata().unwrap();
		assert_eq!(infos.len(), 5);
		for (info, status) in infos.iter().zip(expect) {
			assert_eq!(info.status, status, "{}", info.coord);
		}
		assert_eq!(infos[0].length, Some(0x2000));
		for (x, status) in expect.into_iter().enumerate() {
			match region.read_chunk((x as i32, 0)) {
				Err(McError::CorruptChunk { coord, status: found }) => {
					assert_eq!(coord, RegionCoord::new(x as i32, 0));
					assert_eq!(found, status);
				}
				other => panic!("expected corruption for ({x}, 0), got {other:?}"),
			}
		}

		// Overwriting a damaged slot never frees the sectors it pointed at.
		region.write_chunk((3, 0), &payload(100, 9), CompressionScheme::Uncompressed).unwrap();
		region.write_chunk((1, 0), &payload(100, 9), CompressionScheme::Uncompressed).unwrap();
		for x in [1, 3] {
			let sector = region.sector((x, 0));
			assert!(sector.sector_offset() >= 2);
			assert!(!sector.intersects(region.sector((4, 0))));
			assert!(!sector.intersects(region.sector((0, 0))));
		}
		assert_eq!(region.read_chunk((4, 0)).unwrap().unwrap().data, payload(100, 4));
		assert_eq!(region.read_chunk((3, 0)).unwrap().unwrap().data, payload(100, 9));
	}

	#[test]
	fn zero_offset_slot_is_absent() {
		let (_dir, path) = temp_region();
		let mut region = RegionFile::open(&path).unwrap();
		region.write_chunk((1, 0), &payload(100, 1), CompressionScheme::Uncompressed).unwrap();
		drop(region);
		// Offset 0 with a count of 1.
		patch(&path, 0, &[0, 0, 0, 1]);

		let mut region = RegionFile::open(&path).unwrap();
		assert_eq!(region.chunk_count(), 1);
		assert!(!region.has_chunk((0, 0)));
		assert!(region.read_chunk((0, 0)).unwrap().is_none());
		assert!(region.load_chunk((0, 0)).unwrap().is_none());
		assert!(!region.delete_chunk((0, 0)).unwrap());
		let infos = region.metadata().unwrap();
		assert_eq!(infos.len(), 1);
		assert_eq!(infos[0].coord, RegionCoord::new(1, 0));
		assert!(infos[0].status.is_ok());

		let sector = region.write_chunk((0, 0), &payload(100, 0), CompressionScheme::Uncompressed).unwrap();
		assert_eq!(sector, RegionSector::new(3, 1));
		assert_eq!(region.read_chunk((0, 0)).unwrap().unwrap().data, payload(100, 0));
		assert_eq!(region.read_chunk((1, 0)).unwrap().unwrap().data, payload(100, 1));
	}

	#[test]
	fn bad_scheme_byte() {
		let (_dir, path) = temp_region();
		let mut region = RegionFile::open(&path).unwrap();
		region.write_chunk((0, 0), &payload(10, 0), CompressionScheme::Uncompressed).unwrap();
		drop(region);
		patch(&path, 2 * 4096 + 4, &[9]);
		let mut region = RegionFile::open(&path).unwrap();
		assert!(matches!(region.read_chunk((0, 0)), Err(McError::InvalidCompressionScheme(9))));
	}

	#[test]
	fn every_scheme_loads() {
		let (_dir, path) = temp_region();
		let tag = NamedTag::new("Chunk", compound! {
			("DataVersion", 1343i32),
			("Heights", vec![70i64; 37]),
		});
		for (x, scheme) in [CompressionScheme::GZip, CompressionScheme::ZLib, CompressionScheme::Uncompressed].into_iter().enumerate() {
			let config = RegionConfig { scheme, level: Compression::best() };
			let mut region = RegionFile::open_with(&path, config).unwrap();
			region.save_chunk((x as i32, 0), &tag).unwrap();
			assert_eq!(region.read_chunk((x as i32, 0)).unwrap().unwrap().scheme, scheme);
		}
		let mut region = RegionFile::open(&path).unwrap();
		for x in 0..3 {
			assert_eq!(region.load_chunk((x, 0)).unwrap().unwrap(), tag);
		}
	}

	#[test]
	fn garbage_payload_is_a_decompression_error() {
		let (_dir, path) = temp_region();
		let mut region = RegionFile::open(&path).unwrap();
		region.write_chunk((0, 0), &[1, 2, 3, 4, 5], CompressionScheme::ZLib).unwrap();
		assert!(matches!(region.load_chunk((0, 0)), Err(McError::Decompression(_))));
	}

	#[test]
	fn non_compound_root_is_rejected() {
		let (_dir, path) = temp_region();
		let mut region = RegionFile::open(&path).unwrap();
		let tag = NamedTag::new("", Tag::Int(1));
		assert!(matches!(
			region.save_chunk((0, 0), &tag),
			Err(McError::Nbt(NbtError::RootNotCompound(TagID::Int)))
		));
		let bytes = nbt::serialize(&tag).unwrap();
		region.write_chunk((0, 0), &bytes, CompressionScheme::Uncompressed).unwrap();
		assert!(matches!(
			region.load_chunk((0, 0)),
			Err(McError::Nbt(NbtError::RootNotCompound(TagID::Int)))
		));
	}

	#[test]
	fn defragment_compacts() {
		let (_dir, path) = temp_region();
		let mut region = RegionFile::open(&path).unwrap();
		region.write_chunk((0, 0), &payload(5000, 0), CompressionScheme::Uncompressed).unwrap();
		region.write_chunk((1, 0), &payload(9000, 1), CompressionScheme::Uncompressed).unwrap();
		region.write_chunk((2, 0), &payload(100, 2), CompressionScheme::Uncompressed).unwrap();
		let stamp = region.timestamp((2, 0));
		region.delete_chunk((1, 0)).unwrap();
		region.write_chunk((0, 0), &payload(20000, 3), CompressionScheme::Uncompressed).unwrap();
		assert!(region.sector_manager().count_unused_blocks() > 0);

		region.defragment().unwrap();
		assert_eq!(region.sector((0, 0)), RegionSector::new(2, 5));
		assert_eq!(region.sector((2, 0)), RegionSector::new(7, 1));
		assert_eq!(region.timestamp((2, 0)), stamp);
		assert_eq!(region.sector_manager().count_unused_blocks(), 0);
		assert_eq!(region.len_sectors(), 8);
		drop(region);

		assert_eq!(disk_len(&path), 8 * 4096);
		let mut region = RegionFile::open(&path).unwrap();
		assert_eq!(region.read_chunk((0, 0)).unwrap().unwrap().data, payload(20000, 3));
		assert_eq!(region.read_chunk((2, 0)).unwrap().unwrap().data, payload(100, 2));
		assert!(!region.has_chunk((1, 0)));
	}
}
