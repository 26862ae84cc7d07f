use std::{
	collections::{
		BTreeMap,
		HashMap,
		hash_map::Entry,
	},
	fs,
	path::{
		Path, PathBuf,
	},
};

use log::debug;

use crate::{
	McResult, McError,
	nbt::NamedTag,
};

use super::io::region::{
	ChunkData,
	CompressionScheme,
	RegionConfig,
	RegionCoord,
	RegionFile,
	RegionSector,
	coord::ChunkPos,
};

/// Region key: `(region_x, region_z)`.
pub type RegionKey = (i32, i32);

/// The two region file flavours, told apart by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionFormat {
	/// `.mca` files.
	Anvil,
	/// `.mcr` files.
	McRegion,
}

impl RegionFormat {
	pub const fn extension(self) -> &'static str {
		match self {
			RegionFormat::Anvil => "mca",
			RegionFormat::McRegion => "mcr",
		}
	}

	/// The file name of the region at `(x, z)`, eg. `r.-1.2.mca`.
	pub fn file_name(self, (x, z): RegionKey) -> String {
		format!("r.{x}.{z}.{}", self.extension())
	}

	/// Parses a region file name of this format.
	/// Regions whose chunks could not be addressed with `i32` positions
	/// are rejected.
	pub fn parse_file_name(self, name: &str) -> Option<RegionKey> {
		let parts: Vec<&str> = name.split('.').collect();
		let key: RegionKey = match parts.as_slice() {
			["r", x, z, ext] if *ext == self.extension() => {
				(x.parse().ok()?, z.parse().ok()?)
			}
			_ => return None,
		};
		let range = REGION_MIN..=REGION_MAX;
		(range.contains(&key.0) && range.contains(&key.1)).then_some(key)
	}
}

const REGION_MIN: i32 = i32::MIN / 32;
const REGION_MAX: i32 = i32::MAX / 32;

/// The smallest rectangle of chunk positions holding every chunk of a world.
/// Both corners are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkBounds {
	pub min: ChunkPos,
	pub max: ChunkPos,
}

impl ChunkBounds {
	/// Bounds holding only `pos`.
	pub const fn new(pos: ChunkPos) -> Self {
		Self {
			min: pos,
			max: pos,
		}
	}

	/// Grows the bounds to include `pos`.
	pub fn expand(&mut self, pos: ChunkPos) {
		self.min.x = self.min.x.min(pos.x);
		self.min.z = self.min.z.min(pos.z);
		self.max.x = self.max.x.max(pos.x);
		self.max.z = self.max.z.max(pos.z);
	}

	pub fn contains(&self, pos: ChunkPos) -> bool {
		(self.min.x..=self.max.x).contains(&pos.x)
		&& (self.min.z..=self.max.z).contains(&pos.z)
	}

	/// Number of chunk columns along x.
	pub fn width(&self) -> u64 {
		(self.max.x as i64 - self.min.x as i64 + 1) as u64
	}

	/// Number of chunk rows along z.
	pub fn depth(&self) -> u64 {
		(self.max.z as i64 - self.min.z as i64 + 1) as u64
	}
}

impl std::fmt::Display for ChunkBounds {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}..={}", self.min, self.max)
	}
}

/// A world directory holding region files under `<world>/region`.
/// Region files are opened on first use and stay open until
/// [WorldFolder::close_region] or until the folder is dropped.
pub struct WorldFolder {
	directory: PathBuf,
	format: RegionFormat,
	config: RegionConfig,
	region_paths: BTreeMap<RegionKey, PathBuf>,
	regions: HashMap<RegionKey, RegionFile>,
}

impl WorldFolder {
	/// Opens a world, guessing the region format from the files present.
	/// Anvil wins if both kinds of files exist.
	pub fn open<P: AsRef<Path>>(directory: P) -> McResult<Self> {
		let directory = directory.as_ref();
		if !directory.is_dir() {
			return Err(McError::WorldDirectoryNotFound(directory.to_owned()));
		}
		for format in [RegionFormat::Anvil, RegionFormat::McRegion] {
			let found = scan_regions(&directory.join("region"), format)?;
			if !found.is_empty() {
				return Ok(Self::with_regions(directory, format, RegionConfig::default(), found));
			}
		}
		Err(McError::UnknownWorldFormat(directory.to_owned()))
	}

	/// Opens a world with an explicit format. The world may not have any
	/// region files yet; they are created when chunks are written.
	pub fn open_with<P: AsRef<Path>>(directory: P, format: RegionFormat, config: RegionConfig) -> McResult<Self> {
		let directory = directory.as_ref();
		if !directory.is_dir() {
			return Err(McError::WorldDirectoryNotFound(directory.to_owned()));
		}
		let found = scan_regions(&directory.join("region"), format)?;
		Ok(Self::with_regions(directory, format, config, found))
	}

	fn with_regions(directory: &Path, format: RegionFormat, config: RegionConfig, region_paths: BTreeMap<RegionKey, PathBuf>) -> Self {
		debug!("Opened world {} ({} {} regions).", directory.display(), region_paths.len(), format.extension());
		Self {
			directory: directory.to_owned(),
			format,
			config,
			region_paths,
			regions: HashMap::new(),
		}
	}

	pub fn directory(&self) -> &Path {
		&self.directory
	}

	pub fn format(&self) -> RegionFormat {
		self.format
	}

	pub fn region_directory(&self) -> PathBuf {
		self.directory.join("region")
	}

	/// Every region known to exist on disk, in coordinate order.
	pub fn regions(&self) -> impl Iterator<Item = RegionKey> + '_ {
		self.region_paths.keys().copied()
	}

	/// Returns the open region at `key`, opening it if needed.
	/// When `create` is false a region that does not exist yields `None`.
	pub fn region(&mut self, key: RegionKey, create: bool) -> McResult<Option<&mut RegionFile>> {
		if !create && !self.region_paths.contains_key(&key) {
			return Ok(None);
		}
		self.region_or_create(key).map(Some)
	}

	/// Returns the open region at `key`, creating the region file (and the
	/// region directory) if it does not exist yet.
	pub fn region_or_create(&mut self, key: RegionKey) -> McResult<&mut RegionFile> {
		match self.regions.entry(key) {
			Entry::Occupied(entry) => Ok(entry.into_mut()),
			Entry::Vacant(entry) => {
				let (path, created) = match self.region_paths.get(&key) {
					Some(path) => (path.clone(), false),
					None => {
						let region_directory = self.directory.join("region");
						fs::create_dir_all(&region_directory)?;
						(region_directory.join(self.format.file_name(key)), true)
					}
				};
				debug!("Opening region {}.", path.display());
				let region = RegionFile::open_with(&path, self.config)?;
				if created {
					self.region_paths.insert(key, path);
				}
				Ok(entry.insert(region))
			}
		}
	}

	/// Closes the region at `key` if it is open.
	/// Returns `false` if it was not open.
	pub fn close_region(&mut self, key: RegionKey) -> McResult<bool> {
		match self.regions.remove(&key) {
			Some(region) => {
				region.close()?;
				Ok(true)
			}
			None => Ok(false),
		}
	}

	/// Flushes and closes every open region.
	pub fn close(mut self) -> McResult<()> {
		for (_, region) in self.regions.drain() {
			region.close()?;
		}
		Ok(())
	}

	pub fn read_chunk(&mut self, pos: ChunkPos) -> McResult<Option<ChunkData>> {
		match self.region(pos.region(), false)? {
			Some(region) => region.read_chunk(pos.local()),
			None => Ok(None),
		}
	}

	pub fn write_chunk(&mut self, pos: ChunkPos, data: &[u8], scheme: CompressionScheme) -> McResult<RegionSector> {
		self.region_or_create(pos.region())?.write_chunk(pos.local(), data, scheme)
	}

	pub fn load_chunk(&mut self, pos: ChunkPos) -> McResult<Option<NamedTag>> {
		match self.region(pos.region(), false)? {
			Some(region) => region.load_chunk(pos.local()),
			None => Ok(None),
		}
	}

	pub fn save_chunk(&mut self, pos: ChunkPos, tag: &NamedTag) -> McResult<RegionSector> {
		self.region_or_create(pos.region())?.save_chunk(pos.local(), tag)
	}

	/// Returns `false` if the chunk did not exist.
	pub fn delete_chunk(&mut self, pos: ChunkPos) -> McResult<bool> {
		match self.region(pos.region(), false)? {
			Some(region) => region.delete_chunk(pos.local()),
			None => Ok(false),
		}
	}

	/// Positions of every chunk in every region, region by region.
	pub fn chunk_positions(&mut self) -> McResult<Vec<ChunkPos>> {
		let keys: Vec<RegionKey> = self.regions().collect();
		let mut positions = Vec::new();
		for key in keys {
			let Some(region) = self.region(key, false)? else {
				continue;
			};
			positions.extend(
				RegionCoord::all()
					.filter(|&coord| region.has_chunk(coord))
					.filter_map(|coord| ChunkPos::from_region(key, coord))
			);
		}
		Ok(positions)
	}

	/// The smallest rectangle holding every chunk in the world, or `None`
	/// if the world has no chunks.
	pub fn bounding_box(&mut self) -> McResult<Option<ChunkBounds>> {
		let bounds = self.chunk_positions()?
			.into_iter()
			.fold(None, |bounds: Option<ChunkBounds>, pos| match bounds {
				Some(mut bounds) => {
					bounds.expand(pos);
					Some(bounds)
				}
				None => Some(ChunkBounds::new(pos)),
			});
		Ok(bounds)
	}

	/// Number of chunks across every region.
	pub fn chunk_count(&mut self) -> McResult<usize> {
		let keys: Vec<RegionKey> = self.regions().collect();
		let mut count = 0;
		for key in keys {
			if let Some(region) = self.region(key, false)? {
				count += region.chunk_count();
			}
		}
		Ok(count)
	}

	/// Loads many chunks at once. Each chunk succeeds or fails on its own,
	/// so one damaged chunk does not hide the rest.
	pub fn load_chunks<I: IntoIterator<Item = ChunkPos>>(&mut self, positions: I) -> Vec<(ChunkPos, McResult<Option<NamedTag>>)> {
		positions.into_iter()
			.map(|pos| (pos, self.load_chunk(pos)))
			.collect()
	}
}

/// Finds every region file of `format` in `region_directory`.
/// A missing directory simply has no regions.
fn scan_regions(region_directory: &Path, format: RegionFormat) -> McResult<BTreeMap<RegionKey, PathBuf>> {
	let mut found = BTreeMap::new();
	if !region_directory.is_dir() {
		return Ok(found);
	}
	for entry in fs::read_dir(region_directory)? {
		let path = entry?.path();
		if !path.is_file() {
			continue;
		}
		let key = path.file_name()
			.and_then(|name| name.to_str())
			.and_then(|name| format.parse_file_name(name));
		if let Some(key) = key {
			found.insert(key, path);
		}
	}
	Ok(found)
}
