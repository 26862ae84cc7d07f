//! Standalone NBT documents such as `level.dat`.

use std::{
	fs::File,
	io::{
		BufReader, BufWriter,
		Read, Write,
	},
	path::Path,
};

use flate2::Compression;

use crate::{
	McResult,
	nbt::{
		io::{
			parse,
			serialize,
		},
		tag::NamedTag,
	},
	world::io::region::CompressionScheme,
};

/// An NBT document together with the compression it is stored with.
#[derive(Debug, Clone, PartialEq)]
pub struct NbtFile {
	pub root: NamedTag,
	pub scheme: CompressionScheme,
}

impl NbtFile {
	/// Creates a document that will be written GZip compressed, which is
	/// what standalone files conventionally use.
	pub fn new(root: NamedTag) -> Self {
		Self {
			root,
			scheme: CompressionScheme::GZip,
		}
	}

	/// Decodes a document, detecting its compression from the leading bytes.
	/// The root must be a Compound.
	pub fn from_bytes(bytes: &[u8]) -> McResult<Self> {
		let scheme = CompressionScheme::sniff(bytes);
		let raw = scheme.decompress(bytes)?;
		let root = parse(&raw)?.require_compound()?;
		Ok(Self {
			root,
			scheme,
		})
	}

	/// Encodes the document with its scheme.
	pub fn to_bytes(&self, level: Compression) -> McResult<Vec<u8>> {
		let raw = serialize(&self.root)?;
		self.scheme.compress(&raw, level)
	}

	pub fn read<P: AsRef<Path>>(path: P) -> McResult<Self> {
		let mut reader = BufReader::new(File::open(path)?);
		let mut bytes = Vec::new();
		reader.read_to_end(&mut bytes)?;
		Self::from_bytes(&bytes)
	}

	pub fn write<P: AsRef<Path>>(&self, path: P) -> McResult<()> {
		let bytes = self.to_bytes(Compression::default())?;
		let mut writer = BufWriter::new(File::create(path)?);
		writer.write_all(&bytes)?;
		writer.flush()?;
		Ok(())
	}
}
