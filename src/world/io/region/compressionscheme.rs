use std::io::{
	self,
	Read, Write,
};

use flate2::{
	Compression,
	Decompress,
	FlushDecompress,
	Status,
	read::GzDecoder,
	write::{
		GzEncoder,
		ZlibEncoder,
	},
};

use crate::{
	McResult, McError,
	ioext::*,
};

/// Compression scheme used for writing or reading.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompressionScheme {
	/// GZip compression is used.
	GZip = 1,
	/// ZLib compression is used.
	#[default]
	ZLib = 2,
	/// Data is uncompressed.
	Uncompressed = 3,
}

impl CompressionScheme {
	pub const fn value(self) -> u8 {
		self as u8
	}

	/// Compresses `data` as a single complete stream.
	pub fn compress(self, data: &[u8], level: Compression) -> McResult<Vec<u8>> {
		Ok(match self {
			CompressionScheme::GZip => {
				let mut encoder = GzEncoder::new(Vec::new(), level);
				encoder.write_all(data)?;
				encoder.finish()?
			}
			CompressionScheme::ZLib => {
				let mut encoder = ZlibEncoder::new(Vec::new(), level);
				encoder.write_all(data)?;
				encoder.finish()?
			}
			CompressionScheme::Uncompressed => data.to_vec(),
		})
	}

	/// Decompresses `data` completely. Truncated or corrupt streams are
	/// reported as [McError::Decompression] and never yield partial output.
	pub fn decompress(self, data: &[u8]) -> McResult<Vec<u8>> {
		match self {
			CompressionScheme::GZip => {
				let mut buffer = Vec::new();
				GzDecoder::new(data).read_to_end(&mut buffer).map_err(McError::Decompression)?;
				Ok(buffer)
			}
			CompressionScheme::ZLib => inflate_zlib(data),
			CompressionScheme::Uncompressed => Ok(data.to_vec()),
		}
	}

	/// Guesses the scheme of a standalone blob from its leading bytes.
	/// GZip has a fixed magic number; ZLib has a header checksum.
	/// Anything else is assumed to be uncompressed.
	pub fn sniff(data: &[u8]) -> Self {
		match data {
			[0x1f, 0x8b, ..] => CompressionScheme::GZip,
			[cmf, flg, ..] if cmf & 0x0F == 8 && (*cmf as u16 * 256 + *flg as u16) % 31 == 0 => {
				CompressionScheme::ZLib
			}
			_ => CompressionScheme::Uncompressed,
		}
	}
}

impl TryFrom<u8> for CompressionScheme {
	type Error = McError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			1 => Ok(Self::GZip),
			2 => Ok(Self::ZLib),
			3 => Ok(Self::Uncompressed),
			unexpected => Err(McError::InvalidCompressionScheme(unexpected)),
		}
	}
}

impl Writable for CompressionScheme {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
		writer.write_value(self.value())
	}
}

impl Readable for CompressionScheme {
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self> {
		CompressionScheme::try_from(reader.read_value::<u8>()?)
	}
}

impl std::fmt::Display for CompressionScheme {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			CompressionScheme::GZip => f.write_str("GZip"),
			CompressionScheme::ZLib => f.write_str("ZLib"),
			CompressionScheme::Uncompressed => f.write_str("Uncompressed"),
		}
	}
}

/// Inflates a complete zlib stream. The stream must reach its end marker
/// (and pass its checksum) or the whole blob is rejected.
fn inflate_zlib(data: &[u8]) -> McResult<Vec<u8>> {
	let mut inflater = Decompress::new(true);
	let mut buffer = Vec::with_capacity(data.len().saturating_mul(2).max(64));
	loop {
		if buffer.len() == buffer.capacity() {
			buffer.reserve(buffer.capacity());
		}
		let progress = (inflater.total_in(), inflater.total_out());
		let consumed = inflater.total_in() as usize;
		let status = inflater
			.decompress_vec(&data[consumed..], &mut buffer, FlushDecompress::Finish)
			.map_err(|err| McError::Decompression(io::Error::new(io::ErrorKind::InvalidData, err)))?;
		match status {
			Status::StreamEnd => return Ok(buffer),
			Status::Ok | Status::BufError => {
				if (inflater.total_in(), inflater.total_out()) == progress {
					return Err(McError::Decompression(io::Error::new(
						io::ErrorKind::UnexpectedEof,
						"zlib stream ended early",
					)));
				}
			}
		}
	}
}
