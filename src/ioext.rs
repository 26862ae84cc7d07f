//! Extension traits for reading and writing the fixed-width big-endian
//! values that make up region file headers and chunk records.

use std::io::{
	self,
	Read, Write,
	SeekFrom,
};

use byteorder::{
	BigEndian,
	ReadBytesExt,
	WriteBytesExt,
};

use crate::McResult;

/// A value that can be read from a big-endian byte stream.
pub trait Readable: Sized {
	fn read_from<R: Read>(reader: &mut R) -> McResult<Self>;
}

/// A value that can be written to a big-endian byte stream.
/// Returns the number of bytes written.
pub trait Writable {
	fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize>;
}

/// A value that knows where it lives in a seekable stream.
pub trait Seekable {
	fn seeker(&self) -> SeekFrom;
}

pub trait ReadExt: Read + Sized {
	fn read_value<T: Readable>(&mut self) -> McResult<T> {
		T::read_from(self)
	}
}

impl<R: Read> ReadExt for R {}

pub trait WriteExt: Write + Sized {
	fn write_value<T: Writable>(&mut self, value: T) -> McResult<usize> {
		value.write_to(self)
	}
}

impl<W: Write> WriteExt for W {}

pub trait WriteZeroes {
	fn write_zeroes(&mut self, count: u64) -> io::Result<u64>;
}

impl<T: Write> WriteZeroes for T {
	fn write_zeroes(&mut self, count: u64) -> io::Result<u64> {
		const ZEROES: &'static [u8; 4096] = &[0u8; 4096];
		let mut remainder = count;
		while remainder >= ZEROES.len() as u64 {
			self.write_all(ZEROES)?;
			remainder -= ZEROES.len() as u64;
		}
		if remainder != 0 {
			self.write_all(&ZEROES[0..remainder as usize])?;
		}
		Ok(count)
	}
}

macro_rules! __primitive_impls {
	($type:ty, $read:ident, $write:ident$(, $order:ty)?) => {
		impl Readable for $type {
			fn read_from<R: Read>(reader: &mut R) -> McResult<Self> {
				Ok(reader.$read$(::<$order>)?()?)
			}
		}

		impl Writable for $type {
			fn write_to<W: Write>(&self, writer: &mut W) -> McResult<usize> {
				writer.$write$(::<$order>)?(*self)?;
				Ok(std::mem::size_of::<$type>())
			}
		}
	};
}

__primitive_impls!(u8, read_u8, write_u8);
__primitive_impls!(u16, read_u16, write_u16, BigEndian);
__primitive_impls!(u32, read_u32, write_u32, BigEndian);
__primitive_impls!(u64, read_u64, write_u64, BigEndian);

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	#[test]
	fn big_endian_values() {
		let mut buf = Cursor::new(Vec::new());
		buf.write_value(0x01020304u32).unwrap();
		buf.write_value(7u8).unwrap();
		assert_eq!(buf.get_ref().as_slice(), &[1, 2, 3, 4, 7]);
		buf.set_position(0);
		assert_eq!(buf.read_value::<u32>().unwrap(), 0x01020304);
		assert_eq!(buf.read_value::<u8>().unwrap(), 7);
	}

	#[test]
	fn zeroes() {
		let mut buf = Vec::new();
		assert_eq!(buf.write_zeroes(5000).unwrap(), 5000);
		assert_eq!(buf.len(), 5000);
		assert!(buf.iter().all(|&b| b == 0));
	}
}
