//! The binary NBT codec.
//!
//! Every value is big-endian. A named tag is `id:u8`, `name` (a string), then
//! the payload for `id`. Strings are prefixed with a `u16` byte count; arrays
//! and lists with an `i32` element count.

use std::io::{
	Read, Write,
};

use byteorder::{
	BigEndian,
	ByteOrder,
	ReadBytesExt,
	WriteBytesExt,
};
use log::warn;

use crate::nbt::{
	Map,
	NbtError,
	NbtResult,
	tag::*,
};

/// Lists and Compounds may not be nested deeper than this.
pub const MAX_DEPTH: usize = 512;

/// Upper bound on the capacity reserved up front for a list. Larger lists
/// still decode, they just grow as elements actually arrive.
const PREALLOC_LIMIT: usize = 4096;

pub trait NbtRead: Sized {
	fn nbt_read<R: Read>(reader: &mut R) -> NbtResult<Self>;
}

pub trait NbtWrite {
	/// Returns the number of bytes written.
	fn nbt_write<W: Write>(&self, writer: &mut W) -> NbtResult<usize>;
}

pub trait NbtReadExt: Read + Sized {
	fn read_nbt<T: NbtRead>(&mut self) -> NbtResult<T> {
		T::nbt_read(self)
	}
}

impl<R: Read> NbtReadExt for R {}

pub trait NbtWriteExt: Write + Sized {
	fn write_nbt<T: NbtWrite>(&mut self, value: &T) -> NbtResult<usize> {
		value.nbt_write(self)
	}
}

impl<W: Write> NbtWriteExt for W {}

/// Parses a complete uncompressed NBT document.
pub fn parse(bytes: &[u8]) -> NbtResult<NamedTag> {
	let mut reader = bytes;
	read_named_tag(&mut reader)
}

/// Serializes a named tag into a new buffer.
/// Values nested deeper than [MAX_DEPTH] are rejected with
/// [NbtError::NestingTooDeep], the same as when parsing.
pub fn serialize(tag: &NamedTag) -> NbtResult<Vec<u8>> {
	let mut buffer = Vec::new();
	write_named_tag(&mut buffer, tag)?;
	Ok(buffer)
}

pub fn read_named_tag<R: Read>(reader: &mut R) -> NbtResult<NamedTag> {
	let id = TagID::try_from(reader.read_u8()?)?;
	if id == TagID::End {
		return Err(NbtError::UnknownTagType(TagID::End.value()));
	}
	let name = read_string(reader)?;
	let tag = read_payload(id, reader, 0)?;
	Ok(NamedTag { name, tag })
}

pub fn write_named_tag<W: Write>(writer: &mut W, tag: &NamedTag) -> NbtResult<usize> {
	writer.write_u8(tag.tag.id().value())?;
	let name_size = write_string(writer, &tag.name)?;
	Ok(1 + name_size + write_payload(&tag.tag, writer, 0)?)
}

impl NbtRead for NamedTag {
	fn nbt_read<R: Read>(reader: &mut R) -> NbtResult<Self> {
		read_named_tag(reader)
	}
}

impl NbtWrite for NamedTag {
	fn nbt_write<W: Write>(&self, writer: &mut W) -> NbtResult<usize> {
		write_named_tag(writer, self)
	}
}

impl NbtWrite for Tag {
	/// Writes only the payload; the caller is responsible for the id and name.
	fn nbt_write<W: Write>(&self, writer: &mut W) -> NbtResult<usize> {
		write_payload(self, writer, 0)
	}
}

/// Reads a length prefix for an array or list. Negative counts are malformed.
fn read_count<R: Read>(reader: &mut R) -> NbtResult<usize> {
	let count = reader.read_i32::<BigEndian>()?;
	if count < 0 {
		return Err(NbtError::MalformedLength(count as i64));
	}
	Ok(count as usize)
}

/// Reads exactly `size` bytes without trusting `size` for the allocation.
/// Running short means the length prefix was wrong.
fn read_body<R: Read>(reader: &mut R, size: u64, declared: i64) -> NbtResult<Vec<u8>> {
	let mut buffer = Vec::with_capacity((size as usize).min(PREALLOC_LIMIT));
	reader.by_ref().take(size).read_to_end(&mut buffer)?;
	if (buffer.len() as u64) < size {
		return Err(NbtError::MalformedLength(declared));
	}
	Ok(buffer)
}

fn read_string<R: Read>(reader: &mut R) -> NbtResult<String> {
	let length = reader.read_u16::<BigEndian>()?;
	let bytes = read_body(reader, length as u64, length as i64)?;
	Ok(String::from_utf8(bytes)?)
}

fn read_byte_array<R: Read>(reader: &mut R) -> NbtResult<Vec<i8>> {
	let count = read_count(reader)?;
	let bytes = read_body(reader, count as u64, count as i64)?;
	Ok(bytes.into_iter().map(|b| b as i8).collect())
}

fn read_int_array<R: Read>(reader: &mut R) -> NbtResult<Vec<i32>> {
	let count = read_count(reader)?;
	let bytes = read_body(reader, count as u64 * 4, count as i64)?;
	let mut values = vec![0i32; count];
	BigEndian::read_i32_into(&bytes, &mut values);
	Ok(values)
}

fn read_long_array<R: Read>(reader: &mut R) -> NbtResult<Vec<i64>> {
	let count = read_count(reader)?;
	let bytes = read_body(reader, count as u64 * 8, count as i64)?;
	let mut values = vec![0i64; count];
	BigEndian::read_i64_into(&bytes, &mut values);
	Ok(values)
}

fn read_list<R: Read>(reader: &mut R, depth: usize) -> NbtResult<ListTag> {
	let element = TagID::try_from(reader.read_u8()?)?;
	let count = read_count(reader)?;
	if element == TagID::End {
		if count != 0 {
			return Err(NbtError::MalformedLength(count as i64));
		}
		return Ok(ListTag::Empty);
	}
	macro_rules! read_elements {
		($variant:ident, $read:expr) => {
			{
				let mut list = Vec::with_capacity(count.min(PREALLOC_LIMIT));
				for _ in 0..count {
					list.push($read);
				}
				ListTag::$variant(list)
			}
		};
	}
	Ok(match element {
		TagID::End => ListTag::Empty,
		TagID::Byte => read_elements!(Byte, reader.read_i8()?),
		TagID::Short => read_elements!(Short, reader.read_i16::<BigEndian>()?),
		TagID::Int => read_elements!(Int, reader.read_i32::<BigEndian>()?),
		TagID::Long => read_elements!(Long, reader.read_i64::<BigEndian>()?),
		TagID::Float => read_elements!(Float, reader.read_f32::<BigEndian>()?),
		TagID::Double => read_elements!(Double, reader.read_f64::<BigEndian>()?),
		TagID::ByteArray => read_elements!(ByteArray, read_byte_array(reader)?),
		TagID::String => read_elements!(String, read_string(reader)?),
		TagID::List => read_elements!(List, read_list(reader, nested(depth)?)?),
		TagID::Compound => read_elements!(Compound, read_compound(reader, nested(depth)?)?),
		TagID::IntArray => read_elements!(IntArray, read_int_array(reader)?),
		TagID::LongArray => read_elements!(LongArray, read_long_array(reader)?),
	})
}

fn read_compound<R: Read>(reader: &mut R, depth: usize) -> NbtResult<Map> {
	let mut map = Map::new();
	loop {
		let id = TagID::try_from(reader.read_u8()?)?;
		if id == TagID::End {
			break;
		}
		let name = read_string(reader)?;
		let value = read_payload(id, reader, depth)?;
		// Last value wins, but the member keeps the position it was first seen at.
		if map.contains_key(&name) {
			warn!("Duplicate Compound member \"{name}\", keeping the last value.");
		}
		map.insert(name, value);
	}
	Ok(map)
}

fn nested(depth: usize) -> NbtResult<usize> {
	if depth >= MAX_DEPTH {
		return Err(NbtError::NestingTooDeep(MAX_DEPTH));
	}
	Ok(depth + 1)
}

/// Reads the payload of a tag whose id has already been consumed.
fn read_payload<R: Read>(id: TagID, reader: &mut R, depth: usize) -> NbtResult<Tag> {
	Ok(match id {
		TagID::End => return Err(NbtError::UnknownTagType(id.value())),
		TagID::Byte => Tag::Byte(reader.read_i8()?),
		TagID::Short => Tag::Short(reader.read_i16::<BigEndian>()?),
		TagID::Int => Tag::Int(reader.read_i32::<BigEndian>()?),
		TagID::Long => Tag::Long(reader.read_i64::<BigEndian>()?),
		TagID::Float => Tag::Float(reader.read_f32::<BigEndian>()?),
		TagID::Double => Tag::Double(reader.read_f64::<BigEndian>()?),
		TagID::ByteArray => Tag::ByteArray(read_byte_array(reader)?),
		TagID::String => Tag::String(read_string(reader)?),
		TagID::List => Tag::List(read_list(reader, nested(depth)?)?),
		TagID::Compound => Tag::Compound(read_compound(reader, nested(depth)?)?),
		TagID::IntArray => Tag::IntArray(read_int_array(reader)?),
		TagID::LongArray => Tag::LongArray(read_long_array(reader)?),
	})
}

fn write_count<W: Write>(writer: &mut W, count: usize) -> NbtResult<usize> {
	let count = i32::try_from(count)
		.map_err(|_| NbtError::MalformedLength(count as i64))?;
	writer.write_i32::<BigEndian>(count)?;
	Ok(4)
}

fn write_string<W: Write>(writer: &mut W, value: &str) -> NbtResult<usize> {
	let length = u16::try_from(value.len())
		.map_err(|_| NbtError::MalformedLength(value.len() as i64))?;
	writer.write_u16::<BigEndian>(length)?;
	writer.write_all(value.as_bytes())?;
	Ok(2 + value.len())
}

fn write_byte_array<W: Write>(writer: &mut W, value: &[i8]) -> NbtResult<usize> {
	let size = write_count(writer, value.len())?;
	let bytes: Vec<u8> = value.iter().map(|&b| b as u8).collect();
	writer.write_all(&bytes)?;
	Ok(size + bytes.len())
}

fn write_int_array<W: Write>(writer: &mut W, value: &[i32]) -> NbtResult<usize> {
	let size = write_count(writer, value.len())?;
	let mut bytes = vec![0u8; value.len() * 4];
	BigEndian::write_i32_into(value, &mut bytes);
	writer.write_all(&bytes)?;
	Ok(size + bytes.len())
}

fn write_long_array<W: Write>(writer: &mut W, value: &[i64]) -> NbtResult<usize> {
	let size = write_count(writer, value.len())?;
	let mut bytes = vec![0u8; value.len() * 8];
	BigEndian::write_i64_into(value, &mut bytes);
	writer.write_all(&bytes)?;
	Ok(size + bytes.len())
}

fn write_list<W: Write>(writer: &mut W, list: &ListTag, depth: usize) -> NbtResult<usize> {
	writer.write_u8(list.element_id().value())?;
	let mut size = 1 + write_count(writer, list.len())?;
	macro_rules! write_elements {
		($list:ident, |$item:ident| $write:expr) => {
			for $item in $list.iter() {
				size += $write;
			}
		};
	}
	match list {
		ListTag::Empty => (),
		ListTag::Byte(list) => write_elements!(list, |item| { writer.write_i8(*item)?; 1 }),
		ListTag::Short(list) => write_elements!(list, |item| { writer.write_i16::<BigEndian>(*item)?; 2 }),
		ListTag::Int(list) => write_elements!(list, |item| { writer.write_i32::<BigEndian>(*item)?; 4 }),
		ListTag::Long(list) => write_elements!(list, |item| { writer.write_i64::<BigEndian>(*item)?; 8 }),
		ListTag::Float(list) => write_elements!(list, |item| { writer.write_f32::<BigEndian>(*item)?; 4 }),
		ListTag::Double(list) => write_elements!(list, |item| { writer.write_f64::<BigEndian>(*item)?; 8 }),
		ListTag::ByteArray(list) => write_elements!(list, |item| write_byte_array(writer, item)?),
		ListTag::String(list) => write_elements!(list, |item| write_string(writer, item)?),
		ListTag::List(list) => write_elements!(list, |item| write_list(writer, item, nested(depth)?)?),
		ListTag::Compound(list) => write_elements!(list, |item| write_compound(writer, item, nested(depth)?)?),
		ListTag::IntArray(list) => write_elements!(list, |item| write_int_array(writer, item)?),
		ListTag::LongArray(list) => write_elements!(list, |item| write_long_array(writer, item)?),
	}
	Ok(size)
}

fn write_compound<W: Write>(writer: &mut W, map: &Map, depth: usize) -> NbtResult<usize> {
	let mut size = 0;
	for (name, value) in map.iter() {
		writer.write_u8(value.id().value())?;
		size += 1 + write_string(writer, name)?;
		size += write_payload(value, writer, depth)?;
	}
	writer.write_u8(TagID::End.value())?;
	Ok(size + 1)
}

fn write_payload<W: Write>(tag: &Tag, writer: &mut W, depth: usize) -> NbtResult<usize> {
	Ok(match tag {
		Tag::Byte(value) => { writer.write_i8(*value)?; 1 }
		Tag::Short(value) => { writer.write_i16::<BigEndian>(*value)?; 2 }
		Tag::Int(value) => { writer.write_i32::<BigEndian>(*value)?; 4 }
		Tag::Long(value) => { writer.write_i64::<BigEndian>(*value)?; 8 }
		Tag::Float(value) => { writer.write_f32::<BigEndian>(*value)?; 4 }
		Tag::Double(value) => { writer.write_f64::<BigEndian>(*value)?; 8 }
		Tag::ByteArray(value) => write_byte_array(writer, value)?,
		Tag::String(value) => write_string(writer, value)?,
		Tag::List(value) => write_list(writer, value, nested(depth)?)?,
		Tag::Compound(value) => write_compound(writer, value, nested(depth)?)?,
		Tag::IntArray(value) => write_int_array(writer, value)?,
		Tag::LongArray(value) => write_long_array(writer, value)?,
	})
}
