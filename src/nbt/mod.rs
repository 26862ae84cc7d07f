//! Named Binary Tag (NBT) support.
//!
//! [tag] holds the in-memory value tree, [io] holds the binary codec,
//! [file] deals with standalone (optionally compressed) documents, and
//! [pretty] renders a tree for humans.

pub mod tag;
pub mod tagref;
pub mod io;
pub mod pretty;
pub mod file;
pub mod macros;

use thiserror::Error;

use tag::TagID;

/// Compound storage. Insertion order is the order written to the wire.
pub type Map = indexmap::IndexMap<String, tag::Tag>;

pub use tag::{
	Tag,
	ListTag,
	NamedTag,
};
pub use tagref::ValueRef;
pub use file::NbtFile;
pub use io::{
	parse,
	serialize,
	read_named_tag,
	write_named_tag,
};

/// Errors raised while encoding or decoding NBT.
#[derive(Debug, Error)]
pub enum NbtError {
	#[error("Unexpected end of stream.")]
	UnexpectedEndOfStream,
	#[error("Unsupported Tag ID: {0}")]
	UnknownTagType(u8),
	#[error("Malformed length prefix: {0}")]
	MalformedLength(i64),
	#[error("Failed to convert to UTF-8 string.")]
	InvalidEncoding(#[from] std::string::FromUtf8Error),
	#[error("List of {expected} can not hold {found}.")]
	ListElementTypeMismatch {
		expected: TagID,
		found: TagID,
	},
	#[error("Root tag must be a Compound, found {0}.")]
	RootNotCompound(TagID),
	#[error("Tags are nested deeper than {0} levels.")]
	NestingTooDeep(usize),
	#[error("IO Error: {0}")]
	Io(std::io::Error),
}

impl From<std::io::Error> for NbtError {
	fn from(value: std::io::Error) -> Self {
		if value.kind() == std::io::ErrorKind::UnexpectedEof {
			NbtError::UnexpectedEndOfStream
		} else {
			NbtError::Io(value)
		}
	}
}

pub type NbtResult<T> = Result<T, NbtError>;
