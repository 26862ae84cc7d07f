use std::fmt::Display;

use crate::nbt::{
	Map,
	NbtError,
	NbtResult,
	tagref::ValueRef,
};

/// The type discriminant written before every named tag and once
/// at the start of every list.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagID {
	End = 0,
	Byte = 1,
	Short = 2,
	Int = 3,
	Long = 4,
	Float = 5,
	Double = 6,
	ByteArray = 7,
	String = 8,
	List = 9,
	Compound = 10,
	IntArray = 11,
	LongArray = 12,
}

impl TagID {
	pub const fn value(self) -> u8 {
		self as u8
	}

	/// The classic name of the tag type, as used by [crate::nbt::pretty].
	pub const fn title(self) -> &'static str {
		match self {
			TagID::End => "TAG_End",
			TagID::Byte => "TAG_Byte",
			TagID::Short => "TAG_Short",
			TagID::Int => "TAG_Int",
			TagID::Long => "TAG_Long",
			TagID::Float => "TAG_Float",
			TagID::Double => "TAG_Double",
			TagID::ByteArray => "TAG_Byte_Array",
			TagID::String => "TAG_String",
			TagID::List => "TAG_List",
			TagID::Compound => "TAG_Compound",
			TagID::IntArray => "TAG_Int_Array",
			TagID::LongArray => "TAG_Long_Array",
		}
	}
}

impl TryFrom<u8> for TagID {
	type Error = NbtError;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Ok(match value {
			0 => TagID::End,
			1 => TagID::Byte,
			2 => TagID::Short,
			3 => TagID::Int,
			4 => TagID::Long,
			5 => TagID::Float,
			6 => TagID::Double,
			7 => TagID::ByteArray,
			8 => TagID::String,
			9 => TagID::List,
			10 => TagID::Compound,
			11 => TagID::IntArray,
			12 => TagID::LongArray,
			unknown => return Err(NbtError::UnknownTagType(unknown)),
		})
	}
}

impl Display for TagID {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.title())
	}
}

/// A single NBT value.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
	Byte(i8),
	Short(i16),
	Int(i32),
	Long(i64),
	Float(f32),
	Double(f64),
	ByteArray(Vec<i8>),
	String(String),
	List(ListTag),
	Compound(Map),
	IntArray(Vec<i32>),
	LongArray(Vec<i64>),
}

/// A homogeneous list of NBT values.
/// Each variant stores its elements in a typed `Vec`, so a list can never
/// hold two element types at once. `Empty` is the list whose declared
/// element type is `TAG_End`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListTag {
	#[default]
	Empty,
	Byte(Vec<i8>),
	Short(Vec<i16>),
	Int(Vec<i32>),
	Long(Vec<i64>),
	Float(Vec<f32>),
	Double(Vec<f64>),
	ByteArray(Vec<Vec<i8>>),
	String(Vec<String>),
	List(Vec<ListTag>),
	Compound(Vec<Map>),
	IntArray(Vec<Vec<i32>>),
	LongArray(Vec<Vec<i64>>),
}

/// The root of an NBT document: a tag and the name it was stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTag {
	pub name: String,
	pub tag: Tag,
}

/// Invokes `$macro` with every variant shared by [Tag] and [ListTag].
macro_rules! for_each_variant {
	($macro:ident) => {
		$macro!(Byte, Short, Int, Long, Float, Double, ByteArray, String, List, Compound, IntArray, LongArray)
	};
}

impl Tag {
	pub fn id(&self) -> TagID {
		macro_rules! id_arms {
			($($variant:ident),+) => {
				match self {
					$(Tag::$variant(_) => TagID::$variant,)+
				}
			};
		}
		for_each_variant!(id_arms)
	}

	/// Get a member of a Compound tag.
	/// Returns `None` if this is not a Compound or the key is missing.
	pub fn get(&self, key: &str) -> Option<&Tag> {
		match self {
			Tag::Compound(map) => map.get(key),
			_ => None,
		}
	}

	pub fn get_mut(&mut self, key: &str) -> Option<&mut Tag> {
		match self {
			Tag::Compound(map) => map.get_mut(key),
			_ => None,
		}
	}

	/// Walks nested Compound tags by key, eg. `["Level", "Sections"]`.
	pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<&Tag> {
		path.iter().try_fold(self, |node, key| node.get(key.as_ref()))
	}

	pub fn as_value_ref(&self) -> ValueRef<'_> {
		ValueRef::from(self)
	}
}

macro_rules! tag_accessors {
	($($name:ident($variant:ident) -> $ret:ty = |$value:ident| $expr:expr;)+) => {
		impl Tag {
			$(
				pub fn $name(&self) -> Option<$ret> {
					match self {
						Tag::$variant($value) => Some($expr),
						_ => None,
					}
				}
			)+
		}
	};
}

tag_accessors!(
	as_byte(Byte) -> i8 = |value| *value;
	as_short(Short) -> i16 = |value| *value;
	as_int(Int) -> i32 = |value| *value;
	as_long(Long) -> i64 = |value| *value;
	as_float(Float) -> f32 = |value| *value;
	as_double(Double) -> f64 = |value| *value;
	as_byte_array(ByteArray) -> &[i8] = |value| value.as_slice();
	as_str(String) -> &str = |value| value.as_str();
	as_list(List) -> &ListTag = |value| value;
	as_compound(Compound) -> &Map = |value| value;
	as_int_array(IntArray) -> &[i32] = |value| value.as_slice();
	as_long_array(LongArray) -> &[i64] = |value| value.as_slice();
);

impl ListTag {
	/// Creates an empty list that declares `id` as its element type.
	pub fn with_element_type(id: TagID) -> Self {
		match id {
			TagID::End => ListTag::Empty,
			TagID::Byte => ListTag::Byte(Vec::new()),
			TagID::Short => ListTag::Short(Vec::new()),
			TagID::Int => ListTag::Int(Vec::new()),
			TagID::Long => ListTag::Long(Vec::new()),
			TagID::Float => ListTag::Float(Vec::new()),
			TagID::Double => ListTag::Double(Vec::new()),
			TagID::ByteArray => ListTag::ByteArray(Vec::new()),
			TagID::String => ListTag::String(Vec::new()),
			TagID::List => ListTag::List(Vec::new()),
			TagID::Compound => ListTag::Compound(Vec::new()),
			TagID::IntArray => ListTag::IntArray(Vec::new()),
			TagID::LongArray => ListTag::LongArray(Vec::new()),
		}
	}

	/// The declared element type of this list.
	pub fn element_id(&self) -> TagID {
		macro_rules! id_arms {
			($($variant:ident),+) => {
				match self {
					ListTag::Empty => TagID::End,
					$(ListTag::$variant(_) => TagID::$variant,)+
				}
			};
		}
		for_each_variant!(id_arms)
	}

	pub fn len(&self) -> usize {
		macro_rules! len_arms {
			($($variant:ident),+) => {
				match self {
					ListTag::Empty => 0,
					$(ListTag::$variant(list) => list.len(),)+
				}
			};
		}
		for_each_variant!(len_arms)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Appends a tag to the list. An `Empty` list takes on the type of the
	/// first tag pushed into it. Any other mismatch is an error and leaves
	/// the list untouched.
	pub fn push(&mut self, value: Tag) -> NbtResult<()> {
		if let ListTag::Empty = self {
			*self = ListTag::with_element_type(value.id());
		}
		macro_rules! push_arms {
			($($variant:ident),+) => {
				match (self, value) {
					$(
						(ListTag::$variant(list), Tag::$variant(value)) => {
							list.push(value);
							Ok(())
						}
					)+
					(list, value) => Err(NbtError::ListElementTypeMismatch {
						expected: list.element_id(),
						found: value.id(),
					}),
				}
			};
		}
		for_each_variant!(push_arms)
	}

	/// Borrow the element at `index`.
	pub fn get(&self, index: usize) -> Option<ValueRef<'_>> {
		macro_rules! get_arms {
			($($variant:ident),+) => {
				match self {
					ListTag::Empty => None,
					$(ListTag::$variant(list) => list.get(index).map(ValueRef::$variant),)+
				}
			};
		}
		for_each_variant!(get_arms)
	}

	pub fn iter(&self) -> impl Iterator<Item = ValueRef<'_>> + '_ {
		(0..self.len()).filter_map(move |index| self.get(index))
	}

	/// Clones every element into an owned [Tag].
	pub fn to_tags(&self) -> Vec<Tag> {
		self.iter().map(ValueRef::to_tag).collect()
	}
}

impl TryFrom<Vec<Tag>> for ListTag {
	type Error = NbtError;

	/// Builds a list from loose tags. Every tag must share the type of the
	/// first one.
	fn try_from(value: Vec<Tag>) -> Result<Self, Self::Error> {
		let mut list = ListTag::Empty;
		for tag in value {
			list.push(tag)?;
		}
		Ok(list)
	}
}

impl NamedTag {
	pub fn new<S: Into<String>, T: Into<Tag>>(name: S, tag: T) -> Self {
		Self {
			name: name.into(),
			tag: tag.into(),
		}
	}

	/// The root Compound, if the root is a Compound.
	pub fn compound(&self) -> Option<&Map> {
		self.tag.as_compound()
	}

	pub fn compound_mut(&mut self) -> Option<&mut Map> {
		match &mut self.tag {
			Tag::Compound(map) => Some(map),
			_ => None,
		}
	}

	/// Fails with [NbtError::RootNotCompound] unless the root is a Compound.
	/// Documents (standalone files and chunks) always have a Compound root.
	pub fn require_compound(self) -> NbtResult<Self> {
		match self.tag.id() {
			TagID::Compound => Ok(self),
			other => Err(NbtError::RootNotCompound(other)),
		}
	}
}

macro_rules! tag_from_impls {
	($($type:ty => $variant:ident;)+) => {
		$(
			impl From<$type> for Tag {
				fn from(value: $type) -> Self {
					Tag::$variant(value)
				}
			}
		)+
	};
}

tag_from_impls!(
	i8 => Byte;
	i16 => Short;
	i32 => Int;
	i64 => Long;
	f32 => Float;
	f64 => Double;
	Vec<i8> => ByteArray;
	String => String;
	ListTag => List;
	Map => Compound;
	Vec<i32> => IntArray;
	Vec<i64> => LongArray;
);

impl From<&str> for Tag {
	fn from(value: &str) -> Self {
		Tag::String(value.to_owned())
	}
}

macro_rules! list_from_impls {
	($($type:ty => $variant:ident;)+) => {
		$(
			impl From<Vec<$type>> for ListTag {
				fn from(value: Vec<$type>) -> Self {
					ListTag::$variant(value)
				}
			}
		)+
	};
}

list_from_impls!(
	i8 => Byte;
	i16 => Short;
	i32 => Int;
	i64 => Long;
	f32 => Float;
	f64 => Double;
	Vec<i8> => ByteArray;
	String => String;
	ListTag => List;
	Map => Compound;
	Vec<i32> => IntArray;
	Vec<i64> => LongArray;
);

impl From<Vec<&str>> for ListTag {
	fn from(value: Vec<&str>) -> Self {
		ListTag::String(value.into_iter().map(str::to_owned).collect())
	}
}
