/*
A borrowed view of a value inside a tag tree.
Elements of a ListTag are stored in typed vectors rather than as Tags, so
this is the common currency for walking both Compound members and List
elements without cloning.
*/
use crate::nbt::{
	Map,
	tag::*,
};

/// Allows immutable access to a value within an NBT tag hierarchy.
/// This includes elements within a [ListTag].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRef<'a> {
	Byte(&'a i8),
	Short(&'a i16),
	Int(&'a i32),
	Long(&'a i64),
	Float(&'a f32),
	Double(&'a f64),
	ByteArray(&'a Vec<i8>),
	String(&'a String),
	List(&'a ListTag),
	Compound(&'a Map),
	IntArray(&'a Vec<i32>),
	LongArray(&'a Vec<i64>),
}

impl<'a> ValueRef<'a> {
	pub fn id(self) -> TagID {
		match self {
			ValueRef::Byte(_) => TagID::Byte,
			ValueRef::Short(_) => TagID::Short,
			ValueRef::Int(_) => TagID::Int,
			ValueRef::Long(_) => TagID::Long,
			ValueRef::Float(_) => TagID::Float,
			ValueRef::Double(_) => TagID::Double,
			ValueRef::ByteArray(_) => TagID::ByteArray,
			ValueRef::String(_) => TagID::String,
			ValueRef::List(_) => TagID::List,
			ValueRef::Compound(_) => TagID::Compound,
			ValueRef::IntArray(_) => TagID::IntArray,
			ValueRef::LongArray(_) => TagID::LongArray,
		}
	}

	/// Looks up a member when this refers to a Compound.
	pub fn get(self, key: &str) -> Option<ValueRef<'a>> {
		match self {
			ValueRef::Compound(map) => map.get(key).map(ValueRef::from),
			_ => None,
		}
	}

	/// Looks up an element when this refers to a List.
	pub fn at(self, index: usize) -> Option<ValueRef<'a>> {
		match self {
			ValueRef::List(list) => list.get(index),
			_ => None,
		}
	}

	pub fn to_tag(self) -> Tag {
		match self {
			ValueRef::Byte(v) => Tag::Byte(*v),
			ValueRef::Short(v) => Tag::Short(*v),
			ValueRef::Int(v) => Tag::Int(*v),
			ValueRef::Long(v) => Tag::Long(*v),
			ValueRef::Float(v) => Tag::Float(*v),
			ValueRef::Double(v) => Tag::Double(*v),
			ValueRef::ByteArray(v) => Tag::ByteArray(v.clone()),
			ValueRef::String(v) => Tag::String(v.clone()),
			ValueRef::List(v) => Tag::List(v.clone()),
			ValueRef::Compound(v) => Tag::Compound(v.clone()),
			ValueRef::IntArray(v) => Tag::IntArray(v.clone()),
			ValueRef::LongArray(v) => Tag::LongArray(v.clone()),
		}
	}
}

impl<'a> From<&'a Tag> for ValueRef<'a> {
	fn from(value: &'a Tag) -> Self {
		match value {
			Tag::Byte(v) => ValueRef::Byte(v),
			Tag::Short(v) => ValueRef::Short(v),
			Tag::Int(v) => ValueRef::Int(v),
			Tag::Long(v) => ValueRef::Long(v),
			Tag::Float(v) => ValueRef::Float(v),
			Tag::Double(v) => ValueRef::Double(v),
			Tag::ByteArray(v) => ValueRef::ByteArray(v),
			Tag::String(v) => ValueRef::String(v),
			Tag::List(v) => ValueRef::List(v),
			Tag::Compound(v) => ValueRef::Compound(v),
			Tag::IntArray(v) => ValueRef::IntArray(v),
			Tag::LongArray(v) => ValueRef::LongArray(v),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn walk_list_of_compounds() {
		let mut section = Map::new();
		section.insert("Y".to_owned(), Tag::Byte(3));
		let sections = ListTag::Compound(vec![Map::new(), section]);
		let root = ValueRef::List(&sections);
		assert_eq!(root.at(1).and_then(|c| c.get("Y")), Some(ValueRef::Byte(&3)));
		assert_eq!(root.at(0).and_then(|c| c.get("Y")), None);
		assert_eq!(root.at(2), None);
		assert_eq!(root.at(1).unwrap().id(), TagID::Compound);
	}
}
