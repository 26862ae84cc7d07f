//! Human readable rendering of a tag tree.
//!
//! ```text
//! TAG_Compound('Level'): 2 entries
//! {
//!     TAG_Int('xPos'): 4
//!     TAG_List('Sections'): 1 entries of type TAG_Compound
//!     {
//!         TAG_Compound(None): 0 entries
//!         {
//!         }
//!     }
//! }
//! ```

use std::fmt::{
	self,
	Write,
};

use crate::nbt::{
	tag::*,
	tagref::ValueRef,
};

const INDENT: &str = "    ";

/// Renders `value` under `name`. List elements have no name and render as `None`.
fn render<W: Write>(f: &mut W, name: Option<&str>, value: ValueRef<'_>, depth: usize) -> fmt::Result {
	for _ in 0..depth {
		f.write_str(INDENT)?;
	}
	write!(f, "{}(", value.id().title())?;
	match name {
		Some(name) => write!(f, "'{name}'")?,
		None => f.write_str("None")?,
	}
	f.write_str("): ")?;
	match value {
		ValueRef::Byte(v) => writeln!(f, "{v}"),
		ValueRef::Short(v) => writeln!(f, "{v}"),
		ValueRef::Int(v) => writeln!(f, "{v}"),
		ValueRef::Long(v) => writeln!(f, "{v}"),
		ValueRef::Float(v) => writeln!(f, "{v}"),
		ValueRef::Double(v) => writeln!(f, "{v}"),
		ValueRef::String(v) => writeln!(f, "{v}"),
		ValueRef::ByteArray(v) => writeln!(f, "[{} bytes]", v.len()),
		ValueRef::IntArray(v) => writeln!(f, "[{} ints]", v.len()),
		ValueRef::LongArray(v) => writeln!(f, "[{} longs]", v.len()),
		ValueRef::List(list) => {
			writeln!(f, "{} entries of type {}", list.len(), list.element_id().title())?;
			open_close(f, depth, |f| {
				list.iter().try_for_each(|element| render(f, None, element, depth + 1))
			})
		}
		ValueRef::Compound(map) => {
			writeln!(f, "{} entries", map.len())?;
			open_close(f, depth, |f| {
				map.iter().try_for_each(|(key, member)| render(f, Some(key.as_str()), member.into(), depth + 1))
			})
		}
	}
}

fn open_close<W: Write, F: FnOnce(&mut W) -> fmt::Result>(f: &mut W, depth: usize, body: F) -> fmt::Result {
	let pad = INDENT.repeat(depth);
	writeln!(f, "{pad}{{")?;
	body(f)?;
	writeln!(f, "{pad}}}")
}

/// Renders a tag tree as indented text, one value per line.
pub fn pretty_tree(tag: &NamedTag) -> String {
	let mut out = String::new();
	// Writing into a String can not fail.
	let _ = render(&mut out, Some(&tag.name), tag.tag.as_value_ref(), 0);
	out
}

/// Same as [pretty_tree], for a tag that has no name of its own.
pub fn pretty_value(tag: &Tag) -> String {
	let mut out = String::new();
	let _ = render(&mut out, None, tag.as_value_ref(), 0);
	out
}

impl NamedTag {
	pub fn pretty_tree(&self) -> String {
		pretty_tree(self)
	}
}
