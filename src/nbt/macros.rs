/// Shorthand way to create a Tag::Compound.
/// Members keep the order they are written in.
/// Example:
/// ```no_run
/// # use mcregion::{compound, nbt::Tag};
/// compound!{
///     ("Item One", 0i8),
///     (String::from("Item Two"), 2i32),
///     ("Item Three", Tag::Byte(1))
/// };
/// ```
#[macro_export]
macro_rules! compound {
	($(($name:expr, $value:expr)),+$(,)?) => {
		{
			let mut map = $crate::nbt::Map::new();
			$(
				map.insert(::std::string::String::from($name), $crate::nbt::tag::Tag::from($value));
			)+
			$crate::nbt::tag::Tag::Compound(map)
		}
	};
	() => {
		$crate::nbt::tag::Tag::Compound($crate::nbt::Map::new())
	};
}

/// Shorthand way to create a Tag::List.
/// Example:
/// ```no_run
/// # use mcregion::list;
/// list!{ 1i32, 2, 3, 4, 5, 6, 7, 8, 9, 10 };
/// list![
///     "One",
///     "Two",
///     "Three",
/// ];
/// list![0i64; 16];
/// ```
#[macro_export]
macro_rules! list {
	() => {
		$crate::nbt::tag::Tag::List($crate::nbt::tag::ListTag::Empty)
	};
	($value:expr; $repetitions:expr) => {
		$crate::nbt::tag::Tag::List($crate::nbt::tag::ListTag::from(::std::vec![$value; $repetitions]))
	};
	($($item:expr),+$(,)?) => {
		$crate::nbt::tag::Tag::List($crate::nbt::tag::ListTag::from(::std::vec![
			$($item,)+
		]))
	};
}
