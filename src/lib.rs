//! Reading and writing Named Binary Tag (NBT) data and the sector-allocated
//! region files that store it.
//!
//! * [nbt] holds the tag tree, its binary codec, and standalone documents.
//! * [world::io::region] holds [RegionFile](world::io::region::RegionFile)
//!   and its header, allocator, and diagnostics.
//! * [world::WorldFolder] maps absolute chunk positions onto region files.
//!
//! The crate logs through the `log` facade and never installs a logger.

pub mod macros;
pub mod ioext;
pub mod error;
pub mod nbt;
pub mod world;

pub use flate2;

pub use error::McError;
pub use error::McResult;
