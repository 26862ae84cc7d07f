//! Region files and the world directories that hold them.

pub mod io;
pub mod worldfolder;

pub use io::region::coord::ChunkPos;
pub use worldfolder::{
	ChunkBounds,
	RegionFormat,
	WorldFolder,
};
