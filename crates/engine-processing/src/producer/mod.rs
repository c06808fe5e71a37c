pub mod reader;

pub use reader::ChunkReader;
