pub mod writer;

pub use writer::{ChunkWriter, WriteResult};
