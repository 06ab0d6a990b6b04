pub mod json_file;
pub mod memory;
pub mod tokio_fs;
pub mod traits;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use tokio_fs::TokioFileSystem;
pub use traits::{FileSystem, KeyValueStore};
