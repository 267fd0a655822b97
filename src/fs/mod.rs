//! FileSystem abstraction so resolution, generation and the pipeline can run
//! against an in-memory tree in tests

mod mock;
mod real;
mod r#trait;

pub use mock::MockFileSystem;
pub use r#trait::{DirEntry, FileSystem, FileType};
pub use real::RealFileSystem;
