pub mod config;
pub mod fs;
pub mod logger;
pub mod post;
pub mod store;
pub mod text_utils;
pub mod util;
mod test_data;

pub use fs::{DiskFs, FileSystem, MemoryFs};
pub use post::{Comment, Post};
pub use store::{PostStore, StoreError, StoreOptions, StoreResult};
