use std::io;
use std::path::{Path, PathBuf};

pub mod disk_fs;
pub mod memory_fs;

pub use disk_fs::DiskFs;
pub use memory_fs::MemoryFs;

/// Every file access of the post store goes through this trait, so the real
/// disk and the in-memory double are interchangeable.
pub trait FileSystem {
    /// Creates the directory and its parents. Existing directories are fine.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    fn file_exists(&self, path: &Path) -> bool;

    /// Fails with `NotFound` when the file is absent.
    fn read_file_text(&self, path: &Path) -> io::Result<String>;

    /// Creates the file or replaces its whole content.
    fn write_file_text(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Deleting a file that does not exist succeeds.
    fn delete_file(&self, path: &Path) -> io::Result<()>;

    /// Regular files directly inside `dir`, in no particular order.
    fn enumerate_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}
