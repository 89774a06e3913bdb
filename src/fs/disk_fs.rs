use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{fs, io};

use crate::fs::FileSystem;

/// `std::fs` backed file system. Relative paths are resolved against `root`
/// when one is given, otherwise against the current directory.
#[derive(Debug, Clone, Default)]
pub struct DiskFs {
    root: Option<PathBuf>,
}

impl DiskFs {
    pub fn new() -> DiskFs {
        DiskFs { root: None }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> DiskFs {
        DiskFs { root: Some(root.into()) }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match self.root {
            Some(ref root) => root.join(path),
            None => path.to_path_buf(),
        }
    }
}

impl FileSystem for DiskFs {
    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(self.resolve(path))
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.resolve(path).is_file()
    }

    fn read_file_text(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(self.resolve(path))
    }

    fn write_file_text(&self, path: &Path, content: &str) -> io::Result<()> {
        fs::write(self.resolve(path), content)
    }

    fn delete_file(&self, path: &Path) -> io::Result<()> {
        match fs::remove_file(self.resolve(path)) {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            res => res,
        }
    }

    fn enumerate_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = vec![];
        let entries = fs::read_dir(self.resolve(dir))?;
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                // Reported the way the caller named the directory
                files.push(dir.join(entry.file_name()));
            }
        }
        Ok(files)
    }
}
