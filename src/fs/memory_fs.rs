use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::fs::FileSystem;

/// In-memory file system used as a test double. Single threaded, like the
/// store using it.
#[derive(Debug, Default)]
pub struct MemoryFs {
    dirs: RefCell<BTreeSet<PathBuf>>,
    files: RefCell<BTreeMap<PathBuf, String>>,
    fail_writes: Cell<bool>,
    fail_deletes: Cell<bool>,
}

impl MemoryFs {
    pub fn new() -> MemoryFs {
        Default::default()
    }

    /// When set, writes fail as a full disk would.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// When set, deletes fail as a read-only directory would.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.set(fail);
    }

    pub fn dir_exists(&self, path: &Path) -> bool {
        self.dirs.borrow().contains(path)
    }

    pub fn file_count(&self) -> usize {
        self.files.borrow().len()
    }

    fn check_fault(fail: &Cell<bool>, op: &str, path: &Path) -> io::Result<()> {
        if fail.get() {
            return Err(io::Error::new(ErrorKind::Other, format!("Simulated {} failure - file={}", op, path.display())));
        }
        Ok(())
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(ErrorKind::NotFound, format!("No such file or directory - path={}", path.display()))
    }
}

impl FileSystem for MemoryFs {
    fn create_dir(&self, path: &Path) -> io::Result<()> {
        let mut dirs = self.dirs.borrow_mut();
        for dir in path.ancestors().filter(|p| !p.as_os_str().is_empty()) {
            dirs.insert(dir.to_path_buf());
        }
        Ok(())
    }

    fn file_exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read_file_text(&self, path: &Path) -> io::Result<String> {
        self.files.borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found(path))
    }

    fn write_file_text(&self, path: &Path, content: &str) -> io::Result<()> {
        Self::check_fault(&self.fail_writes, "write", path)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !self.dir_exists(parent) {
                return Err(Self::not_found(parent));
            }
        }
        self.files.borrow_mut().insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn delete_file(&self, path: &Path) -> io::Result<()> {
        Self::check_fault(&self.fail_deletes, "delete", path)?;
        self.files.borrow_mut().remove(path);
        Ok(())
    }

    fn enumerate_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.dir_exists(dir) {
            return Err(Self::not_found(dir));
        }
        let files = self.files.borrow()
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect();
        Ok(files)
    }
}
