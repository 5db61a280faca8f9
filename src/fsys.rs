//! Storage abstraction backing the staged project tree.
//!
//! Discovery and commit go through the [`Fsys`] trait rather than `std::fs`
//! directly, so the model can be exercised against an in-memory filesystem.
//! [`OsFs`] is the real implementation; [`MemFs`] backs tests and dry runs.
//!
//! Absence is modeled as data, not failure: [`Fsys::entry_kind`] returns
//! `Ok(None)` for a path with nothing behind it.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What kind of entry sits at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Minimal filesystem surface needed by the staged tree: stat, read,
/// list, write, and recursive directory creation.
///
/// All methods take `&self`; the model is single-actor and implementations
/// are not required to be thread-safe.
pub trait Fsys {
    /// The kind of entry at `path`, or `None` if nothing exists there.
    /// Absence is a successful outcome, not an error.
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>>;

    /// Reads the full contents of the file at `path`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// The entries directly under `path`, sorted by name.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Creates or replaces the file at `path`. The parent directory must
    /// already exist.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Creates the directory at `path` and any missing ancestors.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem, via `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFs;

impl Fsys for OsFs {
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        match fs::metadata(path) {
            Ok(metadata) => Ok(Some(if metadata.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            })),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let kind = if entry.file_type()?.is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MemEntry {
    File(Vec<u8>),
    Dir,
}

/// In-memory filesystem for tests and dry runs.
///
/// Writing a file creates its ancestors implicitly, mirroring what the
/// model guarantees via `create_dir_all` before every write.
/// Single-threaded by design, like the model itself.
#[derive(Debug, Default)]
pub struct MemFs {
    entries: RefCell<BTreeMap<PathBuf, MemEntry>>,
}

impl MemFs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn insert_ancestors(entries: &mut BTreeMap<PathBuf, MemEntry>, path: &Path) -> io::Result<()> {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            match entries.get(ancestor) {
                Some(MemEntry::File(_)) => return Err(not_a_dir(ancestor)),
                Some(MemEntry::Dir) => {}
                None => {
                    entries.insert(ancestor.to_path_buf(), MemEntry::Dir);
                }
            }
        }
        Ok(())
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} not found", path.display()),
    )
}

fn not_a_dir(path: &Path) -> io::Error {
    io::Error::other(format!("{} is not a directory", path.display()))
}

impl Fsys for MemFs {
    fn entry_kind(&self, path: &Path) -> io::Result<Option<EntryKind>> {
        Ok(self.entries.borrow().get(path).map(|entry| match entry {
            MemEntry::File(_) => EntryKind::File,
            MemEntry::Dir => EntryKind::Dir,
        }))
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        match self.entries.borrow().get(path) {
            Some(MemEntry::File(contents)) => Ok(contents.clone()),
            Some(MemEntry::Dir) => Err(io::Error::other(format!(
                "{} is a directory",
                path.display()
            ))),
            None => Err(not_found(path)),
        }
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let entries = self.entries.borrow();
        match entries.get(path) {
            Some(MemEntry::Dir) => {}
            Some(MemEntry::File(_)) => return Err(not_a_dir(path)),
            None => return Err(not_found(path)),
        }
        // BTreeMap iteration is path-sorted, which sorts names within a
        // shared parent.
        let mut listing = Vec::new();
        for (entry_path, entry) in entries.iter() {
            if entry_path.parent() != Some(path) {
                continue;
            }
            let Some(name) = entry_path.file_name() else {
                continue;
            };
            listing.push(DirEntry {
                name: name.to_string_lossy().into_owned(),
                kind: match entry {
                    MemEntry::File(_) => EntryKind::File,
                    MemEntry::Dir => EntryKind::Dir,
                },
            });
        }
        Ok(listing)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut entries = self.entries.borrow_mut();
        Self::insert_ancestors(&mut entries, path)?;
        if matches!(entries.get(path), Some(MemEntry::Dir)) {
            return Err(io::Error::other(format!(
                "{} is a directory",
                path.display()
            )));
        }
        entries.insert(path.to_path_buf(), MemEntry::File(contents.to_vec()));
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut entries = self.entries.borrow_mut();
        Self::insert_ancestors(&mut entries, path)?;
        if matches!(entries.get(path), Some(MemEntry::File(_))) {
            return Err(not_a_dir(path));
        }
        entries.insert(path.to_path_buf(), MemEntry::Dir);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn memfs_write_creates_ancestors() {
        let fsys = MemFs::new();
        fsys.write(Path::new("a/b/c.txt"), b"hello").unwrap();

        assert_eq!(
            fsys.entry_kind(Path::new("a")).unwrap(),
            Some(EntryKind::Dir)
        );
        assert_eq!(
            fsys.entry_kind(Path::new("a/b")).unwrap(),
            Some(EntryKind::Dir)
        );
        assert_eq!(fsys.read(Path::new("a/b/c.txt")).unwrap(), b"hello");
    }

    #[test]
    fn memfs_entry_kind_absent_is_none() {
        let fsys = MemFs::new();
        assert_eq!(fsys.entry_kind(Path::new("missing")).unwrap(), None);
    }

    #[test]
    fn memfs_read_missing_is_not_found() {
        let fsys = MemFs::new();
        let err = fsys.read(Path::new("missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn memfs_read_dir_lists_direct_children_sorted() {
        let fsys = MemFs::new();
        fsys.write(Path::new("root/b.txt"), b"").unwrap();
        fsys.write(Path::new("root/a/nested.txt"), b"").unwrap();
        fsys.create_dir_all(Path::new("root/c")).unwrap();

        let listing = fsys.read_dir(Path::new("root")).unwrap();
        let names: Vec<&str> = listing.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b.txt", "c"]);
        assert_eq!(listing[0].kind, EntryKind::Dir);
        assert_eq!(listing[1].kind, EntryKind::File);
    }

    #[test]
    fn memfs_read_dir_missing_is_not_found() {
        let fsys = MemFs::new();
        let err = fsys.read_dir(Path::new("missing")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn memfs_create_dir_all_idempotent() {
        let fsys = MemFs::new();
        fsys.create_dir_all(Path::new("a/b")).unwrap();
        fsys.create_dir_all(Path::new("a/b")).unwrap();
        assert_eq!(
            fsys.entry_kind(Path::new("a/b")).unwrap(),
            Some(EntryKind::Dir)
        );
    }

    #[test]
    fn memfs_write_over_dir_fails() {
        let fsys = MemFs::new();
        fsys.create_dir_all(Path::new("a")).unwrap();
        assert!(fsys.write(Path::new("a"), b"oops").is_err());
    }

    #[test]
    fn memfs_dir_over_file_fails() {
        let fsys = MemFs::new();
        fsys.write(Path::new("a"), b"file").unwrap();
        assert!(fsys.create_dir_all(Path::new("a/b")).is_err());
    }

    #[test]
    fn osfs_round_trip() {
        let dir = TempDir::new().unwrap();
        let fsys = OsFs;
        let path = dir.path().join("sub").join("file.txt");

        assert_eq!(fsys.entry_kind(&path).unwrap(), None);
        fsys.create_dir_all(path.parent().unwrap()).unwrap();
        fsys.write(&path, b"contents").unwrap();

        assert_eq!(fsys.entry_kind(&path).unwrap(), Some(EntryKind::File));
        assert_eq!(
            fsys.entry_kind(&dir.path().join("sub")).unwrap(),
            Some(EntryKind::Dir)
        );
        assert_eq!(fsys.read(&path).unwrap(), b"contents");
    }

    #[test]
    fn osfs_read_dir_sorted() {
        let dir = TempDir::new().unwrap();
        let fsys = OsFs;
        fsys.write(&dir.path().join("b.txt"), b"").unwrap();
        fsys.write(&dir.path().join("a.txt"), b"").unwrap();
        fsys.create_dir_all(&dir.path().join("c")).unwrap();

        let listing = fsys.read_dir(dir.path()).unwrap();
        let names: Vec<&str> = listing.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "c"]);
        assert_eq!(listing[2].kind, EntryKind::Dir);
    }
}
