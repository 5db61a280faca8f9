//! Staged filesystem nodes: the atomic units of the project tree.
//!
//! A node records where an entry lives, whether it was already on disk at
//! load time, and (for files) any content staged for the next commit.
//! Discovery alone never causes a write: a file node with nothing staged is
//! skipped by [`FileNode::write_changes`] even when the file does not exist
//! yet. Staging empty content is distinct from staging nothing.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fsys::{EntryKind, Fsys};

/// A staged file: a path, an existence flag, and optional pending content.
#[derive(Debug, Clone)]
pub struct FileNode {
    path: PathBuf,
    existed: bool,
    content: Option<Vec<u8>>,
    committed: bool,
}

impl FileNode {
    /// A file node that is not on disk yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            existed: false,
            content: None,
            committed: false,
        }
    }

    /// Stats `path` and records whether a file is already there.
    ///
    /// Absence is not an error; a directory at `path` is.
    pub fn from_path(fs: &dyn Fsys, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let existed = match stat(fs, &path)? {
            None => false,
            Some(EntryKind::File) => true,
            Some(EntryKind::Dir) => return Err(Error::ExpectedFile { path }),
        };
        Ok(Self {
            path,
            existed,
            content: None,
            committed: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file was on disk when this node was constructed.
    /// Immutable afterwards; committing does not change it.
    #[must_use]
    pub fn existed(&self) -> bool {
        self.existed
    }

    /// Whether the file is on disk or logically created: discovered,
    /// staged, or committed.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.existed || self.committed || self.content.is_some()
    }

    /// Stages new content. Touches nothing on disk until
    /// [`write_changes`](Self::write_changes).
    pub fn update_contents(&mut self, contents: Vec<u8>) {
        self.content = Some(contents);
    }

    /// Writes staged content, creating parent directories as needed.
    ///
    /// With nothing staged this is a no-op, even for a node that never
    /// existed. A successful write clears the staged content, so a second
    /// commit of an unmodified node touches the filesystem not at all.
    pub fn write_changes(&mut self, fs: &dyn Fsys) -> Result<()> {
        let Some(contents) = &self.content else {
            return Ok(());
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs.create_dir_all(parent).map_err(|source| Error::CreateDir {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        fs.write(&self.path, contents)
            .map_err(|source| Error::Write {
                path: self.path.clone(),
                source,
            })?;
        self.content = None;
        self.committed = true;
        Ok(())
    }
}

/// A staged directory. Holds no child list; children are owned by the
/// aggregate above.
#[derive(Debug, Clone)]
pub struct DirNode {
    path: PathBuf,
    existed: bool,
    committed: bool,
}

impl DirNode {
    /// A directory node that is not on disk yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            existed: false,
            committed: false,
        }
    }

    /// Stats `path` and records whether a directory is already there.
    ///
    /// Absence is not an error; a file at `path` is.
    pub fn from_path(fs: &dyn Fsys, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let existed = match stat(fs, &path)? {
            None => false,
            Some(EntryKind::Dir) => true,
            Some(EntryKind::File) => return Err(Error::ExpectedDir { path }),
        };
        Ok(Self {
            path,
            existed,
            committed: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the directory was on disk when this node was constructed.
    #[must_use]
    pub fn existed(&self) -> bool {
        self.existed
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.existed || self.committed
    }

    /// Ensures the directory exists on disk, creating it and any missing
    /// ancestors. Already discovered or already committed means no-op.
    pub fn write_changes(&mut self, fs: &dyn Fsys) -> Result<()> {
        if self.existed || self.committed {
            return Ok(());
        }
        fs.create_dir_all(&self.path)
            .map_err(|source| Error::CreateDir {
                path: self.path.clone(),
                source,
            })?;
        self.committed = true;
        Ok(())
    }
}

/// A fixture input is either a single file or a directory of files.
///
/// Directory inputs are staged only as the directory itself; the files
/// inside are not modeled and write-out leaves them untouched.
#[derive(Debug, Clone)]
pub enum InputNode {
    File(FileNode),
    Dir(DirNode),
}

impl InputNode {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::File(file) => file.path(),
            Self::Dir(dir) => dir.path(),
        }
    }

    #[must_use]
    pub fn existed(&self) -> bool {
        match self {
            Self::File(file) => file.existed(),
            Self::Dir(dir) => dir.existed(),
        }
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        match self {
            Self::File(file) => file.exists(),
            Self::Dir(dir) => dir.exists(),
        }
    }

    pub fn write_changes(&mut self, fs: &dyn Fsys) -> Result<()> {
        match self {
            Self::File(file) => file.write_changes(fs),
            Self::Dir(dir) => dir.write_changes(fs),
        }
    }
}

fn stat(fs: &dyn Fsys, path: &Path) -> Result<Option<EntryKind>> {
    fs.entry_kind(path).map_err(|source| Error::Stat {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::fsys::MemFs;

    #[test]
    fn new_file_without_content_writes_nothing() {
        let fsys = MemFs::new();
        let mut file = FileNode::new("project/stub.txt");

        assert!(!file.existed());
        assert!(!file.exists());
        file.write_changes(&fsys).unwrap();

        assert_eq!(fsys.entry_kind(Path::new("project/stub.txt")).unwrap(), None);
        assert_eq!(fsys.entry_kind(Path::new("project")).unwrap(), None);
    }

    #[test]
    fn staged_content_is_written_with_ancestors() {
        let fsys = MemFs::new();
        let mut file = FileNode::new("project/rules/infra.tf");
        file.update_contents(b"resource {}".to_vec());

        assert!(file.exists());
        file.write_changes(&fsys).unwrap();

        assert_eq!(
            fsys.read(Path::new("project/rules/infra.tf")).unwrap(),
            b"resource {}"
        );
        assert!(file.exists());
        assert!(!file.existed());
    }

    #[test]
    fn second_commit_is_a_no_op() {
        let fsys = MemFs::new();
        let mut file = FileNode::new("file.txt");
        file.update_contents(b"v1".to_vec());
        file.write_changes(&fsys).unwrap();

        // Tamper behind the node's back; an idempotent second commit must
        // not restore the staged content.
        fsys.write(Path::new("file.txt"), b"tampered").unwrap();
        file.write_changes(&fsys).unwrap();

        assert_eq!(fsys.read(Path::new("file.txt")).unwrap(), b"tampered");
    }

    #[test]
    fn staging_empty_content_writes_an_empty_file() {
        let fsys = MemFs::new();
        let mut file = FileNode::new("empty.txt");
        file.update_contents(Vec::new());
        file.write_changes(&fsys).unwrap();

        assert_eq!(fsys.read(Path::new("empty.txt")).unwrap(), b"");
    }

    #[test]
    fn from_path_records_existence() {
        let fsys = MemFs::new();
        fsys.write(Path::new("present.txt"), b"x").unwrap();

        let present = FileNode::from_path(&fsys, "present.txt").unwrap();
        assert!(present.existed());
        assert!(present.exists());

        let absent = FileNode::from_path(&fsys, "absent.txt").unwrap();
        assert!(!absent.existed());
        assert!(!absent.exists());
    }

    #[test]
    fn file_from_path_rejects_directory() {
        let fsys = MemFs::new();
        fsys.create_dir_all(Path::new("somedir")).unwrap();

        let err = FileNode::from_path(&fsys, "somedir").unwrap_err();
        assert!(matches!(err, Error::ExpectedFile { .. }));
    }

    #[test]
    fn dir_from_path_rejects_file() {
        let fsys = MemFs::new();
        fsys.write(Path::new("somefile"), b"").unwrap();

        let err = DirNode::from_path(&fsys, "somefile").unwrap_err();
        assert!(matches!(err, Error::ExpectedDir { .. }));
    }

    #[test]
    fn new_dir_is_created_on_commit() {
        let fsys = MemFs::new();
        let mut dir = DirNode::new("a/b/c");

        assert!(!dir.exists());
        dir.write_changes(&fsys).unwrap();

        assert_eq!(
            fsys.entry_kind(Path::new("a/b/c")).unwrap(),
            Some(EntryKind::Dir)
        );
        assert!(dir.exists());
        assert!(!dir.existed());
    }

    #[test]
    fn existing_dir_commit_is_a_no_op() {
        let fsys = MemFs::new();
        fsys.create_dir_all(Path::new("present")).unwrap();

        let mut dir = DirNode::from_path(&fsys, "present").unwrap();
        assert!(dir.existed());
        dir.write_changes(&fsys).unwrap();
        assert!(dir.exists());
    }

    #[test]
    fn input_node_dispatches_by_kind() {
        let fsys = MemFs::new();
        let mut input = InputNode::Dir(DirNode::new("inputs/multi_file"));
        input.write_changes(&fsys).unwrap();

        assert_eq!(
            fsys.entry_kind(Path::new("inputs/multi_file")).unwrap(),
            Some(EntryKind::Dir)
        );
        assert_eq!(input.path(), Path::new("inputs/multi_file"));
        assert!(input.exists());
    }
}
