//! Project manifest: identity and push targets, stored as `manifest.json`.
//!
//! Unlike generic file nodes the manifest always writes on commit — once
//! loaded, the in-memory value is canonical. A missing manifest loads as a
//! zero value, not an error.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fsys::Fsys;
use crate::node::FileNode;

pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Metadata about a custom rules project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub push: Vec<ManifestPush>,
}

/// Where the rule bundle should be pushed. Currently always the cloud API
/// service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestPush {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub custom_rules_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub organization_id: String,
}

impl Manifest {
    /// Loads the manifest under `root`.
    ///
    /// Returns the value and whether `manifest.json` existed; an absent
    /// manifest is the zero value and `false`, not an error.
    pub fn load(fs: &dyn Fsys, root: &Path) -> Result<(Self, bool)> {
        let file = ManifestFile::from_dir(fs, root)?;
        let existed = file.exists();
        Ok((file.manifest(), existed))
    }

    /// Writes `manifest` under `root` as indented JSON, replacing whatever
    /// is there — including a manifest that failed to parse.
    pub fn save(fs: &dyn Fsys, root: &Path, manifest: &Self) -> Result<()> {
        let mut file = ManifestFile::new(root);
        file.update_contents(manifest.clone());
        file.write_changes(fs)
    }
}

/// Staged node for `manifest.json`.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    file: FileNode,
    manifest: Manifest,
}

impl ManifestFile {
    pub(crate) fn new(root: &Path) -> Self {
        Self {
            file: FileNode::new(root.join(MANIFEST_FILENAME)),
            manifest: Manifest::default(),
        }
    }

    /// Loads `manifest.json` under `root`.
    ///
    /// Absent file: a fresh node with the zero-value manifest. Unreadable
    /// file: [`Error::Read`]. Malformed JSON: [`Error::ManifestParse`],
    /// naming the broken file.
    pub fn from_dir(fs: &dyn Fsys, root: &Path) -> Result<Self> {
        let path = root.join(MANIFEST_FILENAME);
        let file = FileNode::from_path(fs, path.clone())?;
        if !file.exists() {
            return Ok(Self {
                file,
                manifest: Manifest::default(),
            });
        }
        let bytes = fs.read(&path).map_err(|source| Error::Read {
            path: path.clone(),
            source,
        })?;
        let manifest =
            serde_json::from_slice(&bytes).map_err(|source| Error::ManifestParse { path, source })?;
        Ok(Self { file, manifest })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.file.exists()
    }

    /// A copy of the staged manifest. Mutating the returned value cannot
    /// alter the staged state.
    #[must_use]
    pub fn manifest(&self) -> Manifest {
        self.manifest.clone()
    }

    /// Stages `manifest`. The value is moved in, so the caller keeps no
    /// handle that could alter the staged state afterwards.
    pub fn update_contents(&mut self, manifest: Manifest) {
        self.manifest = manifest;
    }

    /// Serializes the staged manifest to indented JSON and writes it,
    /// whether or not anything changed.
    pub fn write_changes(&mut self, fs: &dyn Fsys) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&self.manifest).map_err(Error::ManifestSerialize)?;
        self.file.update_contents(bytes);
        self.file.write_changes(fs)
    }
}
