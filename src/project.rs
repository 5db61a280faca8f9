//! Top-level project aggregate: manifest plus spec tree under one root.
//!
//! Scaffolding front ends load a [`Project`], stage changes against it, and
//! commit once. Each operation takes an explicit storage handle; there is
//! no process-wide state.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fsys::{EntryKind, Fsys};
use crate::manifest::{Manifest, ManifestFile};
use crate::spec::{self, SpecTree};

/// A staged custom-rules project.
pub struct Project {
    root: PathBuf,
    manifest: ManifestFile,
    spec: SpecTree,
}

impl Project {
    /// Loads the staged state of the project at `root`.
    ///
    /// Works on an empty or partially scaffolded root: a missing manifest
    /// and a missing spec tree both load as zero values.
    pub fn from_dir(fs: &dyn Fsys, root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let manifest = ManifestFile::from_dir(fs, &root)?;
        let spec = SpecTree::from_dir(fs, &root)?;
        Ok(Self {
            root,
            manifest,
            spec,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// A copy of the staged manifest; mutating it cannot alter the
    /// project's state.
    #[must_use]
    pub fn manifest(&self) -> Manifest {
        self.manifest.manifest()
    }

    /// Stages a new manifest value. Written out on the next
    /// [`write_changes`](Self::write_changes).
    pub fn update_manifest(&mut self, manifest: Manifest) {
        self.manifest.update_contents(manifest);
    }

    #[must_use]
    pub fn spec(&self) -> &SpecTree {
        &self.spec
    }

    /// Rule IDs present in the spec tree, sorted.
    #[must_use]
    pub fn rule_ids(&self) -> Vec<String> {
        self.spec.rule_ids()
    }

    /// Stages a rule spec input, creating or updating the fixture named by
    /// `filename`'s base name. Returns the path the input will occupy on
    /// disk, so the caller can report it before committing.
    pub fn add_rule_spec(&mut self, rule_id: &str, filename: &str, contents: Vec<u8>) -> PathBuf {
        self.spec.add_fixture(rule_id, filename, contents, None)
    }

    /// Like [`add_rule_spec`](Self::add_rule_spec), but also stages the
    /// fixture's expected output.
    pub fn add_rule_spec_with_expected(
        &mut self,
        rule_id: &str,
        filename: &str,
        contents: Vec<u8>,
        expected: Vec<u8>,
    ) -> PathBuf {
        self.spec
            .add_fixture(rule_id, filename, contents, Some(expected))
    }

    /// Rule implementation directories directly under the project root:
    /// one directory per rule, named after the rule ID. The `spec`
    /// directory, hidden directories, and stray files are skipped.
    pub fn list_rules(&self, fs: &dyn Fsys) -> Result<Vec<String>> {
        let mut rules = Vec::new();
        for entry in spec::list_dir(fs, &self.root)? {
            if entry.kind != EntryKind::Dir {
                continue;
            }
            if entry.name == spec::SPEC_DIR || entry.name.starts_with('.') {
                continue;
            }
            rules.push(entry.name);
        }
        Ok(rules)
    }

    /// Commits the manifest, then the spec tree.
    ///
    /// The manifest always writes; the spec tree writes only staged
    /// changes. Not transactional: a failure leaves earlier writes on
    /// disk.
    pub fn write_changes(&mut self, fs: &dyn Fsys) -> Result<()> {
        self.manifest.write_changes(fs)?;
        self.spec.write_changes(fs)
    }
}
