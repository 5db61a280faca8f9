//! The staged spec tree: per-rule test fixtures under `<root>/spec`.
//!
//! On-disk shape, relative to the project root:
//!
//! ```text
//! spec/rules/<ruleID>/inputs/<fixture>          file or directory input
//! spec/rules/<ruleID>/expected/<stem>.json      recorded expected output
//! ```
//!
//! Discovery correlates `inputs/` entries with `expected/` files by base
//! name: `inputs/infra.tf` pairs with `expected/infra.json`, and a
//! multi-file fixture directory `inputs/invalid_ec2/` pairs with
//! `expected/invalid_ec2.json`. A fixture without a recorded expected
//! output is legal — it simply has not been run yet.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fsys::{DirEntry, EntryKind, Fsys};
use crate::node::{DirNode, FileNode, InputNode};

pub(crate) const SPEC_DIR: &str = "spec";
const RULES_DIR: &str = "rules";
const INPUTS_DIR: &str = "inputs";
const EXPECTED_DIR: &str = "expected";
const EXPECTED_EXT: &str = "json";

/// One test case for a rule: an input payload plus, once recorded, the
/// output the rule is expected to produce for it.
#[derive(Debug, Clone)]
pub struct Fixture {
    name: String,
    rule_dir_name: String,
    input: InputNode,
    expected: Option<FileNode>,
}

impl Fixture {
    /// The fixture's base name: the input file name with its extension
    /// kept (`infra.tf`), or the input directory name (`invalid_ec2`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name of the rule directory this fixture belongs to.
    #[must_use]
    pub fn rule_dir_name(&self) -> &str {
        &self.rule_dir_name
    }

    #[must_use]
    pub fn input(&self) -> &InputNode {
        &self.input
    }

    /// The recorded expected output, if any.
    #[must_use]
    pub fn expected(&self) -> Option<&FileNode> {
        self.expected.as_ref()
    }

    fn write_changes(&mut self, fs: &dyn Fsys) -> Result<()> {
        self.input.write_changes(fs)?;
        if let Some(expected) = &mut self.expected {
            expected.write_changes(fs)?;
        }
        Ok(())
    }
}

/// The staged fixtures for a single rule, keyed by fixture name.
#[derive(Debug, Clone)]
pub struct RuleSpecsDir {
    dir: DirNode,
    fixtures: BTreeMap<String, Fixture>,
}

impl RuleSpecsDir {
    fn from_dir(fs: &dyn Fsys, path: PathBuf, rule_dir_name: &str) -> Result<Self> {
        let dir = DirNode::from_path(fs, path.clone())?;
        let inputs_path = path.join(INPUTS_DIR);
        let entries = list_dir(fs, &inputs_path)?;

        // A file `foo.tf` and a directory `foo` would both claim
        // `expected/foo.json`. Refuse to guess which one wins.
        for entry in &entries {
            if entry.kind != EntryKind::File {
                continue;
            }
            let name = stem(&entry.name);
            let collides = entries
                .iter()
                .any(|other| other.kind == EntryKind::Dir && other.name == name);
            if collides {
                return Err(Error::InputConflict {
                    dir: inputs_path,
                    name: name.to_string(),
                });
            }
        }

        let mut fixtures = BTreeMap::new();
        for entry in entries {
            let input_path = inputs_path.join(&entry.name);
            let input = match entry.kind {
                EntryKind::File => InputNode::File(FileNode::from_path(fs, input_path)?),
                EntryKind::Dir => InputNode::Dir(DirNode::from_path(fs, input_path)?),
            };
            let expected_path = path
                .join(EXPECTED_DIR)
                .join(format!("{}.{EXPECTED_EXT}", stem(&entry.name)));
            let expected_file = FileNode::from_path(fs, expected_path)?;
            let expected = expected_file.existed().then_some(expected_file);
            fixtures.insert(
                entry.name.clone(),
                Fixture {
                    name: entry.name,
                    rule_dir_name: rule_dir_name.to_string(),
                    input,
                    expected,
                },
            );
        }
        Ok(Self { dir, fixtures })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Fixture names in sorted order.
    #[must_use]
    pub fn fixture_names(&self) -> Vec<String> {
        self.fixtures.keys().cloned().collect()
    }

    #[must_use]
    pub fn fixture(&self, name: &str) -> Option<&Fixture> {
        self.fixtures.get(name)
    }

    fn write_changes(&mut self, fs: &dyn Fsys) -> Result<()> {
        self.dir.write_changes(fs)?;
        for fixture in self.fixtures.values_mut() {
            fixture.write_changes(fs)?;
        }
        Ok(())
    }
}

/// The staged spec tree for a whole project, rooted at `<root>/spec`.
#[derive(Debug, Clone)]
pub struct SpecTree {
    dir: DirNode,
    rule_specs: BTreeMap<String, RuleSpecsDir>,
}

impl SpecTree {
    /// Scans `<root>/spec`, building staged state for every rule directory
    /// under `spec/rules`.
    ///
    /// A missing spec tree loads as an empty one. Non-directory entries
    /// under `spec/rules` are not modeled and cause no error.
    pub fn from_dir(fs: &dyn Fsys, root: &Path) -> Result<Self> {
        let spec_path = root.join(SPEC_DIR);
        let dir = DirNode::from_path(fs, spec_path.clone())?;
        let rules_path = spec_path.join(RULES_DIR);
        let mut rule_specs = BTreeMap::new();
        for entry in list_dir(fs, &rules_path)? {
            if entry.kind != EntryKind::Dir {
                continue;
            }
            let rule_dir = RuleSpecsDir::from_dir(fs, rules_path.join(&entry.name), &entry.name)?;
            rule_specs.insert(entry.name, rule_dir);
        }
        Ok(Self { dir, rule_specs })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Rule IDs in sorted order.
    #[must_use]
    pub fn rule_ids(&self) -> Vec<String> {
        self.rule_specs.keys().cloned().collect()
    }

    #[must_use]
    pub fn rule_specs(&self, rule_id: &str) -> Option<&RuleSpecsDir> {
        self.rule_specs.get(rule_id)
    }

    /// Stages a fixture input — and optionally its expected output — for
    /// `rule_id`, creating the rule's spec directory entry if it is new.
    ///
    /// Returns the path the input will occupy on disk, so callers can
    /// report "will write to X" before committing. Re-adding a fixture
    /// with the same name replaces the staged entry wholesale; only the
    /// final content is committed.
    pub fn add_fixture(
        &mut self,
        rule_id: &str,
        filename: &str,
        contents: Vec<u8>,
        expected_contents: Option<Vec<u8>>,
    ) -> PathBuf {
        let rule_path = self.dir.path().join(RULES_DIR).join(rule_id);
        let rule_dir = self
            .rule_specs
            .entry(rule_id.to_string())
            .or_insert_with(|| RuleSpecsDir {
                dir: DirNode::new(rule_path.clone()),
                fixtures: BTreeMap::new(),
            });

        let name = base_name(filename);
        let input_path = rule_path.join(INPUTS_DIR).join(name);
        let mut input = FileNode::new(input_path.clone());
        input.update_contents(contents);

        let expected = expected_contents.map(|bytes| {
            let expected_path = rule_path
                .join(EXPECTED_DIR)
                .join(format!("{}.{EXPECTED_EXT}", stem(name)));
            let mut node = FileNode::new(expected_path);
            node.update_contents(bytes);
            node
        });

        rule_dir.fixtures.insert(
            name.to_string(),
            Fixture {
                name: name.to_string(),
                rule_dir_name: rule_id.to_string(),
                input: InputNode::File(input),
                expected,
            },
        );
        input_path
    }

    /// Commits staged state: directories first, then fixture contents,
    /// rules in name order.
    ///
    /// Not transactional: the first failure aborts the walk and is
    /// surfaced, while earlier writes stay on disk.
    pub fn write_changes(&mut self, fs: &dyn Fsys) -> Result<()> {
        self.dir.write_changes(fs)?;
        for rule_dir in self.rule_specs.values_mut() {
            rule_dir.write_changes(fs)?;
        }
        Ok(())
    }
}

/// Lists `path`, treating a missing directory as empty.
pub(crate) fn list_dir(fs: &dyn Fsys, path: &Path) -> Result<Vec<DirEntry>> {
    match fs.entry_kind(path).map_err(|source| Error::Stat {
        path: path.to_path_buf(),
        source,
    })? {
        None => Ok(Vec::new()),
        Some(EntryKind::File) => Err(Error::ExpectedDir {
            path: path.to_path_buf(),
        }),
        Some(EntryKind::Dir) => fs.read_dir(path).map_err(|source| Error::List {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Base name of `filename`: the final path component.
fn base_name(filename: &str) -> &str {
    Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(filename)
}

/// Base name minus the extension: `infra.tf` becomes `infra`,
/// `invalid_ec2` stays `invalid_ec2`.
fn stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(name)
}
