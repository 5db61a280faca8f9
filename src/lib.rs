//! rulekit — staged project tree for security-policy rule authoring.
//!
//! A rules project is a directory holding a JSON manifest, one
//! implementation directory per rule, and a `spec/` tree of test fixtures
//! (input payloads paired with recorded expected outputs):
//!
//! ```text
//! manifest.json
//! <ruleID>/
//! spec/rules/<ruleID>/inputs/<fixture>
//! spec/rules/<ruleID>/expected/<stem>.json
//! ```
//!
//! Scaffolding front ends load the staged tree from disk, mutate it in
//! memory, and commit once:
//!
//! ```no_run
//! use rulekit::{Manifest, OsFs, Project};
//!
//! # fn main() -> rulekit::Result<()> {
//! let fsys = OsFs;
//! let mut project = Project::from_dir(&fsys, "acme-rules")?;
//! project.update_manifest(Manifest {
//!     name: "acme-rules".into(),
//!     push: Vec::new(),
//! });
//! let path = project.add_rule_spec("ACMECORP_001", "infra.tf", b"{}".to_vec());
//! println!("will write to {}", path.display());
//! project.write_changes(&fsys)?;
//! # Ok(())
//! # }
//! ```
//!
//! Discovery never writes; commit writes only staged content (plus the
//! manifest, which is always canonical once loaded), creating directories
//! as needed. Commit is not transactional across files: a failure leaves
//! earlier writes on disk. The model is single-actor — one staged tree,
//! one owner, no internal synchronization.

mod error;
mod fsys;
mod manifest;
mod node;
mod project;
mod spec;
mod validate;

pub use error::{Error, Result};
pub use fsys::{DirEntry, EntryKind, Fsys, MemFs, OsFs};
pub use manifest::{MANIFEST_FILENAME, Manifest, ManifestFile, ManifestPush};
pub use node::{DirNode, FileNode, InputNode};
pub use project::Project;
pub use spec::{Fixture, RuleSpecsDir, SpecTree};
pub use validate::{RULE_ID_MAX_LENGTH, RuleIdError, validate_rule_id};
