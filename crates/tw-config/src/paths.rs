// paths.rs — Standard on-disk layout.
//
// Everything Toolwarden keeps in a project lives under a `.warden/`
// directory at the project root: the policy document, the check scripts
// (by convention), and the decision journal.

use std::path::{Path, PathBuf};

/// Resolved locations of Toolwarden's files for one project.
#[derive(Debug, Clone)]
pub struct WardenPaths {
    /// Root directory of the project.
    pub project_root: PathBuf,
    /// The policy document.
    pub policy: PathBuf,
    /// The decision journal.
    pub journal: PathBuf,
}

impl WardenPaths {
    /// Standard `.warden/` layout under a project root.
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        let root = project_root.as_ref().to_path_buf();
        let warden_dir = root.join(".warden");
        Self {
            project_root: root,
            policy: warden_dir.join("policy.toml"),
            journal: warden_dir.join("decisions.jsonl"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_layout() {
        let paths = WardenPaths::for_project("/work/project");
        assert_eq!(paths.policy, Path::new("/work/project/.warden/policy.toml"));
        assert_eq!(
            paths.journal,
            Path::new("/work/project/.warden/decisions.jsonl")
        );
    }
}
