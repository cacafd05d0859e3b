//! Project name and on-disk location.

use crate::error::AppError;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9._-]+$").expect("static regex"))
}

/// Sanitized project identifier.
///
/// Doubles as the local directory name and the remote repository name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    /// Parse raw input: trim, collapse whitespace runs to `-`, lowercase.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let name = raw
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase();

        if name.is_empty() {
            return Err(AppError::validation(
                "Project name is required and cannot be empty.",
            ));
        }
        if name.starts_with('.') || !name_pattern().is_match(&name) {
            return Err(AppError::validation(format!(
                "Invalid project name '{}': use letters, digits, '.', '-' or '_' and do not start with '.'",
                name
            )));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A project directory under the workspace root
#[derive(Debug, Clone)]
pub struct Project {
    /// Project name
    pub name: ProjectName,
    /// Absolute project directory
    pub path: PathBuf,
}

impl Project {
    /// Locate a project under the workspace root
    pub fn new(workspace_root: &Path, name: ProjectName) -> Self {
        let root = workspace_root
            .canonicalize()
            .unwrap_or_else(|_| workspace_root.to_path_buf());
        let path = root.join(name.as_str());
        Self { name, path }
    }

    /// True when the directory exists and has at least one entry
    pub fn is_occupied(&self) -> bool {
        match std::fs::read_dir(&self.path) {
            Ok(mut entries) => entries.next().is_some(),
            Err(_) => self.path.exists(),
        }
    }

    /// Check whether the directory carries git metadata
    pub fn is_git_repository(path: &Path) -> bool {
        path.join(".git").exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sanitizes_whitespace_and_case() {
        let name = ProjectName::parse("  My Demo  Site ").unwrap();
        assert_eq!(name.as_str(), "my-demo-site");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(ProjectName::parse("").is_err());
        assert!(ProjectName::parse("   ").is_err());
    }

    #[test]
    fn test_parse_rejects_traversal() {
        assert!(ProjectName::parse("..").is_err());
        assert!(ProjectName::parse("../other").is_err());
        assert!(ProjectName::parse(".hidden").is_err());
        assert!(ProjectName::parse("a/b").is_err());
    }

    #[test]
    fn test_project_occupied() {
        let temp = tempfile::TempDir::new().unwrap();
        let project = Project::new(temp.path(), ProjectName::parse("demo-site").unwrap());
        assert!(!project.is_occupied());

        std::fs::create_dir(&project.path).unwrap();
        assert!(!project.is_occupied());

        std::fs::write(project.path.join("index.html"), "<html></html>").unwrap();
        assert!(project.is_occupied());
        assert!(project.path.is_absolute());
    }
}
