//! Remote repository descriptor.

use serde::{Deserialize, Serialize};

/// A freshly created hosted repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Repository name
    pub name: String,
    /// Repository description
    pub description: Option<String>,
    /// HTTPS clone URL
    pub remote_url: String,
    /// Browser URL
    pub html_url: String,
    /// Branch to push the initial commit to
    pub default_branch: String,
}
