//! Configuration management for website-generator.
//!
//! Supports layered configuration: defaults → project → user → env

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub template: TemplateConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub git: GitConfig,
}

impl ServerConfig {
    /// Load configuration with hierarchy: defaults → project → user → env
    pub fn load(project_root: Option<&PathBuf>) -> Result<Self, ConfigError> {
        use config::{Config, Environment, File};

        let mut builder = Config::builder();

        // 1. Start with defaults
        builder = builder.add_source(
            config::File::from_str(
                include_str!("../default_config.toml"),
                config::FileFormat::Toml,
            )
            .required(false),
        );

        // 2. Project-specific config (.website-generator.toml in the working directory)
        if let Some(root) = project_root {
            let project_config = root.join(".website-generator.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }
        }

        // 3. User config (~/.config/website-generator/config.toml)
        if let Some(config_dir) =
            directories::ProjectDirs::from("com", "website-generator", "website-generator")
        {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(File::from(user_config).required(false));
            }
        }

        // 4. Environment variables (WEBGEN_*)
        builder = builder.add_source(
            Environment::with_prefix("WEBGEN")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut loaded: Self = config
            .try_deserialize()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        if let Some(root) = project_root {
            loaded.workspace.root = loaded.workspace.resolve_root(root);
        }
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject settings the workflow cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.template.url.trim().is_empty() {
            return Err(ConfigError::Invalid("template.url must not be empty".into()));
        }
        if self.github.token_env.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "github.token_env must name an environment variable".into(),
            ));
        }
        if self.git.timeout_seconds == 0 || self.github.timeout_seconds == 0 {
            return Err(ConfigError::Invalid("timeouts must be at least one second".into()));
        }
        if self.git.default_branch.trim().is_empty() {
            return Err(ConfigError::Invalid("git.default_branch must not be empty".into()));
        }
        Ok(())
    }
}

/// Where provisioned projects live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Directory under which project directories are created
    #[serde(default = "default_workspace_root")]
    pub root: PathBuf,
}

impl WorkspaceConfig {
    /// Resolve a relative root against the given base directory
    pub fn resolve_root(&self, base: &Path) -> PathBuf {
        if self.root.is_absolute() {
            self.root.clone()
        } else {
            base.join(&self.root)
        }
    }
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_workspace_root(),
        }
    }
}

fn default_workspace_root() -> PathBuf {
    PathBuf::from(".")
}

/// Template repository every project starts from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Clone source (URL or local path)
    #[serde(default = "default_template_url")]
    pub url: String,
    /// Clone with `--depth 1`
    #[serde(default = "default_true")]
    pub shallow: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            url: default_template_url(),
            shallow: true,
        }
    }
}

fn default_template_url() -> String {
    "https://github.com/Jeetanshu18/react-vite".to_string()
}

fn default_true() -> bool {
    true
}

/// GitHub API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Environment variable holding the access token
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Create repositories under this organization instead of the user
    #[serde(default)]
    pub organization: Option<String>,
    /// Create private repositories
    #[serde(default)]
    pub private: bool,
    /// Request timeout in seconds
    #[serde(default = "default_api_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl GithubConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token_env: default_token_env(),
            organization: None,
            private: false,
            timeout_seconds: default_api_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_api_timeout_seconds() -> u64 {
    30
}

fn default_user_agent() -> String {
    "website-generator-mcp/1.0.0".to_string()
}

/// Git-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitConfig {
    /// git executable
    #[serde(default = "default_git_executable")]
    pub executable: String,
    /// Bound for every git subprocess, in seconds
    #[serde(default = "default_git_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Branch pushed when the API does not report one
    #[serde(default = "default_branch")]
    pub default_branch: String,
    #[serde(default = "default_author_name")]
    pub author_name: String,
    #[serde(default = "default_author_email")]
    pub author_email: String,
    /// Extra `-c key=value` pairs for every git invocation
    #[serde(default)]
    pub config_overrides: BTreeMap<String, String>,
}

impl GitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            executable: default_git_executable(),
            timeout_seconds: default_git_timeout_seconds(),
            default_branch: default_branch(),
            author_name: default_author_name(),
            author_email: default_author_email(),
            config_overrides: BTreeMap::new(),
        }
    }
}

fn default_git_executable() -> String {
    "git".to_string()
}

fn default_git_timeout_seconds() -> u64 {
    60
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_author_name() -> String {
    "Web Developer".to_string()
}

fn default_author_email() -> String {
    "web@developer.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.workspace.root, PathBuf::from("."));
        assert_eq!(
            config.template.url,
            "https://github.com/Jeetanshu18/react-vite"
        );
        assert!(config.template.shallow);
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.github.token_env, "GITHUB_TOKEN");
        assert_eq!(config.github.timeout_seconds, 30);
        assert_eq!(config.git.timeout_seconds, 60);
        assert_eq!(config.git.default_branch, "main");
        assert!(config.git.config_overrides.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_reads_project_file() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".website-generator.toml"),
            "[template]\nurl = \"/srv/templates/site\"\nshallow = false\n\n[workspace]\nroot = \"projects\"\n",
        )
        .unwrap();

        let root = temp.path().to_path_buf();
        let config = ServerConfig::load(Some(&root)).unwrap();
        assert_eq!(config.template.url, "/srv/templates/site");
        assert!(!config.template.shallow);
        assert_eq!(config.workspace.root, temp.path().join("projects"));
        assert_eq!(config.git.author_name, "Web Developer");
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = ServerConfig::default();
        config.git.timeout_seconds = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
