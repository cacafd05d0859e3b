//! Unified error types for the website-generator server.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    #[error("GitHub error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("File error: {0}")]
    File(#[from] FileError),

    #[error("MCP error: {0}")]
    Mcp(#[from] McpError),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Create a validation error from a string
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Stable classification reported to callers
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Environment,
            Self::Process(e) => e.kind(),
            Self::Remote(e) => e.kind(),
            Self::Git(e) => e.kind(),
            Self::File(e) => e.kind(),
            Self::Mcp(_) => ErrorKind::Validation,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

/// Caller-facing error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    #[serde(rename = "ValidationError")]
    Validation,
    #[serde(rename = "AuthError")]
    Auth,
    #[serde(rename = "ConflictError")]
    Conflict,
    #[serde(rename = "TransportError")]
    Transport,
    #[serde(rename = "ApiError")]
    Api,
    #[serde(rename = "CloneError")]
    Clone,
    #[serde(rename = "CleanupError")]
    Cleanup,
    #[serde(rename = "GitInitError")]
    GitInit,
    #[serde(rename = "PushError")]
    Push,
    #[serde(rename = "CommitError")]
    Commit,
    #[serde(rename = "NothingToCommitError")]
    NothingToCommit,
    #[serde(rename = "NotAGitRepositoryError")]
    NotAGitRepository,
    #[serde(rename = "TimeoutError")]
    Timeout,
    #[serde(rename = "EnvironmentError")]
    Environment,
    #[serde(rename = "IoError")]
    Io,
}

impl ErrorKind {
    /// Name used in messages and serialized outcomes
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "ValidationError",
            Self::Auth => "AuthError",
            Self::Conflict => "ConflictError",
            Self::Transport => "TransportError",
            Self::Api => "ApiError",
            Self::Clone => "CloneError",
            Self::Cleanup => "CleanupError",
            Self::GitInit => "GitInitError",
            Self::Push => "PushError",
            Self::Commit => "CommitError",
            Self::NothingToCommit => "NothingToCommitError",
            Self::NotAGitRepository => "NotAGitRepositoryError",
            Self::Timeout => "TimeoutError",
            Self::Environment => "EnvironmentError",
            Self::Io => "IoError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Process runner errors.
///
/// A command that runs and fails is not an error here; it is a
/// `CommandResult` with `success == false`.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Executable not found: {0}")]
    ExecutableNotFound(String),

    #[error("Working directory does not exist: {0}")]
    InvalidWorkingDirectory(PathBuf),

    #[error("Failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("Failed to wait for {program}: {message}")]
    Wait { program: String, message: String },
}

impl ProcessError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Environment
    }
}

/// Repository-hosting API errors
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("GitHub credential missing or rejected: {0}")]
    Auth(String),

    #[error("Repository '{0}' already exists for this account")]
    Conflict(String),

    /// The connection could not be established; nothing was sent
    #[error("Could not reach GitHub API: {0}")]
    Unreachable(String),

    /// The request may have been delivered before the connection failed
    #[error("GitHub API connection failed: {0}")]
    Transport(String),

    #[error("GitHub API request timed out after {0} seconds")]
    Timeout(u64),

    #[error("GitHub API error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// 2xx answer whose body is unusable; the repository exists
    #[error("Invalid GitHub API response: {0}")]
    InvalidResponse(String),
}

/// What a failed create call implies about the remote repository
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteState {
    /// The API refused or was never reached
    Absent,
    /// The API accepted the request
    Created,
    /// The request may or may not have been applied
    Unknown,
}

impl RemoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth(_) => ErrorKind::Auth,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Unreachable(_) | Self::Transport(_) => ErrorKind::Transport,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Api { .. } | Self::InvalidResponse(_) => ErrorKind::Api,
        }
    }

    pub fn remote_state(&self) -> RemoteState {
        match self {
            Self::Auth(_) | Self::Conflict(_) | Self::Unreachable(_) | Self::Api { .. } => {
                RemoteState::Absent
            }
            Self::InvalidResponse(_) => RemoteState::Created,
            Self::Transport(_) | Self::Timeout(_) => RemoteState::Unknown,
        }
    }
}

/// Git workflow step errors
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Failed to clone template repository: {0}")]
    Clone(String),

    #[error("Failed to remove template git metadata: {0}")]
    Cleanup(String),

    #[error("Failed to initialize git repository: {0}")]
    Init(String),

    #[error("Failed to push to remote: {0}")]
    Push(String),

    #[error("Failed to commit changes: {0}")]
    Commit(String),

    #[error("Nothing to commit")]
    NothingToCommit,

    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("Unsupported remote URL (HTTPS required): {0}")]
    UnsupportedRemote(String),

    #[error("git {command} timed out after {seconds} seconds")]
    Timeout { command: String, seconds: u64 },

    #[error("Failed to inspect repository: {0}")]
    Status(String),

    #[error(transparent)]
    Process(#[from] ProcessError),
}

impl GitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Clone(_) => ErrorKind::Clone,
            Self::Cleanup(_) => ErrorKind::Cleanup,
            Self::Init(_) => ErrorKind::GitInit,
            Self::Push(_) | Self::UnsupportedRemote(_) => ErrorKind::Push,
            Self::Commit(_) => ErrorKind::Commit,
            Self::NothingToCommit => ErrorKind::NothingToCommit,
            Self::NotARepository(_) => ErrorKind::NotAGitRepository,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Status(_) => ErrorKind::Environment,
            Self::Process(e) => e.kind(),
        }
    }
}

/// Project file tool errors
#[derive(Debug, Error)]
pub enum FileError {
    #[error("{0} is required and cannot be empty.")]
    EmptyPath(&'static str),

    #[error("'{0}' does not exist.")]
    NotFound(PathBuf),

    #[error("'{0}' already exists. Use update_file to change it.")]
    AlreadyExists(PathBuf),

    #[error("Path '{0}' is not a file.")]
    NotAFile(PathBuf),

    #[error("Path '{0}' is not a directory.")]
    NotADirectory(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Unable to decode file as UTF-8: {0}")]
    NotUtf8(PathBuf),

    #[error("IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FileError {
    /// Classify an IO failure on a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            std::io::ErrorKind::InvalidData => Self::NotUtf8(path),
            _ => Self::Io { path, source },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyPath(_)
            | Self::NotFound(_)
            | Self::AlreadyExists(_)
            | Self::NotAFile(_)
            | Self::NotADirectory(_) => ErrorKind::Validation,
            Self::PermissionDenied(_) | Self::NotUtf8(_) | Self::Io { .. } => ErrorKind::Io,
        }
    }
}

/// MCP server errors
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for process execution
pub type ProcessResult<T> = std::result::Result<T, ProcessError>;

/// Result type alias for GitHub API operations
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Result type alias for Git operations
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Result type alias for file tools
pub type FileResult<T> = std::result::Result<T, FileError>;

/// Result type alias for MCP operations
pub type McpResult<T> = std::result::Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_serializes_with_suffix() {
        let json = serde_json::to_string(&ErrorKind::NothingToCommit).unwrap();
        assert_eq!(json, "\"NothingToCommitError\"");
        assert_eq!(ErrorKind::Conflict.to_string(), "ConflictError");
    }

    #[test]
    fn test_git_timeout_is_timeout_kind() {
        let err = GitError::Timeout {
            command: "push".to_string(),
            seconds: 60,
        };
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(AppError::from(err).kind(), ErrorKind::Timeout);
    }

    #[test]
    fn test_status_failure_is_not_a_commit_error() {
        let err = GitError::Status("fatal: not a git repository".to_string());
        assert_eq!(err.kind(), ErrorKind::Environment);
    }

    #[test]
    fn test_file_io_classification() {
        let err = FileError::io(
            "/tmp/missing",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, FileError::NotFound(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
