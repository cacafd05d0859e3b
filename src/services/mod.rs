//! Infrastructure services for website-generator.
//!
//! This module contains:
//! - ProcessRunner: bounded external command execution
//! - GithubClient: repository creation on the hosting API
//! - GitDriver: clone, init, commit and push through the git CLI
//! - Provisioner: the end-to-end provisioning and sync workflows
//! - FileTools: project file helpers
//! - McpServer: MCP server over stdio

pub mod files;
pub mod git;
pub mod github;
pub mod mcp;
pub mod process;
pub mod provision;

pub use files::FileTools;
pub use git::{AuthenticatedRemote, GitDriver};
pub use github::GithubClient;
pub use mcp::{McpServer, ToolHandler};
pub use process::{CommandResult, ProcessCommand, ProcessRunner};
pub use provision::{ProvisionRequest, Provisioner};
