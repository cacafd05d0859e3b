//! Tool catalog: maps MCP tool calls onto the provisioning and file services.

use crate::config::ServerConfig;
use crate::domain::{CredentialSource, WorkflowOutcome};
use crate::error::{FileError, McpError, McpResult, Result};
use crate::services::files::FileTools;
use crate::services::mcp::{ServerInfo, ToolDefinition, ToolHandler, ToolResult};
use crate::services::provision::{ProvisionRequest, Provisioner};
use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Server name announced during initialize
pub const SERVER_NAME: &str = "website-generator";

/// Tools exposed by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    RepoSetup,
    CommitAndPush,
    PushProject,
    NewFile,
    ReadFile,
    ListFiles,
    UpdateFile,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Self::RepoSetup,
        Self::CommitAndPush,
        Self::PushProject,
        Self::NewFile,
        Self::ReadFile,
        Self::ListFiles,
        Self::UpdateFile,
    ];

    /// MCP tool name
    pub fn tool_name(&self) -> &'static str {
        match self {
            Self::RepoSetup => "repo_setup",
            Self::CommitAndPush => "commit_and_push",
            Self::PushProject => "push_project",
            Self::NewFile => "new_file",
            Self::ReadFile => "read_file",
            Self::ListFiles => "list_files",
            Self::UpdateFile => "update_file",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tool_name() == name)
    }

    fn description(&self) -> &'static str {
        match self {
            Self::RepoSetup => {
                "Create a new website project from the template: clone it, create a GitHub \
                 repository, and push the initial commit."
            }
            Self::CommitAndPush => {
                "Stage all changes in a project, commit them, and push to GitHub."
            }
            Self::PushProject => {
                "Push the current branch of a project to its GitHub remote. Use this to retry \
                 after a failed initial push."
            }
            Self::NewFile => {
                "Create a new file in the given directory. Fails if the file already exists; \
                 use update_file to change it."
            }
            Self::ReadFile => "Read the contents of a file.",
            Self::ListFiles => "List the files and directories in a directory.",
            Self::UpdateFile => "Replace the contents of an existing file.",
        }
    }

    fn input_schema(&self) -> Value {
        let string = |description: &str| json!({ "type": "string", "description": description });
        match self {
            Self::RepoSetup => json!({
                "type": "object",
                "properties": {
                    "project_name": string("Name of the project and the GitHub repository"),
                    "description": string("Repository description"),
                    "deploy_to_amplify": {
                        "type": "boolean",
                        "description": "Request AWS Amplify deployment",
                        "default": false
                    }
                },
                "required": ["project_name"]
            }),
            Self::CommitAndPush => json!({
                "type": "object",
                "properties": {
                    "project_path": string("Project directory; relative paths resolve against the workspace root"),
                    "commit_message": string("Commit message; generated when omitted")
                },
                "required": ["project_path"]
            }),
            Self::PushProject => json!({
                "type": "object",
                "properties": {
                    "project_path": string("Project directory; relative paths resolve against the workspace root")
                },
                "required": ["project_path"]
            }),
            Self::NewFile => json!({
                "type": "object",
                "properties": {
                    "file_path": string("Directory to create the file in; relative paths resolve against the workspace root"),
                    "file_name": string("Name of the new file"),
                    "content": string("File content")
                },
                "required": ["file_path", "file_name"]
            }),
            Self::ReadFile => json!({
                "type": "object",
                "properties": { "file_path": string("Path to the file") },
                "required": ["file_path"]
            }),
            Self::ListFiles => json!({
                "type": "object",
                "properties": { "directory_path": string("Path to the directory") },
                "required": ["directory_path"]
            }),
            Self::UpdateFile => json!({
                "type": "object",
                "properties": {
                    "file_path": string("Path to the existing file"),
                    "new_content": string("Replacement content")
                },
                "required": ["file_path", "new_content"]
            }),
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.tool_name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RepoSetupArgs {
    project_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    deploy_to_amplify: bool,
}

#[derive(Debug, Deserialize)]
struct CommitAndPushArgs {
    project_path: String,
    #[serde(default)]
    commit_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProjectPathArgs {
    project_path: String,
}

#[derive(Debug, Deserialize)]
struct NewFileArgs {
    file_path: String,
    file_name: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct FilePathArgs {
    file_path: String,
}

#[derive(Debug, Deserialize)]
struct DirectoryPathArgs {
    directory_path: String,
}

#[derive(Debug, Deserialize)]
struct UpdateFileArgs {
    file_path: String,
    new_content: String,
}

fn parse_args<T: DeserializeOwned>(tool: Tool, arguments: Value) -> McpResult<T> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|e| McpError::InvalidArguments {
        tool: tool.tool_name().to_string(),
        message: e.to_string(),
    })
}

/// Commit message used when the caller supplies none
pub fn auto_commit_message(now: NaiveDateTime) -> String {
    format!(
        "Auto-commit: Update project files - {}",
        now.format("%Y-%m-%d %H:%M:%S")
    )
}

fn outcome_result(outcome: WorkflowOutcome) -> ToolResult {
    let structured = serde_json::to_value(&outcome).ok();
    let result = if outcome.is_success() {
        ToolResult::text(outcome.message)
    } else {
        ToolResult::error(outcome.message)
    };
    match structured {
        Some(value) => result.with_structured(value),
        None => result,
    }
}

fn file_result(result: std::result::Result<String, FileError>) -> ToolResult {
    match result {
        Ok(text) => ToolResult::text(text),
        Err(e) => {
            tracing::error!("File tool failed: {}", e);
            ToolResult::error(e.to_string()).with_structured(json!({
                "status": "failure",
                "message": e.to_string(),
                "error_type": e.kind(),
            }))
        }
    }
}

/// Application state behind the MCP server
pub struct App {
    provisioner: Provisioner,
    files: FileTools,
}

impl App {
    pub fn with_credentials(
        config: &ServerConfig,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<Self> {
        Ok(Self {
            provisioner: Provisioner::new(config, credentials)?,
            files: FileTools::new(config.workspace.root.clone()),
        })
    }

    pub fn server_info() -> ServerInfo {
        ServerInfo {
            name: SERVER_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ToolHandler for App {
    fn tools(&self) -> Vec<ToolDefinition> {
        Tool::ALL.iter().map(Tool::definition).collect()
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> McpResult<ToolResult> {
        let tool = Tool::from_name(name).ok_or_else(|| McpError::ToolNotFound(name.to_string()))?;

        let result = match tool {
            Tool::RepoSetup => {
                let args: RepoSetupArgs = parse_args(tool, arguments)?;
                outcome_result(
                    self.provisioner
                        .provision(ProvisionRequest {
                            project_name: args.project_name,
                            description: args.description,
                            deploy: args.deploy_to_amplify,
                        })
                        .await,
                )
            }
            Tool::CommitAndPush => {
                let args: CommitAndPushArgs = parse_args(tool, arguments)?;
                let message = args
                    .commit_message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| auto_commit_message(chrono::Local::now().naive_local()));
                outcome_result(
                    self.provisioner
                        .synchronize(&args.project_path, &message)
                        .await,
                )
            }
            Tool::PushProject => {
                let args: ProjectPathArgs = parse_args(tool, arguments)?;
                outcome_result(self.provisioner.push_project(&args.project_path).await)
            }
            Tool::NewFile => {
                let args: NewFileArgs = parse_args(tool, arguments)?;
                file_result(
                    self.files
                        .new_file(&args.file_path, &args.file_name, &args.content)
                        .await,
                )
            }
            Tool::ReadFile => {
                let args: FilePathArgs = parse_args(tool, arguments)?;
                file_result(self.files.read_file(&args.file_path).await)
            }
            Tool::ListFiles => {
                let args: DirectoryPathArgs = parse_args(tool, arguments)?;
                file_result(
                    self.files
                        .list_files(&args.directory_path)
                        .await
                        .map(|items| {
                            if items.is_empty() {
                                format!("Directory '{}' is empty.", args.directory_path.trim())
                            } else {
                                items.join("\n")
                            }
                        }),
                )
            }
            Tool::UpdateFile => {
                let args: UpdateFileArgs = parse_args(tool, arguments)?;
                file_result(
                    self.files
                        .update_file(&args.file_path, &args.new_content)
                        .await,
                )
            }
        };

        Ok(result)
    }
}
