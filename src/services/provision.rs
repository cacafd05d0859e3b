//! Provisioning orchestrator and change synchronization.
//!
//! `provision` runs the new-project state machine in strict order:
//! clone template → strip history → create remote → initialize → push.
//! Nothing is rolled back on failure; the outcome names every side effect
//! that already happened.

use crate::config::{ServerConfig, TemplateConfig};
use crate::domain::{
    Credential, CredentialSource, Project, ProjectName, ProvisionStep, RepositoryDescriptor,
    WorkflowOutcome,
};
use crate::error::{AppError, ErrorKind, GitError, RemoteState, Result};
use crate::services::git::{AuthenticatedRemote, GitDriver, InitPushError};
use crate::services::github::{CreateRepository, GithubClient};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments of a provisioning run
#[derive(Debug, Clone, Default)]
pub struct ProvisionRequest {
    pub project_name: String,
    pub description: String,
    pub deploy: bool,
}

/// Side effects accumulated during one provisioning run
struct Progress {
    project: Project,
    completed: Vec<ProvisionStep>,
    repository: Option<RepositoryDescriptor>,
    /// Set after a failed create call when no descriptor is available
    remote_state: RemoteState,
    /// A failed clone left files behind that could not be removed
    partial_clone: bool,
}

impl Progress {
    fn new(project: Project) -> Self {
        Self {
            project,
            completed: Vec::new(),
            repository: None,
            remote_state: RemoteState::Absent,
            partial_clone: false,
        }
    }

    fn has_local_copy(&self) -> bool {
        self.partial_clone || self.completed.contains(&ProvisionStep::CloneTemplate)
    }

    fn done(&mut self, step: ProvisionStep) {
        tracing::info!(
            "Step {} complete: {} ({})",
            step.number(),
            step,
            self.project.name
        );
        self.completed.push(step);
    }

    /// Failure outcome naming the step and what already exists
    fn fail(self, step: ProvisionStep, error: AppError) -> WorkflowOutcome {
        let kind = error.kind();
        tracing::error!("Step {} ({}) failed: {}", step.number(), step, error);

        let mut message = format!(
            "Failed at Step {} ({}): {}",
            step.number(),
            step,
            error
        );

        match &self.repository {
            Some(repo) if step == ProvisionStep::Push => message.push_str(&format!(
                "\nThe GitHub repository {} was created but is still empty because the push failed. \
                 It has not been deleted; retry the push with push_project.",
                repo.html_url
            )),
            Some(repo) => message.push_str(&format!(
                "\nThe GitHub repository {} was created and has not been deleted.",
                repo.html_url
            )),
            None => match self.remote_state {
                RemoteState::Created => message.push_str(&format!(
                    "\nThe GitHub repository '{}' was created, but its details could not be read. \
                     It has not been deleted; check the account before retrying.",
                    self.project.name
                )),
                RemoteState::Unknown => message.push_str(&format!(
                    "\nThe GitHub repository '{}' may have been created before the request failed. \
                     Check the account before retrying.",
                    self.project.name
                )),
                RemoteState::Absent => message.push_str("\nNo GitHub repository was created."),
            },
        }

        if self.partial_clone {
            message.push_str(&format!(
                "\nPartially cloned files could not be removed and remain at {}.",
                self.project.path.display()
            ));
        } else if self.completed.contains(&ProvisionStep::CloneTemplate) {
            message.push_str(&format!(
                "\nLocal project directory retained at {}.",
                self.project.path.display()
            ));
        } else if step == ProvisionStep::CloneTemplate {
            message.push_str("\nNo local files were left behind.");
        }

        let mut outcome = WorkflowOutcome::failure(kind, message)
            .with_steps(self.completed.clone(), Some(step));
        if let Some(repo) = &self.repository {
            outcome = outcome.with_repository_url(repo.html_url.clone());
        }
        if self.has_local_copy() {
            outcome = outcome.with_local_path(self.project.path.clone());
        }
        outcome
    }
}

/// Composes the GitHub client and git driver into end-to-end workflows
pub struct Provisioner {
    workspace_root: PathBuf,
    template: TemplateConfig,
    private: bool,
    token_env: String,
    credentials: Arc<dyn CredentialSource>,
    github: GithubClient,
    git: GitDriver,
}

impl Provisioner {
    pub fn new(config: &ServerConfig, credentials: Arc<dyn CredentialSource>) -> Result<Self> {
        Ok(Self {
            workspace_root: config.workspace.root.clone(),
            template: config.template.clone(),
            private: config.github.private,
            token_env: config.github.token_env.clone(),
            credentials,
            github: GithubClient::new(&config.github, &config.git)?,
            git: GitDriver::new(&config.git),
        })
    }

    /// Resolve a caller-supplied project path against the workspace root
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path.trim());
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        };
        joined.canonicalize().unwrap_or(joined)
    }

    fn credential(&self) -> std::result::Result<Credential, WorkflowOutcome> {
        self.credentials.resolve().ok_or_else(|| {
            tracing::error!("{} is not set; refusing to contact GitHub", self.token_env);
            WorkflowOutcome::failure(
                ErrorKind::Auth,
                format!(
                    "GitHub Token is missing. Set the {} environment variable to a personal access token.",
                    self.token_env
                ),
            )
        })
    }

    /// Validate inputs before any side effect
    fn preconditions(&self, request: &ProvisionRequest) -> std::result::Result<(Credential, Project), WorkflowOutcome> {
        let credential = self.credential()?;

        let invalid = |e: AppError| WorkflowOutcome::failure(e.kind(), e.to_string());
        let name = ProjectName::parse(&request.project_name).map_err(invalid)?;

        if !self.workspace_root.is_dir() {
            return Err(invalid(AppError::validation(format!(
                "Workspace root {} does not exist.",
                self.workspace_root.display()
            ))));
        }

        let project = Project::new(&self.workspace_root, name);
        if project.is_occupied() || (project.path.exists() && !project.path.is_dir()) {
            return Err(invalid(AppError::validation(format!(
                "Directory {} already exists and is not empty.",
                project.path.display()
            ))));
        }

        Ok((credential, project))
    }

    /// Turn a project name into a pushed, hosted, locally tracked repository
    pub async fn provision(&self, request: ProvisionRequest) -> WorkflowOutcome {
        let (credential, project) = match self.preconditions(&request) {
            Ok(ready) => ready,
            Err(outcome) => return outcome,
        };

        tracing::info!("Starting repository setup for project: {}", project.name);
        let mut progress = Progress::new(project);
        let path = progress.project.path.clone();
        let existed = path.exists();

        if let Err(e) = self
            .git
            .clone_template(&self.template.url, &path, self.template.shallow)
            .await
        {
            progress.partial_clone = !discard_partial_clone(&path, existed).await;
            return progress.fail(ProvisionStep::CloneTemplate, e.into());
        }
        progress.done(ProvisionStep::CloneTemplate);

        if let Err(e) = self.git.strip_history(&path).await {
            return progress.fail(ProvisionStep::StripHistory, e.into());
        }
        progress.done(ProvisionStep::StripHistory);

        let create = CreateRepository {
            name: progress.project.name.to_string(),
            description: request.description.clone(),
            private: self.private,
        };
        let repository = match self.github.create_repository(&credential, &create).await {
            Ok(repository) => repository,
            Err(e) => {
                progress.remote_state = e.remote_state();
                return progress.fail(ProvisionStep::CreateRemote, e.into());
            }
        };
        progress.repository = Some(repository.clone());
        progress.done(ProvisionStep::CreateRemote);

        let remote = match AuthenticatedRemote::new(&repository.remote_url, credential) {
            Ok(remote) => remote,
            Err(e) => return progress.fail(ProvisionStep::InitializeLocal, e.into()),
        };
        let message = format!("Initial commit for {}", progress.project.name);

        match self
            .git
            .initialize_and_push(&path, &remote, &repository.default_branch, &message)
            .await
        {
            Ok(()) => {
                progress.done(ProvisionStep::InitializeLocal);
                progress.done(ProvisionStep::Push);
            }
            Err(InitPushError::Local(e)) => {
                return progress.fail(ProvisionStep::InitializeLocal, e.into())
            }
            Err(InitPushError::Push(e)) => {
                progress.done(ProvisionStep::InitializeLocal);
                return progress.fail(ProvisionStep::Push, e.into());
            }
        }

        let mut summary = self.success_message(&progress.project, &repository);
        if request.deploy {
            summary.push_str(
                "\n\n⚠️  AWS Amplify deployment is not yet implemented but can be added in future updates.",
            );
        }

        WorkflowOutcome::success(summary)
            .with_repository_url(repository.html_url.clone())
            .with_local_path(progress.project.path.clone())
            .with_steps(progress.completed, None)
    }

    fn success_message(&self, project: &Project, repository: &RepositoryDescriptor) -> String {
        let steps = ProvisionStep::ALL
            .iter()
            .map(|s| format!("✅ {}", s))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Repository setup completed successfully!\n\n\
             Project Name: {}\n\
             Repository URL: {}\n\
             Local Path: {}\n\
             Template Used: {}\n\n\
             Steps Completed:\n{}\n\n\
             Your website project is now ready! You can:\n\
             1. Open the project: cd {}\n\
             2. Install dependencies: npm install\n\
             3. Start development server: npm run dev\n\
             4. Build for production: npm run build",
            project.name,
            repository.html_url,
            project.path.display(),
            self.template.url,
            steps,
            project.path.display(),
        )
    }

    /// Commit and push pending changes of an already provisioned project
    pub async fn synchronize(&self, project_path: &str, commit_message: &str) -> WorkflowOutcome {
        let path = self.resolve_path(project_path);
        if !Project::is_git_repository(&path) {
            return WorkflowOutcome::failure(
                ErrorKind::NotAGitRepository,
                format!(
                    "Not a git repository: {}. Please ensure the project is initialized with git.",
                    path.display()
                ),
            )
            .with_local_path(path);
        }
        if commit_message.trim().is_empty() {
            return WorkflowOutcome::failure(
                ErrorKind::Validation,
                "Commit message cannot be empty.",
            );
        }

        let credential = match self.credential() {
            Ok(credential) => credential,
            Err(outcome) => return outcome,
        };

        match self.git.status_has_changes(&path).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!("No changes to commit in {:?}", path);
                return WorkflowOutcome::success("No changes to commit.").with_local_path(path);
            }
            Err(e) => return self.git_failure(e, path),
        }

        let remote = match self.origin_remote(&path, credential).await {
            Ok(remote) => remote,
            Err(e) => return self.git_failure(e, path),
        };

        match self.git.stage_commit_push(&path, commit_message, &remote).await {
            Ok(()) => WorkflowOutcome::success(format!(
                "Successfully committed and pushed changes with message: '{}'",
                commit_message
            ))
            .with_repository_url(remote.url().trim_end_matches(".git").to_string())
            .with_local_path(path),
            Err(e) => self.git_failure(e, path),
        }
    }

    /// Push the checked-out branch to `origin`, e.g. after a failed initial push
    pub async fn push_project(&self, project_path: &str) -> WorkflowOutcome {
        let path = self.resolve_path(project_path);
        if !Project::is_git_repository(&path) {
            return WorkflowOutcome::failure(
                ErrorKind::NotAGitRepository,
                format!("Not a git repository: {}.", path.display()),
            );
        }

        let credential = match self.credential() {
            Ok(credential) => credential,
            Err(outcome) => return outcome,
        };

        let remote = match self.origin_remote(&path, credential).await {
            Ok(remote) => remote,
            Err(e) => return self.git_failure(e, path),
        };
        let branch = match self.git.current_branch(&path).await {
            Ok(branch) => branch,
            Err(e) => return self.git_failure(e, path),
        };

        match self.git.push(&path, &remote, &branch).await {
            Ok(()) => WorkflowOutcome::success(format!(
                "Successfully pushed branch '{}' to {}",
                branch,
                remote.url()
            ))
            .with_repository_url(remote.url().trim_end_matches(".git").to_string())
            .with_local_path(path),
            Err(e) => self.git_failure(e, path),
        }
    }

    async fn origin_remote(
        &self,
        path: &Path,
        credential: Credential,
    ) -> std::result::Result<AuthenticatedRemote, GitError> {
        let url = self.git.origin_url(path).await?;
        AuthenticatedRemote::new(&url, credential)
    }

    fn git_failure(&self, error: GitError, path: PathBuf) -> WorkflowOutcome {
        tracing::error!("Git workflow failed in {:?}: {}", path, error);
        WorkflowOutcome::failure(error.kind(), error.to_string()).with_local_path(path)
    }
}

/// Put the destination back the way it was before a failed clone.
/// Returns false when leftovers could not be removed.
async fn discard_partial_clone(path: &Path, existed: bool) -> bool {
    let removed = match tokio::fs::remove_dir_all(path).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
        _ if existed => tokio::fs::create_dir(path).await,
        _ => Ok(()),
    };

    match removed {
        Ok(()) => {
            tracing::info!("Removed partial clone at {:?}", path);
            true
        }
        Err(e) => {
            tracing::warn!("Could not remove partial clone at {:?}: {}", path, e);
            false
        }
    }
}
