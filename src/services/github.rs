//! GitHub API client for creating repositories.

use crate::config::{GitConfig, GithubConfig};
use crate::domain::{Credential, RepositoryDescriptor};
use crate::error::{RemoteError, RemoteResult};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Parameters for a new repository
#[derive(Debug, Clone)]
pub struct CreateRepository {
    pub name: String,
    pub description: String,
    pub private: bool,
}

#[derive(Debug, Serialize)]
struct CreateRepositoryRequest<'a> {
    name: &'a str,
    description: &'a str,
    private: bool,
    auto_init: bool,
}

#[derive(Debug, Deserialize)]
struct RepositoryResponse {
    name: String,
    #[serde(default)]
    description: Option<String>,
    clone_url: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    default_branch: Option<String>,
}

/// HTTP client for the repository-hosting API
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: Client,
    api_base: String,
    organization: Option<String>,
    user_agent: String,
    timeout_seconds: u64,
    fallback_branch: String,
}

impl GithubClient {
    /// Create a new client. The credential is supplied per call.
    pub fn new(config: &GithubConfig, git: &GitConfig) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RemoteError::Unreachable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            organization: config
                .organization
                .as_ref()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty()),
            user_agent: config.user_agent.clone(),
            timeout_seconds: config.timeout_seconds,
            fallback_branch: git.default_branch.clone(),
        })
    }

    fn endpoint(&self) -> String {
        match &self.organization {
            Some(org) => format!("{}/orgs/{}/repos", self.api_base, org),
            None => format!("{}/user/repos", self.api_base),
        }
    }

    /// Create a repository. Not idempotent: a second call with the same
    /// name fails with `RemoteError::Conflict`.
    pub async fn create_repository(
        &self,
        credential: &Credential,
        request: &CreateRepository,
    ) -> RemoteResult<RepositoryDescriptor> {
        let description = if request.description.trim().is_empty() {
            format!("Website project: {}", request.name)
        } else {
            request.description.clone()
        };

        let body = CreateRepositoryRequest {
            name: &request.name,
            description: &description,
            private: request.private,
            auto_init: false,
        };

        let url = self.endpoint();
        tracing::info!("Creating GitHub repository '{}' via POST {}", request.name, url);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", credential.expose()))
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, &self.user_agent)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!("GitHub API returned {} for {}: {}", status.as_u16(), url, text);
            return Err(classify_status(status, &request.name, text));
        }

        let parsed: RepositoryResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::InvalidResponse(e.to_string()))?;

        self.descriptor(parsed)
    }

    fn descriptor(&self, parsed: RepositoryResponse) -> RemoteResult<RepositoryDescriptor> {
        let remote_url = parsed
            .clone_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                RemoteError::InvalidResponse("Repository created but clone URL not found".into())
            })?;

        if !remote_url.starts_with("https://") {
            return Err(RemoteError::InvalidResponse(format!(
                "clone URL is not HTTPS: {}",
                remote_url
            )));
        }

        let html_url = parsed
            .html_url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| remote_url.trim_end_matches(".git").to_string());

        Ok(RepositoryDescriptor {
            name: parsed.name,
            description: parsed.description,
            remote_url,
            html_url,
            default_branch: parsed
                .default_branch
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| self.fallback_branch.clone()),
        })
    }

    fn transport_error(&self, error: reqwest::Error) -> RemoteError {
        if error.is_timeout() {
            RemoteError::Timeout(self.timeout_seconds)
        } else if error.is_connect() {
            RemoteError::Unreachable(error.to_string())
        } else {
            RemoteError::Transport(error.to_string())
        }
    }
}

fn classify_status(status: StatusCode, name: &str, body: String) -> RemoteError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteError::Auth(format!(
            "GitHub rejected the token ({}): {}",
            status.as_u16(),
            body
        )),
        StatusCode::UNPROCESSABLE_ENTITY if body.contains("already exists") => {
            RemoteError::Conflict(name.to_string())
        }
        _ => RemoteError::Api {
            status: status.as_u16(),
            body,
        },
    }
}
