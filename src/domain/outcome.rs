//! Workflow steps and the caller-facing outcome.

use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Steps of the provisioning state machine, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionStep {
    CloneTemplate,
    StripHistory,
    CreateRemote,
    InitializeLocal,
    Push,
}

impl ProvisionStep {
    /// All steps in order
    pub const ALL: [ProvisionStep; 5] = [
        Self::CloneTemplate,
        Self::StripHistory,
        Self::CreateRemote,
        Self::InitializeLocal,
        Self::Push,
    ];

    /// Human readable label
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CloneTemplate => "Clone template repository",
            Self::StripHistory => "Remove template git metadata",
            Self::CreateRemote => "Create GitHub repository",
            Self::InitializeLocal => "Initialize local repository",
            Self::Push => "Push to GitHub",
        }
    }

    /// 1-based position in the sequence
    pub fn number(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0) + 1
    }
}

impl std::fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Failure,
}

/// Terminal result of one workflow invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowOutcome {
    pub status: OutcomeStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorKind>,
    /// Provisioning steps that finished before return
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub completed_steps: Vec<ProvisionStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<ProvisionStep>,
}

impl WorkflowOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Success,
            message: message.into(),
            repository_url: None,
            local_path: None,
            error_type: None,
            completed_steps: Vec::new(),
            failed_step: None,
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Failure,
            error_type: Some(kind),
            ..Self::success(message)
        }
    }

    pub fn with_repository_url(mut self, url: impl Into<String>) -> Self {
        self.repository_url = Some(url.into());
        self
    }

    pub fn with_local_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_path = Some(path.into());
        self
    }

    pub fn with_steps(mut self, completed: Vec<ProvisionStep>, failed: Option<ProvisionStep>) -> Self {
        self.completed_steps = completed;
        self.failed_step = failed;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_numbers_follow_order() {
        assert_eq!(ProvisionStep::CloneTemplate.number(), 1);
        assert_eq!(ProvisionStep::CreateRemote.number(), 3);
        assert_eq!(ProvisionStep::Push.number(), 5);
    }

    #[test]
    fn test_failure_serialization() {
        let outcome = WorkflowOutcome::failure(ErrorKind::Push, "push failed")
            .with_repository_url("https://github.com/octo/demo-site")
            .with_steps(
                vec![ProvisionStep::CloneTemplate, ProvisionStep::CreateRemote],
                Some(ProvisionStep::Push),
            );
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["error_type"], "PushError");
        assert_eq!(json["failed_step"], "push");
        assert_eq!(json["completed_steps"][1], "create_remote");
        assert!(json.get("local_path").is_none());
    }
}
