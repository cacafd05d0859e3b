//! Domain entities for website-generator.
//!
//! This module contains the core value types:
//! - ProjectName / Project: what is being provisioned and where
//! - Credential: the caller's access token
//! - RepositoryDescriptor: a created remote repository
//! - WorkflowOutcome: the terminal result handed back to the caller

mod credential;
mod outcome;
mod project;
mod repository;

pub use credential::{Credential, CredentialSource, EnvCredentialSource, StaticCredentialSource};
pub use outcome::{OutcomeStatus, ProvisionStep, WorkflowOutcome};
pub use project::{Project, ProjectName};
pub use repository::RepositoryDescriptor;
