//! website-generator: MCP server that provisions website projects
//!
//! Clones a template, creates a GitHub repository, pushes the initial
//! commit, and keeps the project in sync afterwards.

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;

pub use app::App;
pub use config::ServerConfig;
pub use error::{AppError, Result};
