//! Dataset module
//!
//! This module provides the fixed dashboard dataset including:
//! - Model definitions
//! - The embedded seed data
//! - Lookup and relation accessors
//! - Repository layer for local mutations

pub mod accessors;
pub mod models;
pub mod repository;
pub mod seed;

pub use models::*;
pub use repository::{Entity, InMemoryRepository, Repository};
pub use seed::seed_dataset;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Every collection the dashboard pages read from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub meetings: Vec<Meeting>,
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub files: Vec<FileMetadata>,
    #[serde(default)]
    pub finance: FinanceLedger,
}

impl Dataset {
    /// Parse a dataset from its JSON representation
    pub fn from_json(content: &str) -> Result<Self> {
        let dataset: Dataset = serde_json::from_str(content)?;
        Ok(dataset)
    }

    /// Load a dataset file from disk
    pub async fn load(path: &Path) -> Result<Self> {
        tracing::info!("Loading dataset from: {:?}", path);

        let content = fs::read_to_string(path).await?;
        let dataset = Self::from_json(&content)?;

        tracing::info!(
            "Dataset loaded: {} users, {} projects, {} tasks",
            dataset.users.len(),
            dataset.projects.len(),
            dataset.tasks.len()
        );

        Ok(dataset)
    }

    /// Write the dataset to disk as pretty JSON
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        tracing::info!("Dataset saved to {:?}", path);

        Ok(())
    }

    /// Local working copy of the task collection
    pub fn task_repository(&self) -> InMemoryRepository<Task> {
        InMemoryRepository::new(self.tasks.clone())
    }

    /// Local working copy of the budget requests
    pub fn budget_request_repository(&self) -> InMemoryRepository<BudgetRequest> {
        InMemoryRepository::new(self.finance.budget_requests.clone())
    }
}
