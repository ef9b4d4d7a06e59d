//! Error types for the dashboard library
//!
//! All errors use thiserror for structured error handling.
//! Lookup misses on nested references are not errors; only primary
//! entity detail lookups surface `NotFound`.

use serde::Serialize;
use thiserror::Error;

/// Entity kinds that can be the subject of a detail lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    Project,
    Task,
    Event,
    Meeting,
    Folder,
    BudgetRequest,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Task => "task",
            Self::Event => "event",
            Self::Meeting => "meeting",
            Self::Folder => "folder",
            Self::BudgetRequest => "budget request",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

impl AppError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Returns true for the page-level "404" outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = AppError::not_found(EntityKind::Project, "p-404");
        assert_eq!(err.to_string(), "project not found: p-404");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_serializes_as_message() {
        let err = AppError::InvalidSettings("cap must be positive".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Invalid settings: cap must be positive\"");
    }
}
