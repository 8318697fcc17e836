// src/domain/error.rs
use crate::domain::NoteId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailure(String),
    #[error("Not signed in")]
    NotAuthenticated,
    #[error("Invalid note: {0}")]
    Validation(String),
    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),
    #[error("Record operation failed: {0}")]
    RecordOperationFailure(String),
    #[error("Upload to {path} failed: {reason}")]
    UploadFailure { path: String, reason: String },
    #[error("Could not resolve display URL for {path}: {reason}")]
    UrlResolutionFailure { path: String, reason: String },
}

impl DomainError {
    pub fn record(err: impl std::fmt::Display) -> Self {
        DomainError::RecordOperationFailure(err.to_string())
    }
}
