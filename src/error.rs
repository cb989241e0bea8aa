/// Error types shared by the pipeline and its collaborators
use crate::tab_data::TabId;
use thiserror::Error;

/// Failures reported by the browser side: tabs, scripting, AI capability, badge
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("tab {0} no longer exists")]
    TabGone(TabId),
    #[error("access denied: {0}")]
    Denied(String),
    #[error("capability unavailable: {0}")]
    Unavailable(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage read failed: {0}")]
    Read(String),
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("storage codec error: {0}")]
    Codec(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Codec(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
