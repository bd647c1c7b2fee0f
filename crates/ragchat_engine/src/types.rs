use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::BackendError;

/// Wire form of one synthesized answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name sent in the multipart part.
    pub name: String,
    pub path: PathBuf,
}

/// One backend lifecycle action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendRequest {
    Reset,
    ListFiles,
    AddFiles(Vec<UploadFile>),
    ClearFiles,
    AddConversation(String),
    ClearConversation,
}

impl BackendRequest {
    pub fn name(&self) -> &'static str {
        match self {
            BackendRequest::Reset => "new",
            BackendRequest::ListFiles => "list-files",
            BackendRequest::AddFiles(_) => "add-files",
            BackendRequest::ClearFiles => "clear-files",
            BackendRequest::AddConversation(_) => "add-conversation",
            BackendRequest::ClearConversation => "clear-conversation",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackendReply {
    Done,
    Files(Vec<String>),
    Answers(Vec<Answer>),
}

/// Completion of a submitted request, carrying the caller's tag back.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineEvent<T> {
    pub tag: T,
    pub stack: String,
    pub result: Result<BackendReply, BackendError>,
}
