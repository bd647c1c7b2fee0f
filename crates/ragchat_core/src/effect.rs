use crate::{PanelId, Stack, UploadFile};

/// Identifies the lane binding a request was issued for.
///
/// Replies carry the ticket back; a reply whose generation no longer matches
/// the lane belongs to a previous binding and is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelTicket {
    pub panel: PanelId,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ResetSession {
        ticket: PanelTicket,
        stack: Stack,
    },
    /// Reload the lane's file list. `settles` marks the last step of a bulk
    /// file operation for that lane.
    RefreshFiles {
        ticket: PanelTicket,
        stack: Stack,
        settles: bool,
    },
    ListFilesForIngest {
        ticket: PanelTicket,
        stack: Stack,
    },
    UploadFiles {
        ticket: PanelTicket,
        stack: Stack,
        files: Vec<UploadFile>,
    },
    ClearFiles {
        ticket: PanelTicket,
        stack: Stack,
    },
    AddConversation {
        ticket: PanelTicket,
        stack: Stack,
        text: String,
    },
    ClearConversation {
        ticket: PanelTicket,
        stack: Stack,
    },
    /// The lane selection changed; `query` is its shareable encoding.
    PersistSelection {
        query: String,
    },
}
