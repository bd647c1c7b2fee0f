use crate::{Answer, PanelId, PanelTicket, Stack, UploadFile};

/// Backend failures reach the core as display text.
pub type Outcome<T> = Result<T, String>;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Startup: bind each lane (in display order) and open its sessions.
    Init { lanes: Vec<Option<Stack>> },
    /// User submitted a query, possibly carrying a `<`/`>` routing prefix.
    QuerySubmitted(String),
    ConversationAnswered {
        ticket: PanelTicket,
        result: Outcome<Vec<Answer>>,
    },
    /// User picked another stack (or none) for a lane.
    StackSelected {
        panel: PanelId,
        stack: Option<Stack>,
    },
    SessionReset {
        ticket: PanelTicket,
        result: Outcome<()>,
    },
    /// User chose files to ingest into every eligible lane.
    FilesSelected(Vec<UploadFile>),
    /// Backend file list fetched ahead of an upload.
    IngestListing {
        ticket: PanelTicket,
        result: Outcome<Vec<String>>,
    },
    FilesUploaded {
        ticket: PanelTicket,
        result: Outcome<()>,
    },
    FileListLoaded {
        ticket: PanelTicket,
        settles: bool,
        result: Outcome<Vec<String>>,
    },
    /// User asked to delete the files of every eligible lane.
    ClearFilesClicked,
    FilesCleared {
        ticket: PanelTicket,
        result: Outcome<()>,
    },
    /// User asked to restart the conversation in every bound lane.
    ClearConversationClicked,
    ConversationCleared {
        ticket: PanelTicket,
        result: Outcome<()>,
    },
    /// User flipped a lane's bulk file operation checkbox.
    EligibilityToggled { panel: PanelId },
    /// User clicked a lane's rating thumb.
    RatingClicked { panel: PanelId },
    /// Input that changes nothing, such as an empty line.
    NoOp,
}
