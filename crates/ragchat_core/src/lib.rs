//! RagChat core: pure coordinator state machine and view-model helpers.
mod answer;
mod effect;
mod ingest;
pub mod markdown;
mod msg;
mod panel;
pub mod rating;
mod routing;
pub mod selection;
mod stack;
mod state;
mod update;
mod view_model;

pub use answer::{dedupe_citations, Answer};
pub use effect::{Effect, PanelTicket};
pub use ingest::{diff_new_files, IngestDiff, UploadFile};
pub use msg::{Msg, Outcome};
pub use panel::{
    Message, MessageKind, PanelId, PanelState, ANSWERABILITY_SENDER, ATTRIBUTION_SENDER,
    BLOCK_DIVIDER, SYSTEM_SENDER, USER_SENDER,
};
pub use rating::{Rating, RatingEvent};
pub use routing::{route_query, QueryTarget, RoutedQuery};
pub use stack::{parse_lane_binding, Stack, UnknownStack};
pub use state::{Activity, AppState, DEFAULT_WELCOME_MESSAGE};
pub use update::update;
pub use view_model::{AppViewModel, ControlsView, PanelView};
