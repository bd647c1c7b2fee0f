use crate::rating::Rating;
use crate::{Activity, Message, PanelId, PanelState, Stack};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub activity: Activity,
    pub controls: ControlsView,
    pub panels: Vec<PanelView>,
    /// Shareable encoding of the lane selection.
    pub selection_query: String,
    pub dirty: bool,
}

/// Query box, file input and delete-files control share one state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControlsView {
    pub enabled: bool,
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub id: PanelId,
    pub stack: Option<Stack>,
    pub title: String,
    pub generation: u64,
    pub messages: Vec<Message>,
    pub files: Vec<String>,
    pub busy: bool,
    pub eligible: bool,
    pub rating: Option<Rating>,
}

impl PanelView {
    pub(crate) fn from_panel(id: PanelId, panel: &PanelState) -> Self {
        Self {
            id,
            stack: panel.stack(),
            title: panel
                .stack()
                .map_or("none", Stack::display_name)
                .to_string(),
            generation: panel.generation(),
            messages: panel.messages().to_vec(),
            files: panel.files().to_vec(),
            busy: panel.is_busy(),
            eligible: panel.is_eligible(),
            rating: panel.rating(),
        }
    }
}
