use crate::rating::{RatingBus, RatingEvent};
use crate::selection::encode_selection;
use crate::view_model::{AppViewModel, ControlsView, PanelView};
use crate::{PanelId, PanelState, PanelTicket, Stack, UploadFile};

pub const DEFAULT_WELCOME_MESSAGE: &str = "How can I help?";

/// What the shared controls are waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    Running,
    Ingesting,
    ClearingFiles,
    ClearingConversation,
}

impl Activity {
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            Activity::Idle => None,
            Activity::Running => Some("Running…"),
            Activity::Ingesting => Some("Ingesting files…"),
            Activity::ClearingFiles => Some("Deleting files…"),
            Activity::ClearingConversation => Some("Clearing conversation…"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    panels: Vec<PanelState>,
    activity: Activity,
    outstanding: usize,
    ingest_files: Vec<UploadFile>,
    welcome_message: String,
    ratings: RatingBus,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_welcome_message(DEFAULT_WELCOME_MESSAGE)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_welcome_message(welcome: impl Into<String>) -> Self {
        Self {
            panels: Vec::new(),
            activity: Activity::Idle,
            outstanding: 0,
            ingest_files: Vec::new(),
            welcome_message: welcome.into(),
            ratings: RatingBus::new(),
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let placeholder = self
            .activity
            .placeholder()
            .unwrap_or(self.welcome_message.as_str())
            .to_string();
        AppViewModel {
            activity: self.activity,
            controls: ControlsView {
                enabled: self.activity == Activity::Idle,
                placeholder,
            },
            panels: self
                .panels
                .iter()
                .enumerate()
                .map(|(id, panel)| PanelView::from_panel(id, panel))
                .collect(),
            selection_query: encode_selection(&self.selection()),
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn activity(&self) -> Activity {
        self.activity
    }

    pub fn panels(&self) -> &[PanelState] {
        &self.panels
    }

    pub fn panel(&self, id: PanelId) -> Option<&PanelState> {
        self.panels.get(id)
    }

    /// Current binding of every lane, in display order.
    pub fn selection(&self) -> Vec<Option<Stack>> {
        self.panels.iter().map(PanelState::stack).collect()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn reset_panels(&mut self, lanes: Vec<Option<Stack>>) {
        self.panels = lanes.into_iter().map(PanelState::new).collect();
        self.activity = Activity::Idle;
        self.outstanding = 0;
        self.ingest_files.clear();
    }

    pub(crate) fn panel_mut(&mut self, id: PanelId) -> Option<&mut PanelState> {
        self.panels.get_mut(id)
    }

    /// Returns the lane only when `ticket` still matches its binding.
    pub(crate) fn current_panel_mut(&mut self, ticket: PanelTicket) -> Option<&mut PanelState> {
        self.panels
            .get_mut(ticket.panel)
            .filter(|panel| panel.is_current(ticket.generation))
    }

    pub(crate) fn ticket(&self, id: PanelId) -> Option<(PanelTicket, Stack)> {
        let panel = self.panels.get(id)?;
        let stack = panel.stack()?;
        Some((
            PanelTicket {
                panel: id,
                generation: panel.generation(),
            },
            stack,
        ))
    }

    /// Bound lanes among `ids`, ready to be addressed.
    pub(crate) fn bound_tickets(
        &self,
        ids: impl IntoIterator<Item = PanelId>,
    ) -> Vec<(PanelTicket, Stack)> {
        ids.into_iter().filter_map(|id| self.ticket(id)).collect()
    }

    /// Bound lanes that take part in bulk file operations.
    pub(crate) fn eligible_tickets(&self) -> Vec<(PanelTicket, Stack)> {
        self.bound_tickets(
            self.panels
                .iter()
                .enumerate()
                .filter(|(_, panel)| panel.is_eligible())
                .map(|(id, _)| id),
        )
    }

    /// Enters a busy activity covering `tickets`. Controls flip once here.
    pub(crate) fn begin(&mut self, activity: Activity, tickets: &[(PanelTicket, Stack)]) {
        self.activity = activity;
        self.outstanding = tickets.len();
        for (ticket, _) in tickets {
            if let Some(panel) = self.panels.get_mut(ticket.panel) {
                panel.set_pending(true);
                panel.set_busy(true);
            }
        }
    }

    /// Marks one lane of the current activity as done. Controls flip back
    /// only when the last lane settles.
    pub(crate) fn settle(&mut self, id: PanelId) {
        let Some(panel) = self.panels.get_mut(id) else {
            return;
        };
        panel.set_busy(false);
        if !panel.is_pending() {
            return;
        }
        panel.set_pending(false);
        self.outstanding = self.outstanding.saturating_sub(1);
        if self.outstanding == 0 {
            self.activity = Activity::Idle;
            self.ingest_files.clear();
        }
    }

    pub(crate) fn set_ingest_files(&mut self, files: Vec<UploadFile>) {
        self.ingest_files = files;
    }

    pub(crate) fn ingest_files(&self) -> &[UploadFile] {
        &self.ingest_files
    }

    /// Publishes a rating change and delivers it to every other lane.
    pub(crate) fn broadcast_rating(&mut self, event: RatingEvent) {
        self.ratings.publish(event);
        let events: Vec<RatingEvent> = self.ratings.drain().collect();
        for event in events {
            for (id, panel) in self.panels.iter_mut().enumerate() {
                if id != event.source {
                    panel.on_sibling_rating(&event);
                }
            }
        }
    }
}
