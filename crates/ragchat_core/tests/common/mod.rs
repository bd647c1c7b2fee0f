#![allow(dead_code)]

use std::sync::Once;

use ragchat_core::{update, AppState, Effect, Msg, PanelTicket, Stack, UploadFile};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(chat_logging::initialize_for_tests);
}

pub fn started(lanes: &[Option<Stack>]) -> AppState {
    init_logging();
    let (mut state, _effects) = update(
        AppState::new(),
        Msg::Init {
            lanes: lanes.to_vec(),
        },
    );
    state.consume_dirty();
    state
}

pub fn ticket(panel: usize, generation: u64) -> PanelTicket {
    PanelTicket { panel, generation }
}

pub fn uploads(names: &[&str]) -> Vec<UploadFile> {
    names
        .iter()
        .map(|name| UploadFile::from_path(format!("/home/user/docs/{name}")))
        .collect()
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// Lanes addressed by `AddConversation` effects, in emission order.
pub fn conversation_targets(effects: &[Effect]) -> Vec<(usize, String)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::AddConversation { ticket, text, .. } => Some((ticket.panel, text.clone())),
            _ => None,
        })
        .collect()
}
