use chat_logging::{chat_debug, chat_info, chat_warn};

use crate::answer::Answer;
use crate::ingest::{diff_new_files, UploadFile};
use crate::msg::Outcome;
use crate::rating::RatingEvent;
use crate::routing::route_query;
use crate::selection::encode_selection;
use crate::{Activity, AppState, Effect, Msg, PanelId, PanelTicket, Stack};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Init { lanes } => {
            state.reset_panels(lanes);
            state.mark_dirty();
            state
                .bound_tickets(0..state.panels().len())
                .into_iter()
                .map(|(ticket, stack)| Effect::ResetSession { ticket, stack })
                .collect()
        }
        Msg::QuerySubmitted(raw) => submit_query(&mut state, &raw),
        Msg::ConversationAnswered { ticket, result } => {
            apply_answers(&mut state, ticket, result);
            Vec::new()
        }
        Msg::StackSelected { panel, stack } => select_stack(&mut state, panel, stack),
        Msg::SessionReset { ticket, result } => {
            let Some((panel, stack)) = current(&mut state, ticket) else {
                return (state, Vec::new());
            };
            state.mark_dirty();
            match result {
                Ok(()) => {
                    chat_debug!("Session reset for lane {} ({})", ticket.panel, stack);
                    vec![Effect::RefreshFiles {
                        ticket,
                        stack,
                        settles: false,
                    }]
                }
                Err(message) => {
                    if let Some(lane) = state.panel_mut(panel) {
                        lane.append_system_message(message);
                    }
                    Vec::new()
                }
            }
        }
        Msg::FilesSelected(files) => start_ingest(&mut state, files),
        Msg::IngestListing { ticket, result } => continue_ingest(&mut state, ticket, result),
        Msg::FilesUploaded { ticket, result } | Msg::FilesCleared { ticket, result } => {
            let Some((panel, stack)) = current(&mut state, ticket) else {
                return (state, Vec::new());
            };
            if let (Err(message), Some(lane)) = (result, state.panel_mut(panel)) {
                lane.append_system_message(message);
            }
            state.mark_dirty();
            vec![Effect::RefreshFiles {
                ticket,
                stack,
                settles: true,
            }]
        }
        Msg::FileListLoaded {
            ticket,
            settles,
            result,
        } => {
            let Some(lane) = state.current_panel_mut(ticket) else {
                chat_debug!("Dropping file list for superseded lane {}", ticket.panel);
                return (state, Vec::new());
            };
            match result {
                Ok(names) => lane.replace_file_list(names),
                Err(message) => lane.append_system_message(message),
            }
            if settles {
                state.settle(ticket.panel);
            }
            state.mark_dirty();
            Vec::new()
        }
        Msg::ClearFilesClicked => {
            let tickets = claim(&mut state, Activity::ClearingFiles, |state| {
                state.eligible_tickets()
            });
            tickets
                .into_iter()
                .map(|(ticket, stack)| Effect::ClearFiles { ticket, stack })
                .collect()
        }
        Msg::ClearConversationClicked => {
            let tickets = claim(&mut state, Activity::ClearingConversation, |state| {
                state.bound_tickets(0..state.panels().len())
            });
            for (ticket, _) in &tickets {
                if let Some(lane) = state.panel_mut(ticket.panel) {
                    lane.clear_messages();
                }
            }
            tickets
                .into_iter()
                .map(|(ticket, stack)| Effect::ClearConversation { ticket, stack })
                .collect()
        }
        Msg::ConversationCleared { ticket, result } => {
            let Some(lane) = state.current_panel_mut(ticket) else {
                return (state, Vec::new());
            };
            if let Err(message) = result {
                lane.append_system_message(message);
            }
            state.settle(ticket.panel);
            state.mark_dirty();
            Vec::new()
        }
        Msg::EligibilityToggled { panel } => {
            if let Some(lane) = state.panel_mut(panel) {
                lane.toggle_eligible();
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RatingClicked { panel } => {
            let rating = state
                .panel_mut(panel)
                .filter(|lane| lane.stack().is_some())
                .map(|lane| lane.toggle_rating());
            if let Some(rating) = rating {
                state.broadcast_rating(RatingEvent {
                    source: panel,
                    rating,
                });
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// Resolves a reply ticket to its lane and stack, or `None` when the lane has
/// been rebound since the request went out.
fn current(state: &mut AppState, ticket: PanelTicket) -> Option<(PanelId, Stack)> {
    let stack = state.current_panel_mut(ticket)?.stack();
    if stack.is_none() {
        chat_debug!("Dropping reply for unbound lane {}", ticket.panel);
    }
    stack.map(|stack| (ticket.panel, stack))
}

/// Starts a bulk operation over the lanes `select` picks, if the controls are
/// free and at least one lane qualifies.
fn claim(
    state: &mut AppState,
    activity: Activity,
    select: impl FnOnce(&AppState) -> Vec<(PanelTicket, Stack)>,
) -> Vec<(PanelTicket, Stack)> {
    if state.activity() != Activity::Idle {
        chat_debug!("Ignoring {:?} request while {:?}", activity, state.activity());
        return Vec::new();
    }
    let tickets = select(&*state);
    if tickets.is_empty() {
        chat_info!("No lane qualifies for {:?}", activity);
        return Vec::new();
    }
    state.begin(activity, &tickets);
    state.mark_dirty();
    tickets
}

fn submit_query(state: &mut AppState, raw: &str) -> Vec<Effect> {
    let routed = route_query(raw);
    if routed.text.is_empty() {
        return Vec::new();
    }
    let lanes = routed.target.lanes(state.panels().len());
    let tickets = claim(state, Activity::Running, |state| state.bound_tickets(lanes));
    if tickets.is_empty() {
        return Vec::new();
    }
    chat_info!(
        "Query to {} lane(s): {}",
        tickets.len(),
        chat_logging::excerpt(&routed.text, 80)
    );

    let mut effects = Vec::with_capacity(tickets.len());
    for (ticket, stack) in tickets {
        if let Some(lane) = state.panel_mut(ticket.panel) {
            lane.append_user_message(routed.text.clone());
        }
        effects.push(Effect::AddConversation {
            ticket,
            stack,
            text: routed.text.clone(),
        });
    }
    effects
}

fn apply_answers(state: &mut AppState, ticket: PanelTicket, result: Outcome<Vec<Answer>>) {
    let Some(lane) = state.current_panel_mut(ticket) else {
        chat_debug!("Dropping answers for superseded lane {}", ticket.panel);
        return;
    };
    match (result, lane.stack()) {
        (Ok(answers), Some(stack)) => {
            for answer in answers {
                let attribution = answer.attribution();
                lane.append_assistant_message(stack.display_name(), answer.answer);
                if let Some(citations) = attribution {
                    lane.append_attribution(citations);
                }
                if let Some(score) = answer.score {
                    lane.append_answerability(score);
                }
            }
        }
        (Ok(_), None) => {}
        (Err(message), _) => {
            chat_warn!("Lane {} query failed: {}", ticket.panel, message);
            lane.append_system_message(message);
        }
    }
    state.settle(ticket.panel);
    state.mark_dirty();
}

fn select_stack(state: &mut AppState, panel: PanelId, stack: Option<Stack>) -> Vec<Effect> {
    let Some(previous) = state.panel(panel).map(|lane| lane.stack()) else {
        chat_warn!("Stack selected for unknown lane {}", panel);
        return Vec::new();
    };
    if previous == stack {
        return Vec::new();
    }

    // A lane taking part in a bulk operation counts as finished once rebound.
    state.settle(panel);
    if let Some(lane) = state.panel_mut(panel) {
        lane.rebind(stack);
    }
    state.mark_dirty();
    chat_info!(
        "Lane {} rebound: {} -> {}",
        panel,
        previous.map_or("none", Stack::as_str),
        stack.map_or("none", Stack::as_str)
    );

    let mut effects = Vec::with_capacity(2);
    if let Some((ticket, stack)) = state.ticket(panel) {
        effects.push(Effect::ResetSession { ticket, stack });
    }
    effects.push(Effect::PersistSelection {
        query: encode_selection(&state.selection()),
    });
    effects
}

fn start_ingest(state: &mut AppState, files: Vec<UploadFile>) -> Vec<Effect> {
    if files.is_empty() {
        return Vec::new();
    }
    let tickets = claim(state, Activity::Ingesting, AppState::eligible_tickets);
    if tickets.is_empty() {
        return Vec::new();
    }
    state.set_ingest_files(files);
    tickets
        .into_iter()
        .map(|(ticket, stack)| Effect::ListFilesForIngest { ticket, stack })
        .collect()
}

fn continue_ingest(
    state: &mut AppState,
    ticket: PanelTicket,
    result: Outcome<Vec<String>>,
) -> Vec<Effect> {
    let requested = state.ingest_files().to_vec();
    let Some((panel, stack)) = current(state, ticket) else {
        return Vec::new();
    };
    let Some(lane) = state.panel_mut(panel) else {
        return Vec::new();
    };

    let effect = match result {
        Ok(existing) => {
            let diff = diff_new_files(&requested, &existing);
            if !diff.skipped.is_empty() {
                chat_warn!(
                    "Lane {} ({}) already has {:?}; not uploading them again",
                    panel,
                    stack,
                    diff.skipped
                );
                let notices: Vec<String> = diff
                    .skipped
                    .iter()
                    .map(|name| format!("`{name}` is already ingested, skipping it."))
                    .collect();
                lane.append_system_messages(&notices);
            }
            if diff.upload.is_empty() {
                Effect::RefreshFiles {
                    ticket,
                    stack,
                    settles: true,
                }
            } else {
                Effect::UploadFiles {
                    ticket,
                    stack,
                    files: diff.upload,
                }
            }
        }
        Err(message) => {
            lane.append_system_message(message);
            Effect::RefreshFiles {
                ticket,
                stack,
                settles: true,
            }
        }
    };
    state.mark_dirty();
    vec![effect]
}
