mod common;

use common::{started, strings, ticket};
use pretty_assertions::assert_eq;
use ragchat_core::{update, Activity, Answer, AppState, Effect, Msg, Rating, Stack};

#[test]
fn init_opens_a_session_per_bound_lane() {
    common::init_logging();
    let (mut state, effects) = update(
        AppState::new(),
        Msg::Init {
            lanes: vec![Some(Stack::OpenAi), None, Some(Stack::WindowGoogle)],
        },
    );

    assert!(state.consume_dirty());
    assert_eq!(
        effects,
        vec![
            Effect::ResetSession {
                ticket: ticket(0, 0),
                stack: Stack::OpenAi
            },
            Effect::ResetSession {
                ticket: ticket(2, 0),
                stack: Stack::WindowGoogle
            },
        ]
    );
    assert_eq!(state.view().panels[1].title, "none");
    assert_eq!(state.view().panels[2].title, "Windowed markdown + Google AQA");

    let (state, effects) = update(
        state,
        Msg::SessionReset {
            ticket: ticket(2, 0),
            result: Ok(()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::RefreshFiles {
            ticket: ticket(2, 0),
            stack: Stack::WindowGoogle,
            settles: false,
        }]
    );

    let (state, effects) = update(
        state,
        Msg::SessionReset {
            ticket: ticket(0, 0),
            result: Err("no such stack".into()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.panel(0).unwrap().messages()[0].body, "no such stack");
}

#[test]
fn reassignment_clears_lane_before_new_requests() {
    let state = started(&[Some(Stack::OpenAi), None]);
    let (state, _) = update(state, Msg::QuerySubmitted("hello".into()));
    let (state, _) = update(
        state,
        Msg::ConversationAnswered {
            ticket: ticket(0, 0),
            result: Ok(vec![Answer::text("hi")]),
        },
    );
    let (state, _) = update(
        state,
        Msg::FileListLoaded {
            ticket: ticket(0, 0),
            settles: false,
            result: Ok(strings(&["a.txt"])),
        },
    );

    let (state, effects) = update(
        state,
        Msg::StackSelected {
            panel: 0,
            stack: Some(Stack::Google),
        },
    );

    let lane = state.panel(0).unwrap();
    assert!(lane.messages().is_empty());
    assert!(lane.files().is_empty());
    assert_eq!(lane.generation(), 1);
    assert_eq!(
        effects,
        vec![
            Effect::ResetSession {
                ticket: ticket(0, 1),
                stack: Stack::Google
            },
            Effect::PersistSelection {
                query: "stack=google&stack=none".into()
            },
        ]
    );
    assert_eq!(state.view().selection_query, "stack=google&stack=none");
}

#[test]
fn unbinding_a_lane_only_persists_the_selection() {
    let state = started(&[Some(Stack::OpenAi)]);
    let (state, effects) = update(
        state,
        Msg::StackSelected {
            panel: 0,
            stack: None,
        },
    );
    assert_eq!(
        effects,
        vec![Effect::PersistSelection {
            query: "stack=none".into()
        }]
    );
    assert_eq!(state.selection(), vec![None]);
}

#[test]
fn reselecting_the_same_stack_changes_nothing() {
    let state = started(&[Some(Stack::OpenAi)]);
    let (mut state, effects) = update(
        state,
        Msg::StackSelected {
            panel: 0,
            stack: Some(Stack::OpenAi),
        },
    );
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn late_answers_from_a_previous_binding_are_dropped() {
    let state = started(&[Some(Stack::OpenAi), Some(Stack::Google)]);
    let (state, _) = update(state, Msg::QuerySubmitted("q".into()));

    let (state, _) = update(
        state,
        Msg::StackSelected {
            panel: 0,
            stack: Some(Stack::HydeGpt4),
        },
    );
    // Lane 1 is still in flight.
    assert_eq!(state.activity(), Activity::Running);
    assert!(!state.panel(0).unwrap().is_busy());

    let (state, _) = update(
        state,
        Msg::ConversationAnswered {
            ticket: ticket(0, 0),
            result: Ok(vec![Answer::text("stale")]),
        },
    );
    assert!(state.panel(0).unwrap().messages().is_empty());
    assert_eq!(state.activity(), Activity::Running);

    let (state, _) = update(
        state,
        Msg::ConversationAnswered {
            ticket: ticket(1, 0),
            result: Ok(vec![Answer::text("fresh")]),
        },
    );
    assert_eq!(state.activity(), Activity::Idle);
    assert_eq!(state.panel(1).unwrap().messages().len(), 2);
}

#[test]
fn late_file_list_from_a_previous_binding_is_dropped() {
    let state = started(&[Some(Stack::OpenAi)]);
    let (state, _) = update(
        state,
        Msg::StackSelected {
            panel: 0,
            stack: Some(Stack::Google),
        },
    );
    let (state, _) = update(
        state,
        Msg::FileListLoaded {
            ticket: ticket(0, 0),
            settles: false,
            result: Ok(strings(&["openai-only.txt"])),
        },
    );
    assert!(state.panel(0).unwrap().files().is_empty());
}

#[test]
fn thumbs_up_forces_siblings_down() {
    let state = started(&[Some(Stack::OpenAi), Some(Stack::Google), Some(Stack::HydeGpt4)]);

    let (state, _) = update(state, Msg::RatingClicked { panel: 0 });
    let ratings: Vec<_> = state.view().panels.iter().map(|p| p.rating).collect();
    assert_eq!(
        ratings,
        vec![Some(Rating::Up), Some(Rating::Down), Some(Rating::Down)]
    );

    let (state, _) = update(state, Msg::RatingClicked { panel: 2 });
    let ratings: Vec<_> = state.view().panels.iter().map(|p| p.rating).collect();
    assert_eq!(
        ratings,
        vec![Some(Rating::Down), Some(Rating::Down), Some(Rating::Up)]
    );

    // Turning a thumb down leaves the siblings alone.
    let (state, _) = update(state, Msg::RatingClicked { panel: 2 });
    let ratings: Vec<_> = state.view().panels.iter().map(|p| p.rating).collect();
    assert_eq!(
        ratings,
        vec![Some(Rating::Down), Some(Rating::Down), Some(Rating::Down)]
    );
}

#[test]
fn unbound_lanes_cannot_be_rated() {
    let state = started(&[None, Some(Stack::Google)]);
    let (mut state, _) = update(state, Msg::RatingClicked { panel: 0 });
    assert!(!state.consume_dirty());
    assert_eq!(state.panel(1).unwrap().rating(), None);
}
