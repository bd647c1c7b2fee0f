mod common;

use common::{started, strings, ticket, uploads};
use pretty_assertions::assert_eq;
use ragchat_core::{update, Activity, Effect, MessageKind, Msg, Stack};

#[test]
fn only_new_files_are_uploaded_and_list_refreshed_once() {
    let state = started(&[Some(Stack::OpenAi)]);

    let (state, effects) = update(state, Msg::FilesSelected(uploads(&["a.txt", "b.txt"])));
    assert_eq!(
        effects,
        vec![Effect::ListFilesForIngest {
            ticket: ticket(0, 0),
            stack: Stack::OpenAi
        }]
    );
    let view = state.view();
    assert_eq!(view.activity, Activity::Ingesting);
    assert_eq!(view.controls.placeholder, "Ingesting files…");
    assert!(!view.controls.enabled);

    let (state, effects) = update(
        state,
        Msg::IngestListing {
            ticket: ticket(0, 0),
            result: Ok(strings(&["a.txt"])),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::UploadFiles {
            ticket: ticket(0, 0),
            stack: Stack::OpenAi,
            files: uploads(&["b.txt"]),
        }]
    );
    let notice = state.panel(0).unwrap().messages().last().unwrap().clone();
    assert_eq!(notice.kind, MessageKind::System);
    assert!(notice.body.contains("a.txt"));

    let (state, effects) = update(
        state,
        Msg::FilesUploaded {
            ticket: ticket(0, 0),
            result: Ok(()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::RefreshFiles {
            ticket: ticket(0, 0),
            stack: Stack::OpenAi,
            settles: true,
        }]
    );
    assert_eq!(state.activity(), Activity::Ingesting);

    let (state, effects) = update(
        state,
        Msg::FileListLoaded {
            ticket: ticket(0, 0),
            settles: true,
            result: Ok(strings(&["b.txt", "a.txt", "C.md"])),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.activity(), Activity::Idle);
    assert_eq!(state.panel(0).unwrap().files(), ["a.txt", "b.txt", "C.md"]);
}

#[test]
fn nothing_new_skips_the_upload() {
    let state = started(&[Some(Stack::Google)]);
    let (state, _) = update(state, Msg::FilesSelected(uploads(&["a.txt"])));

    let (_state, effects) = update(
        state,
        Msg::IngestListing {
            ticket: ticket(0, 0),
            result: Ok(strings(&["a.txt"])),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::RefreshFiles {
            ticket: ticket(0, 0),
            stack: Stack::Google,
            settles: true,
        }]
    );
}

#[test]
fn ineligible_and_unbound_lanes_are_left_out_of_ingestion() {
    let state = started(&[Some(Stack::OpenAi), None, Some(Stack::Google)]);
    let (state, _) = update(state, Msg::EligibilityToggled { panel: 2 });
    assert!(!state.view().panels[2].eligible);

    let (state, effects) = update(state, Msg::FilesSelected(uploads(&["x.pdf"])));

    assert_eq!(
        effects,
        vec![Effect::ListFilesForIngest {
            ticket: ticket(0, 0),
            stack: Stack::OpenAi
        }]
    );
    assert!(!state.panel(2).unwrap().is_busy());
}

#[test]
fn failed_listing_still_refreshes() {
    let state = started(&[Some(Stack::Google)]);
    let (state, _) = update(state, Msg::FilesSelected(uploads(&["a.txt"])));

    let (state, effects) = update(
        state,
        Msg::IngestListing {
            ticket: ticket(0, 0),
            result: Err("storage offline".into()),
        },
    );

    assert!(matches!(
        effects.as_slice(),
        [Effect::RefreshFiles { settles: true, .. }]
    ));
    assert_eq!(
        state.panel(0).unwrap().messages().last().unwrap().body,
        "storage offline"
    );
}

#[test]
fn failed_upload_is_reported_and_list_refreshed() {
    let state = started(&[Some(Stack::Google)]);
    let (state, _) = update(state, Msg::FilesSelected(uploads(&["a.txt"])));
    let (state, _) = update(
        state,
        Msg::IngestListing {
            ticket: ticket(0, 0),
            result: Ok(Vec::new()),
        },
    );

    let (state, effects) = update(
        state,
        Msg::FilesUploaded {
            ticket: ticket(0, 0),
            result: Err("file too large".into()),
        },
    );

    assert!(matches!(
        effects.as_slice(),
        [Effect::RefreshFiles { settles: true, .. }]
    ));
    assert_eq!(
        state.panel(0).unwrap().messages().last().unwrap().body,
        "file too large"
    );
}

#[test]
fn clearing_files_disables_controls_until_lists_reload() {
    let state = started(&[Some(Stack::OpenAi), Some(Stack::Google)]);

    let (state, effects) = update(state, Msg::ClearFilesClicked);
    assert_eq!(
        effects,
        vec![
            Effect::ClearFiles {
                ticket: ticket(0, 0),
                stack: Stack::OpenAi
            },
            Effect::ClearFiles {
                ticket: ticket(1, 0),
                stack: Stack::Google
            },
        ]
    );
    assert_eq!(state.view().controls.placeholder, "Deleting files…");

    let (state, effects) = update(
        state,
        Msg::FilesCleared {
            ticket: ticket(0, 0),
            result: Ok(()),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::RefreshFiles {
            ticket: ticket(0, 0),
            stack: Stack::OpenAi,
            settles: true,
        }]
    );

    let (state, _) = update(
        state,
        Msg::FileListLoaded {
            ticket: ticket(0, 0),
            settles: true,
            result: Ok(Vec::new()),
        },
    );
    assert_eq!(state.activity(), Activity::ClearingFiles);

    let (state, _) = update(
        state,
        Msg::FilesCleared {
            ticket: ticket(1, 0),
            result: Ok(()),
        },
    );
    let (state, _) = update(
        state,
        Msg::FileListLoaded {
            ticket: ticket(1, 0),
            settles: true,
            result: Ok(Vec::new()),
        },
    );
    assert_eq!(state.activity(), Activity::Idle);
}

#[test]
fn non_settling_refresh_does_not_end_a_bulk_operation() {
    let state = started(&[Some(Stack::OpenAi)]);
    let (state, _) = update(state, Msg::FilesSelected(uploads(&["a.txt"])));

    // Startup refresh landing late.
    let (state, _) = update(
        state,
        Msg::FileListLoaded {
            ticket: ticket(0, 0),
            settles: false,
            result: Ok(strings(&["old.txt"])),
        },
    );

    assert_eq!(state.activity(), Activity::Ingesting);
    assert_eq!(state.panel(0).unwrap().files(), ["old.txt"]);
}
