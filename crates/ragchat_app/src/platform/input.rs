//! Line-oriented input: plain text is a query, `/`-commands drive the
//! lane controls.

use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use ragchat_core::{parse_lane_binding, Msg, Stack, UploadFile};

use super::app::AppEvent;

pub const HELP: &str = "\
Type a question to ask every bound lane. Prefix with `<` for the first lane only, `>` for the last.
/upload <path>...    ingest files into every checked lane
/clear-files         delete the files of every checked lane
/clear               restart the conversation in every bound lane
/stack <lane> <id>   bind a lane (1-based) to a stack, or `none`
/eligible <lane>     toggle whether a lane takes part in file operations
/rate <lane>         toggle the lane's thumbs up/down
/stacks              list the available stacks
/quit                leave";

/// Turns one input line into the event it stands for.
pub fn parse_line(line: &str) -> AppEvent {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        if trimmed.is_empty() {
            return AppEvent::Msg(Msg::NoOp);
        }
        return AppEvent::Msg(Msg::QuerySubmitted(line.to_string()));
    };

    let mut words = command.split_whitespace();
    let name = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();
    match (name, args.as_slice()) {
        ("upload", []) => AppEvent::Notice("usage: /upload <path>...".to_string()),
        ("upload", paths) => AppEvent::Msg(Msg::FilesSelected(
            paths.iter().map(|path| UploadFile::from_path(*path)).collect(),
        )),
        ("clear-files", []) => AppEvent::Msg(Msg::ClearFilesClicked),
        ("clear", []) => AppEvent::Msg(Msg::ClearConversationClicked),
        ("stack", [lane, id]) => match (parse_lane(lane), parse_lane_binding(id)) {
            (Ok(panel), Ok(stack)) => AppEvent::Msg(Msg::StackSelected { panel, stack }),
            (Err(notice), _) => AppEvent::Notice(notice),
            (_, Err(err)) => AppEvent::Notice(format!("{err} (try /stacks)")),
        },
        ("eligible", [lane]) => lane_event(lane, |panel| Msg::EligibilityToggled { panel }),
        ("rate", [lane]) => lane_event(lane, |panel| Msg::RatingClicked { panel }),
        ("stacks", []) => AppEvent::Notice(stack_listing()),
        ("help", _) => AppEvent::Notice(HELP.to_string()),
        ("quit" | "exit", _) => AppEvent::Quit,
        _ => AppEvent::Notice(format!("unknown command `/{command}`, try /help")),
    }
}

/// Whether `msg` starts one of the operations that need idle controls.
pub fn needs_idle_controls(msg: &Msg) -> bool {
    matches!(
        msg,
        Msg::QuerySubmitted(_)
            | Msg::FilesSelected(_)
            | Msg::ClearFilesClicked
            | Msg::ClearConversationClicked
    )
}

/// Reads stdin on its own thread; end of input quits.
pub fn spawn_stdin_reader(events: mpsc::Sender<AppEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("ragchat-input".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if events.send(parse_line(&line)).is_err() {
                    return;
                }
            }
            let _ = events.send(AppEvent::Quit);
        })?;
    Ok(())
}

fn lane_event(lane: &str, make: impl FnOnce(usize) -> Msg) -> AppEvent {
    match parse_lane(lane) {
        Ok(panel) => AppEvent::Msg(make(panel)),
        Err(notice) => AppEvent::Notice(notice),
    }
}

fn parse_lane(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(number) if number >= 1 => Ok(number - 1),
        _ => Err(format!("`{raw}` is not a lane number (lanes start at 1)")),
    }
}

fn stack_listing() -> String {
    Stack::ALL
        .iter()
        .map(|stack| format!("{:<22} {}", stack.as_str(), stack.display_name()))
        .collect::<Vec<_>>()
        .join("\n")
}
