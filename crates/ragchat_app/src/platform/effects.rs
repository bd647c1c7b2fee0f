use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use chat_logging::{chat_debug, chat_info, chat_warn};
use ragchat_core::selection::location_with_query;
use ragchat_core::{Answer, Effect, Msg, Outcome, PanelTicket, Stack, UploadFile};
use ragchat_engine::{
    BackendClient, BackendError, BackendReply, BackendRequest, EngineEvent, EngineHandle,
};

use super::app::AppEvent;

/// Which message a backend reply turns into once it comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyRoute {
    SessionReset(PanelTicket),
    FileList { ticket: PanelTicket, settles: bool },
    IngestListing(PanelTicket),
    FilesUploaded(PanelTicket),
    FilesCleared(PanelTicket),
    Conversation(PanelTicket),
    ConversationCleared(PanelTicket),
}

pub struct EffectRunner {
    engine: EngineHandle<ReplyRoute>,
    page_url: String,
    events: mpsc::Sender<AppEvent>,
}

impl EffectRunner {
    pub fn new(
        client: Arc<dyn BackendClient>,
        page_url: impl Into<String>,
        events: mpsc::Sender<AppEvent>,
    ) -> io::Result<Self> {
        let (reply_tx, reply_rx) = mpsc::channel();
        let engine = EngineHandle::new(client, reply_tx)?;
        spawn_reply_pump(reply_rx, events.clone())?;
        Ok(Self {
            engine,
            page_url: page_url.into(),
            events,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ResetSession { ticket, stack } => {
                    self.submit(ReplyRoute::SessionReset(ticket), stack, BackendRequest::Reset);
                }
                Effect::RefreshFiles {
                    ticket,
                    stack,
                    settles,
                } => {
                    self.submit(
                        ReplyRoute::FileList { ticket, settles },
                        stack,
                        BackendRequest::ListFiles,
                    );
                }
                Effect::ListFilesForIngest { ticket, stack } => {
                    self.submit(
                        ReplyRoute::IngestListing(ticket),
                        stack,
                        BackendRequest::ListFiles,
                    );
                }
                Effect::UploadFiles {
                    ticket,
                    stack,
                    files,
                } => {
                    chat_info!("Uploading {} file(s) to {}", files.len(), stack);
                    let files = files.into_iter().map(to_engine_file).collect();
                    self.submit(
                        ReplyRoute::FilesUploaded(ticket),
                        stack,
                        BackendRequest::AddFiles(files),
                    );
                }
                Effect::ClearFiles { ticket, stack } => {
                    self.submit(
                        ReplyRoute::FilesCleared(ticket),
                        stack,
                        BackendRequest::ClearFiles,
                    );
                }
                Effect::AddConversation {
                    ticket,
                    stack,
                    text,
                } => {
                    self.submit(
                        ReplyRoute::Conversation(ticket),
                        stack,
                        BackendRequest::AddConversation(text),
                    );
                }
                Effect::ClearConversation { ticket, stack } => {
                    self.submit(
                        ReplyRoute::ConversationCleared(ticket),
                        stack,
                        BackendRequest::ClearConversation,
                    );
                }
                Effect::PersistSelection { query } => {
                    let _ = self.events.send(share_location(&self.page_url, &query));
                }
            }
        }
    }

    fn submit(&self, route: ReplyRoute, stack: Stack, request: BackendRequest) {
        self.engine.submit(route, stack.as_str(), request);
    }
}

fn share_location(page_url: &str, query: &str) -> AppEvent {
    match location_with_query(page_url, query) {
        Ok(location) => AppEvent::Location(location),
        Err(err) => {
            chat_warn!("Cannot build location from {:?}: {}", page_url, err);
            AppEvent::Location(format!("?{query}"))
        }
    }
}

fn spawn_reply_pump(
    replies: mpsc::Receiver<EngineEvent<ReplyRoute>>,
    events: mpsc::Sender<AppEvent>,
) -> io::Result<()> {
    thread::Builder::new()
        .name("ragchat-replies".to_string())
        .spawn(move || {
            while let Ok(event) = replies.recv() {
                chat_debug!("Reply from {} for {:?}", event.stack, event.tag);
                let msg = reply_to_msg(event.tag, event.result);
                if events.send(AppEvent::Msg(msg)).is_err() {
                    break;
                }
            }
        })?;
    Ok(())
}

pub(crate) fn reply_to_msg(route: ReplyRoute, result: Result<BackendReply, BackendError>) -> Msg {
    match route {
        ReplyRoute::SessionReset(ticket) => Msg::SessionReset {
            ticket,
            result: expect_done(result),
        },
        ReplyRoute::FileList { ticket, settles } => Msg::FileListLoaded {
            ticket,
            settles,
            result: expect_files(result),
        },
        ReplyRoute::IngestListing(ticket) => Msg::IngestListing {
            ticket,
            result: expect_files(result),
        },
        ReplyRoute::FilesUploaded(ticket) => Msg::FilesUploaded {
            ticket,
            result: expect_done(result),
        },
        ReplyRoute::FilesCleared(ticket) => Msg::FilesCleared {
            ticket,
            result: expect_done(result),
        },
        ReplyRoute::Conversation(ticket) => Msg::ConversationAnswered {
            ticket,
            result: expect_answers(result),
        },
        ReplyRoute::ConversationCleared(ticket) => Msg::ConversationCleared {
            ticket,
            result: expect_done(result),
        },
    }
}

fn expect_done(result: Result<BackendReply, BackendError>) -> Outcome<()> {
    match result.map_err(|err| err.to_string())? {
        BackendReply::Done => Ok(()),
        other => Err(mismatch(&other)),
    }
}

fn expect_files(result: Result<BackendReply, BackendError>) -> Outcome<Vec<String>> {
    match result.map_err(|err| err.to_string())? {
        BackendReply::Files(files) => Ok(files),
        other => Err(mismatch(&other)),
    }
}

fn expect_answers(result: Result<BackendReply, BackendError>) -> Outcome<Vec<Answer>> {
    match result.map_err(|err| err.to_string())? {
        BackendReply::Answers(answers) => Ok(answers.into_iter().map(to_core_answer).collect()),
        other => Err(mismatch(&other)),
    }
}

fn mismatch(reply: &BackendReply) -> String {
    format!("unexpected reply from backend: {reply:?}")
}

fn to_core_answer(answer: ragchat_engine::Answer) -> Answer {
    Answer {
        answer: answer.answer,
        citations: answer.citations,
        score: answer.score,
    }
}

fn to_engine_file(file: UploadFile) -> ragchat_engine::UploadFile {
    ragchat_engine::UploadFile {
        name: file.name,
        path: file.path,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ticket() -> PanelTicket {
        PanelTicket {
            panel: 1,
            generation: 4,
        }
    }

    #[test]
    fn answers_keep_citations_and_scores() {
        let reply = BackendReply::Answers(vec![ragchat_engine::Answer {
            answer: "Paris".into(),
            citations: Some(vec!["atlas.pdf".into()]),
            score: Some(0.93),
        }]);

        let msg = reply_to_msg(ReplyRoute::Conversation(ticket()), Ok(reply));

        assert_eq!(
            msg,
            Msg::ConversationAnswered {
                ticket: ticket(),
                result: Ok(vec![Answer {
                    answer: "Paris".into(),
                    citations: Some(vec!["atlas.pdf".into()]),
                    score: Some(0.93),
                }]),
            }
        );
    }

    #[test]
    fn backend_errors_become_their_message() {
        let err = BackendError::Status {
            status: 500,
            message: "index is rebuilding".into(),
        };

        let msg = reply_to_msg(ReplyRoute::FilesCleared(ticket()), Err(err));

        assert_eq!(
            msg,
            Msg::FilesCleared {
                ticket: ticket(),
                result: Err("index is rebuilding".into()),
            }
        );
    }

    #[test]
    fn file_list_route_carries_settle_flag() {
        let route = ReplyRoute::FileList {
            ticket: ticket(),
            settles: true,
        };
        let msg = reply_to_msg(route, Ok(BackendReply::Files(vec!["a.txt".into()])));
        assert_eq!(
            msg,
            Msg::FileListLoaded {
                ticket: ticket(),
                settles: true,
                result: Ok(vec!["a.txt".into()]),
            }
        );
    }

    #[test]
    fn mismatched_reply_is_reported_as_failure() {
        let msg = reply_to_msg(ReplyRoute::SessionReset(ticket()), Ok(BackendReply::Files(vec![])));
        match msg {
            Msg::SessionReset { result: Err(text), .. } => {
                assert!(text.starts_with("unexpected reply from backend"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn selection_is_shared_against_the_page_url() {
        match share_location("http://localhost:8000/", "stack=openai&stack=none") {
            AppEvent::Location(location) => {
                assert_eq!(location, "http://localhost:8000/?stack=openai&stack=none")
            }
            _ => panic!("expected a location"),
        }
    }
}
