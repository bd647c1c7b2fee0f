use std::cmp::Ordering;

use crate::rating::{Rating, RatingEvent};
use crate::Stack;

/// Index of a lane in display order.
pub type PanelId = usize;

pub const USER_SENDER: &str = "User";
pub const SYSTEM_SENDER: &str = "SYSTEM";
pub const ATTRIBUTION_SENDER: &str = "Attribution";
pub const ANSWERABILITY_SENDER: &str = "Answerability probability";

/// Markdown horizontal rule placed between blocks of a multi-block message.
pub const BLOCK_DIVIDER: &str = "\n\n---\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    Assistant,
    System,
    Attribution,
    Answerability,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: String,
    /// Markdown source; rendered only at display time.
    pub body: String,
    pub kind: MessageKind,
    pub citations: Vec<String>,
}

impl Message {
    fn new(kind: MessageKind, sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            kind,
            citations: Vec::new(),
        }
    }
}

/// One conversation lane and everything shown inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    stack: Option<Stack>,
    generation: u64,
    messages: Vec<Message>,
    files: Vec<String>,
    busy: bool,
    eligible: bool,
    rating: Option<Rating>,
    pending: bool,
}

impl PanelState {
    pub fn new(stack: Option<Stack>) -> Self {
        Self {
            stack,
            generation: 0,
            messages: Vec::new(),
            files: Vec::new(),
            busy: false,
            eligible: true,
            rating: None,
            pending: false,
        }
    }

    pub fn stack(&self) -> Option<Stack> {
        self.stack
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_eligible(&self) -> bool {
        self.eligible
    }

    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    pub fn append_user_message(&mut self, body: impl Into<String>) {
        self.messages
            .push(Message::new(MessageKind::User, USER_SENDER, body));
    }

    pub fn append_assistant_message(&mut self, sender: impl Into<String>, body: impl Into<String>) {
        self.messages
            .push(Message::new(MessageKind::Assistant, sender, body));
    }

    /// Appends several blocks as a single message separated by a divider.
    pub fn append_assistant_messages<S: AsRef<str>>(&mut self, sender: &str, bodies: &[S]) {
        if bodies.is_empty() {
            return;
        }
        self.append_assistant_message(sender, join_blocks(bodies));
    }

    pub fn append_system_message(&mut self, body: impl Into<String>) {
        self.messages
            .push(Message::new(MessageKind::System, SYSTEM_SENDER, body));
    }

    /// Appends several notices as one system message separated by a divider.
    pub fn append_system_messages<S: AsRef<str>>(&mut self, bodies: &[S]) {
        if bodies.is_empty() {
            return;
        }
        self.append_system_message(join_blocks(bodies));
    }

    pub fn append_attribution(&mut self, citations: Vec<String>) {
        let mut message = Message::new(
            MessageKind::Attribution,
            ATTRIBUTION_SENDER,
            citations.join("\n"),
        );
        message.citations = citations;
        self.messages.push(message);
    }

    pub fn append_answerability(&mut self, score: f64) {
        self.messages.push(Message::new(
            MessageKind::Answerability,
            ANSWERABILITY_SENDER,
            format!("{score:.4}"),
        ));
    }

    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    /// Replaces the cached file list, sorted ascending ignoring case.
    pub fn replace_file_list(&mut self, mut names: Vec<String>) {
        names.sort_by(|a, b| compare_case_insensitive(a, b));
        self.files = names;
    }

    pub fn toggle_eligible(&mut self) {
        self.eligible = !self.eligible;
    }

    /// Toggles the thumb and returns the new rating.
    pub fn toggle_rating(&mut self) -> Rating {
        let next = match self.rating {
            Some(Rating::Up) => Rating::Down,
            Some(Rating::Down) | None => Rating::Up,
        };
        self.rating = Some(next);
        next
    }

    /// Reacts to a rating published by another lane.
    pub fn on_sibling_rating(&mut self, event: &RatingEvent) {
        if event.rating == Rating::Up && self.stack.is_some() {
            self.rating = Some(Rating::Down);
        }
    }

    /// Rebinds the lane. Transcript, files and transient flags are dropped
    /// and the generation moves on so late responses are ignored.
    pub(crate) fn rebind(&mut self, stack: Option<Stack>) {
        self.stack = stack;
        self.generation += 1;
        self.messages.clear();
        self.files.clear();
        self.busy = false;
        self.rating = None;
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pending
    }

    pub(crate) fn set_pending(&mut self, pending: bool) {
        self.pending = pending;
    }
}

fn join_blocks<S: AsRef<str>>(bodies: &[S]) -> String {
    bodies
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(BLOCK_DIVIDER)
}

fn compare_case_insensitive(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_list_sorts_ignoring_case() {
        let mut panel = PanelState::new(Some(Stack::Google));
        panel.replace_file_list(vec![
            "beta.md".to_string(),
            "Alpha.txt".to_string(),
            "alpha.md".to_string(),
            "Gamma.pdf".to_string(),
        ]);
        assert_eq!(
            panel.files(),
            ["alpha.md", "Alpha.txt", "beta.md", "Gamma.pdf"]
        );
    }

    #[test]
    fn multiple_blocks_join_with_divider() {
        let mut panel = PanelState::new(None);
        panel.append_assistant_messages("Google AQA", &["one", "two"]);
        assert_eq!(panel.messages().len(), 1);
        assert_eq!(panel.messages()[0].body, "one\n\n---\n\ntwo");

        panel.append_assistant_messages::<&str>("Google AQA", &[]);
        assert_eq!(panel.messages().len(), 1);
    }

    #[test]
    fn rebind_clears_everything_visible() {
        let mut panel = PanelState::new(Some(Stack::OpenAi));
        panel.append_user_message("hi");
        panel.replace_file_list(vec!["a.txt".into()]);
        panel.set_busy(true);
        panel.toggle_rating();

        panel.rebind(Some(Stack::Google));

        assert!(panel.messages().is_empty());
        assert!(panel.files().is_empty());
        assert!(!panel.is_busy());
        assert_eq!(panel.rating(), None);
        assert_eq!(panel.generation(), 1);
        assert!(!panel.is_current(0));
    }

    #[test]
    fn answerability_uses_four_decimals() {
        let mut panel = PanelState::new(Some(Stack::Google));
        panel.append_answerability(0.5);
        assert_eq!(panel.messages()[0].body, "0.5000");
    }
}
