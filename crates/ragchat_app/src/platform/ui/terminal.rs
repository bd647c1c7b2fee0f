use std::io::{self, Write};

use ragchat_core::rating::Rating;
use ragchat_core::{Message, MessageKind, PanelId};

use super::surface::PanelSurface;

/// Interleaves every lane on one text stream, each line tagged with its
/// 1-based lane number.
pub struct TerminalSurface {
    out: Box<dyn Write + Send>,
}

impl TerminalSurface {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    fn line(&mut self, panel: PanelId, text: &str) -> io::Result<()> {
        writeln!(self.out, "[{}] {}", panel + 1, text)
    }
}

impl PanelSurface for TerminalSurface {
    fn append_message(&mut self, panel: PanelId, message: &Message) -> io::Result<()> {
        let mut lines = message.body.lines();
        let first = lines.next().unwrap_or_default();
        let marker = match message.kind {
            MessageKind::User => ">",
            MessageKind::Assistant => "<",
            MessageKind::System => "!",
            MessageKind::Attribution | MessageKind::Answerability => "~",
        };
        self.line(panel, &format!("{marker} {}: {first}", message.sender))?;
        for rest in lines {
            writeln!(self.out, "      {rest}")?;
        }
        Ok(())
    }

    fn clear_messages(&mut self, panel: PanelId) -> io::Result<()> {
        self.line(panel, "--- transcript cleared ---")
    }

    fn set_busy(&mut self, panel: PanelId, busy: bool) -> io::Result<()> {
        if busy {
            self.line(panel, "working…")
        } else {
            Ok(())
        }
    }

    fn set_file_list(&mut self, panel: PanelId, files: &[String]) -> io::Result<()> {
        if files.is_empty() {
            self.line(panel, "files: (none)")
        } else {
            self.line(panel, &format!("files: {}", files.join(", ")))
        }
    }

    fn set_title(&mut self, panel: PanelId, title: &str) -> io::Result<()> {
        self.line(panel, &format!("=== {title} ==="))
    }

    fn set_rating(&mut self, panel: PanelId, rating: Option<Rating>) -> io::Result<()> {
        let label = match rating {
            Some(Rating::Up) => "thumbs up",
            Some(Rating::Down) => "thumbs down",
            None => return Ok(()),
        };
        self.line(panel, &format!("rated {label}"))
    }

    fn set_eligible(&mut self, panel: PanelId, eligible: bool) -> io::Result<()> {
        let state = if eligible { "on" } else { "off" };
        self.line(panel, &format!("file operations {state}"))
    }

    fn set_controls(&mut self, enabled: bool, placeholder: &str) -> io::Result<()> {
        if enabled {
            writeln!(self.out, "({placeholder})")
        } else {
            writeln!(self.out, "{placeholder}")
        }
    }

    fn share_location(&mut self, location: &str) -> io::Result<()> {
        writeln!(self.out, "share: {location}")
    }

    fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
