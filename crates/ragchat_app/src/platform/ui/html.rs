use std::fmt::Write as _;
use std::io;
use std::path::PathBuf;

use chrono::Local;
use ragchat_core::markdown::{escape_html, render_html};
use ragchat_core::rating::Rating;
use ragchat_core::{Message, MessageKind, PanelId};
use ragchat_engine::AtomicFileWriter;

use super::surface::PanelSurface;

#[derive(Debug, Clone, Default)]
struct LaneTranscript {
    title: String,
    messages: Vec<Message>,
    files: Vec<String>,
    busy: bool,
    eligible: bool,
    rating: Option<Rating>,
}

/// Mirrors every lane into a standalone HTML page, rewritten on each flush.
pub struct HtmlTranscript {
    writer: AtomicFileWriter,
    lanes: Vec<LaneTranscript>,
    location: Option<String>,
    changed: bool,
}

impl HtmlTranscript {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            writer: AtomicFileWriter::new(target),
            lanes: Vec::new(),
            location: None,
            changed: false,
        }
    }

    fn lane_mut(&mut self, panel: PanelId) -> &mut LaneTranscript {
        if self.lanes.len() <= panel {
            self.lanes.resize_with(panel + 1, || LaneTranscript {
                eligible: true,
                ..LaneTranscript::default()
            });
        }
        self.changed = true;
        &mut self.lanes[panel]
    }

    fn document(&self) -> String {
        let mut doc = String::from(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>RagChat transcript</title>\n\
             <style>\nbody{font-family:sans-serif}.lanes{display:flex;gap:1em}\
             .lane{flex:1;border:1px solid #ccc;padding:.5em}.busy h2::after{content:\" …\"}\
             .msg{margin:.5em 0}.sender{font-weight:bold}.system{color:#a00}\
             .attribution,.answerability{color:#666;font-size:smaller}\n</style>\n</head>\n<body>\n",
        );
        let _ = writeln!(
            doc,
            "<p>Updated {}</p>",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        if let Some(location) = &self.location {
            let escaped = escape_html(location);
            let _ = writeln!(doc, "<p>Share: <a href=\"{escaped}\">{escaped}</a></p>");
        }
        doc.push_str("<div class=\"lanes\">\n");
        for (index, lane) in self.lanes.iter().enumerate() {
            render_lane(&mut doc, index, lane);
        }
        doc.push_str("</div>\n</body>\n</html>\n");
        doc
    }
}

fn render_lane(doc: &mut String, index: usize, lane: &LaneTranscript) {
    let class = if lane.busy { "lane busy" } else { "lane" };
    let _ = writeln!(doc, "<section class=\"{class}\">");
    let _ = writeln!(doc, "<h2>{}. {}</h2>", index + 1, escape_html(&lane.title));
    let rating = match lane.rating {
        Some(Rating::Up) => "&#128077;",
        Some(Rating::Down) => "&#128078;",
        None => "",
    };
    let checked = if lane.eligible { "checked" } else { "unchecked" };
    let _ = writeln!(doc, "<p class=\"meta\">file operations {checked} {rating}</p>");
    for message in &lane.messages {
        let _ = writeln!(
            doc,
            "<div class=\"msg {}\"><span class=\"sender\">{}</span>\n{}</div>",
            kind_class(message.kind),
            escape_html(&message.sender),
            render_html(&message.body)
        );
    }
    doc.push_str("<ul class=\"files\">\n");
    for file in &lane.files {
        let _ = writeln!(doc, "<li>{}</li>", escape_html(file));
    }
    doc.push_str("</ul>\n</section>\n");
}

fn kind_class(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::User => "user",
        MessageKind::Assistant => "assistant",
        MessageKind::System => "system",
        MessageKind::Attribution => "attribution",
        MessageKind::Answerability => "answerability",
    }
}

impl PanelSurface for HtmlTranscript {
    fn append_message(&mut self, panel: PanelId, message: &Message) -> io::Result<()> {
        self.lane_mut(panel).messages.push(message.clone());
        Ok(())
    }

    fn clear_messages(&mut self, panel: PanelId) -> io::Result<()> {
        self.lane_mut(panel).messages.clear();
        Ok(())
    }

    fn set_busy(&mut self, panel: PanelId, busy: bool) -> io::Result<()> {
        self.lane_mut(panel).busy = busy;
        Ok(())
    }

    fn set_file_list(&mut self, panel: PanelId, files: &[String]) -> io::Result<()> {
        self.lane_mut(panel).files = files.to_vec();
        Ok(())
    }

    fn set_title(&mut self, panel: PanelId, title: &str) -> io::Result<()> {
        self.lane_mut(panel).title = title.to_string();
        Ok(())
    }

    fn set_rating(&mut self, panel: PanelId, rating: Option<Rating>) -> io::Result<()> {
        self.lane_mut(panel).rating = rating;
        Ok(())
    }

    fn set_eligible(&mut self, panel: PanelId, eligible: bool) -> io::Result<()> {
        self.lane_mut(panel).eligible = eligible;
        Ok(())
    }

    fn share_location(&mut self, location: &str) -> io::Result<()> {
        self.location = Some(location.to_string());
        self.changed = true;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.changed {
            return Ok(());
        }
        self.writer
            .write(&self.document())
            .map_err(io::Error::other)?;
        self.changed = false;
        Ok(())
    }
}
