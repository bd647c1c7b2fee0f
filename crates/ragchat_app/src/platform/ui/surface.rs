use std::io;

use ragchat_core::rating::Rating;
use ragchat_core::{Message, PanelId};

/// Something that can show the lanes: the terminal, a transcript file.
///
/// Lanes are addressed by their zero-based id; surfaces label them as they
/// see fit.
pub trait PanelSurface {
    fn append_message(&mut self, panel: PanelId, message: &Message) -> io::Result<()>;
    fn clear_messages(&mut self, panel: PanelId) -> io::Result<()>;
    fn set_busy(&mut self, panel: PanelId, busy: bool) -> io::Result<()>;
    fn set_file_list(&mut self, panel: PanelId, files: &[String]) -> io::Result<()>;

    fn set_title(&mut self, _panel: PanelId, _title: &str) -> io::Result<()> {
        Ok(())
    }

    fn set_rating(&mut self, _panel: PanelId, _rating: Option<Rating>) -> io::Result<()> {
        Ok(())
    }

    fn set_eligible(&mut self, _panel: PanelId, _eligible: bool) -> io::Result<()> {
        Ok(())
    }

    fn set_controls(&mut self, _enabled: bool, _placeholder: &str) -> io::Result<()> {
        Ok(())
    }

    fn share_location(&mut self, _location: &str) -> io::Result<()> {
        Ok(())
    }

    fn notice(&mut self, _text: &str) -> io::Result<()> {
        Ok(())
    }

    /// Called once after each batch of commands.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    SetTitle { panel: PanelId, title: String },
    AppendMessage { panel: PanelId, message: Message },
    ClearMessages { panel: PanelId },
    SetBusy { panel: PanelId, busy: bool },
    SetFileList { panel: PanelId, files: Vec<String> },
    SetRating { panel: PanelId, rating: Option<Rating> },
    SetEligible { panel: PanelId, eligible: bool },
    SetControls { enabled: bool, placeholder: String },
    ShareLocation(String),
    Notice(String),
}

pub fn apply(surface: &mut dyn PanelSurface, command: &SurfaceCommand) -> io::Result<()> {
    match command {
        SurfaceCommand::SetTitle { panel, title } => surface.set_title(*panel, title),
        SurfaceCommand::AppendMessage { panel, message } => surface.append_message(*panel, message),
        SurfaceCommand::ClearMessages { panel } => surface.clear_messages(*panel),
        SurfaceCommand::SetBusy { panel, busy } => surface.set_busy(*panel, *busy),
        SurfaceCommand::SetFileList { panel, files } => surface.set_file_list(*panel, files),
        SurfaceCommand::SetRating { panel, rating } => surface.set_rating(*panel, *rating),
        SurfaceCommand::SetEligible { panel, eligible } => surface.set_eligible(*panel, *eligible),
        SurfaceCommand::SetControls {
            enabled,
            placeholder,
        } => surface.set_controls(*enabled, placeholder),
        SurfaceCommand::ShareLocation(location) => surface.share_location(location),
        SurfaceCommand::Notice(text) => surface.notice(text),
    }
}
