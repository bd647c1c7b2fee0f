use ragchat_core::{AppViewModel, PanelView};

use super::surface::SurfaceCommand;

/// Commands that bring a surface showing `prev` up to `next`.
///
/// Transcripts only grow between renders unless the lane was rebound or
/// cleared; a shrunken transcript is cleared and replayed.
pub fn render(prev: &AppViewModel, next: &AppViewModel) -> Vec<SurfaceCommand> {
    let mut cmds = Vec::new();

    for panel in &next.panels {
        match prev.panels.get(panel.id) {
            Some(before) => render_panel_diff(&mut cmds, before, panel),
            None => render_panel_full(&mut cmds, panel),
        }
    }

    if prev.controls != next.controls {
        cmds.push(SurfaceCommand::SetControls {
            enabled: next.controls.enabled,
            placeholder: next.controls.placeholder.clone(),
        });
    }

    cmds
}

fn render_panel_full(cmds: &mut Vec<SurfaceCommand>, panel: &PanelView) {
    let id = panel.id;
    cmds.push(SurfaceCommand::SetTitle {
        panel: id,
        title: panel.title.clone(),
    });
    cmds.push(SurfaceCommand::ClearMessages { panel: id });
    append_from(cmds, panel, 0);
    cmds.push(SurfaceCommand::SetBusy {
        panel: id,
        busy: panel.busy,
    });
    cmds.push(SurfaceCommand::SetFileList {
        panel: id,
        files: panel.files.clone(),
    });
    cmds.push(SurfaceCommand::SetEligible {
        panel: id,
        eligible: panel.eligible,
    });
    cmds.push(SurfaceCommand::SetRating {
        panel: id,
        rating: panel.rating,
    });
}

fn render_panel_diff(cmds: &mut Vec<SurfaceCommand>, before: &PanelView, panel: &PanelView) {
    let id = panel.id;
    if before.title != panel.title || before.generation != panel.generation {
        cmds.push(SurfaceCommand::SetTitle {
            panel: id,
            title: panel.title.clone(),
        });
    }

    let keeps_prefix = before.generation == panel.generation
        && panel.messages.len() >= before.messages.len()
        && panel.messages[..before.messages.len()] == before.messages[..];
    if keeps_prefix {
        append_from(cmds, panel, before.messages.len());
    } else {
        cmds.push(SurfaceCommand::ClearMessages { panel: id });
        append_from(cmds, panel, 0);
    }

    if before.busy != panel.busy {
        cmds.push(SurfaceCommand::SetBusy {
            panel: id,
            busy: panel.busy,
        });
    }
    if before.files != panel.files {
        cmds.push(SurfaceCommand::SetFileList {
            panel: id,
            files: panel.files.clone(),
        });
    }
    if before.eligible != panel.eligible {
        cmds.push(SurfaceCommand::SetEligible {
            panel: id,
            eligible: panel.eligible,
        });
    }
    if before.rating != panel.rating {
        cmds.push(SurfaceCommand::SetRating {
            panel: id,
            rating: panel.rating,
        });
    }
}

fn append_from(cmds: &mut Vec<SurfaceCommand>, panel: &PanelView, start: usize) {
    cmds.extend(
        panel.messages[start..]
            .iter()
            .cloned()
            .map(|message| SurfaceCommand::AppendMessage {
                panel: panel.id,
                message,
            }),
    );
}
