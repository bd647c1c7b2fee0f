use std::sync::{mpsc, Arc};

use anyhow::Context;
use chat_logging::{chat_info, chat_warn};
use clap::Parser;
use ragchat_core::{update, AppState, AppViewModel, Effect, Msg};
use ragchat_engine::ReqwestBackendClient;

use super::cli::Cli;
use super::config::{config_source, load_config};
use super::effects::EffectRunner;
use super::input::{self, needs_idle_controls};
use super::logging;
use super::ui::html::HtmlTranscript;
use super::ui::render::render;
use super::ui::surface::{self, PanelSurface, SurfaceCommand};
use super::ui::terminal::TerminalSurface;

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Msg(Msg),
    /// The shareable location for the current lane selection.
    Location(String),
    Notice(String),
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let source = config_source(cli.config.as_deref());
    let mut config = load_config(source.as_deref())?;
    cli.apply(&mut config);
    logging::initialize(cli.log, &config.log_file);
    match &source {
        Some(path) => chat_info!("Loaded configuration from {:?}", path),
        None => chat_info!("No configuration file; using defaults"),
    }
    chat_info!("ragchat starting against {}", config.api_root);

    let lanes = config.initial_lanes(cli.location.as_deref())?;
    let client = ReqwestBackendClient::new(config.client_settings())?;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let effects = EffectRunner::new(Arc::new(client), config.page_url.clone(), event_tx.clone())
        .context("starting backend engine")?;

    let mut surfaces: Vec<Box<dyn PanelSurface>> = vec![Box::new(TerminalSurface::stdout())];
    if let Some(path) = &config.transcript_html {
        chat_info!("Mirroring transcripts to {:?}", path);
        surfaces.push(Box::new(HtmlTranscript::new(path.clone())));
    }

    let mut app = App::new(
        AppState::with_welcome_message(config.welcome_message.clone()),
        effects,
        surfaces,
    );
    app.show(&[SurfaceCommand::Notice("Type /help for commands.".to_string())]);
    app.dispatch(Msg::Init { lanes });
    app.share_selection();

    input::spawn_stdin_reader(event_tx).context("starting input reader")?;

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Msg(msg) => app.dispatch(msg),
            AppEvent::Location(location) => app.show(&[SurfaceCommand::ShareLocation(location)]),
            AppEvent::Notice(text) => app.show(&[SurfaceCommand::Notice(text)]),
            AppEvent::Quit => break,
        }
    }

    chat_info!("ragchat exiting");
    Ok(())
}

struct App {
    state: AppState,
    last_view: AppViewModel,
    effects: EffectRunner,
    surfaces: Vec<Box<dyn PanelSurface>>,
}

impl App {
    fn new(state: AppState, effects: EffectRunner, surfaces: Vec<Box<dyn PanelSurface>>) -> Self {
        Self {
            state,
            last_view: AppViewModel::default(),
            effects,
            surfaces,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        if needs_idle_controls(&msg) && !self.last_view.controls.enabled {
            let notice = format!("busy: {}", self.last_view.controls.placeholder);
            self.show(&[SurfaceCommand::Notice(notice)]);
        }

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            let view = state.view();
            let cmds = render(&self.last_view, &view);
            self.last_view = view;
            self.show(&cmds);
        }
        self.state = state;
        self.effects.enqueue(effects);
    }

    fn share_selection(&mut self) {
        let query = self.state.view().selection_query;
        self.effects.enqueue(vec![Effect::PersistSelection { query }]);
    }

    fn show(&mut self, cmds: &[SurfaceCommand]) {
        for target in &mut self.surfaces {
            for cmd in cmds {
                if let Err(err) = surface::apply(target.as_mut(), cmd) {
                    chat_warn!("Surface update failed: {}", err);
                    break;
                }
            }
            if let Err(err) = target.flush() {
                chat_warn!("Surface flush failed: {}", err);
            }
        }
    }
}
