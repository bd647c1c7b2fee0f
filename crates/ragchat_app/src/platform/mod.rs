//! Terminal front end: wiring between stdin, the core state machine, the
//! backend engine and the rendering surfaces.
mod app;
mod cli;
mod config;
mod effects;
mod input;
mod logging;
mod ui;

pub use app::run_app;
