use std::path::PathBuf;

use clap::Parser;

use super::config::AppConfig;
use super::logging::LogDestination;

/// Compare retrieval-augmented chat stacks side by side.
#[derive(Debug, Parser)]
#[command(name = "ragchat", version)]
pub struct Cli {
    /// RON configuration file (defaults to ./ragchat.ron when present).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Backend API root, e.g. http://localhost:8000/api
    #[arg(long)]
    pub api_root: Option<String>,

    /// Shared location whose `stack` parameters choose the lane bindings.
    #[arg(long)]
    pub location: Option<String>,

    /// Number of lanes to show.
    #[arg(long)]
    pub lanes: Option<usize>,

    /// Where log output goes.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Also mirror every lane into this HTML file.
    #[arg(long)]
    pub transcript_html: Option<PathBuf>,
}

impl Cli {
    /// Command line values win over the configuration file.
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(api_root) = &self.api_root {
            config.api_root = api_root.clone();
        }
        if let Some(count) = self.lanes {
            config.resize_lanes(count);
        }
        if let Some(path) = &self.transcript_html {
            config.transcript_html = Some(path.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_on_top_of_config() {
        let cli = Cli::parse_from([
            "ragchat",
            "--api-root",
            "http://rag:9000/api",
            "--lanes",
            "3",
            "--log",
            "off",
        ]);
        let mut config = AppConfig::default();
        cli.apply(&mut config);

        assert_eq!(cli.log, LogDestination::Off);
        assert_eq!(config.api_root, "http://rag:9000/api");
        assert_eq!(config.lanes, vec!["openai", "google", "none"]);
        assert_eq!(config.transcript_html, None);
    }

    #[test]
    fn defaults_leave_config_untouched() {
        let cli = Cli::parse_from(["ragchat"]);
        let mut config = AppConfig::default();
        cli.apply(&mut config);
        assert_eq!(config, AppConfig::default());
        assert_eq!(cli.log, LogDestination::File);
    }
}
