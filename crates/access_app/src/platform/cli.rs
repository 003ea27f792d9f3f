use std::path::PathBuf;

use access_core::AccessibilityMode;
use clap::{Parser, ValueEnum};

use super::logging::LogDestination;

/// Submit a document or web page to the accessibility processing service.
///
/// With `--file` or `--url` a single submission is made and its result printed.
/// Without either, an interactive session starts.
#[derive(Parser, Debug)]
#[command(name = "vibe-access", version, about)]
pub struct Cli {
    /// PDF or plain-text document to submit
    #[arg(short, long, conflicts_with = "url")]
    pub file: Option<PathBuf>,

    /// Web page address to submit
    #[arg(short, long)]
    pub url: Option<String>,

    /// Presentation mode: default, dyslexia or high-contrast
    #[arg(short, long)]
    pub mode: Option<AccessibilityMode>,

    /// Processing endpoint (overrides the settings file)
    #[arg(long, env = "VIBE_ACCESS_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Upper bound on one round trip, in seconds (at least 1)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,

    /// Directory downloaded bundles are written to
    #[arg(long)]
    pub bundle_dir: Option<PathBuf>,

    /// Download the result bundle after a successful single submission
    #[arg(long, default_value_t = false)]
    pub download: bool,

    /// Settings file (RON). Defaults to ./access_client.ron when present
    #[arg(long, env = "VIBE_ACCESS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the effective settings to the settings file and exit
    #[arg(long, default_value_t = false)]
    pub save_config: bool,

    /// Check that the processing service answers, then exit
    #[arg(long, default_value_t = false)]
    pub check: bool,

    /// Log level: off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogTarget::File)]
    pub log_to: LogTarget,

    /// Disable ANSI styling
    #[arg(long, default_value_t = false)]
    pub no_color: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    File,
    Terminal,
    Both,
    Off,
}

impl LogTarget {
    pub fn destination(self) -> Option<LogDestination> {
        match self {
            LogTarget::File => Some(LogDestination::File),
            LogTarget::Terminal => Some(LogDestination::Terminal),
            LogTarget::Both => Some(LogDestination::Both),
            LogTarget::Off => None,
        }
    }
}

/// Input given on the command line for a single submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneShotInput {
    File(PathBuf),
    Url(String),
}

impl Cli {
    pub fn one_shot_input(&self) -> Option<OneShotInput> {
        if let Some(path) = &self.file {
            return Some(OneShotInput::File(path.clone()));
        }
        self.url.clone().map(OneShotInput::Url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_and_url_are_mutually_exclusive() {
        let result = Cli::try_parse_from(["vibe-access", "--file", "a.pdf", "--url", "https://x"]);
        assert!(result.is_err());
    }

    #[test]
    fn mode_parses_through_core_names() {
        let cli = Cli::try_parse_from(["vibe-access", "--mode", "high-contrast"]).unwrap();
        assert_eq!(cli.mode, Some(AccessibilityMode::HighContrast));
        assert!(Cli::try_parse_from(["vibe-access", "--mode", "sepia"]).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(Cli::try_parse_from(["vibe-access", "--timeout-secs", "0"]).is_err());
        let cli = Cli::try_parse_from(["vibe-access", "--timeout-secs", "5"]).unwrap();
        assert_eq!(cli.timeout_secs, Some(5));
    }

    #[test]
    fn no_input_means_interactive() {
        let cli = Cli::try_parse_from(["vibe-access"]).unwrap();
        assert_eq!(cli.one_shot_input(), None);
        assert_eq!(cli.log_to, LogTarget::File);
    }

    #[test]
    fn url_input_is_passed_through_untrimmed() {
        let cli = Cli::try_parse_from(["vibe-access", "-u", " https://en.wikipedia.org/wiki/Law "])
            .unwrap();
        assert_eq!(
            cli.one_shot_input(),
            Some(OneShotInput::Url(" https://en.wikipedia.org/wiki/Law ".to_string()))
        );
    }
}
