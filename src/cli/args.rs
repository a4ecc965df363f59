//! Command-line argument parsing for the genie binary.

use crate::config::{CorrelationScheme, GenieConfig, TerminalConvention};

pub const USAGE: &str = "\
Usage: genie [OPTIONS]

Chat with the Genie study-abroad assistant.

Options:
  --base-url <URL>     Assistant backend (env GENIE_BASE_URL)
  --session-scoped     Address streams by session id (default)
  --task-scoped        Address streams by the task id returned on submit
  --summary-terminal   Keep reading after ai_response_completed
  -V, --version        Print version and exit
  -h, --help           Print this help and exit

Logging goes to stderr; set GENIE_LOG (or RUST_LOG), e.g. GENIE_LOG=genie=debug.";

/// Overrides given on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub base_url: Option<String>,
    pub correlation: Option<CorrelationScheme>,
    pub terminal: Option<TerminalConvention>,
}

impl CliOptions {
    /// Layer the flags over a config resolved from the environment.
    pub fn apply(&self, mut config: GenieConfig) -> GenieConfig {
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(scheme) = self.correlation {
            config = config.with_correlation(scheme);
        }
        if let Some(convention) = self.terminal {
            config = config.with_terminal(convention);
        }
        config
    }
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Version,
    Help,
    /// Run the interactive chat (default)
    Chat(CliOptions),
    /// Unusable arguments, with the reason
    Invalid(String),
}

/// Parse command-line arguments, program name included.
///
/// ```
/// use genie::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["genie".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut options = CliOptions::default();
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--base-url" => match args.next() {
                Some(url) if !url.starts_with("--") => options.base_url = Some(url),
                _ => return CliCommand::Invalid("--base-url needs a value".to_string()),
            },
            "--session-scoped" => options.correlation = Some(CorrelationScheme::SessionScoped),
            "--task-scoped" => options.correlation = Some(CorrelationScheme::TaskScoped),
            "--summary-terminal" => options.terminal = Some(TerminalConvention::SummaryFollows),
            other => {
                if let Some(url) = other.strip_prefix("--base-url=") {
                    options.base_url = Some(url.to_string());
                } else {
                    return CliCommand::Invalid(format!("unknown argument '{}'", other));
                }
            }
        }
    }
    CliCommand::Chat(options)
}
