use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use genie::adapters::ReqwestHttpClient;
use genie::cli::{self, parse_args, CliCommand, USAGE};
use genie::client::GenieClient;
use genie::config::GenieConfig;

/// Log to stderr so records never interleave with the answer on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("GENIE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let options = match parse_args(std::env::args()) {
        CliCommand::Version => {
            println!("{}", cli::version_line());
            return Ok(());
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        CliCommand::Invalid(reason) => {
            eprintln!("error: {}\n\n{}", reason, USAGE);
            std::process::exit(2);
        }
        CliCommand::Chat(options) => options,
    };

    init_tracing();

    let config = options.apply(GenieConfig::from_env());
    println!(
        "{} connected to {} (type /help for commands)",
        cli::version_line(),
        config.base_url
    );

    let mut client = GenieClient::new(config, ReqwestHttpClient::new());
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    cli::run(&mut client, stdin, std::io::stdout()).await
}
