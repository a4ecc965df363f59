//! Interactive chat loop.

use std::io::Write;

use color_eyre::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::cli::args::USAGE;
use crate::cli::render::TerminalRenderer;
use crate::client::GenieClient;
use crate::models::{Message, Suggestion};
use crate::traits::HttpClient;

const PROMPT: &str = "> ";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Send(String),
    /// 1-based index into the last answer's suggestions
    Suggestion(usize),
    Reset,
    History,
    /// History as JSON
    HistoryJson,
    Help,
    Quit,
    Blank,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Blank;
        }
        match line {
            "/reset" | "/new" => return ReplCommand::Reset,
            "/history" => return ReplCommand::History,
            "/history json" => return ReplCommand::HistoryJson,
            "/help" => return ReplCommand::Help,
            "/quit" | "/exit" => return ReplCommand::Quit,
            _ => {}
        }
        if let Some(index) = line.strip_prefix('/').and_then(|n| n.parse::<usize>().ok()) {
            if index > 0 {
                return ReplCommand::Suggestion(index);
            }
        }
        ReplCommand::Send(line.to_string())
    }
}

fn last_suggestions(history: &[Message]) -> &[Suggestion] {
    history
        .iter()
        .rev()
        .find_map(Message::as_genie)
        .map(|m| m.suggestions())
        .unwrap_or(&[])
}

/// Read lines from `input` until EOF or `/quit`, rendering answers to `out`.
///
/// Errors from a turn are reported and the loop continues; only I/O failures
/// end it.
pub async fn run<C, R, W>(client: &mut GenieClient<C>, input: R, out: W) -> Result<()>
where
    C: HttpClient,
    R: AsyncBufRead + Unpin,
    W: Write + Send,
{
    let mut renderer = TerminalRenderer::new(out);
    let mut lines = input.lines();

    loop {
        {
            let out = renderer.out_mut();
            write!(out, "{}", PROMPT)?;
            out.flush()?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let result = match ReplCommand::parse(&line) {
            ReplCommand::Blank => continue,
            ReplCommand::Quit => break,
            ReplCommand::Help => {
                writeln!(renderer.out_mut(), "{}\n\nIn chat: /1../n pick a suggestion, /reset, /history [json], /quit", USAGE)?;
                continue;
            }
            ReplCommand::Reset => {
                let session = client.reset().clone();
                writeln!(renderer.out_mut(), "Started a new conversation ({}).", session)?;
                continue;
            }
            ReplCommand::History => {
                let out = renderer.out_mut();
                for message in client.history() {
                    let who = if message.is_user() { "you" } else { "genie" };
                    writeln!(out, "{}: {}", who, message.text())?;
                }
                continue;
            }
            ReplCommand::HistoryJson => {
                let json = client.state().history().to_json()?;
                writeln!(renderer.out_mut(), "{}", json)?;
                continue;
            }
            ReplCommand::Suggestion(index) => {
                let picked = last_suggestions(client.history()).get(index - 1).cloned();
                match picked {
                    Some(suggestion) => {
                        writeln!(renderer.out_mut(), "> {}", suggestion.prompt)?;
                        client.send_suggestion(&suggestion, &mut renderer).await
                    }
                    None => {
                        writeln!(renderer.out_mut(), "No suggestion /{}.", index)?;
                        continue;
                    }
                }
            }
            ReplCommand::Send(text) => client.send(&text, &mut renderer).await,
        };

        match result {
            Ok(report) => {
                if let Some(err) = &report.transport_error {
                    writeln!(renderer.out_mut(), "({})", err.user_message())?;
                } else if matches!(report.outcome(), Some(o) if !o.is_terminal_frame()) {
                    writeln!(renderer.out_mut(), "(The answer ended before it was complete.)")?;
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "turn rejected");
                writeln!(renderer.out_mut(), "{}", err.user_message())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("  "), ReplCommand::Blank);
        assert_eq!(ReplCommand::parse("/reset"), ReplCommand::Reset);
        assert_eq!(ReplCommand::parse("/history"), ReplCommand::History);
        assert_eq!(ReplCommand::parse("/history json"), ReplCommand::HistoryJson);
        assert_eq!(ReplCommand::parse("/quit"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse("/2"), ReplCommand::Suggestion(2));
        assert_eq!(ReplCommand::parse("/0"), ReplCommand::Send("/0".to_string()));
        assert_eq!(
            ReplCommand::parse(" MBA in Canada "),
            ReplCommand::Send("MBA in Canada".to_string())
        );
    }

    #[test]
    fn test_last_suggestions_empty_history() {
        assert!(last_suggestions(&[]).is_empty());
    }
}
