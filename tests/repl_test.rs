//! The interactive loop driven from an in-memory input.

mod common;

use common::*;
use genie::cli;
use genie::config::{GenieConfig, TerminalConvention};

async fn run_script(
    client: &mut genie::GenieClient<MockHttpClient>,
    script: &str,
) -> String {
    let mut out = Vec::new();
    cli::run(client, script.as_bytes(), &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_chat_then_quit() {
    let (mut client, http) = scripted_client(GenieConfig::default());
    http.set_response(STREAM_PREFIX, MockResponse::sse([chunk("Hello!"), stream_end()]));

    let output = run_script(&mut client, "hi\n\n/quit\nnever sent\n").await;

    assert!(output.contains("Hello!"));
    assert_eq!(client.history().len(), 2);
    assert_eq!(http.get_requests().len(), 2);
}

#[tokio::test]
async fn test_suggestion_shortcut() {
    let config = GenieConfig::default().with_terminal(TerminalConvention::SummaryFollows);
    let (mut client, http) = scripted_client(config);
    http.set_response(
        STREAM_PREFIX,
        MockResponse::sse([final_summary("Pick one", &[("Fees", "What are the fees?")])]),
    );

    let output = run_script(&mut client, "courses\n/1\n/5\n").await;

    assert!(output.contains("/1 Fees"));
    assert!(output.contains("> What are the fees?"));
    assert!(output.contains("No suggestion /5."));
    assert_eq!(client.history()[2].text(), "What are the fees?");
}

#[tokio::test]
async fn test_history_and_reset() {
    let (mut client, http) = scripted_client(GenieConfig::default());
    http.set_response(STREAM_PREFIX, MockResponse::sse([chunk("Answer"), stream_end()]));

    let output = run_script(&mut client, "question\n/history\n/reset\n").await;

    assert!(output.contains("you: question"));
    assert!(output.contains("genie: Answer"));
    assert!(output.contains("Started a new conversation"));
    assert!(client.history().is_empty());
}

#[tokio::test]
async fn test_submit_error_is_reported_and_loop_continues() {
    let (mut client, http) = scripted_client(GenieConfig::default());
    http.set_response(SUBMIT_URL, MockResponse::json(503, "down"));

    let output = run_script(&mut client, "hi\nstill there?\n").await;

    assert_eq!(
        output
            .matches("The assistant service is having trouble")
            .count(),
        2
    );
    assert!(client.history().is_empty());
}

#[tokio::test]
async fn test_history_json_export() {
    let (mut client, http) = scripted_client(GenieConfig::default());
    http.set_response(STREAM_PREFIX, MockResponse::sse([chunk("Answer"), stream_end()]));

    let output = run_script(&mut client, "question\n/history json\n").await;

    assert!(output.contains("\"text\": \"question\""));
    assert!(output.contains("\"text\": \"Answer\""));
}

#[tokio::test]
async fn test_cut_off_answer_is_flagged() {
    let (mut client, http) = scripted_client(GenieConfig::default());
    http.set_response(STREAM_PREFIX, MockResponse::sse([chunk("Half an ans")]));

    let output = run_script(&mut client, "question\n").await;

    assert!(output.contains("Half an ans"));
    assert!(output.contains("(The answer ended before it was complete.)"));
}
