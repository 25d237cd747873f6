//! # Console Player
//!
//! A line-oriented front-end for the Majority Rules client. It renders every
//! [`GameEvent`] as text and turns typed commands into client actions:
//!
//! ```text
//! a <text>   submit an answer
//! g <text>   submit a guess
//! r          fetch results for the current round
//! q          quit
//! ```
//!
//! ## Running
//!
//! ```sh
//! MAJORITY_RULES_URL=http://127.0.0.1:8000/api cargo run --example console -- Alice
//! ```

use std::sync::Arc;

use majority_rules_client::view::results_text;
use majority_rules_client::{
    ClientConfig, GameEvent, HttpGateway, HttpGatewayConfig, MajorityRulesClient, Region,
    StatusLine,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_URL: &str = "http://127.0.0.1:8000/api";

fn render_status(label: &str, status: &StatusLine) {
    if status.is_error {
        println!("[{label}] error: {}", status.text);
    } else {
        println!("[{label}] {}", status.text);
    }
}

fn render_event(event: &GameEvent) {
    match event {
        GameEvent::Joined { session } => {
            render_status("join", &StatusLine::info(session.joined_message()));
        }
        GameEvent::JoinFailed { message } => render_status("join", &StatusLine::error(message)),
        GameEvent::RoundUpdated(view) => {
            let hint = match view.region {
                Region::Answer => "type `a <answer>`",
                Region::Guess => "type `g <guess>`",
                Region::Results => "type `r` for results",
                Region::None => "waiting",
            };
            println!("{}\n  {}\n  ({hint})", view.headline(), view.prompt);
        }
        GameEvent::PollFailed { message } => tracing::debug!("poll failed: {message}"),
        GameEvent::SubmissionStatus { kind, status, .. } => render_status(kind.endpoint(), status),
        GameEvent::ResultsReady { round_id, payload } => {
            println!("results for round {round_id}:\n{}", payload.to_pretty_string());
        }
        GameEvent::ResultsUnavailable {
            round_id: Some(round_id),
            message,
        } => println!("results for round {round_id}: {message}"),
        GameEvent::ResultsUnavailable { message, .. } => println!("results: {message}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let url = std::env::var("MAJORITY_RULES_URL").unwrap_or_else(|_| DEFAULT_URL.to_owned());
    let name = std::env::args().nth(1).unwrap_or_default();

    let gateway = HttpGateway::new(
        HttpGatewayConfig::new(url)
            .with_ngrok_skip_warning()
            .with_user_agent(concat!("majority-rules-console/", env!("CARGO_PKG_VERSION"))),
    )?;
    let (client, mut events) = MajorityRulesClient::start(gateway, ClientConfig::default());
    let client = Arc::new(client);

    // Rendering runs on its own task so polls keep printing while we wait on stdin.
    let renderer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            render_event(&event);
        }
    });

    if let Err(e) = client.join(&name).await {
        // The JoinFailed event has already been rendered.
        tracing::info!("exiting: {e}");
        renderer.abort();
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        match cmd {
            "a" => {
                // Each submit runs independently; a slow one never blocks the prompt.
                let client = Arc::clone(&client);
                let text = rest.to_owned();
                tokio::spawn(async move { client.submit_answer(&text).await });
            }
            "g" => {
                let client = Arc::clone(&client);
                let text = rest.to_owned();
                tokio::spawn(async move { client.submit_guess(&text).await });
            }
            "r" => {
                let result = client.fetch_results().await;
                tracing::debug!("results text: {}", results_text(&result));
            }
            "q" => break,
            "" => {}
            other => println!("unknown command `{other}` (a, g, r, q)"),
        }
    }

    client.stop_polling().await;
    renderer.abort();
    Ok(())
}
