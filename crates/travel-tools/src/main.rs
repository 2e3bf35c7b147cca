//! Command line front end of the travel planning tools.
//!
//! ```text
//! travel-tools tools                  print tool definitions as JSON
//! travel-tools call <tool> [args]     run one tool with JSON arguments
//! travel-tools serve                  answer JSON tool calls on stdin
//! ```

#[macro_use]
extern crate tracing;

use std::env;
use std::process::ExitCode;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;
use travel_tools::core::tool::Error as ToolError;
use travel_tools::core::{ToolCall, ToolOutput};
use travel_tools::forecast::ForecastClient;
use travel_tools::store::TripStore;
use travel_tools::{Config, Toolset, ToolsetBuilder};

const BAR_CHAR: &str = "▎";

const USAGE: &str = "\
Usage:
  travel-tools tools
  travel-tools call <tool> [json-arguments]
  travel-tools serve";

/// One line written by `serve`.
#[derive(Serialize)]
struct Reply {
    id: Option<String>,
    #[serde(flatten)]
    output: ToolOutput,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };
    if !matches!(command.as_str(), "tools" | "call" | "serve") {
        eprintln!("unknown command: {command}\n\n{USAGE}");
        return ExitCode::FAILURE;
    }

    let config = Config::from_env();
    let store = match TripStore::open(&config.db_path) {
        Ok(store) => store,
        Err(err) => {
            eprintln!(
                "failed to open trip database {}: {err}",
                config.db_path.display()
            );
            return ExitCode::FAILURE;
        }
    };
    let toolset = ToolsetBuilder::with_store(store)
        .with_forecast_client(ForecastClient::new(config.forecast_config()))
        .build();

    match command.as_str() {
        "tools" => print_tools(&toolset),
        "call" => {
            let Some(name) = args.next() else {
                eprintln!("{USAGE}");
                return ExitCode::FAILURE;
            };
            call(&toolset, &name, args.next().as_deref()).await
        }
        _ => serve(&toolset).await,
    }
}

fn print_tools(toolset: &Toolset) -> ExitCode {
    match serde_json::to_string_pretty(&toolset.definitions()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to encode tool definitions: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn call(
    toolset: &Toolset,
    name: &str,
    arguments: Option<&str>,
) -> ExitCode {
    let arguments = match arguments.map(serde_json::from_str::<Value>) {
        None => Value::Null,
        Some(Ok(arguments)) => arguments,
        Some(Err(err)) => {
            eprintln!("arguments are not valid JSON: {err}");
            return ExitCode::FAILURE;
        }
    };

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(progress_style);
    progress_bar.set_message(format!("Running {name}..."));

    let mut output_fut = toolset.invoke(name, arguments);
    let output = loop {
        progress_bar.inc(1);
        select! {
            output = &mut output_fut => break output,
            _ = sleep(Duration::from_millis(100)) => {}
        }
    };
    // Finish the progress bar before printing anything else.
    progress_bar.finish_and_clear();

    let text = output.text_content();
    if output.is_error {
        eprintln!("{}{}", BAR_CHAR.bright_red(), text.bright_white());
        ExitCode::FAILURE
    } else {
        println!("{text}");
        ExitCode::SUCCESS
    }
}

async fn serve(toolset: &Toolset) -> ExitCode {
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<Reply>();
    let mut lines = io::BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();
    let mut reading = true;
    // Held until stdin is exhausted so that `recv` ends only after every
    // spawned call has replied.
    let mut reply_tx = Some(reply_tx);

    loop {
        select! {
            line = lines.next_line(), if reading => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        reading = false;
                        reply_tx = None;
                        continue;
                    }
                    Err(err) => {
                        error!("error reading input: {err}");
                        reading = false;
                        reply_tx = None;
                        continue;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                let Some(tx) = &reply_tx else {
                    continue;
                };
                dispatch(toolset, &line, tx);
            }
            reply = reply_rx.recv() => {
                let Some(reply) = reply else {
                    break;
                };
                if let Err(err) = write_reply(&mut stdout, &reply).await {
                    error!("error writing output: {err}");
                    return ExitCode::FAILURE;
                }
            }
        }
    }
    ExitCode::SUCCESS
}

fn dispatch(
    toolset: &Toolset,
    line: &str,
    reply_tx: &mpsc::UnboundedSender<Reply>,
) {
    let call = match serde_json::from_str::<ToolCall>(line) {
        Ok(call) => call,
        Err(err) => {
            warn!("malformed tool call: {err}");
            let err = ToolError::invalid_input()
                .with_reason(format!("Error: malformed tool call: {err}"));
            reply_tx
                .send(Reply {
                    id: None,
                    output: ToolOutput::error(&err),
                })
                .ok();
            return;
        }
    };

    toolset.handle_requests(vec![call], |id, fut| {
        let reply_tx = reply_tx.clone();
        tokio::spawn(async move {
            let output = fut.await;
            reply_tx.send(Reply { id: Some(id), output }).ok();
        });
    });
}

async fn write_reply(
    stdout: &mut io::Stdout,
    reply: &Reply,
) -> std::io::Result<()> {
    let mut line = serde_json::to_vec(reply)?;
    line.push(b'\n');
    stdout.write_all(&line).await?;
    stdout.flush().await
}
