//! A terminal chat front-end for a hosted chatflow.

#[macro_use]
extern crate tracing;

use std::io::Write as _;
use std::time::Duration;

use chatflow::core::{ConversationSnapshot, Role};
use chatflow::{Session, SessionBuilder, Settings};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::time::sleep;

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    debug!("talking to {}", settings.flowise.endpoint());

    let session = SessionBuilder::from_settings(&settings).build();
    let mut snapshot_rx = session.subscribe();

    println!("✨ {}", session.bot_name().bold());
    println!("{}", "Type /reset to start over, Ctrl-D to quit.".dimmed());
    let mut rendered = render_new_messages(&session, &session.snapshot(), 0);

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .map(|style| style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"))
        .unwrap_or_else(|_| ProgressStyle::default_spinner());

    'outer: loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line().await else {
            break;
        };
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }

        if line.trim() == "/reset" {
            session.reset();
            if snapshot_rx.changed().await.is_err() {
                break;
            }
            let snapshot = snapshot_rx.borrow_and_update().clone();
            println!("{}", "Conversation cleared.".dimmed());
            rendered = render_new_messages(&session, &snapshot, 0);
            continue;
        }

        // A turn always ends with one user and one bot message.
        let expected_len = session.snapshot().messages.len() + 2;
        session.submit(line);

        let mut progress_bar = None;

        loop {
            // Create a new progress bar if it has been finished.
            progress_bar
                .get_or_insert_with(|| {
                    let progress_bar = ProgressBar::new_spinner();
                    progress_bar.set_style(progress_style.clone());
                    progress_bar
                        .set_message(format!("{} is typing...", session.bot_name()));
                    progress_bar
                })
                .inc(1);

            let sleep = sleep(Duration::from_millis(100));
            select! {
                changed = snapshot_rx.changed() => {
                    if changed.is_err() {
                        break 'outer;
                    }
                },
                _ = sleep => {
                    continue;
                }
            };

            let snapshot = snapshot_rx.borrow_and_update().clone();
            if snapshot.is_awaiting_response || snapshot.messages.len() < expected_len {
                continue;
            }

            // Finish the progress bar before printing anything else.
            if let Some(progress_bar) = progress_bar.take() {
                progress_bar.finish_and_clear();
            }
            rendered = render_new_messages(&session, &snapshot, rendered);
            break;
        }
    }
}

/// Prints the bot messages after the first `rendered` ones, and returns how
/// many messages are rendered now. User messages are already on screen as
/// typed input.
fn render_new_messages(
    session: &Session,
    snapshot: &ConversationSnapshot,
    rendered: usize,
) -> usize {
    for msg in snapshot.messages.iter().skip(rendered) {
        if msg.role() != Role::Bot {
            continue;
        }
        let time = msg.timestamp().with_timezone(&Local).format("%H:%M");
        println!(
            "{}🤖 {} {}",
            BAR_CHAR.bright_cyan(),
            session.bot_name().bright_cyan().bold(),
            time.dimmed()
        );
        println!("{}{}", BAR_CHAR.bright_cyan(), msg.content().bright_white());
    }
    snapshot.messages.len()
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
