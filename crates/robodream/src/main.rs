//! A terminal host for the RoboDream chat widget.

#[macro_use]
extern crate tracing;

use std::future;
use std::io::Write as _;
use std::process::ExitCode;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use robodream::core::conversation::{Message, Role};
use robodream::core::{ChatWidget, GREETING, PendingReply, Reply};
use robodream::{Config, build_widget};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::select;

const BAR_CHAR: &str = "▎";
const THINKING: &str = "Processing neural data...";

enum Command<'a> {
    Toggle,
    History,
    Help,
    Quit,
    Ask(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        match line.trim() {
            "/toggle" => Command::Toggle,
            "/history" => Command::History,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            _ => Command::Ask(line),
        }
    }
}

enum Event {
    Line(io::Result<Option<String>>),
    Reply(Reply),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    let mut widget = build_widget(&config);

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    let mut lines = BufReader::new(io::stdin()).lines();
    let mut pending: Option<PendingReply> = None;
    let mut progress_bar: Option<ProgressBar> = None;
    let mut input_closed = false;

    println!("RoboDream assistant. Type /toggle to open the chat, /help for commands.");

    loop {
        if input_closed && pending.is_none() {
            break;
        }
        if widget.is_open() && pending.is_none() {
            print!("> ");
            std::io::stdout().flush().ok();
        }

        let event = select! {
            line = lines.next_line(), if !input_closed => Event::Line(line),
            reply = wait_reply(&mut pending) => Event::Reply(reply),
        };

        match event {
            Event::Reply(reply) => {
                pending = None;
                // Finish the progress bar before printing anything else.
                if let Some(progress_bar) = progress_bar.take() {
                    progress_bar.finish_and_clear();
                }
                widget.resolve(reply);
                if let Some(msg) = widget.transcript().last() {
                    print_message(msg);
                }
            }
            Event::Line(Ok(Some(line))) => match Command::parse(&line) {
                Command::Quit => break,
                Command::Help => print_help(),
                Command::History => print_transcript(&widget),
                Command::Toggle => {
                    widget.toggle_open();
                    if widget.is_open() {
                        print_transcript(&widget);
                    } else {
                        println!("Chat closed. Type /toggle to open it again.");
                    }
                }
                Command::Ask(text) => {
                    if !widget.is_open() {
                        println!("The chat is closed. Type /toggle to open it.");
                        continue;
                    }
                    widget.set_input(text);
                    match widget.submit_input() {
                        Some(reply) => {
                            pending = Some(reply);
                            let bar = ProgressBar::new_spinner();
                            bar.set_style(progress_style.clone());
                            bar.set_message(THINKING);
                            bar.enable_steady_tick(Duration::from_millis(100));
                            progress_bar = Some(bar);
                        }
                        None if widget.is_pending() => {
                            if let Some(bar) = &progress_bar {
                                bar.println("Still waiting for the last answer.");
                            }
                        }
                        None => {}
                    }
                }
            },
            Event::Line(Ok(None)) => {
                // Let an in-flight answer arrive before quitting.
                input_closed = true;
            }
            Event::Line(Err(err)) => {
                error!("error reading input: {err}");
                input_closed = true;
            }
        }
    }

    if let Some(progress_bar) = progress_bar {
        progress_bar.finish_and_clear();
    }
    ExitCode::SUCCESS
}

async fn wait_reply(pending: &mut Option<PendingReply>) -> Reply {
    match pending {
        Some(pending) => pending.await,
        None => future::pending().await,
    }
}

fn print_transcript(widget: &ChatWidget) {
    println!("{}🤖 {}", BAR_CHAR.bright_cyan(), GREETING.bright_white());
    for msg in widget.transcript() {
        print_message(msg);
    }
}

fn print_message(msg: &Message) {
    match msg.role() {
        Role::User => {
            println!("{}🧑 {}", BAR_CHAR.bright_blue(), msg.text());
        }
        Role::Assistant => {
            println!(
                "{}🤖 {}",
                BAR_CHAR.bright_cyan(),
                msg.text().bright_white()
            );
        }
    }
}

fn print_help() {
    println!("/toggle   open or close the chat");
    println!("/history  show the conversation");
    println!("/quit     leave");
}
