use audio::{AudioError, CommandPlayer};
use config::Config;
use controller::{AppController, SaveOutcome, SearchTicket};
use dictionary::{Dictionary, DictionaryEntry, DictionaryError};
use futures::future::BoxFuture;
use lookup::Lookup;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use utilities::{parse_command, prompt, Command};

mod audio;
mod config;
mod controller;
mod display;
mod lookup;
mod render;
mod storage;
mod utilities;

/// A lookup that has been issued but not yet applied to the controller.
struct PendingSearch<'a> {
    ticket: SearchTicket,
    response: BoxFuture<'a, Result<DictionaryEntry, DictionaryError>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    init_logging(&config.log_level);

    let dict = Dictionary::with_timeout(
        config.dictionary.base_url.clone(),
        config.dictionary.timeout(),
    )?;
    let (player, mut audio_failures) =
        CommandPlayer::new(config.audio.player.clone(), config.audio.args.clone());
    tracing::debug!(base_url = dict.base_url(), "dictionary client ready");

    let mut app = AppController::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Option<PendingSearch<'_>> = None;

    display::draw(&app.display_model());
    prompt(">> ")?;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Command::Quit => break,
                    Command::Define(term) => {
                        if let Some(ticket) = app.submit(&term) {
                            // dropping the previous future cancels its request
                            pending = Some(start_search(&dict, ticket));
                            display::draw(&app.display_model());
                        }
                    }
                    Command::Save => match app.save_current() {
                        SaveOutcome::Saved => display::draw(&app.display_model()),
                        SaveOutcome::AlreadySaved => println!("Already saved."),
                        SaveOutcome::NothingDisplayed if app.state().is_loading() => {
                            println!("Wait for the lookup to finish.")
                        }
                        SaveOutcome::NothingDisplayed => println!("Look a word up first."),
                    },
                    Command::Saved => {
                        let saved = app.saved_words();
                        if saved.is_empty() {
                            println!("No saved words yet.");
                        } else {
                            println!("Saved words: {}", saved.list().join(", "));
                        }
                    }
                    Command::Play(index) => match app.play_audio(&player, index) {
                        Ok(()) => {}
                        Err(AudioError::NothingDisplayed) => println!("No word is displayed."),
                        Err(AudioError::NoSuchItem(_)) => {
                            println!("There is no pronunciation number {}.", index + 1)
                        }
                        Err(_) => display::draw(&app.display_model()),
                    },
                    Command::Theme => {
                        app.toggle_theme();
                        display::draw(&app.display_model());
                    }
                    Command::Help => println!("{}", display::help()),
                    Command::Unknown(line) => println!("Couldn't understand '{line}'."),
                    Command::Empty => {}
                }
            }
            Some(failure) = audio_failures.recv() => {
                app.audio_failed(&failure);
                display::draw(&app.display_model());
            }
            response = wait_for(&mut pending) => {
                if let Some(search) = pending.take() {
                    if app.complete(&search.ticket, response) {
                        display::draw(&app.display_model());
                    }
                }
            }
        }
        if pending.is_none() {
            prompt(">> ")?;
        }
    }
    Ok(())
}

fn start_search<'a>(dict: &'a Dictionary, ticket: SearchTicket) -> PendingSearch<'a> {
    let term = ticket.term().to_owned();
    PendingSearch {
        ticket,
        response: Box::pin(async move { dict.lookup(&term).await }),
    }
}

/// Resolves with the in-flight response, or never if nothing is in flight.
async fn wait_for(
    pending: &mut Option<PendingSearch<'_>>,
) -> Result<DictionaryEntry, DictionaryError> {
    match pending {
        Some(search) => (&mut search.response).await,
        None => std::future::pending().await,
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
