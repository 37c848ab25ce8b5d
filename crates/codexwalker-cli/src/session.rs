//! The interactive session loop.

use std::future;
use std::sync::Arc;

use colored::Colorize;
use codexwalker_core::clock::{Clock, SystemClock};
use codexwalker_core::error::NarrativeError;
use codexwalker_core::fetch::DataFetcher;
use codexwalker_director::{DirectorPorts, NarrativeDirector, NarrativeEvent, UserAction};
use codexwalker_scene_graph::SceneGraphStore;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::{Instant, sleep_until};
use tracing::{debug, error, info, warn};

use crate::commands::{Command, HELP, parse_command};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::fetch::WebRootFetcher;
use crate::storage::FileStore;
use crate::terminal::{Console, LoggingPrefetcher, TerminalNavigator, TerminalRenderer};

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The player typed `quit`.
    Quit,
    /// Input reached end of file.
    InputClosed,
    /// The narrative handed off to an external page.
    Redirected,
}

/// Wires a director to the terminal ports, the save directory, and the web
/// root described by `config`.
#[must_use]
pub fn build_director(
    config: &AppConfig,
    console: &Console,
    completions: UnboundedSender<UserAction>,
) -> NarrativeDirector {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let fetcher: Arc<dyn DataFetcher> = Arc::new(WebRootFetcher::new(config.web_root.clone()));
    let scenes = SceneGraphStore::from_config(&config.loader, fetcher, Arc::clone(&clock));
    let store = FileStore::new(config.save_dir.clone());
    info!(save_dir = %store.dir().display(), "save storage ready");
    let ports = DirectorPorts {
        renderer: Box::new(TerminalRenderer::new(console.clone(), completions)),
        prefetcher: Box::new(LoggingPrefetcher::default()),
        navigator: Box::new(TerminalNavigator::new(console.clone())),
        store: Box::new(store),
        clock,
    };
    NarrativeDirector::new(config.director.clone(), scenes, ports)
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}

/// Runs the director until the player quits, input ends, or the narrative
/// redirects.
///
/// Renderer completions are handled before due timers, and due timers
/// before new input. Recoverable errors are printed and play continues.
///
/// # Errors
///
/// Returns `AppError::Io` if reading input fails and `AppError::Narrative`
/// for an error the narrative cannot continue past.
pub async fn run_session<R>(
    director: &mut NarrativeDirector,
    input: R,
    completions: &mut UnboundedReceiver<UserAction>,
    console: &Console,
) -> Result<SessionEnd, AppError>
where
    R: AsyncBufRead + Unpin,
{
    let mut events = director.subscribe();
    let mut lines = input.lines();
    loop {
        let deadline = director.next_timer_deadline();
        tokio::select! {
            biased;
            Some(action) = completions.recv() => {
                settle(console, dispatch(director, action, console).await)?;
            }
            () = wait_until(deadline) => {
                settle(console, director.fire_due_timers().await.map(drop))?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Ok(SessionEnd::InputClosed);
                };
                match parse_command(&line) {
                    Ok(Command::Quit) => return Ok(SessionEnd::Quit),
                    Ok(Command::Action(action)) => {
                        settle(console, dispatch(director, action, console).await)?;
                    }
                    Ok(command) => describe(director, command, console),
                    Err(message) => console.line(format_args!("{}", format!("? {message}").dimmed())),
                }
            }
        }
        if drain_events(&mut events, console) {
            return Ok(SessionEnd::Redirected);
        }
    }
}

async fn dispatch(
    director: &mut NarrativeDirector,
    action: UserAction,
    console: &Console,
) -> Result<(), NarrativeError> {
    match action {
        UserAction::Save(slot) => {
            director.save(slot)?;
            console.line(format_args!("saved to slot {slot}"));
        }
        UserAction::Load(slot) => {
            if director.load_slot(slot)? {
                console.line(format_args!(
                    "loaded slot {slot} ({})",
                    director.progression().state()
                ));
            } else {
                console.line(format_args!("slot {slot} is empty"));
            }
        }
        action => director.handle_user_action(action).await?,
    }
    Ok(())
}

/// Prints a recoverable error and passes a fatal one up.
fn settle(console: &Console, outcome: Result<(), NarrativeError>) -> Result<(), AppError> {
    match outcome {
        Ok(()) => Ok(()),
        Err(e) if e.is_fatal() => {
            error!(error = %e, "narrative cannot continue");
            Err(e.into())
        }
        Err(e) => {
            report_error(console, &e);
            Ok(())
        }
    }
}

fn report_error(console: &Console, error: &NarrativeError) {
    warn!(%error, "action failed");
    console.line(format_args!("{}", format!("! {error}").yellow()));
}

fn describe(director: &NarrativeDirector, command: Command, console: &Console) {
    match command {
        Command::Codex => {
            let progression = director.progression();
            let entries = director.scenes().get_all_codex_entries();
            let mut locked = 0;
            for entry in entries {
                if progression.is_codex_entry_unlocked(&entry.id) {
                    console.line(format_args!(
                        "[{}] {}: {}",
                        entry.category, entry.title, entry.content
                    ));
                } else {
                    locked += 1;
                }
            }
            if locked == entries.len() {
                console.line(format_args!("(no codex entries unlocked)"));
            } else if locked > 0 {
                console.line(format_args!("({locked} more still locked)"));
            }
        }
        Command::Routes => {
            let data = director.progression().data();
            let available = director.routes().available_routes(data);
            for route in director.routes().definitions() {
                let status = if route.is_completed() {
                    "completed"
                } else if available.iter().any(|r| r.id == route.id) {
                    "available"
                } else {
                    "locked"
                };
                console.line(format_args!(
                    "{} {}: {} ({status})",
                    route.id, route.name, route.description
                ));
            }
        }
        Command::Ending => console.line(format_args!("ending so far: {}", director.best_ending())),
        Command::Slots => {
            for slot in 1..=5 {
                match director.save_info(slot) {
                    Ok(info) if info.exists => console.line(format_args!(
                        "slot {slot}: {} {}",
                        info.state.map(|state| format!("{state}")).unwrap_or_default(),
                        info.timestamp.unwrap_or_default()
                    )),
                    Ok(_) => console.line(format_args!("slot {slot}: empty")),
                    Err(e) => report_error(console, &e),
                }
            }
        }
        Command::Help => console.line(format_args!("{HELP}")),
        Command::Action(_) | Command::Quit => {}
    }
}

/// Prints the events worth showing. Returns `true` once a redirect happened.
fn drain_events(events: &mut broadcast::Receiver<NarrativeEvent>, console: &Console) -> bool {
    let mut redirected = false;
    loop {
        match events.try_recv() {
            Ok(NarrativeEvent::Redirected { url }) => {
                info!(url, "session redirected");
                redirected = true;
            }
            Ok(NarrativeEvent::AutoplayChanged { enabled }) => {
                console.line(format_args!("[autoplay {}]", if enabled { "on" } else { "off" }));
            }
            Ok(event) => debug!(event_type = event.event_type(), "event"),
            Err(TryRecvError::Lagged(skipped)) => warn!(skipped, "event stream lagged"),
            Err(TryRecvError::Empty | TryRecvError::Closed) => return redirected,
        }
    }
}
