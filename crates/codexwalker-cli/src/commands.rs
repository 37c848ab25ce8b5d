//! Parsing of terminal input lines.

use codexwalker_director::UserAction;

/// One line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Forwarded to the director.
    Action(UserAction),
    /// List unlocked codex entries.
    Codex,
    /// List routes and their status.
    Routes,
    /// Show which ending has been earned.
    Ending,
    /// Summarize the save slots.
    Slots,
    /// Print the command list.
    Help,
    /// End the session.
    Quit,
}

/// Help text listing every command.
pub const HELP: &str = "\
commands:
  <enter> | n        next line
  1..9               pick a choice
  s | skip           skip the video
  a | auto           toggle autoplay
  start              new game
  menu               back to the title menu
  about              open the about page
  save <1-5>         save into a slot
  load <1-5>         restore a slot
  slots              list save slots
  codex              list unlocked codex entries
  routes             list routes
  ending             show the ending earned so far
  quit               leave";

/// Parses one input line.
///
/// # Errors
///
/// Returns a message for unrecognized input.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Action(UserAction::NextDialogue));
    };
    let command = match head {
        "n" | "next" => Command::Action(UserAction::NextDialogue),
        "s" | "skip" => Command::Action(UserAction::SkipVideo),
        "a" | "auto" => Command::Action(UserAction::ToggleAutoplay),
        "start" => Command::Action(UserAction::StartGame),
        "menu" => Command::Action(UserAction::BackToMenu),
        "about" => Command::Action(UserAction::ShowAbout),
        "save" => Command::Action(UserAction::Save(slot_argument(words.next())?)),
        "load" => Command::Action(UserAction::Load(slot_argument(words.next())?)),
        "slots" => Command::Slots,
        "codex" => Command::Codex,
        "routes" => Command::Routes,
        "ending" => Command::Ending,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 => Command::Action(UserAction::SelectChoice(n - 1)),
            _ => return Err(format!("unknown command `{other}`; type `help`")),
        },
    };
    Ok(command)
}

fn slot_argument(word: Option<&str>) -> Result<u8, String> {
    word.ok_or_else(|| "missing slot number".to_owned())?
        .parse()
        .map_err(|_| "slot must be a number from 1 to 5".to_owned())
}
