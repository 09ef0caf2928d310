//! Command interpreter - the chat-facing state machine.
//!
//! A line is split on ASCII whitespace and dispatched on its first word
//! (exact, case-sensitive). While a dance is being taught, `move` records into
//! that dance instead of driving the arm. Every answer goes through the reply
//! callback handed in with the line; the interpreter never picks a recipient.

use robopi_common::catalog;
use robopi_common::parse_move;
use tracing::{debug, info, warn};

use crate::sequencer::MoveSequencer;
use crate::state::ConversationState;

/// Transport capability for joining and leaving chat channels.
pub trait ChannelControl: Send {
    fn join(&self, channel: &str);
    fn part(&self, channel: &str);
}

/// Split a line into command words.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_ascii_whitespace().map(str::to_string).collect()
}

/// Arguments of a `move` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveArgs<'a> {
    pub joint: &'a str,
    pub direction: &'a str,
    pub duration: &'a str,
}

/// A command line, keyed by its verb
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Teach(Option<&'a str>),
    /// `None` when fewer than three arguments were given
    Move(Option<MoveArgs<'a>>),
    Done,
    Dance(Option<&'a str>),
    Forget(Option<&'a str>),
    Join(Option<&'a str>),
    Leave(Option<&'a str>),
    Echo(&'a [String]),
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// Parse tokenized words. `None` for an empty line.
    pub fn parse(words: &'a [String]) -> Option<Self> {
        let (verb, args) = words.split_first()?;
        let arg = |i: usize| -> Option<&'a str> { args.get(i).map(String::as_str) };

        let command = match verb.as_str() {
            "teach" => Self::Teach(arg(0)),
            "move" => Self::Move(match args {
                [joint, direction, duration, ..] => Some(MoveArgs {
                    joint: joint.as_str(),
                    direction: direction.as_str(),
                    duration: duration.as_str(),
                }),
                _ => None,
            }),
            "done" => Self::Done,
            "dance" => Self::Dance(arg(0)),
            "forget" => Self::Forget(arg(0)),
            "join" => Self::Join(arg(0)),
            "leave" => Self::Leave(arg(0)),
            "echo" => Self::Echo(args),
            other => Self::Unknown(other),
        };
        Some(command)
    }
}

pub struct CommandInterpreter {
    state: ConversationState,
    sequencer: MoveSequencer,
    channels: Box<dyn ChannelControl>,
}

impl CommandInterpreter {
    pub fn new(sequencer: MoveSequencer, channels: Box<dyn ChannelControl>) -> Self {
        Self {
            state: ConversationState::new(),
            sequencer,
            channels,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Tokenize and handle one line of text.
    pub async fn handle_line<F: FnMut(String)>(&mut self, line: &str, reply: F) {
        self.handle(&tokenize(line), reply).await;
    }

    /// Handle one tokenized command. Runs to completion, including any dance
    /// it plays, before returning.
    pub async fn handle<F: FnMut(String)>(&mut self, words: &[String], mut reply: F) {
        let Some(command) = Command::parse(words) else {
            return;
        };
        debug!("Handling {:?} while {}", command, self.state.mode());

        match command {
            Command::Teach(Some(name)) => self.teach(name, &mut reply),
            Command::Teach(None) => {
                reply("I need the name of a dance to learn! - Use 'teach <dance>'!".to_string())
            }
            Command::Move(Some(args)) => self.move_arm(args, &mut reply).await,
            Command::Move(None) => reply(
                "I need a move to do! - Use 'move <body part> <direction> <duration>'".to_string(),
            ),
            Command::Done => self.done(&mut reply),
            Command::Dance(Some(name)) => self.dance(name, &mut reply).await,
            Command::Dance(None) => reply(format!(
                "I need the name of a dance to do! - I know these ones: {}",
                self.state.dances().list_names().join(", ")
            )),
            Command::Forget(Some(name)) => {
                if self.state.forget(name) {
                    info!("Forgot '{}' while teaching it, back to idle", name);
                } else {
                    debug!("Forgot '{}'", name);
                }
            }
            Command::Forget(None) => {}
            Command::Join(Some(channel)) => self.channels.join(channel),
            Command::Join(None) => reply("I need the name of a channel to join".to_string()),
            Command::Leave(Some(channel)) => self.channels.part(channel),
            Command::Leave(None) => reply("I need the name of a channel to leave".to_string()),
            Command::Echo(rest) => reply(rest.join(" ")),
            Command::Unknown(verb) => {
                reply(format!("I don't understand '{}'", verb));
                reply("Use 'teach', 'move' or 'dance'".to_string());
            }
        }
    }

    fn teach(&mut self, name: &str, reply: &mut impl FnMut(String)) {
        match self.state.begin_teaching(name) {
            Ok(previous) => {
                if let Some(previous) = previous {
                    warn!("Switched from teaching '{}' to '{}'", previous, name);
                }
                info!("Learning dance '{}'", name);
                reply(format!("Teach me the '{}' dance!", name));
                reply(
                    "Use 'move <body part> <direction> <duration>' for each move and \
                     'done' when you're finished :)"
                        .to_string(),
                );
            }
            Err(_) => {
                reply(format!("That's old hat - I already know '{}'", name));
                reply(format!("Use 'forget {}' if you want to teach me again", name));
            }
        }
    }

    async fn move_arm(&mut self, args: MoveArgs<'_>, reply: &mut impl FnMut(String)) {
        let mv = match parse_move(args.joint, args.direction, args.duration) {
            Ok(mv) => mv,
            Err(e) => {
                debug!("{}", e);
                reply("I don't know that move :(".to_string());
                reply(format!("I do know: {}", known_moves()));
                return;
            }
        };

        if self.state.teaching().is_some() {
            match self.state.record(mv) {
                Ok(()) => reply("OK!".to_string()),
                Err(e) => {
                    warn!("Could not record move: {}", e);
                    reply(format!("I couldn't remember that move: {}", e));
                }
            }
            return;
        }

        match self.sequencer.execute(&[mv]).await {
            Ok(()) => reply("OK!".to_string()),
            Err(_) => reply("Oh dear - my arm failed me :(".to_string()),
        }
    }

    fn done(&mut self, reply: &mut impl FnMut(String)) {
        let name = self.state.finish_teaching().unwrap_or_default();
        if !name.is_empty() {
            info!("Finished learning '{}'", name);
        }
        reply(format!("Use 'dance {}' to see this!", name));
    }

    async fn dance(&mut self, name: &str, reply: &mut impl FnMut(String)) {
        match self.state.dances().get(name) {
            Some(moves) if !moves.is_empty() => {
                info!("Dancing '{}'", name);
                if self.sequencer.execute(moves).await.is_err() {
                    reply("Oh dear - my arm didn't work :(".to_string());
                }
            }
            _ => reply(format!(
                "I don't know that :( - Use 'teach {}' to teach me",
                name
            )),
        }
    }
}

/// Catalog as "base left, base right, ..."
fn known_moves() -> String {
    catalog::list_all()
        .iter()
        .map(|(joint, direction)| format!("{} {}", joint, direction))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        tokenize(line)
    }

    #[test]
    fn test_tokenize_ascii_whitespace() {
        assert_eq!(tokenize("  move\tbase  left 1 \r\n"), vec!["move", "base", "left", "1"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_parse_empty_line() {
        assert_eq!(Command::parse(&[]), None);
    }

    #[test]
    fn test_parse_move_needs_three_args() {
        let w = words("move base left");
        assert_eq!(Command::parse(&w), Some(Command::Move(None)));

        let w = words("move base left 1 extra");
        assert_eq!(
            Command::parse(&w),
            Some(Command::Move(Some(MoveArgs {
                joint: "base",
                direction: "left",
                duration: "1"
            })))
        );
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let w = words("Teach wave");
        assert_eq!(Command::parse(&w), Some(Command::Unknown("Teach")));
    }

    #[test]
    fn test_parse_optional_names() {
        let w = words("dance");
        assert_eq!(Command::parse(&w), Some(Command::Dance(None)));
        let w = words("forget wave");
        assert_eq!(Command::parse(&w), Some(Command::Forget(Some("wave"))));
        let w = words("leave #robopi");
        assert_eq!(Command::parse(&w), Some(Command::Leave(Some("#robopi"))));
    }

    #[test]
    fn test_parse_echo_keeps_rest() {
        let w = words("echo hello   there");
        match Command::parse(&w) {
            Some(Command::Echo(rest)) => assert_eq!(rest.join(" "), "hello there"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_known_moves_text() {
        assert_eq!(
            known_moves(),
            "base left, base right, elbow down, elbow up, grip close, grip open, \
             shoulder down, shoulder up, wrist down, wrist up"
        );
    }
}
