//! Command sources
//!
//! Every source pushes tokenized lines into one queue that the bot loop drains:
//! - console: stdin, always addressed
//! - irc: addressed PRIVMSGs (see `crate::irc`)

pub mod console;

/// Where a command came from, and so where its replies go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Console,
    Irc { nick: String },
}

/// One command line waiting for the interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub origin: Origin,
    pub words: Vec<String>,
}

impl Inbound {
    pub fn new(origin: Origin, words: Vec<String>) -> Self {
        Self { origin, words }
    }
}
