//! Console listener
//!
//! Reads commands from stdin on a plain thread, so a blocked read never holds
//! up runtime shutdown. End of input stops this source only.

use std::io::{self, BufRead};
use std::thread::JoinHandle;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::{Inbound, Origin};
use crate::interpreter::tokenize;

/// Spawn the stdin reader
pub fn spawn_listener(tx: mpsc::UnboundedSender<Inbound>) -> io::Result<JoinHandle<()>> {
    info!("Starting console listener");

    std::thread::Builder::new()
        .name("console".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            forward_lines(stdin.lock(), &tx);
            info!("Console input closed");
        })
}

/// Queue every line of `input`. Stops at end of input or when the bot is gone.
fn forward_lines(input: impl BufRead, tx: &mpsc::UnboundedSender<Inbound>) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to read console input: {}", e);
                break;
            }
        };

        if tx.send(Inbound::new(Origin::Console, tokenize(&line))).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_lines() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        forward_lines("teach wave\n\nmove base left 1\n".as_bytes(), &tx);

        let first = rx.try_recv().unwrap();
        assert_eq!(first.origin, Origin::Console);
        assert_eq!(first.words, vec!["teach", "wave"]);
        // Blank lines are still delivered; the interpreter ignores them
        assert!(rx.try_recv().unwrap().words.is_empty());
        assert_eq!(rx.try_recv().unwrap().words.len(), 4);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_forward_stops_when_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        forward_lines("a\nb\n".as_bytes(), &tx);
    }
}
