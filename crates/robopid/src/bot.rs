//! Bot loop
//!
//! Drains the command queue one line at a time. A command (and any dance it
//! plays) runs to completion before the next is taken or shutdown is seen.

use std::future::Future;
use tokio::sync::mpsc;
use tracing::info;

use crate::interpreter::CommandInterpreter;
use crate::irc::IrcHandle;
use crate::listeners::{Inbound, Origin};

pub async fn run<S>(
    mut interpreter: CommandInterpreter,
    mut inbound: mpsc::UnboundedReceiver<Inbound>,
    irc: IrcHandle,
    shutdown: S,
) where
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    info!("RoboPi ready");

    loop {
        let Inbound { origin, words } = tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Shutting down");
                break;
            }
            next = inbound.recv() => match next {
                Some(cmd) => cmd,
                None => {
                    info!("All command sources closed");
                    break;
                }
            },
        };

        interpreter
            .handle(&words, |text| reply(&origin, &irc, &text))
            .await;
    }
}

fn reply(origin: &Origin, irc: &IrcHandle, text: &str) {
    match origin {
        Origin::Console => println!("{}", text),
        Origin::Irc { nick } => irc.privmsg(nick, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::SimulatedArm;
    use crate::irc::Outbound;
    use crate::sequencer::MoveSequencer;

    fn interpreter(irc: &IrcHandle) -> CommandInterpreter {
        let sequencer = MoveSequencer::new(Box::new(SimulatedArm::new()));
        CommandInterpreter::new(sequencer, Box::new(irc.clone()))
    }

    fn from_irc(nick: &str, line: &str) -> Inbound {
        Inbound::new(
            Origin::Irc {
                nick: nick.to_string(),
            },
            crate::interpreter::tokenize(line),
        )
    }

    #[tokio::test]
    async fn test_replies_go_to_sender() {
        let (irc, mut outbound) = IrcHandle::channel();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(from_irc("alice", "echo hi there")).unwrap();
        tx.send(from_irc("bob", "done")).unwrap();
        drop(tx);

        run(interpreter(&irc), rx, irc.clone(), std::future::pending()).await;

        assert_eq!(
            outbound.try_recv().unwrap(),
            Outbound::Privmsg {
                target: "alice".to_string(),
                text: "hi there".to_string()
            }
        );
        assert_eq!(
            outbound.try_recv().unwrap(),
            Outbound::Privmsg {
                target: "bob".to_string(),
                text: "Use 'dance ' to see this!".to_string()
            }
        );
        assert!(outbound.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_join_goes_to_server() {
        let (irc, mut outbound) = IrcHandle::channel();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(from_irc("alice", "join #arm")).unwrap();
        drop(tx);

        run(interpreter(&irc), rx, irc.clone(), std::future::pending()).await;

        assert_eq!(outbound.try_recv().unwrap(), Outbound::Join("#arm".to_string()));
    }

    #[tokio::test]
    async fn test_shutdown_wins_over_queued_commands() {
        let (irc, mut outbound) = IrcHandle::channel();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(from_irc("alice", "echo never")).unwrap();

        run(interpreter(&irc), rx, irc.clone(), async {}).await;

        assert!(outbound.try_recv().is_err());
    }
}
