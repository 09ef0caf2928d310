//! Protocol decisions for one IRC session, kept free of I/O.

use robopi_common::IrcConfig;
use tracing::{debug, error, info, warn};

use super::message::{IrcMessage, Outbound};
use crate::interpreter::tokenize;
use crate::listeners::{Inbound, Origin};

const NICKSERV: &str = "NickServ";
const REGISTERED_NOTICE: &str = "This nickname is registered";

/// What the connection should do after a server line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Send(Outbound),
    Deliver(Inbound),
}

#[derive(Debug, Clone)]
pub struct Session {
    nick: String,
    user: String,
    real_name: String,
    address: String,
    channels: Vec<String>,
    nickserv_password: Option<String>,
}

impl Session {
    pub fn new(config: &IrcConfig) -> Self {
        Self {
            nick: config.nick.clone(),
            user: config.user.clone(),
            real_name: config.real_name.clone(),
            address: config.address_token(),
            channels: config.channels.clone(),
            nickserv_password: config.nickserv_password.clone(),
        }
    }

    /// Lines sent right after connecting
    pub fn registration(&self) -> Vec<Outbound> {
        vec![
            Outbound::Nick(self.nick.clone()),
            Outbound::User {
                user: self.user.clone(),
                real_name: self.real_name.clone(),
            },
        ]
    }

    pub fn handle(&self, msg: &IrcMessage) -> Vec<Action> {
        match msg.command.as_str() {
            "PING" => {
                let token = msg.trailing().unwrap_or_default().to_string();
                vec![Action::Send(Outbound::Pong(token))]
            }
            "001" => {
                info!("Registered as {}", self.nick);
                self.join_channels()
            }
            "433" => {
                error!("Nickname {} is already in use", self.nick);
                Vec::new()
            }
            "NOTICE" => self.notice(msg),
            "PRIVMSG" => self.privmsg(msg),
            "ERROR" => {
                warn!("Server error: {}", msg.trailing().unwrap_or_default());
                Vec::new()
            }
            other => {
                debug!("Ignoring {} {:?}", other, msg.params);
                Vec::new()
            }
        }
    }

    fn notice(&self, msg: &IrcMessage) -> Vec<Action> {
        let text = msg.trailing().unwrap_or_default();
        info!("NOTICE from {}: {}", msg.nick().unwrap_or("server"), text);

        let from_nickserv = msg
            .nick()
            .is_some_and(|nick| nick.eq_ignore_ascii_case(NICKSERV));
        if !from_nickserv || !text.contains(REGISTERED_NOTICE) {
            return Vec::new();
        }

        let Some(password) = &self.nickserv_password else {
            warn!("{} is registered but no NickServ password is configured", self.nick);
            return Vec::new();
        };

        info!("Identifying with {}", NICKSERV);
        let mut actions = vec![Action::Send(Outbound::Privmsg {
            target: NICKSERV.to_string(),
            text: format!("IDENTIFY {} {}", self.nick, password),
        })];
        actions.extend(self.join_channels());
        actions
    }

    fn privmsg(&self, msg: &IrcMessage) -> Vec<Action> {
        let text = msg.trailing().unwrap_or_default();
        let Some(nick) = msg.nick() else {
            return Vec::new();
        };
        info!("PRIVMSG from {}: {}", nick, text);

        match addressed(text, &self.address) {
            Some(command) => {
                let origin = Origin::Irc {
                    nick: nick.to_string(),
                };
                vec![Action::Deliver(Inbound::new(origin, tokenize(command)))]
            }
            None => Vec::new(),
        }
    }

    fn join_channels(&self) -> Vec<Action> {
        self.channels
            .iter()
            .map(|channel| {
                info!("Joining {}", channel);
                Action::Send(Outbound::Join(channel.clone()))
            })
            .collect()
    }
}

/// Text after the first occurrence of `token`, if the line is addressed to us.
pub fn addressed<'a>(text: &'a str, token: &str) -> Option<&'a str> {
    if token.is_empty() {
        return None;
    }
    text.find(token).map(|at| &text[at + token.len()..])
}
