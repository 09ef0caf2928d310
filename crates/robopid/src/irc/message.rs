//! IRC line format (RFC 1459 subset)

/// A parsed server line: `[:prefix] COMMAND params... [:trailing]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrcMessage {
    pub prefix: Option<String>,
    pub command: String,
    /// Middle params followed by the trailing param, if any
    pub params: Vec<String>,
}

impl IrcMessage {
    /// Parse one line. `None` for blank or prefix-only lines.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);

        let (prefix, rest) = match line.strip_prefix(':') {
            Some(rest) => {
                let (prefix, rest) = rest.split_once(' ')?;
                (Some(prefix.to_string()), rest)
            }
            None => (None, line),
        };

        let (head, trailing) = match rest.split_once(" :") {
            Some((head, trailing)) => (head, Some(trailing)),
            None => (rest, None),
        };

        let mut parts = head.split(' ').filter(|p| !p.is_empty());
        let command = parts.next()?.to_string();
        let mut params: Vec<String> = parts.map(str::to_string).collect();
        if let Some(trailing) = trailing {
            params.push(trailing.to_string());
        }

        Some(Self {
            prefix,
            command,
            params,
        })
    }

    /// Sender nick from a `nick!user@host` prefix
    pub fn nick(&self) -> Option<&str> {
        self.prefix
            .as_deref()
            .and_then(|p| p.split('!').next())
            .filter(|n| !n.is_empty())
    }

    /// Last parameter, which carries the text of PRIVMSG and NOTICE
    pub fn trailing(&self) -> Option<&str> {
        self.params.last().map(String::as_str)
    }
}

/// Lines the bot sends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Nick(String),
    User { user: String, real_name: String },
    Pong(String),
    Join(String),
    Part(String),
    Privmsg { target: String, text: String },
}

impl Outbound {
    /// Wire form, without the trailing CRLF
    pub fn to_line(&self) -> String {
        match self {
            Self::Nick(nick) => format!("NICK {}", nick),
            Self::User { user, real_name } => format!("USER {} 0 * :{}", user, real_name),
            Self::Pong(token) => format!("PONG :{}", token),
            Self::Join(channel) => format!("JOIN {}", channel),
            Self::Part(channel) => format!("PART {}", channel),
            Self::Privmsg { target, text } => {
                format!("PRIVMSG {} :{}", target, text.replace(['\r', '\n'], " "))
            }
        }
    }

    /// Line safe to write to the log
    pub fn log_line(&self) -> String {
        match self {
            Self::Privmsg { target, .. } if target.eq_ignore_ascii_case("NickServ") => {
                format!("PRIVMSG {} :<redacted>", target)
            }
            other => other.to_line(),
        }
    }
}
