//! IRC transport
//!
//! Just enough IRC for a command bot: register, keep alive, join channels,
//! identify with NickServ, and turn addressed PRIVMSGs into commands.
//! There is no reconnect; when the server goes away the connection ends.

mod client;
mod message;
mod session;
mod tls;

pub use client::{connect, IrcConnection, IrcHandle};
pub use message::{IrcMessage, Outbound};
pub use session::{addressed, Action, Session};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IrcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("Invalid server name: {0}")]
    InvalidServerName(String),
}

/// Append `port` unless the address already carries one.
pub fn with_default_port(server: &str, port: u16) -> String {
    if server.contains(':') {
        server.to_string()
    } else {
        format!("{}:{}", server, port)
    }
}

/// Host part of a `host:port` address
fn host_of(server: &str) -> &str {
    server
        .rsplit_once(':')
        .map(|(host, _)| host)
        .unwrap_or(server)
}
