//! IRC connection: a reader task feeding the session and a writer task
//! draining the outbound queue.

use robopi_common::IrcConfig;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::message::{IrcMessage, Outbound};
use super::session::{Action, Session};
use super::{host_of, tls, IrcError};
use crate::interpreter::ChannelControl;
use crate::listeners::Inbound;

trait IrcStream: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send> IrcStream for T {}

/// Cloneable sender for lines to the server
#[derive(Debug, Clone)]
pub struct IrcHandle {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl IrcHandle {
    /// A handle and the receiving end of its queue
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, msg: Outbound) {
        if self.tx.send(msg).is_err() {
            warn!("IRC connection is gone, dropping outbound line");
        }
    }

    /// Send `text` to `target`. Empty text is not sent.
    pub fn privmsg(&self, target: &str, text: &str) {
        if text.is_empty() {
            return;
        }
        self.send(Outbound::Privmsg {
            target: target.to_string(),
            text: text.to_string(),
        });
    }
}

impl ChannelControl for IrcHandle {
    fn join(&self, channel: &str) {
        info!("Joining {}", channel);
        self.send(Outbound::Join(channel.to_string()));
    }

    fn part(&self, channel: &str) {
        info!("Leaving {}", channel);
        self.send(Outbound::Part(channel.to_string()));
    }
}

pub struct IrcConnection {
    handle: IrcHandle,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl IrcConnection {
    pub fn handle(&self) -> IrcHandle {
        self.handle.clone()
    }

    /// Resolves once the server side is gone.
    pub async fn closed(self) {
        if let Err(e) = self.reader.await {
            error!("IRC reader task failed: {}", e);
        }
        self.writer.abort();
    }
}

/// Connect to `server` (`host:port`), register, and start the I/O tasks.
/// Addressed PRIVMSGs are pushed to `inbound`.
pub async fn connect(
    config: &IrcConfig,
    server: &str,
    secure: bool,
    inbound: mpsc::UnboundedSender<Inbound>,
) -> Result<IrcConnection, IrcError> {
    let tcp = TcpStream::connect(server).await?;
    info!("Connected to {}", server);

    let stream: Box<dyn IrcStream> = if secure {
        Box::new(tls::connect(tcp, host_of(server), &config.ca_bundle).await?)
    } else {
        Box::new(tcp)
    };
    let (read_half, write_half) = tokio::io::split(stream);

    let session = Session::new(config);
    let (handle, outbound) = IrcHandle::channel();
    for msg in session.registration() {
        handle.send(msg);
    }

    let writer = tokio::spawn(write_loop(write_half, outbound));
    let reader = tokio::spawn(read_loop(read_half, session, handle.clone(), inbound));

    Ok(IrcConnection {
        handle,
        reader,
        writer,
    })
}

async fn write_loop<W: AsyncWrite + Unpin>(
    mut writer: W,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
) {
    while let Some(msg) = outbound.recv().await {
        debug!("-> {}", msg.log_line());
        let line = format!("{}\r\n", msg.to_line());
        if let Err(e) = writer.write_all(line.as_bytes()).await {
            error!("Failed to write to IRC server: {}", e);
            break;
        }
    }
}

async fn read_loop<R: AsyncRead + Unpin>(
    reader: R,
    session: Session,
    handle: IrcHandle,
    inbound: mpsc::UnboundedSender<Inbound>,
) {
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                error!("IRC server closed the connection");
                break;
            }
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let Some(msg) = IrcMessage::parse(&line) else {
                    continue;
                };
                for action in session.handle(&msg) {
                    match action {
                        Action::Send(out) => handle.send(out),
                        Action::Deliver(cmd) => {
                            if inbound.send(cmd).is_err() {
                                return;
                            }
                        }
                    }
                }
            }
            Err(e) => {
                error!("Failed to read from IRC server: {}", e);
                break;
            }
        }
    }
}
