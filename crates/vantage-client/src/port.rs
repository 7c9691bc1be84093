// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Transport ports.
//!
//! The session talks to the renderer through two collaborators: a
//! [`RequestSender`] for outbound messages and a channel of inbound
//! [`Message`]s (see [`crate::SceneSession::attach`]). [`spawn_framed`] wires
//! both to any byte stream using the packet framing from
//! [`vantage_proto::wire`].

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};
use vantage_proto::wire::{decode_message, encode_message, WireError, CHECKSUM_LEN, HEADER_LEN};
use vantage_proto::Message;

use crate::ClientError;

/// Largest payload [`read_message`] will buffer.
pub const MAX_PAYLOAD_LEN: usize = 64 * 1024 * 1024;

/// Outbound half of a renderer connection.
pub trait RequestSender: Send + Sync {
    /// Hands `message` to the transport without waiting for delivery.
    fn send(&self, message: Message) -> Result<(), ClientError>;
}

/// [`RequestSender`] over an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSender {
    tx: UnboundedSender<Message>,
}

impl ChannelSender {
    /// Wraps the sending half of a channel.
    pub fn new(tx: UnboundedSender<Message>) -> Self {
        Self { tx }
    }

    /// Sender plus the receiving end a transport task drains.
    pub fn channel() -> (Self, UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl RequestSender for ChannelSender {
    fn send(&self, message: Message) -> Result<(), ClientError> {
        trace!(op = message.op_name(), "queueing request");
        self.tx.send(message).map_err(|_| ClientError::Closed)
    }
}

/// Reads one framed message. `Ok(None)` when the stream ends cleanly
/// between packets.
///
/// Buffers the full header first so short reads cannot desynchronize the
/// framing.
pub async fn read_message<R>(reader: &mut R) -> Result<Option<(Message, u64)>, ClientError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_LEN];
    let mut read = 0usize;
    while read < header.len() {
        let n = reader.read(&mut header[read..]).await?;
        if n == 0 {
            if read == 0 {
                return Ok(None);
            }
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("truncated frame header: read {read} of {HEADER_LEN} bytes"),
            )
            .into());
        }
        read += n;
    }
    let len = u32::from_be_bytes([header[8], header[9], header[10], header[11]]) as usize;
    if len > MAX_PAYLOAD_LEN {
        return Err(WireError::TooLarge(len).into());
    }
    let mut packet = vec![0u8; HEADER_LEN + len + CHECKSUM_LEN];
    packet[..HEADER_LEN].copy_from_slice(&header);
    reader.read_exact(&mut packet[HEADER_LEN..]).await?;
    let (message, ts, _) = decode_message(&packet)?;
    Ok(Some((message, ts)))
}

/// Writes one framed message stamped with `ts`.
pub async fn write_message<W>(writer: &mut W, message: &Message, ts: u64) -> Result<(), ClientError>
where
    W: AsyncWrite + Unpin,
{
    let packet = encode_message(message, ts)?;
    writer.write_all(&packet).await?;
    writer.flush().await?;
    Ok(())
}

/// Running framed connection returned by [`spawn_framed`].
pub struct FramedConnection {
    /// Outbound requests.
    pub sender: ChannelSender,
    /// Inbound messages, ready for [`crate::SceneSession::attach`].
    pub inbound: UnboundedReceiver<Message>,
    /// Reader task; ends when the stream closes or a frame is corrupt.
    pub reader: JoinHandle<Result<(), ClientError>>,
    /// Writer task; ends when every sender is dropped.
    pub writer: JoinHandle<Result<(), ClientError>>,
}

/// Splits `stream` into a reader task and a writer task bridged to channels.
pub fn spawn_framed<S>(stream: S) -> FramedConnection
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (mut read_half, mut write_half) = tokio::io::split(stream);
    let (sender, mut outbound) = ChannelSender::channel();
    let (inbound_tx, inbound) = mpsc::unbounded_channel();

    let writer = tokio::spawn(async move {
        let mut ts = 0u64;
        while let Some(message) = outbound.recv().await {
            ts += 1;
            write_message(&mut write_half, &message, ts).await?;
            debug!(op = message.op_name(), ts, "request written");
        }
        write_half.shutdown().await?;
        Ok(())
    });

    let reader = tokio::spawn(async move {
        loop {
            match read_message(&mut read_half).await {
                Ok(Some((message, ts))) => {
                    trace!(op = message.op_name(), ts, "message read");
                    if inbound_tx.send(message).is_err() {
                        return Ok(());
                    }
                }
                Ok(None) => {
                    debug!("stream closed");
                    return Ok(());
                }
                Err(err) => {
                    warn!(%err, "dropping connection after unreadable frame");
                    return Err(err);
                }
            }
        }
    });

    FramedConnection {
        sender,
        inbound,
        reader,
        writer,
    }
}
