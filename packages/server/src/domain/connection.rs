//! Connection handles attached to room members.
//!
//! A `ConnectionChannel` is the server-side handle of one live WebSocket
//! connection. Sending only enqueues the frame on a bounded queue that the
//! connection's writer task drains, so broadcasting under a room lock never
//! waits on a slow peer and every recipient sees frames in enqueue order. A
//! peer that stops reading loses frames once its queue is full.

use std::fmt;

use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};

/// Frames a connection may have queued before further sends are dropped.
pub const OUTBOX_CAPACITY: usize = 256;

/// A transport-independent WebSocket frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
    Close,
}

/// Which of the two per-member channels a connection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Raw drawing-surface data, relayed without interpretation
    Draw,
    /// Structured game protocol messages
    Room,
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Draw => write!(f, "draw"),
            ChannelKind::Room => write!(f, "room"),
        }
    }
}

/// Identity of one connection, used to tell a stale handle from its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(uuid::Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The writer side of the connection is gone
    #[error("Connection {0} is closed")]
    WriteFailure(ConnectionId),

    /// The peer is not draining its queue
    #[error("Connection {0} has a full outbox")]
    Backlogged(ConnectionId),
}

/// Server-side handle of one open connection.
#[derive(Debug, Clone)]
pub struct ConnectionChannel {
    id: ConnectionId,
    kind: ChannelKind,
    sender: mpsc::Sender<Frame>,
}

impl ConnectionChannel {
    /// Create a handle together with the outbox its writer task drains.
    pub fn open(kind: ChannelKind) -> (Self, Outbox) {
        let (sender, receiver) = mpsc::channel(OUTBOX_CAPACITY);
        let channel = Self {
            id: ConnectionId::generate(),
            kind,
            sender,
        };
        (channel, Outbox { receiver })
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// Queue a frame for delivery.
    ///
    /// # Errors
    ///
    /// * `ConnectionError::WriteFailure` - the writer task has stopped
    /// * `ConnectionError::Backlogged` - the queue is full; the frame is dropped
    pub fn send(&self, frame: Frame) -> Result<(), ConnectionError> {
        self.sender.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => ConnectionError::Backlogged(self.id),
            TrySendError::Closed(_) => ConnectionError::WriteFailure(self.id),
        })
    }

    /// Ask the writer task to send a close frame and stop.
    ///
    /// When the queue is full the writer still stops once every handle is
    /// dropped and the queue drains.
    pub fn close(&self) {
        if let Err(e) = self.send(Frame::Close) {
            tracing::debug!("Close frame not queued: {}", e);
        }
    }
}

/// Receiving end of a `ConnectionChannel`, owned by the writer task.
#[derive(Debug)]
pub struct Outbox {
    receiver: mpsc::Receiver<Frame>,
}

impl Outbox {
    /// Wait for the next frame to write. `None` once every handle is dropped.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        self.receiver.recv().await
    }

    /// Take an already queued frame without waiting.
    pub fn try_next_frame(&mut self) -> Option<Frame> {
        self.receiver.try_recv().ok()
    }
}
