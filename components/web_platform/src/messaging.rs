//! Message protocol between the foreground page and the worker.
//!
//! The foreground holds a [`MessageClient`]; the worker drains the matching
//! [`WorkerInbox`]. A request that wants an answer carries a [`ReplyPort`],
//! which is consumed by the single reply sent through it.

use core_types::NotificationOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

/// Commands the foreground can send to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerMessage {
    /// Display a notification from the worker registration
    ShowNotification {
        title: String,
        #[serde(default)]
        options: NotificationOptions,
    },
    /// Report the current generation name and contents
    GetCacheStatus,
    /// Delete every cache generation
    ClearCache,
}

impl WorkerMessage {
    /// Wire names of every known message type.
    pub const TYPES: [&'static str; 3] = ["SHOW_NOTIFICATION", "GET_CACHE_STATUS", "CLEAR_CACHE"];

    /// The wire name of this message.
    pub fn type_name(&self) -> &'static str {
        match self {
            WorkerMessage::ShowNotification { .. } => "SHOW_NOTIFICATION",
            WorkerMessage::GetCacheStatus => "GET_CACHE_STATUS",
            WorkerMessage::ClearCache => "CLEAR_CACHE",
        }
    }

    /// Decode a structured message, separating unknown types from
    /// malformed known ones.
    pub fn from_value(value: serde_json::Value) -> Result<Self, MessageError> {
        let kind = value
            .get("type")
            .and_then(|kind| kind.as_str())
            .ok_or_else(|| MessageError::Malformed("missing \"type\"".to_string()))?;

        if !Self::TYPES.contains(&kind) {
            return Err(MessageError::UnknownType(kind.to_string()));
        }

        serde_json::from_value(value).map_err(|e| MessageError::Malformed(e.to_string()))
    }

    /// Encode for posting.
    pub fn to_value(&self) -> Result<serde_json::Value, MessageError> {
        serde_json::to_value(self).map_err(|e| MessageError::Malformed(e.to_string()))
    }
}

/// Snapshot of the active cache generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatus {
    /// Generation name
    pub name: String,
    /// Number of cached entries
    pub size: usize,
    /// Cached URLs, sorted
    pub urls: Vec<String>,
}

/// Replies the worker sends back on a [`ReplyPort`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerReply {
    /// Answer to `GET_CACHE_STATUS`
    CacheStatus(CacheStatus),
    /// Answer to `CLEAR_CACHE`
    CacheCleared,
}

/// Message protocol failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// The `type` field names no known command
    #[error("unknown message type: {0}")]
    UnknownType(String),
    /// A known command with an unreadable payload
    #[error("malformed message: {0}")]
    Malformed(String),
    /// The worker side is gone
    #[error("worker is not receiving messages")]
    Disconnected,
    /// The worker dropped the reply port without answering
    #[error("reply port closed without a reply")]
    NoReply,
}

/// One-shot reply channel handed to the worker with a message.
#[derive(Debug)]
pub struct ReplyPort {
    sender: oneshot::Sender<WorkerReply>,
}

/// The foreground end of a [`ReplyPort`].
pub type ReplyReceiver = oneshot::Receiver<WorkerReply>;

impl ReplyPort {
    /// A fresh port and the receiver that will see its single reply.
    pub fn channel() -> (ReplyPort, ReplyReceiver) {
        let (sender, receiver) = oneshot::channel();
        (ReplyPort { sender }, receiver)
    }

    /// Send the reply. The port is consumed, so a second reply cannot be
    /// expressed.
    pub fn post(self, reply: WorkerReply) -> Result<(), MessageError> {
        self.sender.send(reply).map_err(|_| MessageError::NoReply)
    }
}

/// A message as it arrives in the worker.
#[derive(Debug)]
pub struct Envelope {
    /// Structured message body
    pub data: serde_json::Value,
    /// Reply channel, when the sender wants an answer
    pub reply: Option<ReplyPort>,
}

/// The worker's receiving end.
pub type WorkerInbox = mpsc::UnboundedReceiver<Envelope>;

/// The foreground's handle for posting to the worker.
#[derive(Debug, Clone)]
pub struct MessageClient {
    sender: mpsc::UnboundedSender<Envelope>,
}

impl MessageClient {
    /// A connected client/inbox pair.
    pub fn channel() -> (MessageClient, WorkerInbox) {
        let (sender, inbox) = mpsc::unbounded_channel();
        (MessageClient { sender }, inbox)
    }

    /// Post raw structured data without expecting a reply.
    pub fn post_value(&self, data: serde_json::Value) -> Result<(), MessageError> {
        self.sender
            .send(Envelope { data, reply: None })
            .map_err(|_| MessageError::Disconnected)
    }

    /// Post a command without expecting a reply.
    pub fn post(&self, message: &WorkerMessage) -> Result<(), MessageError> {
        self.post_value(message.to_value()?)
    }

    /// Post a command with a reply port and wait for the single reply.
    pub async fn request(&self, message: &WorkerMessage) -> Result<WorkerReply, MessageError> {
        let (port, receiver) = ReplyPort::channel();
        self.sender
            .send(Envelope {
                data: message.to_value()?,
                reply: Some(port),
            })
            .map_err(|_| MessageError::Disconnected)?;
        receiver.await.map_err(|_| MessageError::NoReply)
    }
}
