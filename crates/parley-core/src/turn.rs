//! Conversation turn types.
//!
//! A [`Turn`] is one message in the conversation. Turns are immutable once
//! created; the only way to obtain one is through the validating constructors,
//! so every turn in a transcript carries non-empty text.

use serde::{Deserialize, Serialize};

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// Text typed by the user.
    User,
    /// Text generated by the remote endpoint.
    Assistant,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Sender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session-local identity of a turn.
///
/// Ids are handed out by the session state in creation order, so two turns
/// with identical text are still distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TurnId(pub u64);

/// A single message in the transcript.
///
/// Deserialization goes through the same validation as the constructors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TurnRecord")]
pub struct Turn {
    id: TurnId,
    sender: Sender,
    text: String,
}

impl Turn {
    /// Creates a user turn from raw input.
    ///
    /// Leading and trailing whitespace is trimmed. Returns `None` when nothing
    /// is left after trimming.
    pub fn user(id: TurnId, input: &str) -> Option<Self> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            id,
            sender: Sender::User,
            text: text.to_string(),
        })
    }

    /// Creates an assistant turn from a generated reply.
    ///
    /// The reply is stored verbatim. Returns `None` for a reply that is empty
    /// or whitespace only.
    pub fn assistant(id: TurnId, reply: impl Into<String>) -> Option<Self> {
        let text = reply.into();
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            id,
            sender: Sender::Assistant,
            text,
        })
    }

    pub fn id(&self) -> TurnId {
        self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Wire shape of a [`Turn`] before validation.
#[derive(Deserialize)]
struct TurnRecord {
    id: TurnId,
    sender: Sender,
    text: String,
}

impl TryFrom<TurnRecord> for Turn {
    type Error = String;

    fn try_from(record: TurnRecord) -> Result<Self, Self::Error> {
        let sender = record.sender;
        let turn = match sender {
            // Stored user text is already trimmed.
            Sender::User => {
                Turn::user(record.id, &record.text).filter(|turn| turn.text == record.text)
            }
            Sender::Assistant => Turn::assistant(record.id, record.text),
        };
        turn.ok_or_else(|| format!("{sender} turn text must be non-empty and trimmed"))
    }
}
