//! Bounded rolling transcript of the form conversation.
//!
//! Each session owns its transcript; nothing is shared across sessions and
//! nothing survives the process. Only the most recent turns are kept, since
//! the extraction prompt has no use for stale context.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    /// Returns the label used when rendering the transcript into a prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One utterance in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    speaker: Speaker,
    text: String,
}

impl Turn {
    /// Creates a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    /// Creates an assistant turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Rolling window over the last [`Transcript::MAX_TURNS`] turns.
///
/// Pushing onto a full transcript silently drops the oldest turn; eviction
/// is by count, never by time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: VecDeque<Turn>,
}

impl Transcript {
    /// Upper bound on retained turns.
    pub const MAX_TURNS: usize = 10;

    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a turn, evicting the oldest when full.
    pub fn push(&mut self, turn: Turn) {
        while self.turns.len() >= Self::MAX_TURNS {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Iterates turns oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    /// Renders the transcript for inclusion in a prompt, one turn per line.
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("{}: {}", t.speaker().label(), t.text()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
