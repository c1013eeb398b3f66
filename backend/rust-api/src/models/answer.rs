use serde::{Deserialize, Serialize};

use crate::models::content::{GameKind, Subject};

/// Outcome of validating a draft against its prompt. Computed once per
/// submit, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub correct: bool,
    /// Pairing games report which pairs were individually right so the
    /// wrong ones can be pruned while the right ones stay connected.
    pub pairing: Option<PairingBreakdown>,
}

impl Verdict {
    pub fn simple(correct: bool) -> Self {
        Self {
            correct,
            pairing: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingBreakdown {
    pub matched: Vec<Pair>,
    pub mismatched: Vec<Pair>,
}

/// One drawn connection: the left entry and the id of the card placed on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pair {
    pub left: String,
    pub card: String,
}

/// Identifies one attempt counter: per learner, per period, per subject,
/// per game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptKey {
    pub student_id: String,
    pub period: u8,
    pub subject: Subject,
    pub game: GameKind,
}

impl AttemptKey {
    /// Deterministic record id, so concurrent submits from two tabs land on
    /// the same document and race only through the store's atomic `$inc`.
    pub fn record_id(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.student_id, self.period, self.subject, self.game
        )
    }
}

/// Append-only counters; a submit increments exactly one of the two. Field
/// names match what the legacy client wrote to Firestore.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptCounters {
    #[serde(default, rename = "correctCount")]
    pub correct_count: u32,
    #[serde(default, rename = "incorrectCount")]
    pub incorrect_count: u32,
}

#[derive(Debug, Serialize)]
pub struct SubmitAnswerResponse {
    pub correct: bool,
    pub feedback: String,
    /// True exactly when this submit triggered the celebration hook.
    pub celebrate: bool,
    /// Pairing games: the connections kept after pruning the wrong ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retained_pairs: Option<Vec<Pair>>,
    /// Milliseconds until the next round replaces the prompt (correct
    /// answers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_round_in_ms: Option<u64>,
}
