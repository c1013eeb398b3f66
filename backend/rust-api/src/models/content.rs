use std::fmt;

use serde::{Deserialize, Serialize};

/// Subject identifiers, kept wire-compatible with the web client's
/// `?subject=` query values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    #[serde(rename = "mathsGame")]
    Maths,
    #[serde(rename = "frenchGame")]
    French,
    #[serde(rename = "englishGame")]
    English,
    #[serde(rename = "discoveryWorldGame")]
    DiscoveryWorld,
}

impl Subject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Maths => "mathsGame",
            Subject::French => "frenchGame",
            Subject::English => "englishGame",
            Subject::DiscoveryWorld => "discoveryWorldGame",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mini-game identifiers. The string forms are the per-game stat keys the
/// client has always written, so they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    #[serde(rename = "operations")]
    Operations,
    #[serde(rename = "ordre")]
    Ordre,
    #[serde(rename = "comparaison")]
    Comparaison,
    #[serde(rename = "clock-game")]
    ClockGame,
    #[serde(rename = "alphabet")]
    Alphabet,
    #[serde(rename = "ponctuation")]
    Ponctuation,
    #[serde(rename = "pronoms")]
    Pronoms,
    #[serde(rename = "relier")]
    Relier,
    #[serde(rename = "classification")]
    Classification,
}

impl GameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Operations => "operations",
            GameKind::Ordre => "ordre",
            GameKind::Comparaison => "comparaison",
            GameKind::ClockGame => "clock-game",
            GameKind::Alphabet => "alphabet",
            GameKind::Ponctuation => "ponctuation",
            GameKind::Pronoms => "pronoms",
            GameKind::Relier => "relier",
            GameKind::Classification => "classification",
        }
    }

    /// Subjects a game may be started under. `relier` exists both as the
    /// English vocabulary game and the French conjugation game.
    pub fn subjects(&self) -> &'static [Subject] {
        match self {
            GameKind::Operations
            | GameKind::Ordre
            | GameKind::Comparaison
            | GameKind::ClockGame => &[Subject::Maths],
            GameKind::Alphabet | GameKind::Ponctuation | GameKind::Pronoms => &[Subject::French],
            GameKind::Relier => &[Subject::English, Subject::French],
            GameKind::Classification => &[Subject::DiscoveryWorld],
        }
    }

    pub fn success_feedback(&self) -> &'static str {
        match self {
            GameKind::Operations | GameKind::Comparaison | GameKind::ClockGame => {
                "Bravo ! Bonne réponse 🎉"
            }
            GameKind::Ordre => "Bravo ! tu as bien classé tous les nombres 🎉",
            GameKind::Relier => "Bravo ! Toutes les connexions sont correctes 🎉",
            GameKind::Alphabet | GameKind::Classification => {
                "Bravo ! Toutes les réponses sont correctes 🎉"
            }
            GameKind::Ponctuation | GameKind::Pronoms => "Bravo ! La correction est parfaite !",
        }
    }

    pub fn failure_feedback(&self) -> &'static str {
        match self {
            GameKind::Relier | GameKind::ClockGame | GameKind::Classification => {
                "Incorrect, essaie encore !"
            }
            GameKind::Alphabet => "Certaines réponses sont incorrectes. Réessaye !",
            _ => "Ce n'est pas correct. Essayez encore !",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Addition,
    Soustraction,
}

/// One atomic piece of round content: a word card, a sign card, a right-hand
/// pairing card. `label` is the ground-truth answer attached to the item and
/// never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub display: String,
    pub label: String,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        display: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display: display.into(),
            label: label.into(),
        }
    }
}

/// A draggable number card for the sorting game. Ids stay stable even when
/// two cards carry the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberCard {
    pub id: String,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub definition: String,
}

/// Slot identifiers shared between the prompt layout, the answer draft and
/// the validators.
pub const TRAY_SLOT: &str = "propositions";
pub const SIGNS_TRAY_SLOT: &str = "signs";
pub const SIGN_SLOT: &str = "sign";
pub const SEQUENCE_SLOT: &str = "sequence";
pub const RESULT_SLOT: &str = "result";
pub const TIME_SLOT: &str = "time";
pub const SENTENCE_SLOT: &str = "sentence";

pub fn letter_slot(index: usize) -> String {
    format!("letter:{index}")
}

pub const FULL_ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub const COMPARISON_SIGNS: [&str; 3] = ["<", ">", "="];

/// One challenge instance. Immutable once generated; a new round always gets
/// a fresh `Prompt` with a fresh id.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub id: String,
    pub game: GameKind,
    pub theme: Option<String>,
    pub body: PromptBody,
}

#[derive(Debug, Clone)]
pub enum PromptBody {
    /// Drag words into categories; every word must end up in its own
    /// category and the tray must be empty.
    Classification {
        categories: Vec<Category>,
        items: Vec<Item>,
    },
    /// Connect each left entry to a right-hand card. `pairs` is the
    /// ground-truth table; `cards` are the shuffled right-hand cards (their
    /// labels may repeat: "je" and "il,elle" both map to "mange").
    Pairing {
        pairs: Vec<(String, String)>,
        left: Vec<String>,
        cards: Vec<Item>,
    },
    /// Rearrange the cards into the fully sorted sequence.
    Ordering {
        cards: Vec<NumberCard>,
        direction: SortDirection,
    },
    Arithmetic {
        left: u32,
        right: u32,
        operation: Operation,
        answer: i64,
    },
    Comparison {
        left: u32,
        right: u32,
    },
    Clock {
        hours: u32,
        minutes: u32,
    },
    /// Fill the missing letters of the uppercase alphabet (indexes into
    /// `FULL_ALPHABET`).
    AlphabetFill { missing: Vec<usize> },
    /// Rebuild a sentence with the offered tools; any member of `accepted`
    /// counts as correct, exactly as the original correction games behaved.
    Sentence {
        sentence: String,
        tools: Vec<String>,
        accepted: Vec<String>,
    },
}

impl Prompt {
    /// The sign the comparison game expects for its number pair.
    pub fn comparison_sign(left: u32, right: u32) -> &'static str {
        match left.cmp(&right) {
            std::cmp::Ordering::Less => "<",
            std::cmp::Ordering::Greater => ">",
            std::cmp::Ordering::Equal => "=",
        }
    }
}
