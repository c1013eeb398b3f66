use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod answer;
pub mod catalog;
pub mod content;
pub mod draft;
pub mod student;

use answer::AttemptKey;
use content::{
    GameKind, Operation, Prompt, PromptBody, SortDirection, Subject, COMPARISON_SIGNS,
    FULL_ALPHABET,
};
use draft::AnswerDraft;

/// One learner playing one mini-game. Owns its round state; nothing is
/// shared between sessions.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub id: String,
    pub student_id: String,
    pub subject: Subject,
    pub game: GameKind,
    pub period: u8,
    pub operation: Operation,
    pub phase: SessionPhase,
    pub prompt: Option<Prompt>,
    pub draft: AnswerDraft,
    pub feedback: Option<String>,
    /// Round counter; also guards the delayed round advance against
    /// submits that raced it.
    pub round: u64,
    pub started_at: DateTime<Utc>,
}

impl GameSession {
    pub fn attempt_key(&self) -> AttemptKey {
        AttemptKey {
            student_id: self.student_id.clone(),
            period: self.period,
            subject: self.subject,
            game: self.game,
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            id: self.id.clone(),
            student_id: self.student_id.clone(),
            subject: self.subject,
            game: self.game,
            period: self.period,
            phase: self.phase,
            prompt: self.prompt.as_ref().map(PromptView::from_prompt),
            draft: self.draft.clone(),
            feedback: self.feedback.clone(),
            round: self.round,
        }
    }
}

/// Resting states of the round lifecycle. Validation happens synchronously
/// inside submit; an incorrect answer drops straight back to
/// `AwaitingInput`, a correct one holds `Correct` until the delayed round
/// advance returns to `Loading` and then `AwaitingInput`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Loading,
    AwaitingInput,
    Correct,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub student_id: String,
    pub subject: Subject,
    pub game: GameKind,
    /// Defaults to the active period when omitted.
    pub period: Option<u8>,
    /// Only meaningful for the `operations` game.
    pub operation: Option<Operation>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: String,
    pub student_id: String,
    pub subject: Subject,
    pub game: GameKind,
    pub period: u8,
    pub phase: SessionPhase,
    pub prompt: Option<PromptView>,
    pub draft: AnswerDraft,
    pub feedback: Option<String>,
    pub round: u64,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub source: String,
    pub dest: String,
    pub item: String,
    pub position: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub slot: String,
    pub text: String,
}

/// Client-facing prompt: everything needed to render the round, nothing
/// that gives the answer away for the drag-and-drop games.
#[derive(Debug, Serialize)]
pub struct PromptView {
    pub id: String,
    pub game: GameKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    pub display: PromptDisplay,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromptDisplay {
    Classification {
        categories: Vec<CategoryView>,
        words: Vec<String>,
    },
    Pairing {
        left: Vec<String>,
        cards: Vec<CardView>,
    },
    Ordering {
        cards: Vec<NumberCardView>,
        direction: SortDirection,
    },
    Arithmetic {
        left: u32,
        right: u32,
        operation: Operation,
    },
    Comparison {
        left: u32,
        right: u32,
        signs: Vec<String>,
    },
    /// Hand angles only; the digits are the answer.
    Clock { hour_deg: f64, minute_deg: f64 },
    /// 26 cells, `None` where the learner has to fill in the letter.
    Alphabet { letters: Vec<Option<char>> },
    Sentence {
        sentence: String,
        tools: Vec<String>,
    },
}

#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub name: String,
    pub definition: String,
}

#[derive(Debug, Serialize)]
pub struct CardView {
    pub id: String,
    pub display: String,
}

#[derive(Debug, Serialize)]
pub struct NumberCardView {
    pub id: String,
    pub value: u32,
}

impl PromptView {
    pub fn from_prompt(prompt: &Prompt) -> Self {
        let display = match &prompt.body {
            PromptBody::Classification { categories, items } => PromptDisplay::Classification {
                categories: categories
                    .iter()
                    .map(|c| CategoryView {
                        name: c.name.clone(),
                        definition: c.definition.clone(),
                    })
                    .collect(),
                words: items.iter().map(|item| item.display.clone()).collect(),
            },
            PromptBody::Pairing { left, cards, .. } => PromptDisplay::Pairing {
                left: left.clone(),
                cards: cards
                    .iter()
                    .map(|card| CardView {
                        id: card.id.clone(),
                        display: card.display.clone(),
                    })
                    .collect(),
            },
            PromptBody::Ordering { cards, direction } => PromptDisplay::Ordering {
                cards: cards
                    .iter()
                    .map(|card| NumberCardView {
                        id: card.id.clone(),
                        value: card.value,
                    })
                    .collect(),
                direction: *direction,
            },
            PromptBody::Arithmetic {
                left,
                right,
                operation,
                ..
            } => PromptDisplay::Arithmetic {
                left: *left,
                right: *right,
                operation: *operation,
            },
            PromptBody::Comparison { left, right } => PromptDisplay::Comparison {
                left: *left,
                right: *right,
                signs: COMPARISON_SIGNS.iter().map(|s| s.to_string()).collect(),
            },
            PromptBody::Clock { hours, minutes } => PromptDisplay::Clock {
                hour_deg: f64::from(hours % 12) * 30.0 + f64::from(*minutes) * 0.5,
                minute_deg: f64::from(*minutes) * 6.0,
            },
            PromptBody::AlphabetFill { missing } => PromptDisplay::Alphabet {
                letters: FULL_ALPHABET
                    .iter()
                    .enumerate()
                    .map(|(index, letter)| {
                        if missing.contains(&index) {
                            None
                        } else {
                            Some(char::from(*letter))
                        }
                    })
                    .collect(),
            },
            PromptBody::Sentence {
                sentence, tools, ..
            } => PromptDisplay::Sentence {
                sentence: sentence.clone(),
                tools: tools.clone(),
            },
        };

        Self {
            id: prompt.id.clone(),
            game: prompt.game,
            theme: prompt.theme.clone(),
            instruction: instruction_for(prompt),
            display,
        }
    }
}

fn instruction_for(prompt: &Prompt) -> Option<String> {
    let text = match (&prompt.game, &prompt.body) {
        (GameKind::Ordre, PromptBody::Ordering { direction, .. }) => {
            let label = match direction {
                SortDirection::Asc => "Croissant",
                SortDirection::Desc => "Décroissant",
            };
            format!("Trier en ordre : {label}")
        }
        (GameKind::Comparaison, _) => "Glisse le signe correct entre les nombres !".to_string(),
        (GameKind::ClockGame, _) => "Lis l'heure sur l'horloge et saisis-la :".to_string(),
        (GameKind::Alphabet, _) => "Remplissez les lettres manquantes :".to_string(),
        (GameKind::Relier, _) => "Relie les éléments entre eux".to_string(),
        (GameKind::Classification, _) => {
            "Classe les mots dans les bonnes catégories".to_string()
        }
        (GameKind::Ponctuation | GameKind::Pronoms, _) => "Corrige la phrase".to_string(),
        _ => return None,
    };
    Some(text)
}
