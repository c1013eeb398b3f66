use std::collections::BTreeSet;
use std::sync::Arc;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use uuid::Uuid;

use crate::errors::GameError;
use crate::metrics::ROUNDS_GENERATED_TOTAL;
use crate::models::catalog::{GameCatalog, PairingTheme, SentenceBank};
use crate::models::content::{
    GameKind, Item, NumberCard, Operation, Prompt, PromptBody, SortDirection, Subject,
};

/// Period-indexed difficulty ranges for the numeric games.
const PERIOD_RANGES: [(u32, u32); 3] = [(0, 20), (0, 60), (0, 69)];

pub const ORDERING_DRAW: usize = 6;
pub const CLASSIFICATION_DRAW: usize = 5;

/// Content provider: turns a (subject, game, period) triple and the catalog
/// into a fresh immutable `Prompt`, never repeating the previous theme when
/// an alternative exists.
pub struct ContentService {
    catalog: Arc<GameCatalog>,
}

pub fn period_range(period: u8) -> Result<(u32, u32), GameError> {
    let index = usize::from(period).checked_sub(1);
    index
        .and_then(|i| PERIOD_RANGES.get(i))
        .copied()
        .ok_or_else(|| {
            GameError::InvalidConfiguration(format!(
                "period {period} is out of range 1..={}",
                PERIOD_RANGES.len()
            ))
        })
}

impl ContentService {
    pub fn new(catalog: Arc<GameCatalog>) -> Self {
        Self { catalog }
    }

    pub fn next_prompt(
        &self,
        subject: Subject,
        game: GameKind,
        period: u8,
        operation: Operation,
        previous_theme: Option<&str>,
    ) -> Result<Prompt, GameError> {
        self.next_prompt_with(&mut rand::rng(), subject, game, period, operation, previous_theme)
    }

    pub fn next_prompt_with<R: Rng>(
        &self,
        rng: &mut R,
        subject: Subject,
        game: GameKind,
        period: u8,
        operation: Operation,
        previous_theme: Option<&str>,
    ) -> Result<Prompt, GameError> {
        // Bad difficulty aborts before any round state is touched.
        period_range(period)?;

        let (theme, body) = match game {
            GameKind::Operations => (None, self.arithmetic(rng, period, operation)?),
            GameKind::Comparaison => (None, self.comparison(rng, period)?),
            GameKind::Ordre => (None, self.ordering(rng, period)?),
            GameKind::ClockGame => (None, Self::clock(rng)),
            GameKind::Alphabet => (None, Self::alphabet(rng)),
            GameKind::Relier => {
                let themes = self.catalog.pairing_themes(subject).ok_or_else(|| {
                    GameError::InvalidConfiguration(format!(
                        "no pairing themes configured for subject {subject}"
                    ))
                })?;
                let theme =
                    pick_theme(rng, themes, |t: &PairingTheme| t.name.as_str(), previous_theme)?;
                (Some(theme.name.clone()), Self::pairing(rng, theme))
            }
            GameKind::Classification => {
                let theme = pick_theme(
                    rng,
                    &self.catalog.classification,
                    |t| t.name.as_str(),
                    previous_theme,
                )?;
                (Some(theme.name.clone()), Self::classification(rng, theme))
            }
            GameKind::Ponctuation => (None, Self::sentence(rng, &self.catalog.ponctuation)?),
            GameKind::Pronoms => (None, Self::sentence(rng, &self.catalog.pronoms)?),
        };

        ROUNDS_GENERATED_TOTAL
            .with_label_values(&[game.as_str()])
            .inc();

        Ok(Prompt {
            id: Uuid::new_v4().to_string(),
            game,
            theme,
            body,
        })
    }

    fn arithmetic<R: Rng>(
        &self,
        rng: &mut R,
        period: u8,
        operation: Operation,
    ) -> Result<PromptBody, GameError> {
        let (min, max) = period_range(period)?;
        let a = rng.random_range(min..=max);
        let b = rng.random_range(min..=max);
        // Larger operand first, so subtraction never goes negative.
        let (left, right) = if a >= b { (a, b) } else { (b, a) };
        let answer = match operation {
            Operation::Addition => i64::from(left) + i64::from(right),
            Operation::Soustraction => i64::from(left) - i64::from(right),
        };
        Ok(PromptBody::Arithmetic {
            left,
            right,
            operation,
            answer,
        })
    }

    fn comparison<R: Rng>(&self, rng: &mut R, period: u8) -> Result<PromptBody, GameError> {
        let (min, max) = period_range(period)?;
        Ok(PromptBody::Comparison {
            left: rng.random_range(min..=max),
            right: rng.random_range(min..=max),
        })
    }

    fn ordering<R: Rng>(&self, rng: &mut R, period: u8) -> Result<PromptBody, GameError> {
        let (min, max) = period_range(period)?;
        let mut values: Vec<u32> = (min..=max).collect();
        values.shuffle(rng);
        values.truncate(ORDERING_DRAW);

        let direction = if rng.random_bool(0.5) {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        };

        Ok(PromptBody::Ordering {
            cards: values
                .into_iter()
                .enumerate()
                .map(|(i, value)| NumberCard {
                    id: format!("n{i}"),
                    value,
                })
                .collect(),
            direction,
        })
    }

    fn clock<R: Rng>(rng: &mut R) -> PromptBody {
        PromptBody::Clock {
            hours: rng.random_range(1..=12),
            minutes: rng.random_range(0..12) * 5,
        }
    }

    fn alphabet<R: Rng>(rng: &mut R) -> PromptBody {
        let count = rng.random_range(3..=7);
        let mut missing = BTreeSet::new();
        while missing.len() < count {
            missing.insert(rng.random_range(0..26usize));
        }
        PromptBody::AlphabetFill {
            missing: missing.into_iter().collect(),
        }
    }

    fn pairing<R: Rng>(rng: &mut R, theme: &PairingTheme) -> PromptBody {
        let mut drawn = theme.pairs.clone();
        drawn.shuffle(rng);
        drawn.truncate(theme.draw);

        let left: Vec<String> = drawn.iter().map(|(l, _)| l.clone()).collect();
        let mut rights: Vec<String> = drawn.iter().map(|(_, r)| r.clone()).collect();
        rights.shuffle(rng);
        let cards = rights
            .into_iter()
            .enumerate()
            .map(|(i, value)| Item::new(format!("r{i}"), value.clone(), value))
            .collect();

        PromptBody::Pairing {
            pairs: drawn,
            left,
            cards,
        }
    }

    fn classification<R: Rng>(
        rng: &mut R,
        theme: &crate::models::catalog::ClassificationTheme,
    ) -> PromptBody {
        let mut words = theme.words.clone();
        words.shuffle(rng);
        words.truncate(CLASSIFICATION_DRAW);

        PromptBody::Classification {
            categories: theme.categories.clone(),
            items: words
                .into_iter()
                .map(|(word, category)| Item::new(word.clone(), word, category))
                .collect(),
        }
    }

    fn sentence<R: Rng>(rng: &mut R, bank: &SentenceBank) -> Result<PromptBody, GameError> {
        let sentence = bank.sentences.choose(rng).ok_or_else(|| {
            GameError::InvalidConfiguration("sentence bank is empty".to_string())
        })?;
        Ok(PromptBody::Sentence {
            sentence: sentence.clone(),
            tools: bank.tools.clone(),
            accepted: bank.accepted.clone(),
        })
    }
}

/// Uniform resampling until the drawn theme differs from the previous one.
/// Terminates almost surely; the constraint is waived when only one theme
/// exists.
fn pick_theme<'a, T, F>(
    rng: &mut impl Rng,
    themes: &'a [T],
    name: F,
    previous: Option<&str>,
) -> Result<&'a T, GameError>
where
    F: Fn(&T) -> &str,
{
    if themes.is_empty() {
        return Err(GameError::InvalidConfiguration(
            "no themes configured".to_string(),
        ));
    }
    loop {
        let theme = themes.choose(rng).unwrap();
        if themes.len() == 1 || previous != Some(name(theme)) {
            return Ok(theme);
        }
    }
}
