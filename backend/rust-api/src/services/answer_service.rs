use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::GameError;
use crate::models::answer::{Pair, PairingBreakdown, Verdict};
use crate::models::content::{
    letter_slot, Category, Item, NumberCard, Prompt, PromptBody, SortDirection, FULL_ALPHABET,
    RESULT_SLOT, SENTENCE_SLOT, SEQUENCE_SLOT, SIGN_SLOT, TIME_SLOT, TRAY_SLOT,
};
use crate::models::draft::AnswerDraft;

lazy_static! {
    static ref TIME_RE: Regex = Regex::new(r"^\s*(\d{1,2})\s*:\s*(\d{1,2})\s*$").unwrap();
}

pub const MALFORMED_NUMBER: &str = "Veuillez entrer un nombre valide.";
pub const MISSING_SIGN: &str = "Veuillez sélectionner un signe pour valider.";
pub const MALFORMED_TIME: &str = "Entre l'heure au format HH:MM.";

/// Decide correctness of a completed draft against its prompt.
///
/// Pure: no suspension, no side effects. `MalformedInput` is reserved for
/// entries that cannot be interpreted at all and is *not* an incorrect
/// answer (it records no attempt upstream).
pub fn evaluate(prompt: &Prompt, draft: &AnswerDraft) -> Result<Verdict, GameError> {
    match &prompt.body {
        PromptBody::Classification { categories, items } => {
            Ok(classification(categories, items, draft))
        }
        PromptBody::Pairing { pairs, left, cards } => Ok(pairing(pairs, left, cards, draft)),
        PromptBody::Ordering { cards, direction } => Ok(ordering(cards, *direction, draft)),
        PromptBody::Arithmetic { answer, .. } => arithmetic(*answer, draft),
        PromptBody::Comparison { left, right } => comparison(*left, *right, draft),
        PromptBody::Clock { hours, minutes } => clock(*hours, *minutes, draft),
        PromptBody::AlphabetFill { missing } => Ok(alphabet(missing, draft)),
        PromptBody::Sentence { accepted, .. } => Ok(Verdict::simple(
            accepted.iter().any(|s| s == draft.text(SENTENCE_SLOT)),
        )),
    }
}

/// Every item placed in category C must carry ground-truth label C, and no
/// item may be left on the tray.
fn classification(categories: &[Category], items: &[Item], draft: &AnswerDraft) -> Verdict {
    if !draft.slot_items(TRAY_SLOT).is_empty() {
        return Verdict::simple(false);
    }
    let mut placed = 0usize;
    for category in categories {
        for id in draft.slot_items(&category.name) {
            placed += 1;
            let well_placed = items
                .iter()
                .any(|item| &item.id == id && item.label == category.name);
            if !well_placed {
                return Verdict::simple(false);
            }
        }
    }
    Verdict::simple(placed == items.len())
}

/// Each pair is judged on its own so the caller can keep the right ones and
/// discard the rest.
fn pairing(
    pairs: &[(String, String)],
    left: &[String],
    cards: &[Item],
    draft: &AnswerDraft,
) -> Verdict {
    let mut matched = Vec::new();
    let mut mismatched = Vec::new();

    for entry in left {
        let Some(card_id) = draft.slot_items(entry).first() else {
            continue;
        };
        let value = cards
            .iter()
            .find(|card| &card.id == card_id)
            .map(|card| card.label.as_str());
        let pair = Pair {
            left: entry.clone(),
            card: card_id.clone(),
        };
        let is_match =
            value.is_some_and(|v| pairs.iter().any(|(l, r)| l == entry && r == v));
        if is_match {
            matched.push(pair);
        } else {
            mismatched.push(pair);
        }
    }

    let correct = matched.len() == pairs.len() && mismatched.is_empty();
    Verdict {
        correct,
        pairing: Some(PairingBreakdown {
            matched,
            mismatched,
        }),
    }
}

/// Exact sequence identity against the canonical sort of the same multiset;
/// "mostly sorted" does not pass.
fn ordering(cards: &[NumberCard], direction: SortDirection, draft: &AnswerDraft) -> Verdict {
    let sequence = draft.slot_items(SEQUENCE_SLOT);
    if sequence.len() != cards.len() {
        return Verdict::simple(false);
    }
    let values: Vec<u32> = sequence
        .iter()
        .filter_map(|id| cards.iter().find(|card| &card.id == id))
        .map(|card| card.value)
        .collect();
    if values.len() != cards.len() {
        return Verdict::simple(false);
    }

    let mut expected: Vec<u32> = cards.iter().map(|card| card.value).collect();
    expected.sort_unstable();
    if direction == SortDirection::Desc {
        expected.reverse();
    }

    Verdict::simple(values == expected)
}

fn arithmetic(answer: i64, draft: &AnswerDraft) -> Result<Verdict, GameError> {
    let raw = draft.text(RESULT_SLOT).trim().to_string();
    let parsed: i64 = raw
        .parse()
        .map_err(|_| GameError::MalformedInput(MALFORMED_NUMBER.to_string()))?;
    Ok(Verdict::simple(parsed == answer))
}

fn comparison(left: u32, right: u32, draft: &AnswerDraft) -> Result<Verdict, GameError> {
    let Some(sign) = draft.slot_items(SIGN_SLOT).first() else {
        return Err(GameError::MalformedInput(MISSING_SIGN.to_string()));
    };
    Ok(Verdict::simple(sign == Prompt::comparison_sign(left, right)))
}

fn clock(hours: u32, minutes: u32, draft: &AnswerDraft) -> Result<Verdict, GameError> {
    let raw = draft.text(TIME_SLOT);
    let captures = TIME_RE
        .captures(raw)
        .ok_or_else(|| GameError::MalformedInput(MALFORMED_TIME.to_string()))?;
    let h: u32 = captures[1]
        .parse()
        .map_err(|_| GameError::MalformedInput(MALFORMED_TIME.to_string()))?;
    let m: u32 = captures[2]
        .parse()
        .map_err(|_| GameError::MalformedInput(MALFORMED_TIME.to_string()))?;
    Ok(Verdict::simple(h == hours && m == minutes))
}

fn alphabet(missing: &[usize], draft: &AnswerDraft) -> Verdict {
    let all_filled = missing.iter().all(|index| {
        let expected = char::from(FULL_ALPHABET[*index]).to_string();
        draft.text(&letter_slot(*index)).trim().to_uppercase() == expected
    });
    Verdict::simple(all_filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::{GameKind, Operation};

    fn classification_prompt() -> Prompt {
        Prompt {
            id: "p".into(),
            game: GameKind::Classification,
            theme: Some("ovipare-vivipare".into()),
            body: PromptBody::Classification {
                categories: vec![
                    Category {
                        name: "Ovipare".into(),
                        definition: String::new(),
                    },
                    Category {
                        name: "Vivipare".into(),
                        definition: String::new(),
                    },
                ],
                items: vec![
                    Item::new("tortue", "tortue", "Ovipare"),
                    Item::new("poisson", "poisson", "Ovipare"),
                    Item::new("chat", "chat", "Vivipare"),
                ],
            },
        }
    }

    #[test]
    fn classification_requires_every_item_well_placed() {
        let prompt = classification_prompt();
        let mut draft = AnswerDraft::for_prompt(&prompt);
        draft.apply_move(TRAY_SLOT, "Ovipare", "tortue", None);
        draft.apply_move(TRAY_SLOT, "Ovipare", "poisson", None);
        draft.apply_move(TRAY_SLOT, "Vivipare", "chat", None);
        assert!(evaluate(&prompt, &draft).unwrap().correct);

        // Flipping a single placement flips the verdict.
        draft.apply_move("Ovipare", "Vivipare", "poisson", None);
        assert!(!evaluate(&prompt, &draft).unwrap().correct);
    }

    #[test]
    fn classification_rejects_leftovers_on_the_tray() {
        let prompt = classification_prompt();
        let mut draft = AnswerDraft::for_prompt(&prompt);
        draft.apply_move(TRAY_SLOT, "Ovipare", "tortue", None);
        draft.apply_move(TRAY_SLOT, "Ovipare", "poisson", None);
        assert!(!evaluate(&prompt, &draft).unwrap().correct);
    }

    fn ordering_prompt(values: &[u32], direction: SortDirection) -> Prompt {
        Prompt {
            id: "p".into(),
            game: GameKind::Ordre,
            theme: None,
            body: PromptBody::Ordering {
                cards: values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| NumberCard {
                        id: format!("n{i}"),
                        value: *v,
                    })
                    .collect(),
                direction,
            },
        }
    }

    fn sequence_draft(prompt: &Prompt, order: &[&str]) -> AnswerDraft {
        let mut draft = AnswerDraft::for_prompt(prompt);
        for (index, id) in order.iter().enumerate() {
            draft.apply_move(SEQUENCE_SLOT, SEQUENCE_SLOT, id, Some(index));
        }
        draft
    }

    #[test]
    fn ordering_demands_the_exact_canonical_sort() {
        // cards: n0=7 n1=2 n2=9 n3=2
        let prompt = ordering_prompt(&[7, 2, 9, 2], SortDirection::Asc);

        // [2, 2, 7, 9]
        let correct = sequence_draft(&prompt, &["n1", "n3", "n0", "n2"]);
        assert!(evaluate(&prompt, &correct).unwrap().correct);

        // [2, 7, 2, 9] looks mostly sorted but is not the canonical sort.
        let mostly = sequence_draft(&prompt, &["n1", "n0", "n3", "n2"]);
        assert!(!evaluate(&prompt, &mostly).unwrap().correct);
    }

    #[test]
    fn ordering_respects_descending_direction() {
        let prompt = ordering_prompt(&[4, 15, 8], SortDirection::Desc);
        let draft = sequence_draft(&prompt, &["n1", "n2", "n0"]);
        assert!(evaluate(&prompt, &draft).unwrap().correct);
    }

    fn pairing_prompt() -> Prompt {
        Prompt {
            id: "p".into(),
            game: GameKind::Relier,
            theme: Some("rooms".into()),
            body: PromptBody::Pairing {
                pairs: vec![
                    ("Kitchen".into(), "Cuisine".into()),
                    ("Garden".into(), "Jardin".into()),
                    ("Bedroom".into(), "Chambre".into()),
                ],
                left: vec!["Kitchen".into(), "Garden".into(), "Bedroom".into()],
                cards: vec![
                    Item::new("r0", "Jardin", "Jardin"),
                    Item::new("r1", "Cuisine", "Cuisine"),
                    Item::new("r2", "Chambre", "Chambre"),
                ],
            },
        }
    }

    #[test]
    fn pairing_reports_the_correct_subset() {
        let prompt = pairing_prompt();
        let mut draft = AnswerDraft::for_prompt(&prompt);
        draft.apply_move(TRAY_SLOT, "Kitchen", "r1", None); // right
        draft.apply_move(TRAY_SLOT, "Garden", "r0", None); // right
        draft.apply_move(TRAY_SLOT, "Bedroom", "r2", None); // right

        let verdict = evaluate(&prompt, &draft).unwrap();
        assert!(verdict.correct);
        assert_eq!(verdict.pairing.unwrap().matched.len(), 3);
    }

    #[test]
    fn pairing_splits_matched_from_mismatched() {
        let prompt = pairing_prompt();
        let mut draft = AnswerDraft::for_prompt(&prompt);
        draft.apply_move(TRAY_SLOT, "Kitchen", "r1", None); // right
        draft.apply_move(TRAY_SLOT, "Garden", "r2", None); // wrong
        draft.apply_move(TRAY_SLOT, "Bedroom", "r0", None); // wrong

        let verdict = evaluate(&prompt, &draft).unwrap();
        assert!(!verdict.correct);
        let breakdown = verdict.pairing.unwrap();
        assert_eq!(breakdown.matched.len(), 1);
        assert_eq!(breakdown.matched[0].left, "Kitchen");
        assert_eq!(breakdown.mismatched.len(), 2);
    }

    #[test]
    fn pairing_with_missing_connections_is_incorrect_not_malformed() {
        let prompt = pairing_prompt();
        let draft = AnswerDraft::for_prompt(&prompt);
        let verdict = evaluate(&prompt, &draft).unwrap();
        assert!(!verdict.correct);
    }

    fn arithmetic_prompt() -> Prompt {
        Prompt {
            id: "p".into(),
            game: GameKind::Operations,
            theme: None,
            body: PromptBody::Arithmetic {
                left: 12,
                right: 5,
                operation: Operation::Soustraction,
                answer: 7,
            },
        }
    }

    #[test]
    fn arithmetic_distinguishes_malformed_from_incorrect() {
        let prompt = arithmetic_prompt();

        let mut draft = AnswerDraft::for_prompt(&prompt);
        draft.set_free_text(RESULT_SLOT, "sept");
        assert!(matches!(
            evaluate(&prompt, &draft),
            Err(GameError::MalformedInput(_))
        ));

        draft.set_free_text(RESULT_SLOT, "8");
        assert!(!evaluate(&prompt, &draft).unwrap().correct);

        draft.set_free_text(RESULT_SLOT, " 7 ");
        assert!(evaluate(&prompt, &draft).unwrap().correct);
    }

    #[test]
    fn comparison_needs_a_sign_before_it_judges() {
        let prompt = Prompt {
            id: "p".into(),
            game: GameKind::Comparaison,
            theme: None,
            body: PromptBody::Comparison { left: 3, right: 9 },
        };
        let mut draft = AnswerDraft::for_prompt(&prompt);
        assert!(matches!(
            evaluate(&prompt, &draft),
            Err(GameError::MalformedInput(_))
        ));

        draft.apply_move("signs", SIGN_SLOT, "<", None);
        assert!(evaluate(&prompt, &draft).unwrap().correct);

        draft.apply_move("signs", SIGN_SLOT, "=", None);
        assert!(!evaluate(&prompt, &draft).unwrap().correct);
    }

    #[test]
    fn clock_parses_hhmm_and_compares_numerically() {
        let prompt = Prompt {
            id: "p".into(),
            game: GameKind::ClockGame,
            theme: None,
            body: PromptBody::Clock {
                hours: 7,
                minutes: 5,
            },
        };
        let mut draft = AnswerDraft::for_prompt(&prompt);

        draft.set_free_text(TIME_SLOT, "sept heures");
        assert!(matches!(
            evaluate(&prompt, &draft),
            Err(GameError::MalformedInput(_))
        ));

        draft.set_free_text(TIME_SLOT, "7:05");
        assert!(evaluate(&prompt, &draft).unwrap().correct);

        draft.set_free_text(TIME_SLOT, "7:5");
        assert!(evaluate(&prompt, &draft).unwrap().correct);

        draft.set_free_text(TIME_SLOT, "7:10");
        assert!(!evaluate(&prompt, &draft).unwrap().correct);
    }

    #[test]
    fn alphabet_accepts_lowercase_entries() {
        let prompt = Prompt {
            id: "p".into(),
            game: GameKind::Alphabet,
            theme: None,
            body: PromptBody::AlphabetFill {
                missing: vec![0, 25],
            },
        };
        let mut draft = AnswerDraft::for_prompt(&prompt);
        draft.set_free_text(&letter_slot(0), "a");
        draft.set_free_text(&letter_slot(25), "Z");
        assert!(evaluate(&prompt, &draft).unwrap().correct);

        draft.set_free_text(&letter_slot(0), "b");
        assert!(!evaluate(&prompt, &draft).unwrap().correct);
    }

    #[test]
    fn sentence_accepts_any_member_of_the_canonical_set() {
        let prompt = Prompt {
            id: "p".into(),
            game: GameKind::Pronoms,
            theme: None,
            body: PromptBody::Sentence {
                sentence: "Ron et moi adorons le Quidditch.".into(),
                tools: vec!["nous".into()],
                accepted: vec![
                    "nous adorons le Quidditch.".into(),
                    "elle lit un livre étrange.".into(),
                ],
            },
        };
        let mut draft = AnswerDraft::for_prompt(&prompt);
        // Untouched sentence is not in the accepted set.
        assert!(!evaluate(&prompt, &draft).unwrap().correct);

        draft.set_free_text(SENTENCE_SLOT, "nous adorons le Quidditch.");
        assert!(evaluate(&prompt, &draft).unwrap().correct);

        // Membership is set-wide, as in the original games.
        draft.set_free_text(SENTENCE_SLOT, "elle lit un livre étrange.");
        assert!(evaluate(&prompt, &draft).unwrap().correct);
    }
}
