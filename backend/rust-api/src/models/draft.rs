use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::models::content::{
    letter_slot, Prompt, PromptBody, COMPARISON_SIGNS, RESULT_SLOT, SENTENCE_SLOT, SEQUENCE_SLOT,
    SIGNS_TRAY_SLOT, SIGN_SLOT, TIME_SLOT, TRAY_SLOT,
};

/// The learner's in-progress answer: pure bookkeeping, no validation.
///
/// Items live in exactly one slot at a time; free-text entries are keyed by
/// the text slots the prompt defines. The draft only ever references the
/// current prompt's slots and item ids, and is rebuilt from scratch whenever
/// a round begins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnswerDraft {
    slots: BTreeMap<String, Vec<String>>,
    texts: BTreeMap<String, String>,
    #[serde(skip)]
    single_capacity: BTreeSet<String>,
}

impl AnswerDraft {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Initial draft for a prompt: category slots empty, tray filled, text
    /// slots seeded (the sentence games start from the uncorrected sentence,
    /// as the original UI did).
    pub fn for_prompt(prompt: &Prompt) -> Self {
        let mut draft = Self::empty();
        match &prompt.body {
            PromptBody::Classification { categories, items } => {
                for category in categories {
                    draft.slots.insert(category.name.clone(), Vec::new());
                }
                draft.slots.insert(
                    TRAY_SLOT.to_string(),
                    items.iter().map(|item| item.id.clone()).collect(),
                );
            }
            PromptBody::Pairing { left, cards, .. } => {
                for entry in left {
                    draft.slots.insert(entry.clone(), Vec::new());
                    draft.single_capacity.insert(entry.clone());
                }
                draft.slots.insert(
                    TRAY_SLOT.to_string(),
                    cards.iter().map(|card| card.id.clone()).collect(),
                );
            }
            PromptBody::Ordering { cards, .. } => {
                draft.slots.insert(
                    SEQUENCE_SLOT.to_string(),
                    cards.iter().map(|card| card.id.clone()).collect(),
                );
            }
            PromptBody::Comparison { .. } => {
                draft.slots.insert(SIGN_SLOT.to_string(), Vec::new());
                draft.single_capacity.insert(SIGN_SLOT.to_string());
                draft.slots.insert(
                    SIGNS_TRAY_SLOT.to_string(),
                    COMPARISON_SIGNS.iter().map(|s| s.to_string()).collect(),
                );
            }
            PromptBody::Arithmetic { .. } => {
                draft.texts.insert(RESULT_SLOT.to_string(), String::new());
            }
            PromptBody::Clock { .. } => {
                draft.texts.insert(TIME_SLOT.to_string(), String::new());
            }
            PromptBody::AlphabetFill { missing } => {
                for index in missing {
                    draft.texts.insert(letter_slot(*index), String::new());
                }
            }
            PromptBody::Sentence { sentence, .. } => {
                draft
                    .texts
                    .insert(SENTENCE_SLOT.to_string(), sentence.clone());
            }
        }
        draft
    }

    /// Discards everything and reinstalls the prompt's initial layout.
    /// Calling it twice in a row is the same as calling it once.
    pub fn reset(&mut self, prompt: &Prompt) {
        *self = Self::for_prompt(prompt);
    }

    /// Relocate one item from `source` to `dest`. No-op (returns `false`)
    /// when the destination slot does not exist or the item is not in the
    /// source slot. Single-capacity destinations bounce their current
    /// occupant back to the source slot.
    pub fn apply_move(
        &mut self,
        source: &str,
        dest: &str,
        item: &str,
        position: Option<usize>,
    ) -> bool {
        if !self.slots.contains_key(dest) {
            return false;
        }
        let Some(source_items) = self.slots.get_mut(source) else {
            return false;
        };
        let Some(index) = source_items.iter().position(|id| id == item) else {
            return false;
        };
        source_items.remove(index);

        if self.single_capacity.contains(dest) {
            let bounced = {
                let dest_items = self.slots.get_mut(dest).unwrap();
                std::mem::take(dest_items)
            };
            if let Some(source_items) = self.slots.get_mut(source) {
                source_items.extend(bounced);
            }
        }

        let dest_items = self.slots.get_mut(dest).unwrap();
        let index = position.unwrap_or(dest_items.len()).min(dest_items.len());
        dest_items.insert(index, item.to_string());
        true
    }

    /// Store raw text for a text slot. No-op on unknown slots.
    pub fn set_free_text(&mut self, slot: &str, text: &str) -> bool {
        match self.texts.get_mut(slot) {
            Some(entry) => {
                *entry = text.to_string();
                true
            }
            None => false,
        }
    }

    pub fn slot_items(&self, slot: &str) -> &[String] {
        self.slots.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn text(&self, slot: &str) -> &str {
        self.texts.get(slot).map(String::as_str).unwrap_or("")
    }

    pub fn placements(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.slots
            .iter()
            .map(|(slot, items)| (slot.as_str(), items.as_slice()))
    }

    /// True when no item placement and no text is held at all (the state
    /// between rounds, before the next prompt is drawn).
    pub fn is_blank(&self) -> bool {
        self.slots.is_empty() && self.texts.is_empty()
    }
}
