use std::collections::BTreeMap;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{options::UpdateOptions, Collection, Database};
use serde::{Deserialize, Serialize};

use crate::models::answer::{AttemptCounters, AttemptKey};
use crate::models::content::Subject;

/// The persistence collaborator of the game core.
///
/// `increment_attempt` must bump exactly one of the two counters and must be
/// atomic at the store level: two browser tabs racing on the same record is
/// resolved by the store's increment primitive, not by the engine.
#[async_trait]
pub trait StatsStore: Send + Sync {
    async fn increment_attempt(&self, key: &AttemptKey, was_correct: bool) -> Result<()>;

    /// Per-game counters for the reporting dashboard.
    async fn read_stats(
        &self,
        student_id: &str,
        period: u8,
        subject: Subject,
    ) -> Result<BTreeMap<String, AttemptCounters>>;
}

#[derive(Debug, Serialize, Deserialize)]
struct AttemptStatDocument {
    #[serde(rename = "_id")]
    id: String,
    student_id: String,
    period: i32,
    subject: String,
    game: String,
    #[serde(default, rename = "correctCount")]
    correct_count: u32,
    #[serde(default, rename = "incorrectCount")]
    incorrect_count: u32,
}

pub struct MongoStatsStore {
    collection: Collection<AttemptStatDocument>,
}

impl MongoStatsStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("attempt_stats"),
        }
    }
}

#[async_trait]
impl StatsStore for MongoStatsStore {
    async fn increment_attempt(&self, key: &AttemptKey, was_correct: bool) -> Result<()> {
        let counter = if was_correct {
            "correctCount"
        } else {
            "incorrectCount"
        };
        let update = doc! {
            "$inc": { counter: 1 },
            "$setOnInsert": {
                "student_id": &key.student_id,
                "period": i32::from(key.period),
                "subject": key.subject.as_str(),
                "game": key.game.as_str(),
            },
        };

        self.collection
            .update_one(doc! { "_id": key.record_id() }, update)
            .with_options(UpdateOptions::builder().upsert(true).build())
            .await
            .with_context(|| format!("failed to increment attempt counter {}", key.record_id()))?;

        tracing::debug!(record = %key.record_id(), was_correct, "attempt counter incremented");
        Ok(())
    }

    async fn read_stats(
        &self,
        student_id: &str,
        period: u8,
        subject: Subject,
    ) -> Result<BTreeMap<String, AttemptCounters>> {
        let filter = doc! {
            "student_id": student_id,
            "period": i32::from(period),
            "subject": subject.as_str(),
        };
        let documents: Vec<AttemptStatDocument> = self
            .collection
            .find(filter)
            .await
            .context("failed to query attempt stats")?
            .try_collect()
            .await
            .context("failed to collect attempt stats")?;

        Ok(documents
            .into_iter()
            .map(|document| {
                (
                    document.game,
                    AttemptCounters {
                        correct_count: document.correct_count,
                        incorrect_count: document.incorrect_count,
                    },
                )
            })
            .collect())
    }
}

/// In-process store: backs the test suite and database-less local runs.
#[derive(Default)]
pub struct MemoryStatsStore {
    records: Mutex<BTreeMap<String, (AttemptKey, AttemptCounters)>>,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counters(&self, key: &AttemptKey) -> AttemptCounters {
        self.records
            .lock()
            .unwrap()
            .get(&key.record_id())
            .map(|(_, counters)| *counters)
            .unwrap_or_default()
    }
}

#[async_trait]
impl StatsStore for MemoryStatsStore {
    async fn increment_attempt(&self, key: &AttemptKey, was_correct: bool) -> Result<()> {
        let mut records = self.records.lock().unwrap();
        let entry = records
            .entry(key.record_id())
            .or_insert_with(|| (key.clone(), AttemptCounters::default()));
        if was_correct {
            entry.1.correct_count += 1;
        } else {
            entry.1.incorrect_count += 1;
        }
        Ok(())
    }

    async fn read_stats(
        &self,
        student_id: &str,
        period: u8,
        subject: Subject,
    ) -> Result<BTreeMap<String, AttemptCounters>> {
        let records = self.records.lock().unwrap();
        Ok(records
            .values()
            .filter(|(key, _)| {
                key.student_id == student_id && key.period == period && key.subject == subject
            })
            .map(|(key, counters)| (key.game.as_str().to_string(), *counters))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::GameKind;

    fn key(game: GameKind) -> AttemptKey {
        AttemptKey {
            student_id: "stu-1".to_string(),
            period: 1,
            subject: Subject::Maths,
            game,
        }
    }

    #[tokio::test]
    async fn each_submit_increments_exactly_one_counter() {
        let store = MemoryStatsStore::new();
        let key = key(GameKind::Operations);

        for was_correct in [true, false, true, true, false] {
            store.increment_attempt(&key, was_correct).await.unwrap();
        }

        let counters = store.counters(&key);
        assert_eq!(counters.correct_count, 3);
        assert_eq!(counters.incorrect_count, 2);
    }

    #[tokio::test]
    async fn read_stats_filters_by_learner_period_and_subject() {
        let store = MemoryStatsStore::new();
        store
            .increment_attempt(&key(GameKind::Operations), true)
            .await
            .unwrap();
        store
            .increment_attempt(&key(GameKind::Ordre), false)
            .await
            .unwrap();
        let other = AttemptKey {
            period: 2,
            ..key(GameKind::Operations)
        };
        store.increment_attempt(&other, true).await.unwrap();

        let stats = store.read_stats("stu-1", 1, Subject::Maths).await.unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats["operations"].correct_count, 1);
        assert_eq!(stats["ordre"].incorrect_count, 1);
    }
}
