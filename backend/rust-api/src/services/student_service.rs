use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};
use uuid::Uuid;

use crate::models::student::{CreateStudentRequest, PeriodRecord, StudentRecord, PERIOD_COUNT};

/// Administration side: pupil records and the trimester switch.
pub struct StudentService {
    students: Collection<StudentRecord>,
    periods: Collection<PeriodRecord>,
}

impl StudentService {
    pub fn new(mongo: &Database) -> Self {
        Self {
            students: mongo.collection("students"),
            periods: mongo.collection("periods"),
        }
    }

    pub async fn list_students(&self) -> Result<Vec<StudentRecord>> {
        let students = self
            .students
            .find(doc! {})
            .sort(doc! { "lastName": 1, "name": 1 })
            .await
            .context("failed to query students")?
            .try_collect()
            .await
            .context("failed to collect students")?;
        Ok(students)
    }

    pub async fn create_student(&self, req: &CreateStudentRequest) -> Result<StudentRecord> {
        let student = StudentRecord {
            id: Uuid::new_v4().to_string(),
            name: req.name.trim().to_string(),
            last_name: req.last_name.trim().to_string(),
            created_at: Utc::now(),
        };
        self.students
            .insert_one(&student)
            .await
            .context("failed to insert student")?;
        tracing::info!(student = %student.id, "student created");
        Ok(student)
    }

    pub async fn delete_student(&self, student_id: &str) -> Result<bool> {
        let result = self
            .students
            .delete_one(doc! { "_id": student_id })
            .await
            .context("failed to delete student")?;
        Ok(result.deleted_count == 1)
    }

    pub async fn list_periods(&self) -> Result<Vec<PeriodRecord>> {
        let periods = self
            .periods
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await
            .context("failed to query periods")?
            .try_collect()
            .await
            .context("failed to collect periods")?;
        Ok(periods)
    }

    /// Activating a period deactivates every other one: exactly one period
    /// drives difficulty at any time.
    pub async fn activate_period(&self, period_id: i32) -> Result<Vec<PeriodRecord>> {
        if !(1..=PERIOD_COUNT).contains(&period_id) {
            return Err(anyhow!(
                "period {period_id} is out of range 1..={PERIOD_COUNT}"
            ));
        }

        self.periods
            .update_many(doc! {}, doc! { "$set": { "active": false } })
            .await
            .context("failed to deactivate periods")?;
        self.periods
            .update_one(
                doc! { "_id": period_id },
                doc! { "$set": { "active": true } },
            )
            .await
            .context("failed to activate period")?;

        tracing::info!(period = period_id, "active period switched");
        self.list_periods().await
    }

    /// The period used for sessions created without an explicit one.
    pub async fn active_period(&self) -> Result<u8> {
        let active = self
            .periods
            .find_one(doc! { "active": true })
            .await
            .context("failed to query active period")?
            .ok_or_else(|| anyhow!("no active period configured"))?;
        u8::try_from(active.id).map_err(|_| anyhow!("stored period id {} is invalid", active.id))
    }

    /// First-run seeding: periods 1..=3 with period 1 active.
    pub async fn ensure_periods_seeded(&self) -> Result<()> {
        let count = self
            .periods
            .count_documents(doc! {})
            .await
            .context("failed to count periods")?;
        if count > 0 {
            return Ok(());
        }

        let seed: Vec<PeriodRecord> = (1..=PERIOD_COUNT)
            .map(|id| PeriodRecord {
                id,
                active: id == 1,
            })
            .collect();
        self.periods
            .insert_many(seed)
            .await
            .context("failed to seed periods")?;
        tracing::info!("seeded default periods 1..={PERIOD_COUNT}");
        Ok(())
    }
}
