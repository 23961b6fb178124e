use async_trait::async_trait;
use std::sync::Arc;

use crate::config::StoreBackend;
use crate::database::manager::Database;
use crate::database::models::person::Person;
use crate::observer::context::ObserverContext;
use crate::observer::pipeline::ObserverPipeline;
use crate::types::Operation;

use super::{PersonStore, StoreError, PERSON_COLUMNS};

/// Direct parameterized SQL, one statement per call against the pool
pub struct SqlPersonStore {
    db: Database,
    pipeline: Arc<ObserverPipeline>,
}

impl SqlPersonStore {
    pub fn new(db: Database, pipeline: Arc<ObserverPipeline>) -> Self {
        Self { db, pipeline }
    }

    async fn insert(&self, person: &Person) -> Result<i64, StoreError> {
        let id = if person.is_new() {
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO people (first_name, last_name, created_at, updated_at)
                 VALUES (?, ?, ?, ?)
                 RETURNING id",
            )
            .bind(&person.first_name)
            .bind(&person.last_name)
            .bind(person.created_at)
            .bind(person.updated_at)
            .fetch_one(self.db.pool())
            .await?
        } else {
            sqlx::query_scalar::<_, i64>(
                "INSERT INTO people (id, first_name, last_name, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?)
                 RETURNING id",
            )
            .bind(person.id)
            .bind(&person.first_name)
            .bind(&person.last_name)
            .bind(person.created_at)
            .bind(person.updated_at)
            .fetch_one(self.db.pool())
            .await?
        };
        Ok(id)
    }
}

#[async_trait]
impl PersonStore for SqlPersonStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Sql
    }

    async fn get(&self, id: i64) -> Result<Option<Person>, StoreError> {
        let query = format!("SELECT {} FROM people WHERE id = ?", PERSON_COLUMNS);
        let person = sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(person)
    }

    async fn get_all(&self) -> Result<Vec<Person>, StoreError> {
        let query = format!("SELECT {} FROM people ORDER BY id", PERSON_COLUMNS);
        let people = sqlx::query_as::<_, Person>(&query)
            .fetch_all(self.db.pool())
            .await?;
        Ok(people)
    }

    async fn add(&self, person: &mut Person) -> Result<(), StoreError> {
        let mut ctx = ObserverContext::single(Operation::Create, person.clone());
        self.pipeline.before_commit(&mut ctx).await?;

        let id = self.insert(&ctx.entries[0].person).await?;
        ctx.entries[0].person.id = id;
        tracing::debug!("Inserted person {}", id);

        self.pipeline.after_commit(&ctx).await;
        if let Some(entry) = ctx.into_entries().pop() {
            *person = entry.person;
        }
        Ok(())
    }

    async fn update(&self, person: &mut Person) -> Result<(), StoreError> {
        let mut ctx = ObserverContext::single(Operation::Update, person.clone());
        self.pipeline.before_commit(&mut ctx).await?;

        let stamped = &ctx.entries[0].person;
        let result = sqlx::query(
            "UPDATE people SET first_name = ?, last_name = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&stamped.first_name)
        .bind(&stamped.last_name)
        .bind(stamped.updated_at)
        .bind(stamped.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!("Update matched no person with id {}", stamped.id);
        } else {
            self.pipeline.after_commit(&ctx).await;
        }

        if let Some(entry) = ctx.into_entries().pop() {
            *person = entry.person;
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let query = format!("DELETE FROM people WHERE id = ? RETURNING {}", PERSON_COLUMNS);
        let removed = sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        match removed {
            Some(person) => {
                let ctx = ObserverContext::single(Operation::Delete, person);
                self.pipeline.after_commit(&ctx).await;
            }
            None => tracing::debug!("Delete matched no person with id {}", id),
        }
        Ok(())
    }
}
