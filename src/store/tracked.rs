//! Unit-of-work person store.
//!
//! Every facade call opens a [`Session`], stages entries with an explicit
//! [`EntryState`] and calls [`Session::save_changes`], which runs the
//! before-commit observers over all staged entries, flushes them in a single
//! transaction, writes generated ids back, then runs the after-commit rings.

use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::Arc;

use crate::config::StoreBackend;
use crate::database::manager::Database;
use crate::database::models::person::Person;
use crate::observer::context::{ObserverContext, PendingWrite};
use crate::observer::pipeline::ObserverPipeline;
use crate::types::Operation;

use super::{PersonStore, StoreError, PERSON_COLUMNS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Loaded and not touched since
    Unchanged,
    Added,
    Modified,
    Deleted,
}

impl EntryState {
    fn operation(self) -> Option<Operation> {
        match self {
            EntryState::Unchanged => None,
            EntryState::Added => Some(Operation::Create),
            EntryState::Modified => Some(Operation::Update),
            EntryState::Deleted => Some(Operation::Delete),
        }
    }
}

#[derive(Debug, Clone)]
struct TrackedEntry {
    state: EntryState,
    person: Person,
}

/// Short-lived unit of work over the `people` relation
pub struct Session<'a> {
    pool: &'a SqlitePool,
    pipeline: &'a ObserverPipeline,
    entries: Vec<TrackedEntry>,
}

impl<'a> Session<'a> {
    pub fn new(pool: &'a SqlitePool, pipeline: &'a ObserverPipeline) -> Self {
        Self {
            pool,
            pipeline,
            entries: Vec::new(),
        }
    }

    /// Load one person and start tracking it as unchanged
    pub async fn find(&mut self, id: i64) -> Result<Option<Person>, StoreError> {
        if let Some(entry) = self.tracked(id) {
            return Ok(match entry.state {
                EntryState::Deleted => None,
                _ => Some(entry.person.clone()),
            });
        }

        let query = format!("SELECT {} FROM people WHERE id = ?", PERSON_COLUMNS);
        let person = sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        if let Some(person) = &person {
            self.entries.push(TrackedEntry {
                state: EntryState::Unchanged,
                person: person.clone(),
            });
        }
        Ok(person)
    }

    /// Load every person without tracking them
    pub async fn load_all(&self) -> Result<Vec<Person>, StoreError> {
        let query = format!("SELECT {} FROM people ORDER BY id", PERSON_COLUMNS);
        let people = sqlx::query_as::<_, Person>(&query).fetch_all(self.pool).await?;
        Ok(people)
    }

    /// Stage a new person for insertion
    pub fn add(&mut self, person: Person) {
        self.entries.push(TrackedEntry {
            state: EntryState::Added,
            person,
        });
    }

    /// Stage field changes for an existing person. Re-staging a tracked id
    /// replaces the staged values.
    pub fn update(&mut self, person: Person) {
        if self.state_of(person.id) == Some(EntryState::Deleted) {
            tracing::debug!("Ignoring update of person {} staged for deletion", person.id);
            return;
        }

        match self.tracked_mut(person.id) {
            Some(entry) => {
                if entry.state != EntryState::Added {
                    entry.state = EntryState::Modified;
                }
                entry.person = person;
            }
            None => self.entries.push(TrackedEntry {
                state: EntryState::Modified,
                person,
            }),
        }
    }

    /// Stage a person for deletion. Removing something only added in this
    /// session simply forgets it: by id once it has one, otherwise by value.
    /// Unsaved people that were never added are ignored.
    pub fn remove(&mut self, person: Person) {
        let id = person.id;
        if let Some(pos) = self.entries.iter().position(|e| {
            e.state == EntryState::Added
                && if person.is_new() { e.person == person } else { e.person.id == id }
        }) {
            self.entries.remove(pos);
            return;
        }

        if person.is_new() {
            tracing::debug!("Ignoring removal of an unsaved person that was never added");
            return;
        }

        match self.tracked_mut(id) {
            Some(entry) => entry.state = EntryState::Deleted,
            None => self.entries.push(TrackedEntry {
                state: EntryState::Deleted,
                person,
            }),
        }
    }

    pub fn state_of(&self, id: i64) -> Option<EntryState> {
        self.tracked(id).map(|e| e.state)
    }

    /// Number of entries that will be written by the next save
    pub fn pending(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.state != EntryState::Unchanged)
            .count()
    }

    /// Flush staged entries. Returns the stored state of every created or
    /// updated person, in staging order.
    pub async fn save_changes(&mut self) -> Result<Vec<Person>, StoreError> {
        if self.pending() == 0 {
            return Ok(Vec::new());
        }

        let mut staged = Vec::new();
        let mut writes = Vec::new();
        for (index, entry) in self.entries.iter().enumerate() {
            if let Some(operation) = entry.state.operation() {
                staged.push(index);
                writes.push(PendingWrite::new(operation, entry.person.clone()));
            }
        }

        let mut ctx = ObserverContext::new(writes);
        self.pipeline.before_commit(&mut ctx).await?;

        let mut applied = Vec::with_capacity(ctx.entries.len());
        let mut tx = self.pool.begin().await?;
        for write in ctx.entries.iter_mut() {
            applied.push(flush(&mut tx, write).await?);
        }
        tx.commit().await?;

        tracing::debug!(
            "Session committed {} entries in {:?}",
            ctx.entries.len(),
            ctx.execution_time()
        );

        // Audit only what actually touched a row
        let committed = ObserverContext::new(
            ctx.entries
                .iter()
                .zip(&applied)
                .filter(|(_, applied)| **applied)
                .map(|(write, _)| write.clone())
                .collect(),
        );
        self.pipeline.after_commit(&committed).await;

        // Accept the committed state into the tracker
        let mut saved = Vec::new();
        for (index, write) in staged.iter().zip(ctx.into_entries()) {
            let entry = &mut self.entries[*index];
            entry.person = write.person;
            if write.operation != Operation::Delete {
                saved.push(entry.person.clone());
            }
            entry.state = match write.operation {
                Operation::Delete => EntryState::Deleted,
                _ => EntryState::Unchanged,
            };
        }
        // Deleted rows no longer exist; stop tracking them
        self.entries.retain(|e| e.state != EntryState::Deleted);

        Ok(saved)
    }

    fn tracked(&self, id: i64) -> Option<&TrackedEntry> {
        if id == 0 {
            return None;
        }
        self.entries.iter().find(|e| e.person.id == id)
    }

    fn tracked_mut(&mut self, id: i64) -> Option<&mut TrackedEntry> {
        if id == 0 {
            return None;
        }
        self.entries.iter_mut().find(|e| e.person.id == id)
    }
}

/// Write one staged entry inside the session transaction. Returns whether a
/// row was touched.
async fn flush(tx: &mut Transaction<'_, Sqlite>, write: &mut PendingWrite) -> Result<bool, StoreError> {
    let person = &mut write.person;
    match write.operation {
        Operation::Create => {
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
                .fetch_one(&mut **tx)
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
                .fetch_one(&mut **tx)
                .await?
            };
            person.id = id;
            Ok(true)
        }
        Operation::Update => {
            // created_at is never part of an update
            let result = sqlx::query(
                "UPDATE people SET first_name = ?, last_name = ?, updated_at = ? WHERE id = ?",
            )
            .bind(&person.first_name)
            .bind(&person.last_name)
            .bind(person.updated_at)
            .bind(person.id)
            .execute(&mut **tx)
            .await?;
            if result.rows_affected() == 0 {
                tracing::debug!("Update matched no person with id {}", person.id);
            }
            Ok(result.rows_affected() > 0)
        }
        Operation::Delete => {
            let result = sqlx::query("DELETE FROM people WHERE id = ?")
                .bind(person.id)
                .execute(&mut **tx)
                .await?;
            Ok(result.rows_affected() > 0)
        }
    }
}

/// Person store that opens one [`Session`] per call
pub struct TrackedPersonStore {
    db: Database,
    pipeline: Arc<ObserverPipeline>,
}

impl TrackedPersonStore {
    pub fn new(db: Database, pipeline: Arc<ObserverPipeline>) -> Self {
        Self { db, pipeline }
    }

    pub fn session(&self) -> Session<'_> {
        Session::new(self.db.pool(), &self.pipeline)
    }
}

#[async_trait]
impl PersonStore for TrackedPersonStore {
    fn backend(&self) -> StoreBackend {
        StoreBackend::Tracked
    }

    async fn get(&self, id: i64) -> Result<Option<Person>, StoreError> {
        self.session().find(id).await
    }

    async fn get_all(&self) -> Result<Vec<Person>, StoreError> {
        self.session().load_all().await
    }

    async fn add(&self, person: &mut Person) -> Result<(), StoreError> {
        let mut session = self.session();
        session.add(person.clone());
        if let Some(saved) = session.save_changes().await?.pop() {
            *person = saved;
        }
        Ok(())
    }

    async fn update(&self, person: &mut Person) -> Result<(), StoreError> {
        let mut session = self.session();
        session.update(person.clone());
        if let Some(saved) = session.save_changes().await?.pop() {
            *person = saved;
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let mut session = self.session();
        match session.find(id).await? {
            Some(person) => {
                session.remove(person);
                session.save_changes().await?;
            }
            None => tracing::debug!("Delete matched no person with id {}", id),
        }
        Ok(())
    }
}
