//! Person persistence.
//!
//! [`PersonStore`] is the contract the rest of the application depends on.
//! Two strategies implement it and must be observably identical:
//!
//! | Type | Strategy |
//! |------|----------|
//! | [`TrackedPersonStore`] | Per-call unit of work; entries tagged Create/Update/Delete and flushed in one transaction |
//! | [`SqlPersonStore`] | One parameterized statement per call |
//!
//! Both run every write through the same [`ObserverPipeline`](crate::observer::ObserverPipeline),
//! which is where `created_at` / `updated_at` get stamped.

pub mod service;
pub mod sql;
pub mod tracked;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::StoreBackend;
use crate::database::manager::DatabaseError;
use crate::database::models::person::Person;
use crate::observer::error::ObserverError;

pub use service::PersonService;
pub use sql::SqlPersonStore;
pub use tracked::{EntryState, Session, TrackedPersonStore};

/// Column list shared by every person SELECT
pub(crate) const PERSON_COLUMNS: &str = "id, first_name, last_name, created_at, updated_at";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Save aborted: {0}")]
    Observer(#[from] ObserverError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(DatabaseError::Sqlx(err))
    }
}

/// Get/GetAll/Add/Update/Delete over the `people` relation.
///
/// `add` and `update` write the stored state (assigned id, stamped
/// timestamps) back into the caller's value.
#[async_trait]
pub trait PersonStore: Send + Sync {
    fn backend(&self) -> StoreBackend;

    /// Absent ids are `Ok(None)`, not an error
    async fn get(&self, id: i64) -> Result<Option<Person>, StoreError>;

    async fn get_all(&self) -> Result<Vec<Person>, StoreError>;

    async fn add(&self, person: &mut Person) -> Result<(), StoreError>;

    /// Does not check existence; an unknown id writes nothing
    async fn update(&self, person: &mut Person) -> Result<(), StoreError>;

    /// Unknown ids are a silent no-op
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}
