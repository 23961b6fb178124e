//! Query and command objects sitting between the HTTP handlers and the
//! person facade. Each one carries its own input, holds no state across
//! calls, and maps entities to [`PersonDto`](crate::api::PersonDto).

pub mod commands;
pub mod queries;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::store::PersonService;

pub use commands::{CreatePerson, DeletePerson, UpdatePerson};
pub use queries::{GetAllPeople, GetPerson};

#[async_trait]
pub trait Handler {
    type Output: Send;

    async fn handle(self, people: &PersonService) -> Result<Self::Output, ApiError>;
}
