use async_trait::async_trait;

use crate::api::format::{PersonDto, PersonRequest};
use crate::api::validate::validate_person;
use crate::error::ApiError;
use crate::store::PersonService;

use super::Handler;

#[derive(Debug, Clone)]
pub struct CreatePerson {
    pub request: PersonRequest,
}

#[async_trait]
impl Handler for CreatePerson {
    type Output = PersonDto;

    async fn handle(self, people: &PersonService) -> Result<Self::Output, ApiError> {
        validate_person(&self.request)?;

        let mut person = self.request.into_person();
        people.add(&mut person).await?;
        tracing::info!("Created person {}", person.id);

        Ok(person.into())
    }
}

/// Replace the names of an existing person. Unlike the store's update,
/// an unknown id is reported as not found.
#[derive(Debug, Clone)]
pub struct UpdatePerson {
    pub id: i64,
    pub request: PersonRequest,
}

#[async_trait]
impl Handler for UpdatePerson {
    type Output = PersonDto;

    async fn handle(self, people: &PersonService) -> Result<Self::Output, ApiError> {
        validate_person(&self.request)?;

        let mut person = people
            .get(self.id)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("person {} not found", self.id)))?;

        self.request.apply_to(&mut person);
        people.update(&mut person).await?;
        tracing::info!("Updated person {}", person.id);

        Ok(person.into())
    }
}

/// Deleting an id that does not exist succeeds
#[derive(Debug, Clone, Copy)]
pub struct DeletePerson {
    pub id: i64,
}

#[async_trait]
impl Handler for DeletePerson {
    type Output = ();

    async fn handle(self, people: &PersonService) -> Result<Self::Output, ApiError> {
        people.delete(self.id).await?;
        tracing::info!("Deleted person {}", self.id);
        Ok(())
    }
}
