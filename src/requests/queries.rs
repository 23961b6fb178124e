use async_trait::async_trait;

use crate::api::format::PersonDto;
use crate::error::ApiError;
use crate::store::PersonService;

use super::Handler;

/// Every person, mapped to the wire shape
#[derive(Debug, Default, Clone, Copy)]
pub struct GetAllPeople;

#[async_trait]
impl Handler for GetAllPeople {
    type Output = Vec<PersonDto>;

    async fn handle(self, people: &PersonService) -> Result<Self::Output, ApiError> {
        let all = people.get_all().await?;
        Ok(all.into_iter().map(PersonDto::from).collect())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetPerson {
    pub id: i64,
}

#[async_trait]
impl Handler for GetPerson {
    type Output = PersonDto;

    async fn handle(self, people: &PersonService) -> Result<Self::Output, ApiError> {
        people
            .get(self.id)
            .await?
            .map(PersonDto::from)
            .ok_or_else(|| ApiError::not_found(format!("person {} not found", self.id)))
    }
}
