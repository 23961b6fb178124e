//! Wire shapes for people. Entities never leave the process as-is; handlers
//! map them through [`PersonDto`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::person::Person;

/// Outbound shape of a person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDto {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Person> for PersonDto {
    fn from(person: Person) -> Self {
        let full_name = person.full_name();
        Self {
            id: person.id,
            first_name: person.first_name,
            last_name: person.last_name,
            full_name,
            created_at: person.created_at,
            updated_at: person.updated_at,
        }
    }
}

/// Inbound body for create and update. Missing fields deserialize as empty
/// so validation can report them per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl PersonRequest {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// A fresh, unsaved entity
    pub fn into_person(self) -> Person {
        Person::new(self.first_name, self.last_name)
    }

    /// Copy the caller-editable fields onto an existing entity
    pub fn apply_to(self, person: &mut Person) {
        person.first_name = self.first_name;
        person.last_name = self.last_name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn dto_uses_camel_case_and_full_name() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let mut person = Person::new("Ada", "Lovelace");
        person.id = 3;
        person.created_at = at;
        person.updated_at = Some(at);

        let value = serde_json::to_value(PersonDto::from(person)).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["firstName"], "Ada");
        assert_eq!(value["fullName"], "Ada Lovelace");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("first_name").is_none());
    }

    #[test]
    fn request_tolerates_missing_fields() {
        let req: PersonRequest = serde_json::from_value(json!({ "firstName": "Ada" })).unwrap();
        assert_eq!(req, PersonRequest::new("Ada", ""));
    }

    #[test]
    fn apply_to_keeps_identity_and_timestamps() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let mut person = Person::new("Ada", "Lovelace");
        person.id = 9;
        person.created_at = at;

        PersonRequest::new("Ada", "King").apply_to(&mut person);
        assert_eq!(person.id, 9);
        assert_eq!(person.created_at, at);
        assert_eq!(person.last_name, "King");
    }
}
