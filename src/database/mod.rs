pub mod manager;
pub mod models;

pub use manager::{Database, DatabaseError};
pub use models::person::Person;
