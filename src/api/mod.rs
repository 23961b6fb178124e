pub mod format;
pub mod validate;

pub use format::{PersonDto, PersonRequest};
pub use validate::validate_person;
