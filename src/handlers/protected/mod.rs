// handlers/protected/mod.rs - handlers that run behind jwt_auth_middleware
//
// Reads need any valid token; writes take the AdminUser extractor.

pub mod people;
