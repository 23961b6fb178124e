// handlers/mod.rs - HTTP handlers split by security tier
//
// Public (no auth) → Protected (JWT auth, admin role for writes)

pub mod public;    // Service info and health
pub mod protected; // /api/* routes behind the JWT middleware
