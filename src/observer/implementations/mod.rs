// Observer implementations organized by rings

// Ring 4: Enrichment - timestamps stamped before the write
pub mod audit_timestamps;

// Ring 7: Audit - structured log of committed changes
pub mod change_log;

pub use audit_timestamps::*;
pub use change_log::*;
