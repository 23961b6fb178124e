// Observer system: hooks that run around every person store commit.
// Enrichment observers may rewrite pending entries before anything is written;
// audit observers see the committed result and cannot fail the save.

pub mod context;
pub mod traits;
pub mod pipeline;
pub mod error;
pub mod implementations;

// Re-export core types
pub use context::*;
pub use traits::*;
pub use pipeline::*;
pub use error::*;
pub use implementations::*;
