// All extraction logic lives in colgrid-core
// This CLI acts as a thin wrapper around the core library

// Re-export core types for convenience
pub use colgrid_core::*;
