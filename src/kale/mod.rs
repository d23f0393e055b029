//! The Kale language, split into submodules according to their functionality.
//! See the crate-level documentation for further information.

// Shared functionality
pub mod diagnostics;
pub mod errors;
mod util;

// Specific Phases
pub mod token;
