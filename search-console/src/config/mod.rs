//! Configuration and dependency wiring for the search console.

mod dependencies;
mod settings;

pub use dependencies::{Dependencies, IN_MEMORY_URL};
pub use settings::{ConsoleSettings, LogFormat};
