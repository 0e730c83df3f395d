pub mod types;

pub use types::{DEFAULT_TARGET_EXTENSION, OrganizerConfig};
