//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod audio;
pub mod identifier;
pub mod entity;

pub use validation::ValidationError;
pub use audio::{Audio, MAX_AUDIO_LEN};
pub use identifier::parse_identifier;
pub use entity::{Comment, Like, Post};
