//! Core types shared by every part of the engine.
//!
//! - [`error`] - the [`ConfigError`] taxonomy and terminal rendering
//! - [`artifact`] - artifact kinds, scopes, and identities

pub mod artifact;
pub mod error;

pub use artifact::{ArtifactIdentity, ArtifactKind, Scope};
pub use error::{ConfigError, ErrorContext, ErrorKind, FileOperation, user_friendly_error};
