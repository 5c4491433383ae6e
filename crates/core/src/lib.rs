//! Core types, validation, and error taxonomy for whisperbox.

pub mod error;
pub mod fingerprint;
pub mod limits;
pub mod message;

pub use error::{Error, Result, ValidationErrorCode};
pub use fingerprint::*;
pub use message::*;
