//! Root module for the validation system.
//! Exposes the validated wrappers used on request bodies.

mod types;
mod constants;

pub use constants::*;
pub use types::{EmailInput, TextInput};
