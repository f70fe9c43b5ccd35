//! # Envsmith Secrets
//!
//! Secret generation for GENERATE directives.
//!
//! Every value comes from the operating system's CSPRNG. Supported types:
//! - `default`, `base64`, `password`: base64 alphabet with `=`, `+`, `/` removed
//! - `hex`: lowercase hexadecimal
//! - `bcrypt`: `admin:<hash>` basic-auth credential with `$` doubled

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod generator;
pub mod types;

pub use generator::{lookup, SecretGenerator};
pub use types::{GeneratedSecret, GenerationOptions, SecretKind, SecretRequest};
