//! Secret kind implementations.

pub mod bcrypt;
pub mod random;

pub use self::bcrypt::BcryptSecret;
pub use random::{RandomFormat, RandomSecret};

use envsmith_types::{GenerateType, Result};

/// What a caller asks a generator for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretRequest {
    /// Requested generation type
    pub kind: GenerateType,
    /// Output length in characters (ignored by bcrypt)
    pub size: usize,
}

/// A freshly generated value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSecret {
    /// Value to store in the target file
    pub value: String,
    /// Request that produced it
    pub request: SecretRequest,
    /// Plaintext to show the operator once; never persisted
    pub reveal: Option<String>,
}

/// Per-run generation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Work factor for bcrypt hashes
    pub bcrypt_cost: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            bcrypt_cost: ::bcrypt::DEFAULT_COST,
        }
    }
}

/// One entry of the generator lookup table.
pub trait SecretKind: Send + Sync {
    /// Generation type this entry serves.
    fn kind(&self) -> GenerateType;

    /// Produce a value for the request.
    fn generate(&self, request: SecretRequest, options: &GenerationOptions) -> Result<GeneratedSecret>;
}
