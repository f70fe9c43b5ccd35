//! Random string secrets drawn from the operating system's CSPRNG.

use super::{GeneratedSecret, GenerationOptions, SecretKind, SecretRequest};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use envsmith_types::{EnvsmithError, GenerateType, Result};
use rand::rngs::OsRng;
use rand::RngCore;

/// Output alphabet of a random secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomFormat {
    /// Base64 with `=`, `+`, `/` removed, so effectively `[A-Za-z0-9]`
    Base64,
    /// Lowercase hexadecimal
    Hex,
}

/// Random secret of a fixed format.
#[derive(Debug, Clone, Copy)]
pub struct RandomSecret {
    kind: GenerateType,
    format: RandomFormat,
}

impl RandomSecret {
    /// Generator serving `kind` with output in `format`.
    pub const fn new(kind: GenerateType, format: RandomFormat) -> Self {
        Self { kind, format }
    }
}

impl SecretKind for RandomSecret {
    fn kind(&self) -> GenerateType {
        self.kind
    }

    fn generate(&self, request: SecretRequest, _options: &GenerationOptions) -> Result<GeneratedSecret> {
        let value = match self.format {
            RandomFormat::Base64 => base64_string(request.size)?,
            RandomFormat::Hex => hex_string(request.size)?,
        };

        Ok(GeneratedSecret {
            value,
            request,
            reveal: None,
        })
    }
}

/// Fill a buffer from the OS entropy source.
pub fn random_bytes(len: usize) -> Result<Vec<u8>> {
    let mut bytes = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| EnvsmithError::Generation(format!("Entropy source unavailable: {}", e)))?;
    Ok(bytes)
}

/// Exactly `size` characters from the stripped base64 alphabet.
pub fn base64_string(size: usize) -> Result<String> {
    let mut out = String::with_capacity(size);
    while out.len() < size {
        // Three bytes encode to four characters; stripping may drop a few.
        let needed = size - out.len();
        let bytes = random_bytes(needed.max(3))?;
        let encoded = STANDARD.encode(&bytes);
        out.extend(encoded.chars().filter(|c| !matches!(c, '=' | '+' | '/' | '\n')));
    }
    out.truncate(size);
    Ok(out)
}

/// Exactly `size` lowercase hex digits.
pub fn hex_string(size: usize) -> Result<String> {
    let bytes = random_bytes(size.div_ceil(2))?;
    let mut out = hex::encode(bytes);
    out.truncate(size);
    Ok(out)
}
