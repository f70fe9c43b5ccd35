//! htpasswd-style basic-auth credentials.
//!
//! The stored value is `admin:<hash>` with every `$` doubled, which is the
//! form compose files and reverse-proxy labels expect. The plaintext is
//! handed back once for the operator and must never be written anywhere.

use super::random::base64_string;
use super::{GeneratedSecret, GenerationOptions, SecretKind, SecretRequest};
use envsmith_types::{EnvsmithError, GenerateType, Result};

/// User name baked into generated credentials.
pub const BASIC_AUTH_USER: &str = "admin";

/// Length of the generated plaintext password.
pub const PLAINTEXT_LEN: usize = 16;

/// Generator for `admin:<escaped bcrypt hash>` credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptSecret;

impl BcryptSecret {
    /// Hash `plaintext` and format it as an escaped credential.
    pub fn credential(plaintext: &str, cost: u32) -> Result<String> {
        let hash = ::bcrypt::hash(plaintext, cost)
            .map_err(|e| EnvsmithError::Generation(format!("bcrypt hashing failed: {}", e)))?;
        Ok(format!("{}:{}", BASIC_AUTH_USER, escape_dollars(&hash)))
    }
}

impl SecretKind for BcryptSecret {
    fn kind(&self) -> GenerateType {
        GenerateType::Bcrypt
    }

    fn generate(&self, request: SecretRequest, options: &GenerationOptions) -> Result<GeneratedSecret> {
        let plaintext = base64_string(PLAINTEXT_LEN)?;
        let value = Self::credential(&plaintext, options.bcrypt_cost)?;

        Ok(GeneratedSecret {
            value,
            request,
            reveal: Some(plaintext),
        })
    }
}

/// Double every `$` so compose interpolation leaves the hash intact.
pub fn escape_dollars(hash: &str) -> String {
    hash.replace('$', "$$")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unescape_dollars(escaped: &str) -> String {
        escaped.replace("$$", "$")
    }

    #[test]
    fn test_escape_round_trip() {
        let hash = "$2b$04$abcdefghijklmnopqrstuu";
        let escaped = escape_dollars(hash);
        assert_eq!(escaped, "$$2b$$04$$abcdefghijklmnopqrstuu");
        assert_eq!(unescape_dollars(&escaped), hash);
    }

    #[test]
    fn test_generated_credential_verifies() {
        let options = GenerationOptions { bcrypt_cost: 4 };
        let request = SecretRequest {
            kind: GenerateType::Bcrypt,
            size: 24,
        };
        let secret = BcryptSecret.generate(request, &options).unwrap();

        let plaintext = secret.reveal.as_deref().unwrap();
        assert_eq!(plaintext.len(), PLAINTEXT_LEN);
        assert!(!secret.value.contains(plaintext));

        let escaped = secret.value.strip_prefix("admin:").unwrap();
        assert!(escaped.starts_with("$$2b$$04$$"));
        let hash = unescape_dollars(escaped);
        assert!(::bcrypt::verify(plaintext, &hash).unwrap());
    }

    #[test]
    fn test_invalid_cost_is_generation_error() {
        let err = BcryptSecret::credential("pw", 2).unwrap_err();
        assert!(matches!(err, EnvsmithError::Generation(_)));
    }
}
