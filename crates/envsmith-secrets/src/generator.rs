//! Generator lookup table and dispatch.

use crate::types::{
    BcryptSecret, GeneratedSecret, GenerationOptions, RandomFormat, RandomSecret, SecretKind, SecretRequest,
};
use envsmith_types::{GenerateType, Result};
use tracing::debug;

static DEFAULT: RandomSecret = RandomSecret::new(GenerateType::Default, RandomFormat::Base64);
static BASE64: RandomSecret = RandomSecret::new(GenerateType::Base64, RandomFormat::Base64);
static HEX: RandomSecret = RandomSecret::new(GenerateType::Hex, RandomFormat::Hex);
static PASSWORD: RandomSecret = RandomSecret::new(GenerateType::Password, RandomFormat::Base64);
static BCRYPT: BcryptSecret = BcryptSecret;

/// Every generation type mapped to its generator.
static GENERATORS: [&(dyn SecretKind); 5] = [&DEFAULT, &BASE64, &HEX, &PASSWORD, &BCRYPT];

/// Find the generator for a type. Unmapped types use the default generator.
pub fn lookup(kind: GenerateType) -> &'static dyn SecretKind {
    GENERATORS
        .iter()
        .copied()
        .find(|generator| generator.kind() == kind)
        .unwrap_or(&DEFAULT)
}

/// Generates secrets with run-wide options.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretGenerator {
    options: GenerationOptions,
}

impl SecretGenerator {
    /// Create a generator with explicit options.
    pub fn new(options: GenerationOptions) -> Self {
        Self { options }
    }

    /// Generator using a specific bcrypt cost.
    pub fn with_bcrypt_cost(cost: u32) -> Self {
        Self::new(GenerationOptions { bcrypt_cost: cost })
    }

    /// Generate one secret.
    pub fn generate(&self, kind: GenerateType, size: usize) -> Result<GeneratedSecret> {
        let request = SecretRequest { kind, size };
        debug!("Generating {} secret ({} chars)", kind, size);
        lookup(kind).generate(request, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_table_covers_every_type() {
        for kind in GenerateType::ALL {
            assert_eq!(lookup(kind).kind(), kind);
        }
    }

    #[test]
    fn test_hex_generation() {
        let secret = SecretGenerator::default().generate(GenerateType::Hex, 8).unwrap();
        assert_eq!(secret.value.len(), 8);
        assert!(secret.value.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        assert!(secret.reveal.is_none());
        assert_eq!(secret.request.kind, GenerateType::Hex);
    }

    #[test]
    fn test_bcrypt_generation() {
        let secret = SecretGenerator::with_bcrypt_cost(4)
            .generate(GenerateType::Bcrypt, 24)
            .unwrap();
        assert!(secret.value.starts_with("admin:$$2b$$04$$"));
        assert!(secret.reveal.is_some());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_random_kinds_honor_size(
            kind in prop::sample::select(vec![
                GenerateType::Default,
                GenerateType::Base64,
                GenerateType::Hex,
                GenerateType::Password,
            ]),
            size in 1usize..=256,
        ) {
            let secret = SecretGenerator::default().generate(kind, size).unwrap();
            prop_assert_eq!(secret.value.len(), size);
            prop_assert!(!secret.value.contains(['=', '+', '/']));
        }
    }
}
