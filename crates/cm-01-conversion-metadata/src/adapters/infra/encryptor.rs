use crate::domain::errors::RepositoryError;
use crate::ports::outbound::AttributeEncryptor;

/// Encryptor that stores values unchanged.
///
/// For hosts whose store encrypts at the storage layer, and for tests.
#[derive(Default)]
pub struct PassthroughEncryptor;

impl AttributeEncryptor for PassthroughEncryptor {
    fn encrypt(&self, _attribute: &str, plaintext: &str) -> Result<String, RepositoryError> {
        Ok(plaintext.to_string())
    }

    fn decrypt(&self, _attribute: &str, ciphertext: &str) -> Result<String, RepositoryError> {
        Ok(ciphertext.to_string())
    }
}
