//! Signature algorithms and key pairs.
//!
//! The set of algorithms is closed: each [`SignatureAlgorithm`] variant maps to
//! one concrete primitive. RSA and DSA sign under SHA-256 (`SHA256withRSA`,
//! `SHA256withDSA`); Ed25519 signs the message directly. Public keys travel as
//! base64 of their X.509 SubjectPublicKeyInfo DER encoding.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::pkcs1v15;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use signature::{DigestSigner, DigestVerifier, SignatureEncoding, Signer, Verifier};
use spki::{DecodePublicKey, EncodePublicKey};

use crate::error::{Result, SignError};

/// Modulus size used by [`KeyPair::generate`] for RSA.
pub const DEFAULT_RSA_BITS: usize = 2048;

/// A supported signature algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureAlgorithm {
    Rsa,
    Dsa,
    Ed25519,
}

impl SignatureAlgorithm {
    pub const ALL: [Self; 3] = [Self::Rsa, Self::Dsa, Self::Ed25519];

    /// The tag stored in the `npx:hasAlgorithm` literal.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Rsa => "RSA",
            Self::Dsa => "DSA",
            Self::Ed25519 => "Ed25519",
        }
    }

    /// The full signature scheme name.
    pub fn scheme_name(&self) -> String {
        match self {
            Self::Ed25519 => self.tag().to_string(),
            _ => format!("SHA256with{}", self.tag()),
        }
    }

    /// Check `signature` over `message` against a DER-encoded public key.
    ///
    /// A signature that does not match (or does not even decode) is `Ok(false)`.
    /// A key that cannot be decoded for this algorithm is an error.
    pub fn verify(&self, public_key_der: &[u8], message: &[u8], signature: &[u8]) -> Result<bool> {
        match self {
            Self::Rsa => {
                let key = RsaPublicKey::from_public_key_der(public_key_der).map_err(key_error)?;
                let verifying_key = pkcs1v15::VerifyingKey::<Sha256>::new(key);
                let Ok(signature) = pkcs1v15::Signature::try_from(signature) else {
                    return Ok(false);
                };
                Ok(verifying_key.verify(message, &signature).is_ok())
            }
            Self::Dsa => {
                let verifying_key =
                    dsa::VerifyingKey::from_public_key_der(public_key_der).map_err(key_error)?;
                let Ok(signature) = dsa::Signature::try_from(signature) else {
                    return Ok(false);
                };
                Ok(verifying_key
                    .verify_digest(Sha256::new_with_prefix(message), &signature)
                    .is_ok())
            }
            Self::Ed25519 => {
                let verifying_key = ed25519_dalek::VerifyingKey::from_public_key_der(public_key_der)
                    .map_err(key_error)?;
                let Ok(signature) = ed25519_dalek::Signature::from_slice(signature) else {
                    return Ok(false);
                };
                Ok(verifying_key.verify(message, &signature).is_ok())
            }
        }
    }
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SignatureAlgorithm {
    type Err = SignError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SignError::UnsupportedAlgorithm(s.to_string()))
    }
}

fn key_error(e: impl fmt::Display) -> SignError {
    SignError::KeyDecoding(e.to_string())
}

fn crypto_error(e: impl fmt::Display) -> SignError {
    SignError::Crypto(e.to_string())
}

/// A private key together with its algorithm.
#[derive(Clone)]
pub enum KeyPair {
    Rsa(RsaPrivateKey),
    Dsa(dsa::SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
}

impl KeyPair {
    /// Generate a new random key pair.
    pub fn generate(algorithm: SignatureAlgorithm) -> Result<Self> {
        let mut rng = rand::thread_rng();
        match algorithm {
            SignatureAlgorithm::Rsa => Self::generate_rsa(DEFAULT_RSA_BITS),
            SignatureAlgorithm::Dsa => {
                let components = dsa::Components::generate(&mut rng, dsa::KeySize::DSA_2048_256);
                Ok(Self::Dsa(dsa::SigningKey::generate(&mut rng, components)))
            }
            SignatureAlgorithm::Ed25519 => {
                Ok(Self::Ed25519(ed25519_dalek::SigningKey::generate(&mut rng)))
            }
        }
    }

    /// Generate an RSA key pair with the given modulus size.
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        let mut rng = rand::thread_rng();
        RsaPrivateKey::new(&mut rng, bits)
            .map(Self::Rsa)
            .map_err(crypto_error)
    }

    /// Create an Ed25519 key pair from a 32-byte seed.
    pub fn ed25519_from_seed(seed: &[u8; 32]) -> Self {
        Self::Ed25519(ed25519_dalek::SigningKey::from_bytes(seed))
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        match self {
            Self::Rsa(_) => SignatureAlgorithm::Rsa,
            Self::Dsa(_) => SignatureAlgorithm::Dsa,
            Self::Ed25519(_) => SignatureAlgorithm::Ed25519,
        }
    }

    /// The public key as X.509 SubjectPublicKeyInfo DER.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        let document = match self {
            Self::Rsa(key) => key.to_public_key().to_public_key_der(),
            Self::Dsa(key) => key.verifying_key().to_public_key_der(),
            Self::Ed25519(key) => key.verifying_key().to_public_key_der(),
        }
        .map_err(crypto_error)?;
        Ok(document.as_bytes().to_vec())
    }

    /// The public key as the base64 literal stored in signature elements.
    pub fn public_key_base64(&self) -> Result<String> {
        Ok(STANDARD.encode(self.public_key_der()?))
    }

    /// Sign `message` with this key's scheme.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Rsa(key) => {
                let signing_key = pkcs1v15::SigningKey::<Sha256>::new(key.clone());
                let signature: pkcs1v15::Signature =
                    signing_key.try_sign(message).map_err(crypto_error)?;
                Ok(signature.to_vec())
            }
            Self::Dsa(key) => {
                let signature: dsa::Signature = key
                    .try_sign_digest(Sha256::new_with_prefix(message))
                    .map_err(crypto_error)?;
                Ok(signature.to_vec())
            }
            Self::Ed25519(key) => {
                let signature: ed25519_dalek::Signature =
                    key.try_sign(message).map_err(crypto_error)?;
                Ok(signature.to_bytes().to_vec())
            }
        }
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair({})", self.algorithm())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_ed25519_round_trip(
            seed in any::<[u8; 32]>(),
            message in prop::collection::vec(any::<u8>(), 0..256),
            flip in any::<prop::sample::Index>(),
        ) {
            let keys = KeyPair::ed25519_from_seed(&seed);
            let der = keys.public_key_der().unwrap();
            let sig = keys.sign(&message).unwrap();
            prop_assert!(SignatureAlgorithm::Ed25519.verify(&der, &message, &sig).unwrap());

            let mut tampered = sig.clone();
            let i = flip.index(tampered.len());
            tampered[i] ^= 0x01;
            prop_assert!(!SignatureAlgorithm::Ed25519.verify(&der, &message, &tampered).unwrap());
        }
    }

    #[test]
    fn test_tag_parsing() {
        assert_eq!("RSA".parse::<SignatureAlgorithm>().unwrap(), SignatureAlgorithm::Rsa);
        assert_eq!("dsa".parse::<SignatureAlgorithm>().unwrap(), SignatureAlgorithm::Dsa);
        assert_eq!(
            "Ed25519".parse::<SignatureAlgorithm>().unwrap(),
            SignatureAlgorithm::Ed25519
        );
        let err = "ECDSA".parse::<SignatureAlgorithm>().unwrap_err();
        assert!(err.is_crypto());
        assert_eq!(SignatureAlgorithm::Rsa.scheme_name(), "SHA256withRSA");
    }

    #[test]
    fn test_ed25519_sign_verify() {
        let keys = KeyPair::ed25519_from_seed(&[7u8; 32]);
        let der = keys.public_key_der().unwrap();
        let sig = keys.sign(b"digest string").unwrap();
        let alg = keys.algorithm();
        assert!(alg.verify(&der, b"digest string", &sig).unwrap());
        assert!(!alg.verify(&der, b"other string", &sig).unwrap());
        assert!(!alg.verify(&der, b"digest string", &sig[..10]).unwrap());
    }

    #[test]
    fn test_rsa_sign_verify() {
        let keys = KeyPair::generate_rsa(1024).unwrap();
        let der = keys.public_key_der().unwrap();
        let sig = keys.sign(b"digest string").unwrap();
        assert!(SignatureAlgorithm::Rsa.verify(&der, b"digest string", &sig).unwrap());
        assert!(!SignatureAlgorithm::Rsa.verify(&der, b"digest strinG", &sig).unwrap());
    }

    #[test]
    fn test_dsa_sign_verify() {
        let keys = KeyPair::generate(SignatureAlgorithm::Dsa).unwrap();
        let der = keys.public_key_der().unwrap();
        let sig = keys.sign(b"digest string").unwrap();
        assert!(SignatureAlgorithm::Dsa.verify(&der, b"digest string", &sig).unwrap());
        assert!(!SignatureAlgorithm::Dsa.verify(&der, b"tampered", &sig).unwrap());
    }

    #[test]
    fn test_key_of_wrong_algorithm_fails_decoding() {
        let keys = KeyPair::ed25519_from_seed(&[1u8; 32]);
        let der = keys.public_key_der().unwrap();
        let result = SignatureAlgorithm::Rsa.verify(&der, b"m", &[0u8; 64]);
        assert!(matches!(result, Err(SignError::KeyDecoding(_))));
    }

    #[test]
    fn test_garbage_key() {
        let result = SignatureAlgorithm::Ed25519.verify(b"not a key", b"m", &[0u8; 64]);
        assert!(result.unwrap_err().is_crypto());
    }

    #[test]
    fn test_debug_hides_key_material() {
        let keys = KeyPair::ed25519_from_seed(&[9u8; 32]);
        assert_eq!(format!("{:?}", keys), "KeyPair(Ed25519)");
    }
}
