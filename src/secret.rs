//! Shared secret, either raw bytes or their canonical base32 text form.
//!
//! The canonical text representation is RFC 4648 base32 without padding,
//! which is what authenticator apps expect users to type.
//!
//! # Examples
//!
//! - Enroll with a freshly generated secret
//! ```
//! use twofa_util::{Secret, Totp};
//!
//! let secret = Secret::generate().unwrap();
//! let totp = Totp::new(secret.to_bytes().unwrap()).unwrap();
//! println!("current code: {}", totp.generate_current().unwrap());
//! ```
//!
//! - Verify against a base32 secret received from a client
//! ```
//! use twofa_util::{Secret, Totp};
//!
//! let secret = Secret::Encoded("OBWGC2LOFVZXI4TJNZTS243FMNZGK5BNGEZDG".to_string());
//! let totp = Totp::new(secret.to_bytes().unwrap()).unwrap();
//! println!("current code: {}", totp.generate_current().unwrap());
//! ```

use base32::{self, Alphabet};
use constant_time_eq::constant_time_eq;
use rand::TryRngCore;

use crate::Error;

/// Shared secret between client and server to validate tokens against and
/// generate tokens from.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "zeroize", derive(zeroize::Zeroize, zeroize::ZeroizeOnDrop))]
pub enum Secret {
    /// Non-encoded "raw" secret.
    Raw(Vec<u8>),
    /// Base32 encoded secret.
    Encoded(String),
}

impl PartialEq for Secret {
    /// Compares the decoded bytes in constant time, so a `Raw` secret and
    /// its `Encoded` form are equal. When neither side decodes, the encoded
    /// text is compared instead, keeping equality reflexive; a decodable
    /// secret is never equal to an undecodable one.
    fn eq(&self, other: &Self) -> bool {
        match (self.to_bytes(), other.to_bytes()) {
            (Ok(a), Ok(b)) => constant_time_eq(&a, &b),
            // Decoding only fails for the Encoded variant, so both sides
            // carry text here.
            (Err(_), Err(_)) => match (self, other) {
                (Secret::Encoded(a), Secret::Encoded(b)) => {
                    constant_time_eq(a.as_bytes(), b.as_bytes())
                }
                _ => false,
            },
            _ => false,
        }
    }
}

impl Secret {
    /// Default generated length: 160 bits, the size recommended by
    /// [rfc-4226](https://www.rfc-editor.org/rfc/rfc4226#section-4).
    pub const DEFAULT_LENGTH: usize = 20;

    /// Get the secret as a Vec of bytes, decoding the base32 form if needed.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        match self {
            Secret::Raw(bytes) => Ok(bytes.to_vec()),
            Secret::Encoded(s) => base32::decode(Alphabet::Rfc4648 { padding: false }, s)
                .ok_or_else(|| Error::Encoding(s.to_string())),
        }
    }

    /// Try to transform a `Secret::Encoded` into a `Secret::Raw`.
    pub fn to_raw(&self) -> Result<Self, Error> {
        self.to_bytes().map(Secret::Raw)
    }

    /// Transform a `Secret::Raw` into a `Secret::Encoded`.
    pub fn to_encoded(&self) -> Self {
        match self {
            Secret::Raw(bytes) => {
                Secret::Encoded(base32::encode(Alphabet::Rfc4648 { padding: false }, bytes))
            }
            Secret::Encoded(_) => self.clone(),
        }
    }

    /// Generate a 160-bit secret from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [Error::Entropy] if the OS random source cannot supply bytes.
    pub fn generate() -> Result<Secret, Error> {
        Secret::generate_len(Secret::DEFAULT_LENGTH)
    }

    /// Generate a secret of `length` bytes from the OS CSPRNG.
    ///
    /// The secret MUST be at least 128 bits (16 bytes) to be accepted by
    /// [Totp](crate::Totp); 160 bits are recommended.
    ///
    /// # Errors
    ///
    /// Returns [Error::Entropy] if the OS random source cannot supply bytes.
    pub fn generate_len(length: usize) -> Result<Secret, Error> {
        let mut bytes = vec![0u8; length];
        rand::rngs::OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|_| Error::Entropy)?;
        Ok(Secret::Raw(bytes))
    }

    /// Generate a secret of `length` bytes from a caller-provided generator,
    /// for deterministic tests or a custom entropy source.
    pub fn generate_with<R: rand::RngCore>(rng: &mut R, length: usize) -> Secret {
        let mut bytes = vec![0u8; length];
        rng.fill_bytes(&mut bytes);
        Secret::Raw(bytes)
    }
}

impl std::fmt::Display for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Secret::Raw(bytes) => {
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            Secret::Encoded(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Secret;
    use crate::Error;

    const BASE32: &str = "OBWGC2LOFVZXI4TJNZTS243FMNZGK5BNGEZDG";
    const BYTES: [u8; 23] = [
        0x70, 0x6c, 0x61, 0x69, 0x6e, 0x2d, 0x73, 0x74, 0x72, 0x69, 0x6e, 0x67, 0x2d, 0x73, 0x65,
        0x63, 0x72, 0x65, 0x74, 0x2d, 0x31, 0x32, 0x33,
    ];
    const BYTES_DISPLAY: &str = "706c61696e2d737472696e672d7365637265742d313233";

    #[test]
    fn secret_display() {
        let secret_raw = Secret::Raw(BYTES.to_vec());
        let secret_base32 = Secret::Encoded(BASE32.to_string());
        assert_eq!(secret_raw.to_string(), BYTES_DISPLAY.to_string());
        assert_eq!(secret_base32.to_string(), BASE32.to_string());
    }

    #[test]
    fn secret_convert_base32_raw() {
        let secret_raw = Secret::Raw(BYTES.to_vec());
        let secret_base32 = Secret::Encoded(BASE32.to_string());

        assert_eq!(&secret_raw.to_encoded(), &secret_base32);
        assert_eq!(&secret_raw.to_raw().unwrap(), &secret_raw);

        assert_eq!(&secret_base32.to_raw().unwrap(), &secret_raw);
        assert_eq!(&secret_base32.to_encoded(), &secret_base32);
    }

    #[test]
    fn secret_as_bytes() {
        assert_eq!(
            Secret::Raw(BYTES.to_vec()).to_bytes().unwrap(),
            BYTES.to_vec()
        );
        assert_eq!(
            Secret::Encoded(BASE32.to_string()).to_bytes().unwrap(),
            BYTES.to_vec()
        );
    }

    #[test]
    fn secret_roundtrip_all_lengths() {
        // Base32 maps 5 bytes to 8 characters, so exercise every length
        // class modulo 5.
        for len in 1..=25usize {
            let bytes: Vec<u8> = (0..len as u8).collect();
            let encoded = Secret::Raw(bytes.clone()).to_encoded();
            assert_eq!(encoded.to_bytes().unwrap(), bytes);
        }
    }

    #[test]
    fn secret_from_string() {
        let raw = Secret::Raw("TestSecretSuperSecret".as_bytes().to_vec());
        let encoded = Secret::Encoded("KRSXG5CTMVRXEZLUKN2XAZLSKNSWG4TFOQ".to_string());
        assert_eq!(raw.to_encoded(), encoded);
        assert_eq!(raw, encoded.to_raw().unwrap());
    }

    #[test]
    fn secret_generate() {
        let sec = Secret::generate().unwrap();

        assert!(matches!(sec, Secret::Raw(_)));
        assert_eq!(sec.to_bytes().unwrap().len(), 20);
    }

    #[test]
    fn secret_generate_len() {
        let sec = Secret::generate_len(32).unwrap();

        assert!(matches!(sec, Secret::Raw(_)));
        assert_eq!(sec.to_bytes().unwrap().len(), 32);
    }

    #[test]
    fn secret_generate_with_injected_rng() {
        let mut rng = rand::rng();
        let a = Secret::generate_with(&mut rng, 20);
        let b = Secret::generate_with(&mut rng, 20);
        assert_eq!(a.to_bytes().unwrap().len(), 20);
        assert_ne!(a, b);
    }

    #[test]
    fn secret_invalid_base32() {
        let sec = Secret::Encoded("not base32 at all!".to_string());

        assert!(matches!(sec.to_raw(), Err(Error::Encoding(_))));
        assert!(matches!(sec.to_bytes(), Err(Error::Encoding(_))));
    }

    #[test]
    fn secret_invalid_equality_is_reflexive() {
        let sec = Secret::Encoded("not base32 at all!".to_string());

        assert_eq!(sec, sec.clone());
        assert_ne!(sec, Secret::Encoded("still not base32!".to_string()));
        assert_ne!(sec, Secret::Encoded(BASE32.to_string()));
        assert_ne!(sec, Secret::Raw(BYTES.to_vec()));
    }
}
