//! Two-factor enrollment utilities: generate a TOTP secret together with its
//! `otpauth://` URI and QR provisioning code, verify a submitted token with a
//! configurable drift window, and generate the current token. Codes follow
//! [rfc-6238](https://tools.ietf.org/html/rfc6238) with configurable
//! algorithm, digit count and step duration.
//!
//! Be aware that some authenticator apps will accept the `SHA256` and
//! `SHA512` algorithms but silently fall back to `SHA1`, which makes
//! verification fail due to mismatched algorithms. Use `SHA1` to avoid this
//! problem.
//!
//! # Examples
//!
//! The whole enrollment round trip through the convenience functions:
//!
//! ```rust
//! use twofa_util::{generate_secret, generate_token, verify_token, TotpOptions};
//!
//! let enrollment = generate_secret("constantoine@github.com", Some("Github")).unwrap();
//! // Store `enrollment.secret`, show `enrollment.qr_code` to the user.
//! let token = generate_token(&enrollment.secret).unwrap();
//! assert!(verify_token(&token, &enrollment.secret, &TotpOptions::default()).unwrap());
//! ```
//!
//! Driving the engine directly, with an injected timestamp:
//!
//! ```rust
//! use twofa_util::{Secret, Totp};
//!
//! let secret = Secret::Encoded("OBWGC2LOFVZXI4TJNZTS243FMNZGK5BNGEZDG".to_string());
//! let totp = Totp::new(secret.to_bytes().unwrap()).unwrap();
//! let token = totp.generate(1234567890);
//! assert!(totp.check(&token, 1234567890));
//! ```

mod enroll;
mod error;
mod options;
mod secret;
mod totp;
mod uri;

pub use enroll::{generate_secret, generate_token, verify_token, verify_token_at, Enrollment};
pub use error::Error;
pub use options::{TotpOptions, Window};
pub use secret::Secret;
pub use totp::{Algorithm, Totp};
pub use uri::{EnrollmentUri, ParsedEnrollment};
