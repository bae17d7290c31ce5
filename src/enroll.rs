//! The one-call surface: enroll an account, generate the current token,
//! verify a submitted token.
//!
//! These are thin conveniences over [Secret](crate::Secret),
//! [Totp](crate::Totp) and [EnrollmentUri](crate::EnrollmentUri) for
//! callers that live entirely in base32 strings and RFC defaults.

use crate::{EnrollmentUri, Error, Secret, Totp, TotpOptions};

/// Everything a caller needs to enroll a user: the base32 secret to store,
/// the otpauth URI, and a scannable QR code.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrollment {
    /// The freshly generated secret, base32 encoded without padding.
    pub secret: String,
    /// The `otpauth://totp/...` provisioning URI.
    pub otpauth: String,
    /// The URI rendered as a QR code: a PNG wrapped in a
    /// `data:image/png;base64,` URI, ready to embed in an `<img>` tag.
    #[cfg(feature = "qr")]
    pub qr_code: String,
}

/// Generate a 160-bit secret for a new enrollment, plus its provisioning
/// URI and QR code.
///
/// The label is usually the user's account name and must be non-empty once
/// trimmed; the issuer is the name of your service, strongly recommended but
/// optional. Neither may contain a colon.
///
/// # Example
/// ```
/// let enrollment = twofa_util::generate_secret("john@example.com", Some("Example")).unwrap();
/// assert!(enrollment.otpauth.starts_with("otpauth://totp/Example:john%40example.com?"));
/// # #[cfg(feature = "qr")]
/// assert!(enrollment.qr_code.starts_with("data:image/png;base64,"));
/// ```
///
/// # Errors
///
/// [Error::Label]/[Error::Issuer] on invalid metadata, [Error::Entropy] if
/// the OS random source fails, and with the `qr` feature [Error::Qr] if the
/// URI cannot be rendered.
pub fn generate_secret(label: &str, issuer: Option<&str>) -> Result<Enrollment, Error> {
    let secret = Secret::generate()?;
    let totp = Totp::new(secret.to_bytes()?)?;
    let otpauth = EnrollmentUri::new(&totp, label, issuer)?.to_string();
    #[cfg(feature = "qr")]
    let qr_code = format!(
        "data:image/png;base64,{}",
        qrcodegen_image::draw_base64(&otpauth).map_err(Error::Qr)?
    );
    Ok(Enrollment {
        secret: totp.secret_base32(),
        otpauth,
        #[cfg(feature = "qr")]
        qr_code,
    })
}

/// Generate the current 6-digit token for a base32 secret, with RFC 6238
/// defaults.
///
/// # Errors
///
/// [Error::Encoding] if the secret is not valid base32, [Error::SecretSize]
/// if it decodes to fewer than 128 bits, [Error::Clock] if the system clock
/// is set before the Unix epoch.
pub fn generate_token(secret: &str) -> Result<String, Error> {
    let totp = Totp::new(Secret::Encoded(secret.to_string()).to_bytes()?)?;
    totp.generate_current()
}

/// Check a submitted token against a base32 secret at the current time.
///
/// A token that does not match is `Ok(false)`, never an error. The accepted
/// drift defaults to one step each side; pass explicit [TotpOptions] to
/// change it.
///
/// # Example
/// ```
/// use twofa_util::TotpOptions;
///
/// let enrollment = twofa_util::generate_secret("john@example.com", None).unwrap();
/// let token = twofa_util::generate_token(&enrollment.secret).unwrap();
/// let valid = twofa_util::verify_token(&token, &enrollment.secret, &TotpOptions::default()).unwrap();
/// assert!(valid);
/// ```
///
/// # Errors
///
/// [Error::Encoding] for an undecodable secret, [Error::Digits]/[Error::Step]
/// for out-of-range options, [Error::Clock] if the system clock is set
/// before the Unix epoch.
pub fn verify_token(token: &str, secret: &str, options: &TotpOptions) -> Result<bool, Error> {
    let totp = Totp::with_options(Secret::Encoded(secret.to_string()).to_bytes()?, options)?;
    totp.check_current(token)
}

/// [verify_token] with an explicit timestamp instead of the system clock,
/// for deterministic callers and tests.
pub fn verify_token_at(
    token: &str,
    secret: &str,
    time: u64,
    options: &TotpOptions,
) -> Result<bool, Error> {
    let totp = Totp::with_options(Secret::Encoded(secret.to_string()).to_bytes()?, options)?;
    Ok(totp.check(token, time))
}
