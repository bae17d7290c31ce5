use std::time::SystemTimeError;

use url::ParseError;

/// Everything that can go wrong while enrolling, generating or verifying.
///
/// A token that simply does not match is never an error: verification
/// returns `Ok(false)` in that case.
#[derive(Debug)]
pub enum Error {
    /// Label is empty once trimmed, or contains a colon.
    Label(String),
    /// Issuer contains a colon.
    Issuer(String),
    /// The issuer in the URI path does not match the `issuer` query parameter.
    IssuerMismatch(String, String),
    /// Secret text is not valid non-padded base32.
    Encoding(String),
    /// Number of code digits outside the accepted 6..=10 range.
    Digits(usize),
    /// Time step of zero seconds.
    Step(u64),
    /// Shared secret shorter than 128 bits.
    SecretSize(usize),
    /// The OS entropy source could not supply random bytes.
    Entropy,
    /// System clock is set before the Unix epoch.
    Clock(SystemTimeError),
    /// URI is not syntactically valid.
    Url(ParseError),
    /// URI scheme is not `otpauth`.
    Scheme(String),
    /// URI host is not `totp`.
    Host(String),
    /// Unknown digest algorithm name.
    Algorithm(String),
    /// A numeric query parameter could not be parsed. Holds (name, value).
    Query(&'static str, String),
    /// The QR encoder refused the URI or the PNG encoder failed.
    #[cfg(feature = "qr")]
    Qr(String),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Clock(e) => Some(e),
            Error::Url(e) => Some(e),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Label(label) => write!(
                f,
                "Label must be a non-empty string without a colon. \"{}\" is not",
                label
            ),
            Error::Issuer(issuer) => write!(
                f,
                "Issuer can't contain a colon. \"{}\" contains a colon",
                issuer
            ),
            Error::IssuerMismatch(path_issuer, param_issuer) => write!(
                f,
                "An issuer \"{}\" could be retrieved from the path, but a different issuer \"{}\" was found in the issuer URL parameter",
                path_issuer, param_issuer
            ),
            Error::Encoding(secret) => write!(
                f,
                "Secret \"{}\" is not a valid non-padded base32 string",
                secret
            ),
            Error::Digits(digits) => write!(
                f,
                "Codes must be between 6 and 10 digits long. {} digits is not allowed",
                digits
            ),
            Error::Step(step) => write!(
                f,
                "The time step must be at least one second. {} is not allowed",
                step
            ),
            Error::SecretSize(bits) => write!(
                f,
                "The length of the shared secret MUST be at least 128 bits. {} bits is not enough",
                bits
            ),
            Error::Entropy => write!(f, "The OS random source could not supply entropy"),
            Error::Clock(e) => write!(
                f,
                "System time error: {}. The system time is set before the Unix epoch",
                e
            ),
            Error::Url(e) => write!(f, "Error parsing URL: {}", e),
            Error::Scheme(scheme) => write!(f, "Scheme should be otpauth, not \"{}\"", scheme),
            Error::Host(host) => write!(f, "Host should be totp, not \"{}\"", host),
            Error::Algorithm(algo) => write!(
                f,
                "Algorithm can only be SHA1, SHA256 or SHA512, not \"{}\"",
                algo
            ),
            Error::Query(name, value) => write!(
                f,
                "Could not parse \"{}\" as a number for the \"{}\" parameter",
                value, name
            ),
            #[cfg(feature = "qr")]
            Error::Qr(e) => write!(f, "Could not render the QR code: {}", e),
        }
    }
}

impl From<SystemTimeError> for Error {
    fn from(e: SystemTimeError) -> Self {
        Error::Clock(e)
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Url(e)
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn label() {
        let error = Error::Label("  ".to_string());
        assert_eq!(
            error.to_string(),
            "Label must be a non-empty string without a colon. \"  \" is not"
        )
    }

    #[test]
    fn issuer() {
        let error = Error::Issuer("Iss:uer".to_string());
        assert_eq!(
            error.to_string(),
            "Issuer can't contain a colon. \"Iss:uer\" contains a colon"
        )
    }

    #[test]
    fn issuer_mismatch() {
        let error = Error::IssuerMismatch("Google".to_string(), "Github".to_string());
        assert_eq!(error.to_string(), "An issuer \"Google\" could be retrieved from the path, but a different issuer \"Github\" was found in the issuer URL parameter")
    }

    #[test]
    fn encoding() {
        let error = Error::Encoding("YoLo".to_string());
        assert_eq!(
            error.to_string(),
            "Secret \"YoLo\" is not a valid non-padded base32 string"
        )
    }

    #[test]
    fn digits() {
        let error = Error::Digits(5);
        assert_eq!(
            error.to_string(),
            "Codes must be between 6 and 10 digits long. 5 digits is not allowed"
        )
    }

    #[test]
    fn step() {
        let error = Error::Step(0);
        assert_eq!(
            error.to_string(),
            "The time step must be at least one second. 0 is not allowed"
        )
    }

    #[test]
    fn secret_size() {
        let error = Error::SecretSize(112);
        assert_eq!(
            error.to_string(),
            "The length of the shared secret MUST be at least 128 bits. 112 bits is not enough"
        )
    }

    #[test]
    fn url() {
        let error = Error::Url(url::ParseError::EmptyHost);
        assert_eq!(error.to_string(), "Error parsing URL: empty host")
    }

    #[test]
    fn scheme() {
        let error = Error::Scheme("https".to_string());
        assert_eq!(
            error.to_string(),
            "Scheme should be otpauth, not \"https\""
        )
    }

    #[test]
    fn algorithm() {
        let error = Error::Algorithm("MD5".to_string());
        assert_eq!(
            error.to_string(),
            "Algorithm can only be SHA1, SHA256 or SHA512, not \"MD5\""
        )
    }

    #[test]
    fn query() {
        let error = Error::Query("digits", "six".to_string());
        assert_eq!(
            error.to_string(),
            "Could not parse \"six\" as a number for the \"digits\" parameter"
        )
    }
}
