//! Canonical `otpauth://totp/...` enrollment URIs: building one from an
//! engine plus account metadata, and parsing one back.

use core::fmt;

use url::{Host, Url};

use crate::totp::Algorithm;
use crate::{Error, Totp, TotpOptions};

/// Builds the provisioning URI an authenticator app consumes, usually
/// through a QR code:
/// `otpauth://totp/{issuer}:{label}?secret=..&period=..&digits=..&algorithm=..&issuer=..`
///
/// Label and issuer are trimmed and percent-encoded; the secret is rendered
/// as non-padded base32. Without an issuer both the path prefix and the
/// query parameter are omitted.
///
/// # Example
/// ```
/// use twofa_util::{EnrollmentUri, Totp};
///
/// let totp = Totp::new("TestSecretSuperSecret").unwrap();
/// let uri = EnrollmentUri::new(&totp, "john@example.com", Some("Example")).unwrap();
/// assert!(uri.to_string().starts_with("otpauth://totp/Example:john%40example.com?"));
/// ```
#[derive(Debug)]
pub struct EnrollmentUri<'a, T = Vec<u8>> {
    totp: &'a Totp<T>,
    label: String,
    issuer: Option<String>,
}

impl<'a, T: AsRef<[u8]>> EnrollmentUri<'a, T> {
    /// Validate the account metadata and bind it to an engine.
    ///
    /// # Errors
    ///
    /// The label must be non-empty once trimmed and, like the issuer, must
    /// not contain a colon, which is the path separator of the URI format.
    /// An issuer that trims to nothing is treated as absent.
    pub fn new(totp: &'a Totp<T>, label: &str, issuer: Option<&str>) -> Result<Self, Error> {
        let label = label.trim();
        if label.is_empty() || label.contains(':') {
            return Err(Error::Label(label.to_string()));
        }
        let issuer = issuer.map(str::trim).filter(|s| !s.is_empty());
        if let Some(issuer) = issuer {
            if issuer.contains(':') {
                return Err(Error::Issuer(issuer.to_string()));
            }
        }
        Ok(EnrollmentUri {
            totp,
            label: label.to_string(),
            issuer: issuer.map(str::to_string),
        })
    }

    /// The trimmed label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The trimmed issuer, if one was provided.
    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }
}

impl<T: AsRef<[u8]>> fmt::Display for EnrollmentUri<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = urlencoding::encode(&self.label);
        let prefix = match &self.issuer {
            Some(issuer) => format!("{}:", urlencoding::encode(issuer)),
            None => String::new(),
        };
        write!(
            f,
            "otpauth://totp/{}{}?secret={}&period={}&digits={}&algorithm={}",
            prefix,
            label,
            self.totp.secret_base32(),
            self.totp.step,
            self.totp.digits,
            self.totp.algorithm,
        )?;
        if let Some(issuer) = &self.issuer {
            write!(f, "&issuer={}", urlencoding::encode(issuer))?;
        }
        Ok(())
    }
}

/// An enrollment URI decomposed back into an engine and account metadata.
#[derive(Debug, PartialEq)]
pub struct ParsedEnrollment {
    pub totp: Totp<Vec<u8>>,
    pub label: String,
    pub issuer: Option<String>,
}

impl ParsedEnrollment {
    /// Parse a standard `otpauth://totp/...` URI.
    ///
    /// Parameters absent from the query keep the RFC 6238 defaults. Unknown
    /// parameters are ignored. An issuer present in both the path and the
    /// query must match.
    pub fn from_uri<S: AsRef<str>>(uri: S) -> Result<ParsedEnrollment, Error> {
        let url = Url::parse(uri.as_ref())?;
        if url.scheme() != "otpauth" {
            return Err(Error::Scheme(url.scheme().to_string()));
        }
        match url.host() {
            Some(Host::Domain("totp")) => {}
            Some(host) => return Err(Error::Host(host.to_string())),
            None => return Err(Error::Host(String::new())),
        }

        let mut options = TotpOptions::default();
        let mut secret: Vec<u8> = Vec::new();
        let mut issuer: Option<String> = None;

        let path = url.path().trim_start_matches('/');
        let label = match path.split_once(':') {
            Some((path_issuer, label)) => {
                issuer = Some(
                    urlencoding::decode(path_issuer)
                        .map_err(|_| Error::Issuer(path_issuer.to_string()))?
                        .to_string(),
                );
                label
            }
            None => path,
        };
        let label = urlencoding::decode(label)
            .map_err(|_| Error::Label(label.to_string()))?
            .to_string();
        if label.is_empty() || label.contains(':') {
            return Err(Error::Label(label));
        }

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "algorithm" => {
                    options.algorithm = Algorithm::from_name(value.as_ref())?;
                }
                "digits" => {
                    options.digits = value
                        .parse::<usize>()
                        .map_err(|_| Error::Query("digits", value.to_string()))?;
                }
                "period" => {
                    options.step = value
                        .parse::<u64>()
                        .map_err(|_| Error::Query("period", value.to_string()))?;
                }
                "secret" => {
                    secret =
                        base32::decode(base32::Alphabet::Rfc4648 { padding: false }, value.as_ref())
                            .ok_or_else(|| Error::Encoding(value.to_string()))?;
                }
                "issuer" => {
                    let param_issuer = value.to_string();
                    if let Some(path_issuer) = &issuer {
                        if path_issuer != &param_issuer {
                            return Err(Error::IssuerMismatch(
                                path_issuer.to_string(),
                                param_issuer,
                            ));
                        }
                    }
                    issuer = Some(param_issuer);
                }
                _ => {}
            }
        }

        if secret.is_empty() {
            return Err(Error::Encoding(String::new()));
        }

        Ok(ParsedEnrollment {
            totp: Totp::with_options(secret, &options)?,
            label,
            issuer,
        })
    }
}
