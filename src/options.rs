use crate::Algorithm;
use crate::Error;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

pub(crate) fn assert_digits(digits: &usize) -> Result<(), Error> {
    if !(&6..=&10).contains(&digits) {
        Err(Error::Digits(*digits))
    } else {
        Ok(())
    }
}

pub(crate) fn assert_step(step: &u64) -> Result<(), Error> {
    if *step == 0 {
        Err(Error::Step(*step))
    } else {
        Ok(())
    }
}

pub(crate) fn assert_secret_length(secret: &[u8]) -> Result<(), Error> {
    if secret.len() < 16 {
        Err(Error::SecretSize(secret.len() * 8))
    } else {
        Ok(())
    }
}

/// How many time steps around the current one a token is still accepted in,
/// to tolerate clock drift between the client and this machine.
///
/// The window is explicit in both directions. `Window::symmetric(1)` is the
/// recommended value per [rfc-6238](https://tools.ietf.org/html/rfc6238#section-5.2)
/// and the default. A window accepting only future drift is
/// `Window { back: 0, ahead: 1 }`. `Window::symmetric(0)` accepts the exact
/// current step only.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Window {
    /// Steps before the current one that are still accepted.
    pub back: u8,
    /// Steps after the current one that are still accepted.
    pub ahead: u8,
}

impl Window {
    /// A window accepting `steps` time steps on each side of the current one.
    pub const fn symmetric(steps: u8) -> Self {
        Window {
            back: steps,
            ahead: steps,
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Window::symmetric(1)
    }
}

/// Set of options to build a [Totp](crate::Totp), with the
/// [rfc-6238](https://tools.ietf.org/html/rfc6238) recommended values as
/// defaults. Every field is validated when the engine is built, never
/// silently clamped.
///
/// # Example
/// ```
/// use twofa_util::{Totp, TotpOptions, Algorithm, Window};
///
/// let mut options = TotpOptions::default();
/// options.digits(8).unwrap();
/// options.algorithm = Algorithm::SHA256;
/// options.window = Window::symmetric(0);
///
/// let totp = Totp::with_options("TestSecretSuperSecret", &options).unwrap();
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct TotpOptions {
    /// Digest used for the HMAC. Defaults to SHA-1, the only one every
    /// authenticator app gets right.
    pub algorithm: Algorithm,
    /// Number of digits in a code, 6 to 10. Defaults to 6.
    pub digits: usize,
    /// Duration of a time step in seconds, at least 1. Defaults to 30.
    pub step: u64,
    /// Accepted drift around the current step. Defaults to one step on
    /// each side.
    pub window: Window,
}

impl Default for TotpOptions {
    fn default() -> Self {
        TotpOptions {
            algorithm: Algorithm::default(),
            digits: 6,
            step: 30,
            window: Window::default(),
        }
    }
}

impl TotpOptions {
    /// Set the number of digits, rejecting values outside 6..=10.
    pub fn digits(&mut self, value: usize) -> Result<(), Error> {
        assert_digits(&value)?;
        self.digits = value;
        Ok(())
    }

    /// Set the step duration in seconds, rejecting zero.
    pub fn step(&mut self, value: u64) -> Result<(), Error> {
        assert_step(&value)?;
        self.step = value;
        Ok(())
    }

    /// Check every field, since `digits` and `step` are also settable
    /// directly.
    pub fn validate(&self) -> Result<(), Error> {
        assert_digits(&self.digits)?;
        assert_step(&self.step)
    }
}
