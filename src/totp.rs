use core::fmt;
use std::time::{SystemTime, SystemTimeError, UNIX_EPOCH};

use constant_time_eq::constant_time_eq;
use hmac::Mac;

#[cfg(feature = "serde_support")]
use serde::{Deserialize, Serialize};

use crate::options::assert_secret_length;
use crate::{Error, TotpOptions, Window};

type HmacSha1 = hmac::Hmac<sha1::Sha1>;
type HmacSha256 = hmac::Hmac<sha2::Sha256>;
type HmacSha512 = hmac::Hmac<sha2::Sha512>;

/// Algorithm enum holds the three standard algorithms for TOTP as per the
/// [reference implementation](https://tools.ietf.org/html/rfc6238#appendix-A)
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub enum Algorithm {
    SHA1,
    SHA256,
    SHA512,
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::SHA1
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::SHA1 => f.write_str("SHA1"),
            Algorithm::SHA256 => f.write_str("SHA256"),
            Algorithm::SHA512 => f.write_str("SHA512"),
        }
    }
}

impl Algorithm {
    pub(crate) fn from_name(name: &str) -> Result<Algorithm, Error> {
        match name {
            "SHA1" => Ok(Algorithm::SHA1),
            "SHA256" => Ok(Algorithm::SHA256),
            "SHA512" => Ok(Algorithm::SHA512),
            _ => Err(Error::Algorithm(name.to_string())),
        }
    }

    fn hash<D>(mut digest: D, data: &[u8]) -> Vec<u8>
    where
        D: Mac,
    {
        digest.update(data);
        digest.finalize().into_bytes().to_vec()
    }

    fn sign(&self, key: &[u8], data: &[u8]) -> Vec<u8> {
        match self {
            Algorithm::SHA1 => Algorithm::hash(HmacSha1::new_from_slice(key).unwrap(), data),
            Algorithm::SHA256 => Algorithm::hash(HmacSha256::new_from_slice(key).unwrap(), data),
            Algorithm::SHA512 => Algorithm::hash(HmacSha512::new_from_slice(key).unwrap(), data),
        }
    }
}

fn system_time() -> Result<u64, SystemTimeError> {
    let t = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    Ok(t)
}

/// The TOTP engine: derives time-step counters from a timestamp, computes
/// HMAC-based codes for a counter, and verifies candidate codes within the
/// configured drift [Window].
///
/// Both generation and verification are pure over explicit inputs; the only
/// ambient effect lives in the `*_current` convenience methods, which read
/// the system clock once and delegate. The
/// [secret](struct.Totp.html#structfield.secret) field is sensitive data,
/// treat it accordingly.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde_support", derive(Serialize, Deserialize))]
pub struct Totp<T = Vec<u8>> {
    /// Digest used for the HMAC. SHA-1 is the most widespread and, for TOTP
    /// purposes, its collisions are [not a problem](https://tools.ietf.org/html/rfc4226#appendix-B.2)
    /// as HMAC-SHA-1 is not impacted. Not all clients support the other two.
    pub algorithm: Algorithm,
    /// The number of digits composing a code, 6 to 10. Truncation keeps 31
    /// bits, so 10-digit codes are never fully saturated.
    pub digits: usize,
    /// Number of steps accepted around the current one, in each direction.
    pub window: Window,
    /// Duration in seconds of a step. The recommended value per
    /// [rfc-6238](https://tools.ietf.org/html/rfc6238#section-5.2) is 30 seconds.
    pub step: u64,
    /// As per [rfc-4226](https://tools.ietf.org/html/rfc4226#section-4) the
    /// secret should come from a strong source, most likely a CSPRNG. It
    /// should be at least 128 bits, but 160 are recommended.
    ///
    /// Non-encoded value.
    pub secret: T,
}

impl<T: AsRef<[u8]>> PartialEq for Totp<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.algorithm != other.algorithm {
            return false;
        }
        if self.digits != other.digits {
            return false;
        }
        if self.window != other.window {
            return false;
        }
        if self.step != other.step {
            return false;
        }
        constant_time_eq(self.secret.as_ref(), other.secret.as_ref())
    }
}

impl<T: AsRef<[u8]>> fmt::Display for Totp<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "digits: {}; step: {}; alg: {}; window: -{}/+{}",
            self.digits, self.step, self.algorithm, self.window.back, self.window.ahead,
        )
    }
}

impl<T: AsRef<[u8]>> Totp<T> {
    /// Create an engine with the RFC 6238 recommended defaults: SHA-1,
    /// 6 digits, 30-second steps, a drift window of one step each side.
    ///
    /// * `secret`: expects a non-encoded value; to pass a base32 string use
    ///   [Secret::Encoded](crate::Secret::Encoded) and
    ///   [to_bytes](crate::Secret::to_bytes).
    ///
    /// ```
    /// use twofa_util::{Secret, Totp};
    /// let secret = Secret::Encoded("OBWGC2LOFVZXI4TJNZTS243FMNZGK5BNGEZDG".to_string());
    /// let totp = Totp::new(secret.to_bytes().unwrap()).unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Will return an error when the secret is shorter than 128 bits.
    pub fn new(secret: T) -> Result<Totp<T>, Error> {
        Totp::with_options(secret, &TotpOptions::default())
    }

    /// Create an engine from explicit [TotpOptions], validated eagerly.
    ///
    /// # Errors
    ///
    /// Will return an error when `digits` is outside 6..=10, when `step` is
    /// zero, or when the secret is shorter than 128 bits.
    pub fn with_options(secret: T, options: &TotpOptions) -> Result<Totp<T>, Error> {
        options.validate()?;
        assert_secret_length(secret.as_ref())?;
        Ok(Totp {
            algorithm: options.algorithm,
            digits: options.digits,
            window: options.window,
            step: options.step,
            secret,
        })
    }

    /// The time-step counter a timestamp falls into: `time / step`, with
    /// T0 = 0. Monotonically non-decreasing with the timestamp.
    pub fn time_step(&self, time: u64) -> u64 {
        time / self.step
    }

    /// HMAC of the given step counter, keyed with the secret.
    fn sign_step(&self, step: u64) -> Vec<u8> {
        self.algorithm
            .sign(self.secret.as_ref(), step.to_be_bytes().as_ref())
    }

    /// Generate the code for a step counter.
    ///
    /// Dynamic truncation per [rfc-4226](https://tools.ietf.org/html/rfc4226#section-5.3):
    /// the low nibble of the last HMAC byte picks an offset, four bytes from
    /// there are read as a 31-bit big-endian integer and reduced modulo
    /// 10^digits. Identical inputs always yield the identical code.
    pub fn generate_at(&self, step: u64) -> String {
        let hash: &[u8] = &self.sign_step(step);
        let offset = (hash.last().unwrap() & 15) as usize;
        let value = u32::from_be_bytes(hash[offset..offset + 4].try_into().unwrap()) & 0x7fff_ffff;
        // 10^10 overflows u32, and digits goes up to 10.
        let code = u64::from(value) % 10_u64.pow(self.digits as u32);
        format!("{1:00$}", self.digits, code)
    }

    /// Generate the code for the step the provided timestamp falls into.
    pub fn generate(&self, time: u64) -> String {
        self.generate_at(self.time_step(time))
    }

    /// Generate the code for the current system time.
    pub fn generate_current(&self) -> Result<String, Error> {
        let t = system_time()?;
        Ok(self.generate(t))
    }

    /// Check a token against every step in the drift window around the step
    /// the provided timestamp falls into.
    ///
    /// A non-matching token is a plain `false`, never an error. Each
    /// comparison is constant-time. Steps below zero (a window reaching past
    /// the epoch) are clipped rather than wrapped.
    pub fn check(&self, token: &str, time: u64) -> bool {
        let current = self.time_step(time);
        let first = current.saturating_sub(u64::from(self.window.back));
        let last = current.saturating_add(u64::from(self.window.ahead));
        for step in first..=last {
            if constant_time_eq(self.generate_at(step).as_bytes(), token.as_bytes()) {
                return true;
            }
        }
        false
    }

    /// Check a token against the current system time, accounting for the
    /// drift window.
    pub fn check_current(&self, token: &str) -> Result<bool, Error> {
        let t = system_time()?;
        Ok(self.check(token, t))
    }

    /// Returns the timestamp of the first second of the next step, given the
    /// provided timestamp in seconds.
    pub fn next_step(&self, time: u64) -> u64 {
        (self.time_step(time) + 1) * self.step
    }

    /// Returns the timestamp of the first second of the next step, according
    /// to the system time.
    pub fn next_step_current(&self) -> Result<u64, Error> {
        let t = system_time()?;
        Ok(self.next_step(t))
    }

    /// Seconds the code for the current step remains valid, ignoring the
    /// drift window.
    pub fn ttl(&self) -> Result<u64, Error> {
        let t = system_time()?;
        Ok(self.step - (t % self.step))
    }

    /// The base32 representation of the secret, useful when users want to
    /// type the secret into their authenticator instead of scanning a code.
    pub fn secret_base32(&self) -> String {
        base32::encode(
            base32::Alphabet::Rfc4648 { padding: false },
            self.secret.as_ref(),
        )
    }
}
