use crate::b64;
use crate::error::PwHashError;
use crate::kdf;
use crate::lexer::{self, Format, TokenizedHash};

use rand::{rngs::OsRng, Fill};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The key derivation functions behind the supported hash formats. New hashes always use
/// Argon2id; PBKDF2-HMAC-SHA256 is only ever used to verify existing hashes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    /// Memory-hard hybrid of Argon2d and Argon2i
    Argon2id,

    /// PBKDF2 with HMAC-SHA256 as the pseudorandom function
    Pbkdf2Sha256,
}

/// The cost parameters a hash was computed with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Params {
    /// Argon2id memory cost (KiB), time cost and parallelism
    Argon2id {
        /// Memory cost in kibibytes (`m`)
        mem_cost_kib: u32,
        /// Time cost (`t`)
        iterations: u32,
        /// Parallelism (`p`)
        threads: u32,
    },

    /// PBKDF2 iteration count
    Pbkdf2Sha256 {
        /// Number of HMAC-SHA256 rounds
        iterations: u32,
    },
}

/// A builder for a new Argon2id hash.
#[derive(Clone, Debug)]
pub struct Hasher<'a> {
    custom_salt: Option<&'a [u8]>,
    salt_len: usize,
    hash_len: usize,
    iterations: u32,
    mem_cost_kib: u32,
    threads: u32,
}

impl Default for Hasher<'_> {
    /// Create a new `Hasher` with default values.
    ///
    /// The defaults are as follows:
    ///
    /// * Salt Length: 12 bytes
    /// * Hash Length: 32 bytes
    /// * Iterations: 1
    /// * Memory Cost: 65536 kibibytes (64 MiB)
    /// * Parallelization Factor: 4 lanes
    fn default() -> Self {
        Self {
            custom_salt: None,
            salt_len: 12,
            hash_len: 32,
            iterations: 1,
            mem_cost_kib: 65536,
            threads: 4,
        }
    }
}

impl<'a> Hasher<'a> {
    /// Create a new `Hasher` with default values. See [`Hasher::default()`].
    pub fn new() -> Self {
        Self::default()
    }

    /// When left unspecified, a salt is generated using a cryptographically-secure random
    /// number generator. Only use this function if you need to generate a hash
    /// deterministically with a known salt.
    pub fn custom_salt<SLT>(mut self, salt: &'a SLT) -> Self
    where
        SLT: AsRef<[u8]> + ?Sized,
    {
        self.custom_salt = Some(salt.as_ref());
        self
    }

    /// The length of the random salt, in bytes. Ignored if a custom salt is given.
    pub fn salt_length(mut self, salt_len: usize) -> Self {
        self.salt_len = salt_len;
        self
    }

    /// The length of the resulting hash, in bytes.
    pub fn hash_length(mut self, hash_len: usize) -> Self {
        self.hash_len = hash_len;
        self
    }

    /// The Argon2 time cost.
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// The Argon2 memory cost, in kibibytes.
    pub fn memory_cost_kib(mut self, cost: u32) -> Self {
        self.mem_cost_kib = cost;
        self
    }

    /// The Argon2 parallelism (number of lanes).
    pub fn threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }

    /// Consumes the `Hasher` and returns a hash in the argon2 utility format.
    ///
    /// This is an expensive operation. Callers that must not block should move it to a
    /// separate thread.
    pub fn hash<P>(self, password: &P) -> Result<Hash, PwHashError>
    where
        P: AsRef<[u8]> + ?Sized,
    {
        if self.hash_len == 0 {
            return Err(PwHashError::InvalidParameter("Hash length must be positive"));
        }

        let salt = match self.custom_salt {
            Some(s) => Vec::from(s),
            None => {
                let mut rand_salt = vec![0u8; self.salt_len];
                rand_salt
                    .try_fill(&mut OsRng)
                    .expect("Failed to fill buffer with random bytes");
                rand_salt
            }
        };

        let hash = kdf::argon2id(
            password.as_ref(),
            &salt,
            self.mem_cost_kib,
            self.iterations,
            self.threads,
            self.hash_len,
        )?;

        Ok(Hash {
            format: Format::Argon2idUtility,
            params: Params::Argon2id {
                mem_cost_kib: self.mem_cost_kib,
                iterations: self.iterations,
                threads: self.threads,
            },
            salt,
            hash,
        })
    }
}

/// A decoded password hash: the digest, its salt, the format it was stored in and the
/// parameters it was computed with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hash {
    format: Format,
    params: Params,
    salt: Vec<u8>,
    hash: Vec<u8>,
}

impl fmt::Display for Hash {
    /// Writes the hash string in the hash's own format. Argon2 option keys other than
    /// `m`, `t` and `p` are not carried over from a parsed string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.format, self.params) {
            (
                Format::Argon2idUtility,
                Params::Argon2id {
                    mem_cost_kib,
                    iterations,
                    threads,
                },
            ) => write!(
                f,
                "$argon2id$v=19$m={},t={},p={}${}${}",
                mem_cost_kib,
                iterations,
                threads,
                b64::encode(&self.salt),
                b64::encode(&self.hash),
            ),
            (
                Format::Argon2idPhc,
                Params::Argon2id {
                    mem_cost_kib,
                    iterations,
                    threads,
                },
            ) => write!(
                f,
                "$argon2id$m={},t={},p={}${}${}",
                mem_cost_kib,
                iterations,
                threads,
                b64::encode(&self.salt),
                b64::encode(&self.hash),
            ),
            (Format::Pbkdf2Sha256Python, Params::Pbkdf2Sha256 { iterations }) => write!(
                f,
                "$pbkdf2-sha256${}${}${}",
                iterations,
                b64::encode_adapted(&self.salt),
                b64::encode_adapted(&self.hash),
            ),
            (Format::Pbkdf2Sha256Django, Params::Pbkdf2Sha256 { iterations }) => write!(
                f,
                "pbkdf2_sha256${}${}${}",
                iterations,
                String::from_utf8_lossy(&self.salt),
                b64::encode_padded(&self.hash),
            ),
            // Hash values are only built with a format's own parameter kind
            _ => Err(fmt::Error),
        }
    }
}

impl FromStr for Hash {
    type Err = PwHashError;

    /// Deserializes a hash string in any supported format into parts (the hash, the salt,
    /// parameters) that can be used for verification.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = TokenizedHash::try_from(s)?;

        let hash = match b64::decode(tokens.hash) {
            Ok(h) => h,
            Err(_) => {
                return Err(PwHashError::InvalidHash(
                    "Invalid character in base64-encoded hash",
                ))
            }
        };

        let (params, salt) = match tokens.format.algorithm() {
            Algorithm::Argon2id => {
                let options = lexer::parse_options(tokens.options)?;

                let params = Params::Argon2id {
                    mem_cost_kib: required_option(&options, "m")?,
                    iterations: required_option(&options, "t")?,
                    threads: required_option(&options, "p")?,
                };

                (params, decode_salt(tokens.salt)?)
            }
            Algorithm::Pbkdf2Sha256 => {
                let iterations: u32 = match tokens.options.parse() {
                    Ok(i) => i,
                    Err(_) => return Err(PwHashError::InvalidHash("Invalid iteration count")),
                };

                let salt = if tokens.format == Format::Pbkdf2Sha256Django {
                    Vec::from(tokens.salt.as_bytes())
                } else {
                    decode_salt(tokens.salt)?
                };

                (Params::Pbkdf2Sha256 { iterations }, salt)
            }
        };

        Ok(Self {
            format: tokens.format,
            params,
            salt,
            hash,
        })
    }
}

fn required_option(options: &HashMap<&str, u64>, key: &str) -> Result<u32, PwHashError> {
    let value = match options.get(key) {
        Some(v) => *v,
        None => return Err(PwHashError::InvalidHash("Missing required Argon2 parameter")),
    };

    match u32::try_from(value) {
        Ok(v) => Ok(v),
        Err(_) => Err(PwHashError::InvalidHash("Argon2 parameter is out of range")),
    }
}

fn decode_salt(token: &str) -> Result<Vec<u8>, PwHashError> {
    match b64::decode(token) {
        Ok(s) => Ok(s),
        Err(_) => Err(PwHashError::InvalidHash(
            "Invalid character in base64-encoded salt",
        )),
    }
}

impl Hash {
    /// Returns a reference to a byte slice of the stored hash/digest.
    pub fn as_bytes(&self) -> &[u8] {
        &self.hash
    }

    /// Returns a reference to a byte slice of the salt used to generate the hash.
    pub fn salt_bytes(&self) -> &[u8] {
        &self.salt
    }

    /// The format this hash was parsed from or will be written in.
    pub fn format(&self) -> Format {
        self.format
    }

    /// The key derivation parameters this hash was computed with.
    pub fn params(&self) -> Params {
        self.params
    }

    /// Checks if the hash matches the provided password. The digest is recomputed with the
    /// stored parameters and an output length equal to the stored digest's length.
    ///
    /// Because verification requires re-hashing the password, this is an expensive operation.
    pub fn verify<P>(&self, password: &P) -> bool
    where
        P: AsRef<[u8]> + ?Sized,
    {
        let computed = match self.recompute(password.as_ref()) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(format = ?self.format, error = %e, "could not recompute hash");
                return false;
            }
        };

        kdf::digests_match(&self.hash, &computed)
    }

    fn recompute(&self, password: &[u8]) -> Result<Vec<u8>, PwHashError> {
        match self.params {
            Params::Argon2id {
                mem_cost_kib,
                iterations,
                threads,
            } => kdf::argon2id(
                password,
                &self.salt,
                mem_cost_kib,
                iterations,
                threads,
                self.hash.len(),
            ),
            Params::Pbkdf2Sha256 { iterations } => {
                kdf::pbkdf2_sha256(password, &self.salt, iterations, self.hash.len())
            }
        }
    }
}
