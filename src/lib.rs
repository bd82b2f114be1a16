#![deny(missing_docs)]

//! A small library for password hashing. New passwords are hashed with
//! [Argon2id](https://en.wikipedia.org/wiki/Argon2) using fixed, reasonable parameters, and
//! passwords can be checked against hashes produced by several other tools, so that stored
//! credentials keep working after migrating to this crate.
//!
//! Hash strings in the following formats can be verified:
//!
//! * The reference argon2 command-line utility:
//!   `$argon2id$v=19$m=4096,t=3,p=1$<salt>$<hash>`
//! * The Argon2id PHC string format without a version field:
//!   `$argon2id$m=4096,t=3,p=1$<salt>$<hash>`
//! * Python's passlib/hashlib PBKDF2-SHA256 format:
//!   `$pbkdf2-sha256$29000$<salt>$<hash>`
//! * Django's PBKDF2-SHA256 storage format:
//!   `pbkdf2_sha256$29000$<plain salt>$<hash>`
//!
//! Salts and hashes may use any common base64 dialect (padded or not, URL-safe, or the MCF
//! flavour that writes `.` for `+`).
//!
//! # Examples
//!
//! Hash a password, then verify it:
//!
//! ```rust
//! let hash = pwhash::hash("correct horse battery staple");
//!
//! assert!(pwhash::verify("correct horse battery staple", &hash));
//! assert!(!pwhash::verify("Tr0ub4dor&3", &hash));
//! ```
//!
//! Verify a hash that was created elsewhere:
//!
//! ```rust
//! let django = "pbkdf2_sha256$29000$J7TQfLFWTkpn$QoF0Op8EhgreLpM1MQEMSeKmnTWeGcn49gI6d01wvI4=";
//!
//! assert!(pwhash::verify("password", django));
//! ```
//!
//! Malformed or unknown hash strings simply fail to verify:
//!
//! ```rust
//! assert!(!pwhash::verify("x", "not-a-hash"));
//! ```
//!
//! Inspect a hash string, including why it was rejected:
//!
//! ```rust
//! use pwhash::{Format, Hash, Params};
//! use std::str::FromStr;
//!
//! let hash = Hash::from_str(
//!     "$pbkdf2-sha256$29000$YKz13rt3bo3xntPa29u7lw$IPZ5wVv4mVrYdjnBX04eDAtCO2unwPMWcdZQ.6z0ns8",
//! )
//! .unwrap();
//!
//! assert_eq!(hash.format(), Format::Pbkdf2Sha256Python);
//! assert_eq!(hash.params(), Params::Pbkdf2Sha256 { iterations: 29000 });
//! assert!(hash.verify("password"));
//!
//! assert!(Hash::from_str("$argon2id$v=19$m=1,m=2,t=1,p=1$c2FsdA$aGFzaA").is_err());
//! ```
//!
//! Change the parameters used for hashing:
//!
//! ```rust
//! use pwhash::Hasher;
//!
//! let hash = Hasher::new()
//!         .salt_length(16)
//!         .hash_length(24)
//!         .iterations(2)
//!         .memory_cost_kib(1024)
//!         .threads(1)
//!         .hash(b"password")
//!         .unwrap();
//!
//! assert!(pwhash::verify(b"password", &hash.to_string()));
//! assert_eq!(hash.as_bytes().len(), 24);
//! ```

mod b64;
mod error;
mod hasher;
mod kdf;
mod lexer;

pub use error::PwHashError;
pub use hasher::{Algorithm, Hash, Hasher, Params};
pub use lexer::Format;

use std::str::FromStr;

/// Hashes a password with Argon2id (`m=65536,t=1,p=4`), a fresh 12-byte random salt and a
/// 32-byte output, and returns the hash string in the argon2 utility format. Store the
/// string as-is.
///
/// # Panics
///
/// Panics if the operating system's secure random number generator is unavailable.
pub fn hash<P>(password: &P) -> String
where
    P: AsRef<[u8]> + ?Sized,
{
    Hasher::default()
        .hash(password)
        .expect("Default Argon2id parameters are valid")
        .to_string()
}

/// Checks whether `password` matches the hash string `encoded`, which may be in any of the
/// supported formats.
///
/// Returns `false` both for a wrong password and for a hash string that cannot be parsed or
/// recomputed. The two cases are deliberately indistinguishable to the caller.
pub fn verify<P>(password: &P, encoded: &str) -> bool
where
    P: AsRef<[u8]> + ?Sized,
{
    match Hash::from_str(encoded) {
        Ok(h) => h.verify(password),
        Err(e) => {
            tracing::debug!(error = %e, "rejecting unrecognized password hash");
            false
        }
    }
}
