use crate::error::PwHashError;
use crate::hasher::Algorithm;

use std::collections::HashMap;

/// The hash string formats this crate understands. Each format is recognized by its prefix
/// together with the number of `$`-delimited fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// Emitted by the reference argon2 command-line utility:
    /// _$argon2id$v=19$m=4096,t=3,p=1$c2FsdA$aGFzaA_
    Argon2idUtility,

    /// PHC string without a version field: _$argon2id$m=4096,t=3,p=1$c2FsdA$aGFzaA_
    Argon2idPhc,

    /// Python's passlib/hashlib MCF-like format: _$pbkdf2-sha256$29000$c2FsdA$aGFzaA_
    Pbkdf2Sha256Python,

    /// Django's storage format, whose salt is stored as plain text:
    /// _pbkdf2_sha256$29000$salt$aGFzaA==_
    Pbkdf2Sha256Django,
}

impl Format {
    /// The key derivation function used by hashes in this format
    pub fn algorithm(self) -> Algorithm {
        match self {
            Format::Argon2idUtility | Format::Argon2idPhc => Algorithm::Argon2id,
            Format::Pbkdf2Sha256Python | Format::Pbkdf2Sha256Django => Algorithm::Pbkdf2Sha256,
        }
    }
}

struct Signature {
    format: Format,
    prefix: &'static str,
    field_count: usize,
    options: usize,
    salt: usize,
    hash: usize,
}

// Checked top to bottom. Both argon2id rows share a prefix, so the field count decides.
const SIGNATURES: [Signature; 4] = [
    Signature {
        format: Format::Argon2idUtility,
        prefix: "$argon2id$v=19$",
        field_count: 6,
        options: 3,
        salt: 4,
        hash: 5,
    },
    Signature {
        format: Format::Argon2idPhc,
        prefix: "$argon2id$",
        field_count: 5,
        options: 2,
        salt: 3,
        hash: 4,
    },
    Signature {
        format: Format::Pbkdf2Sha256Python,
        prefix: "$pbkdf2-sha256$",
        field_count: 5,
        options: 2,
        salt: 3,
        hash: 4,
    },
    Signature {
        format: Format::Pbkdf2Sha256Django,
        prefix: "pbkdf2_sha256$",
        field_count: 4,
        options: 1,
        salt: 2,
        hash: 3,
    },
];

const MIN_FIELDS: usize = 4;

/// A hash string split into the fields its format assigns roles to. Nothing is decoded
/// yet; `options` is an Argon2 option list or a PBKDF2 iteration count depending on the
/// format.
pub struct TokenizedHash<'a> {
    pub format: Format,
    pub options: &'a str,
    pub salt: &'a str,
    pub hash: &'a str,
}

impl<'a> TryFrom<&'a str> for TokenizedHash<'a> {
    type Error = PwHashError;

    fn try_from(s: &'a str) -> Result<Self, Self::Error> {
        let fields: Vec<&str> = s.split('$').collect();

        if fields.len() < MIN_FIELDS {
            return Err(PwHashError::InvalidHash("Too few '$'-delimited fields"));
        }

        let sig = match SIGNATURES
            .iter()
            .find(|sig| fields.len() == sig.field_count && s.starts_with(sig.prefix))
        {
            Some(sig) => sig,
            None => return Err(PwHashError::InvalidHash("Unrecognized hash format")),
        };

        Ok(Self {
            format: sig.format,
            options: fields[sig.options],
            salt: fields[sig.salt],
            hash: fields[sig.hash],
        })
    }
}

/// Parses an option list like `m=65536,t=1,p=4` into its values. Keys the caller does not
/// need are kept; a segment without `=`, a value that is not a non-negative integer, or a
/// repeated key rejects the whole list.
pub fn parse_options(s: &str) -> Result<HashMap<&str, u64>, PwHashError> {
    let mut options = HashMap::new();

    for segment in s.split(',') {
        let (key, value) = match segment.split_once('=') {
            Some(kv) => kv,
            None => return Err(PwHashError::InvalidHash("Option is missing '='")),
        };

        let value: u64 = match value.parse() {
            Ok(v) => v,
            Err(_) => return Err(PwHashError::InvalidHash("Option value is not an integer")),
        };

        if options.insert(key, value).is_some() {
            return Err(PwHashError::InvalidHash("Duplicate option key"));
        }
    }

    Ok(options)
}
