//! Session codes.
//!
//! Codes are short uppercase alphanumeric tokens that players read to each
//! other. They are normalised on the way in so a code typed in lowercase
//! still finds its session.

use derive_more::Display;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::VecDeque;
use tracing::instrument;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Default code length.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Opaque session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SessionCode(String);

impl SessionCode {
    /// Normalises user input into a code.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_uppercase())
    }

    /// Returns the code text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionCode {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for SessionCode {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<SessionCode> for String {
    fn from(code: SessionCode) -> Self {
        code.0
    }
}

impl JsonSchema for SessionCode {
    fn schema_name() -> Cow<'static, str> {
        "SessionCode".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        String::json_schema(generator)
    }
}

/// Supplies candidate codes to the registry.
///
/// Candidates may collide with live sessions; the registry checks and
/// asks again.
pub trait CodeSource {
    /// Produces the next candidate code.
    fn next_code(&mut self) -> SessionCode;
}

/// Random codes drawn from `[A-Z0-9]`.
#[derive(Debug, Clone)]
pub struct RandomCodes {
    rng: StdRng,
    length: usize,
}

impl RandomCodes {
    /// Creates a source seeded from system entropy.
    #[instrument]
    pub fn new(length: usize) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            length,
        }
    }

    /// Creates a reproducible source.
    pub fn seeded(seed: u64, length: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            length,
        }
    }
}

impl Default for RandomCodes {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeSource for RandomCodes {
    fn next_code(&mut self) -> SessionCode {
        let code: String = (0..self.length)
            .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        SessionCode(code)
    }
}

/// Hands out a fixed list of codes, repeating the last one when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceCodes {
    queue: VecDeque<SessionCode>,
    last: SessionCode,
}

impl SequenceCodes {
    /// Creates a source from the given codes.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let queue: VecDeque<SessionCode> = codes.into_iter().map(SessionCode::new).collect();
        let last = queue.back().cloned().unwrap_or_else(|| SessionCode::new("AAAAAA"));
        Self { queue, last }
    }
}

impl CodeSource for SequenceCodes {
    fn next_code(&mut self) -> SessionCode {
        self.queue.pop_front().unwrap_or_else(|| self.last.clone())
    }
}
