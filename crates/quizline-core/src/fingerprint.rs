//! Stable question identity and content digests.
//!
//! The id covers only subject and prompt, the digest covers the full
//! content. Editing options or the explanation keeps the id and changes the
//! digest, which is how the version ledger notices a changed question.

use std::fmt::Write;

use sha2::{Digest, Sha256};

use crate::model::Question;

/// Field separator; ASCII unit separator never appears in question text.
const FIELD_SEPARATOR: char = '\u{1f}';

/// Length of a question id in hex characters.
const ID_LEN: usize = 16;

/// Stable identifier derived from `(subject, prompt)` only.
pub fn question_id(q: &Question) -> String {
    let mut hex = sha256_hex(&[q.subject(), q.prompt()]);
    hex.truncate(ID_LEN);
    hex
}

/// SHA-256 over subject, prompt, each option in order, and explanation.
pub fn digest(q: &Question) -> String {
    let mut fields: Vec<&str> = Vec::with_capacity(7);
    fields.push(q.subject());
    fields.push(q.prompt());
    fields.extend(q.options().iter().map(String::as_str));
    fields.push(q.explanation());
    sha256_hex(&fields)
}

/// Hex SHA-256 of `fields` joined by the field separator.
pub(crate) fn sha256_hex(fields: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            let mut buf = [0u8; 4];
            hasher.update(FIELD_SEPARATOR.encode_utf8(&mut buf).as_bytes());
        }
        hasher.update(field.as_bytes());
    }
    hasher
        .finalize()
        .iter()
        .fold(String::with_capacity(64), |mut acc, b| {
            let _ = write!(acc, "{b:02x}");
            acc
        })
}
