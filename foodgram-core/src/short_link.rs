//! Short links for recipes.
//!
//! A recipe id is obfuscated by reversing the order of its low 24 bits and
//! then written in base 31 over a shuffled alphabet. Bit reversal is its own
//! inverse, so decoding runs the same steps backwards. This is not meant to
//! be secret, only to keep neighbouring ids from producing neighbouring tokens.

use crate::error::ShortLinkError;

const ALPHABET: &[u8; 31] = b"mn6j2c4rv8bpygw95z7hsdaetxuk3fq";
const BLOCK_SIZE: u32 = 24;
const MIN_LENGTH: usize = 5;

fn reverse_block(value: u64) -> u64 {
    let mask = (1u64 << BLOCK_SIZE) - 1;
    let low = value & mask;
    let reversed = (0..BLOCK_SIZE)
        .filter(|bit| low & (1 << bit) != 0)
        .fold(0u64, |acc, bit| acc | (1 << (BLOCK_SIZE - 1 - bit)));
    (value & !mask) | reversed
}

fn digit_value(c: char) -> Option<u64> {
    ALPHABET
        .iter()
        .position(|&b| char::from(b) == c)
        .map(|p| p as u64)
}

/// Encode a recipe id as a short token.
pub fn encode(id: u32) -> String {
    let base = ALPHABET.len() as u64;
    let mut value = reverse_block(u64::from(id));

    let mut digits = Vec::new();
    loop {
        digits.push(ALPHABET[(value % base) as usize]);
        value /= base;
        if value == 0 {
            break;
        }
    }
    while digits.len() < MIN_LENGTH {
        digits.push(ALPHABET[0]);
    }
    digits.reverse();

    // Alphabet is ASCII
    digits.into_iter().map(char::from).collect()
}

/// Decode a token back into the recipe id it was made from.
///
/// Whether a recipe with that id exists is for the caller to check.
pub fn decode(token: &str) -> Result<u32, ShortLinkError> {
    if token.is_empty() {
        return Err(ShortLinkError::Empty);
    }

    let base = ALPHABET.len() as u64;
    let mut value: u64 = 0;
    for c in token.chars() {
        let digit = digit_value(c).ok_or(ShortLinkError::InvalidCharacter(c))?;
        value = value
            .checked_mul(base)
            .and_then(|v| v.checked_add(digit))
            .ok_or(ShortLinkError::OutOfRange)?;
    }

    let id = reverse_block(value);
    match u32::try_from(id) {
        Ok(0) | Err(_) => Err(ShortLinkError::OutOfRange),
        Ok(id) => Ok(id),
    }
}
