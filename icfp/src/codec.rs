//! The 94-symbol wire alphabet.
//!
//! Literal payloads only ever use the bytes `!` (33) through `~` (126). A string
//! body maps each byte `b` to the glyph at `ALPHABET[b - 33]`; an integer body reads
//! the same bytes as base-94 digits, most significant first.

use num_bigint::{BigInt, BigUint};

use crate::prelude::*;

/// Glyph order of the string encoding: the glyph at index `i` travels as byte `33 + i`.
pub const ALPHABET: &[u8; 94] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!\"#$%&'()*+,-./:;<=>?@[\\]^_`|~ \n";

pub const BASE: u32 = 94;

const FIRST: u8 = b'!';
const LAST: u8 = b'~';

fn wire_digit(c: char, offset: usize) -> Result<u8> {
    match u8::try_from(c) {
        Ok(b @ FIRST..=LAST) => Ok(b - FIRST),
        _ => Err(Error::OutOfAlphabet { found: c, offset }),
    }
}

/// Checks that every byte of an opaque payload is a wire byte.
pub fn check_wire(body: &str) -> Result<()> {
    body.chars()
        .enumerate()
        .try_for_each(|(offset, c)| wire_digit(c, offset).map(drop))
}

pub fn decode_text(body: &str) -> Result<String> {
    body.chars()
        .enumerate()
        .map(|(offset, c)| wire_digit(c, offset).map(|i| char::from(ALPHABET[usize::from(i)])))
        .collect()
}

pub fn encode_text(text: &str) -> Result<String> {
    text.chars()
        .enumerate()
        .map(|(offset, c)| {
            ALPHABET
                .iter()
                .position(|&glyph| char::from(glyph) == c)
                .map(|i| char::from(FIRST + i as u8))
                .ok_or(Error::OutOfAlphabet { found: c, offset })
        })
        .collect()
}

pub fn decode_integer(body: &str) -> Result<BigUint> {
    if body.is_empty() {
        return Err(Error::EmptyInteger);
    }
    body.chars()
        .enumerate()
        .try_fold(BigUint::default(), |value, (offset, c)| {
            Ok(value * BASE + u32::from(wire_digit(c, offset)?))
        })
}

/// Base-94 digits of `n`. Zero is the lone digit `!`; nothing else starts with `!`.
pub fn encode_natural(n: &BigUint) -> String {
    if n.bits() == 0 {
        return char::from(FIRST).to_string();
    }
    n.to_radix_be(BASE)
        .into_iter()
        .map(|digit| char::from(FIRST + digit))
        .collect()
}

pub fn encode_integer(n: &BigInt) -> Result<String> {
    let n = n
        .to_biguint()
        .ok_or_else(|| Error::NegativeIntegerUnsupported(n.clone()))?;
    Ok(encode_natural(&n))
}

/// Formats a natural number as its base-94 wire digits.
#[derive(Debug, Clone, Copy)]
pub struct Base94<'a>(pub &'a BigUint);

impl std::fmt::Display for Base94<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&encode_natural(self.0))
    }
}
