// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Base45 (RFC 9285) text encoding.
//!
//! Two bytes `[a, b]` become the value `n = a * 256 + b`, written as three
//! characters `c, d, e` with `n = c + d * 45 + e * 45²`. A trailing single
//! byte becomes two characters.

const ALPHABET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Base45Error {
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("invalid length {0}: a trailing group of one character cannot be decoded")]
    InvalidLength(usize),

    #[error("group at position {position} decodes to {value}, which exceeds {max}")]
    ValueOverflow { position: usize, value: u32, max: u32 },
}

fn char_value(input: &str, position: usize) -> Result<u32, Base45Error> {
    let byte = input.as_bytes()[position];
    match ALPHABET.iter().position(|&c| c == byte) {
        Some(v) => Ok(v as u32),
        None => Err(Base45Error::InvalidCharacter {
            character: input
                .get(position..)
                .and_then(|rest| rest.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER),
            position,
        }),
    }
}

/// Decode Base45 text into bytes.
pub fn decode(input: &str) -> Result<Vec<u8>, Base45Error> {
    let len = input.len();
    if len % 3 == 1 {
        return Err(Base45Error::InvalidLength(len));
    }

    let mut out = Vec::with_capacity(len / 3 * 2 + 1);
    let mut position = 0;
    while position + 3 <= len {
        let value = char_value(input, position)?
            + char_value(input, position + 1)? * 45
            + char_value(input, position + 2)? * 45 * 45;
        if value > 0xFFFF {
            return Err(Base45Error::ValueOverflow {
                position,
                value,
                max: 0xFFFF,
            });
        }
        out.extend_from_slice(&(value as u16).to_be_bytes());
        position += 3;
    }

    if position < len {
        // len % 3 == 2
        let value = char_value(input, position)? + char_value(input, position + 1)? * 45;
        if value > 0xFF {
            return Err(Base45Error::ValueOverflow {
                position,
                value,
                max: 0xFF,
            });
        }
        out.push(value as u8);
    }

    Ok(out)
}

/// Encode bytes as Base45 text.
pub fn encode(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len() / 2 * 3 + 2);
    let mut push = |mut value: u32, digits: usize| {
        for _ in 0..digits {
            out.push(ALPHABET[(value % 45) as usize] as char);
            value /= 45;
        }
    };

    let mut chunks = input.chunks_exact(2);
    for pair in &mut chunks {
        push((u32::from(pair[0]) << 8) | u32::from(pair[1]), 3);
    }
    if let [last] = chunks.remainder() {
        push(u32::from(*last), 2);
    }
    out
}
