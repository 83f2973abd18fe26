//! Western Gen 3 text encoding.

use crate::core_api::CoreError;

pub const TERMINATOR: u8 = 0xFF;

const PUNCTUATION: &[(u8, char)] = &[
    (0x00, ' '),
    (0xAB, '!'),
    (0xAC, '?'),
    (0xAD, '.'),
    (0xAE, '-'),
    (0xB0, '…'),
    (0xB1, '“'),
    (0xB2, '”'),
    (0xB3, '‘'),
    (0xB4, '\''),
    (0xB5, '♂'),
    (0xB6, '♀'),
    (0xB8, ','),
    (0xBA, '/'),
    (0xF0, ':'),
];

pub fn decode_char(byte: u8) -> char {
    match byte {
        0xA1..=0xAA => char::from(b'0' + (byte - 0xA1)),
        0xBB..=0xD4 => char::from(b'A' + (byte - 0xBB)),
        0xD5..=0xEE => char::from(b'a' + (byte - 0xD5)),
        _ => PUNCTUATION
            .iter()
            .find(|(code, _)| *code == byte)
            .map(|(_, c)| *c)
            .unwrap_or('?'),
    }
}

pub fn encode_char(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(0xA1 + (c as u8 - b'0')),
        'A'..='Z' => Some(0xBB + (c as u8 - b'A')),
        'a'..='z' => Some(0xD5 + (c as u8 - b'a')),
        _ => PUNCTUATION
            .iter()
            .find(|(_, ch)| *ch == c)
            .map(|(code, _)| *code),
    }
}

/// Decode up to the first terminator.
pub fn decode(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| b != TERMINATOR)
        .map(|&b| decode_char(b))
        .collect()
}

/// Encode into a fixed-width field, padding with terminators.
pub fn encode_fixed<const N: usize>(text: &str) -> Result<[u8; N], CoreError> {
    let count = text.chars().count();
    if count > N {
        return Err(CoreError::invalid_argument(format!(
            "text {text:?} is {count} characters, at most {N} fit"
        )));
    }

    let mut out = [TERMINATOR; N];
    for (slot, c) in out.iter_mut().zip(text.chars()) {
        *slot = encode_char(c).ok_or_else(|| {
            CoreError::invalid_argument(format!("character {c:?} has no Gen 3 encoding"))
        })?;
    }
    Ok(out)
}
