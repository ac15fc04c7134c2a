use crate::error::AccountError;

const MODULUS: u32 = 97;

/// The numeric value of an account character: digits are 0-9, and the letters
/// A-Z are 10-35. Anything else has no encoding.
#[inline]
pub fn char_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => Some(c as u32 - '0' as u32),
        'A'..='Z' => Some(c as u32 - 'A' as u32 + 10),
        _ => None,
    }
}

/// Fails on the first character that [char_value] cannot encode.
pub fn check_charset(input: &str) -> Result<(), AccountError> {
    match input
        .chars()
        .enumerate()
        .find(|(_, c)| char_value(*c).is_none())
    {
        Some((position, character)) => Err(AccountError::InvalidCharacter {
            character,
            position,
        }),
        None => Ok(()),
    }
}

/// Replaces every character by its decimal value. Letters become two digits,
/// so "DE00" encodes to "131400".
pub fn encode(input: &str) -> Result<String, AccountError> {
    let mut encoded = String::with_capacity(input.len() * 2);
    for (position, character) in input.chars().enumerate() {
        let value = char_value(character).ok_or(AccountError::InvalidCharacter {
            character,
            position,
        })?;
        encoded.push_str(&value.to_string());
    }
    Ok(encoded)
}

/// Reduces the encoded form of `input` modulo 97, one character at a time.
/// The (possibly very large) encoded number is never built.
pub fn encoded_mod97(input: &str) -> Result<u32, AccountError> {
    let mut remainder = 0;
    for (position, character) in input.chars().enumerate() {
        let value = char_value(character).ok_or(AccountError::InvalidCharacter {
            character,
            position,
        })?;
        let shift = if value < 10 { 10 } else { 100 };
        remainder = (remainder * shift + value) % MODULUS;
    }
    Ok(remainder)
}
