use crate::error::HexError;

/// Decode a hex payload, ignoring any ASCII whitespace between digits.
///
/// `"AA BB"`, `"AABB"` and `"AA\nBB"` all decode to `[0xAA, 0xBB]`.
pub fn decode_hex(text: &str) -> Result<Vec<u8>, HexError> {
    let digits = text
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .enumerate()
        .map(|(position, character)| {
            character
                .to_digit(16)
                .map(|d| d as u8)
                .ok_or(HexError::InvalidCharacter {
                    character,
                    position,
                })
        })
        .collect::<Result<Vec<u8>, HexError>>()?;

    if digits.is_empty() {
        return Err(HexError::Empty);
    }
    if digits.len() % 2 != 0 {
        return Err(HexError::OddLength(digits.len()));
    }

    Ok(digits.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}

/// Format bytes as space-separated uppercase hex
pub fn format_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
