use super::layout::field;

/// Unsigned 16-bit little-endian encoding
pub fn encode_u16_le(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

/// Encode a temperature breakpoint as the ECU stores it:
/// `round((celsius + 273.2) * 10)` as u16 little-endian.
///
/// Values outside the u16 range saturate.
pub fn encode_temperature(celsius: f64) -> [u8; 2] {
    let scaled = ((celsius + field::TEMPERATURE_BIAS) * field::TEMPERATURE_SCALE).round();
    encode_u16_le(scaled as u16)
}

/// Concatenate u16 values into a little-endian byte run
pub fn encode_u16_array(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|&v| encode_u16_le(v)).collect()
}

pub fn encode_temperature_array(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|&c| encode_temperature(c)).collect()
}
