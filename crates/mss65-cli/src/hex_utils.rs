//! Address parsing and formatting utilities.

use anyhow::Result;

/// Parse an address given in decimal or as hex with a 0x prefix.
///
/// Calibration addresses are usually quoted in decimal, disassembler
/// output in hex.
pub fn parse_address(s: &str) -> Result<u64> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).map_err(|e| anyhow::anyhow!("Invalid hex address: {}", e))
    } else {
        s.parse::<u64>()
            .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))
    }
}

/// Format an address as a hex string with 0x prefix.
pub fn format_hex_address(addr: u64) -> String {
    format!("0x{:X}", addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_hex() {
        assert_eq!(parse_address("0x1000").unwrap(), 0x1000);
        assert_eq!(parse_address("0X1f0a8").unwrap(), 0x1F0A8);
    }

    #[test]
    fn test_parse_address_decimal() {
        assert_eq!(parse_address("127144").unwrap(), 127_144);
        assert_eq!(parse_address(" 36000 ").unwrap(), 36_000);
    }

    #[test]
    fn test_parse_address_invalid() {
        assert!(parse_address("GHIJK").is_err());
        assert!(parse_address("0xZZZ").is_err());
        assert!(parse_address("1F0A8").is_err());
        assert!(parse_address("").is_err());
    }

    #[test]
    fn test_format_hex_address() {
        assert_eq!(format_hex_address(0x1000), "0x1000");
        assert_eq!(format_hex_address(127_144), "0x1F0A8");
        assert_eq!(format_hex_address(0), "0x0");
    }
}
